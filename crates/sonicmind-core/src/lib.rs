pub mod command;
pub mod config;
pub mod error;
pub mod intent;
pub mod interfaces;
pub mod lifecycle;

pub use command::{ActionResult, ActionStatus, Command, CommandSource};
pub use error::{AssistantError, AssistantResult};
pub use intent::{Intent, LabelScore};

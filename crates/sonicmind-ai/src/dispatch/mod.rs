pub mod jokes;
pub mod processor;
pub mod registry;

pub use processor::CommandProcessor;
pub use registry::{ActionContext, ActionRegistry, Handler};

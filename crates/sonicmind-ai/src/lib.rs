pub mod actions;
pub mod assistant;
pub mod dispatch;
pub mod events;
pub mod intent;
pub mod voice;

pub use assistant::Assistant;
pub use dispatch::CommandProcessor;
pub use events::{AssistantEvent, ChannelSink};

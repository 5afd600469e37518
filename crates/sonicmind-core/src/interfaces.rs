//! Contracts between the command processor and the outside world.
//!
//! Classification, speech, playback and search are consumed through these
//! traits. Concrete adapters live in sonicmind-ai; tests substitute mocks.

use async_trait::async_trait;

use crate::command::{ActionResult, CommandSource};
use crate::error::AssistantResult;
use crate::intent::{Intent, LabelScore};

/// Zero-shot text classifier over a closed label set.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Score `text` against `labels`, best match first.
    async fn classify(&self, text: &str, labels: &[&str]) -> AssistantResult<Vec<LabelScore>>;
}

/// Blocking capture of one spoken utterance.
#[async_trait]
pub trait SpeechCapture: Send + Sync {
    /// Returns the transcript, or `SpeechUnrecognized` / `SpeechServiceUnavailable`.
    async fn listen(&self) -> AssistantResult<String>;
}

/// Text-to-speech output. Callers treat failures as non-fatal.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn speak(&self, text: &str) -> AssistantResult<()>;
}

/// Finds and starts playback of a video matching the query.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn play(&self, query: &str) -> AssistantResult<()>;
}

/// Shows web search results for the query.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> AssistantResult<()>;
}

/// Renders assistant feedback to the user.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: &AssistantEvent);
}

/// Feedback emitted while a command moves through the assistant.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantEvent {
    /// Microphone is open.
    Listening,
    /// Input accepted for processing.
    Heard { source: CommandSource, text: String },
    IntentDetected(Intent),
    /// Final outcome. Exactly one per command.
    Completed(ActionResult),
}

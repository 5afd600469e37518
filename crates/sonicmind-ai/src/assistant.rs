use std::sync::Arc;

use sonicmind_core::interfaces::{AssistantEvent, NotificationSink, SpeechCapture};
use sonicmind_core::{ActionResult, AssistantError, Command, Intent};

use crate::dispatch::CommandProcessor;

pub const EMPTY_TYPED_COMMAND: &str = "Please type a command first!";

/// Front end of the assistant. Owns the processor and the speech capture
/// handle, and reports every step to the notification sink.
///
/// Each trigger produces exactly one `Completed` event and returns the same result.
pub struct Assistant {
    processor: CommandProcessor,
    capture: Arc<dyn SpeechCapture>,
    sink: Arc<dyn NotificationSink>,
}

impl Assistant {
    pub fn new(
        processor: CommandProcessor,
        capture: Arc<dyn SpeechCapture>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        tracing::info!("Assistant ready");
        Self {
            processor,
            capture,
            sink,
        }
    }

    /// The "run typed command" trigger.
    pub async fn run_typed(&self, text: &str) -> ActionResult {
        let command = Command::typed(text);
        if command.is_blank() {
            return self.complete(ActionResult::warning(Intent::Unknown, EMPTY_TYPED_COMMAND));
        }
        self.handle(command).await
    }

    /// The "speak" trigger: capture one utterance and process it.
    pub async fn run_spoken(&self) -> ActionResult {
        self.sink.notify(&AssistantEvent::Listening);

        match self.capture.listen().await {
            Ok(transcript) => self.handle(Command::voice(transcript)).await,
            Err(e) if e.is_speech_failure() => {
                tracing::warn!("Speech capture failed: {e}");
                self.complete(ActionResult::error(Intent::Unknown, e.to_string()))
            }
            Err(e) => {
                tracing::error!("Speech capture raised an unexpected error: {e}");
                let unavailable = AssistantError::service_unavailable(e.to_string());
                self.complete(ActionResult::error(Intent::Unknown, unavailable.to_string()))
            }
        }
    }

    async fn handle(&self, command: Command) -> ActionResult {
        self.sink.notify(&AssistantEvent::Heard {
            source: command.source(),
            text: command.text().to_string(),
        });

        let intent = self.processor.resolve_intent(command.text()).await;
        self.sink.notify(&AssistantEvent::IntentDetected(intent));

        let result = match self.processor.dispatch(intent, &command).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Command failed: {e}");
                ActionResult::error(intent, e.to_string())
            }
        };
        self.complete(result)
    }

    fn complete(&self, result: ActionResult) -> ActionResult {
        self.sink.notify(&AssistantEvent::Completed(result.clone()));
        result
    }

    /// Release collaborator handles. Consumes the assistant.
    pub fn shutdown(self) {
        tracing::info!("Releasing assistant collaborators");
        drop(self);
    }
}

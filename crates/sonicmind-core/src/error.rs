use thiserror::Error;

/// Failures a command can run into, from capture through dispatch.
///
/// The two speech variants display as the literal text shown to the user.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Sorry, I couldn't understand you.")]
    SpeechUnrecognized,

    #[error("Speech recognition service unavailable.")]
    SpeechServiceUnavailable { reason: String },

    #[error("Intent classification failed: {0}")]
    Classifier(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("{action} failed: {reason}")]
    ExternalAction { action: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AssistantError {
    pub fn service_unavailable(reason: impl Into<String>) -> Self {
        Self::SpeechServiceUnavailable {
            reason: reason.into(),
        }
    }

    pub fn external_action(action: impl Into<String>, reason: impl ToString) -> Self {
        Self::ExternalAction {
            action: action.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors raised while capturing speech, before any command exists.
    pub fn is_speech_failure(&self) -> bool {
        matches!(
            self,
            Self::SpeechUnrecognized | Self::SpeechServiceUnavailable { .. }
        )
    }
}

pub type AssistantResult<T> = Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_errors_display_literal_messages() {
        assert_eq!(
            AssistantError::SpeechUnrecognized.to_string(),
            "Sorry, I couldn't understand you."
        );
        assert_eq!(
            AssistantError::service_unavailable("no input device").to_string(),
            "Speech recognition service unavailable."
        );
    }

    #[test]
    fn external_action_names_the_action() {
        let err = AssistantError::external_action("Video playback", "browser missing");
        assert_eq!(err.to_string(), "Video playback failed: browser missing");
        assert!(!err.is_speech_failure());
    }

    #[test]
    fn speech_failures_are_flagged() {
        assert!(AssistantError::SpeechUnrecognized.is_speech_failure());
        assert!(AssistantError::service_unavailable("x").is_speech_failure());
        assert!(!AssistantError::Classifier("x".into()).is_speech_failure());
    }
}

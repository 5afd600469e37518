use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::intent::Intent;

/// Where a command came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandSource {
    Voice,
    Typed,
}

/// Raw user input. Immutable once captured.
#[derive(Debug, Clone, Serialize)]
pub struct Command {
    text: String,
    source: CommandSource,
    captured_at: DateTime<Utc>,
}

impl Command {
    /// A command typed by the user, kept as entered.
    pub fn typed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: CommandSource::Typed,
            captured_at: Utc::now(),
        }
    }

    /// A transcribed utterance. Transcripts are lowercased at capture.
    pub fn voice(text: impl AsRef<str>) -> Self {
        Self {
            text: text.as_ref().to_lowercase(),
            source: CommandSource::Voice,
            captured_at: Utc::now(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> CommandSource {
        self.source
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Success,
    Warning,
    Error,
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionStatus::Success => "success",
            ActionStatus::Warning => "warning",
            ActionStatus::Error => "error",
        })
    }
}

/// Outcome of one command, consumed immediately by the notification sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub intent: Intent,
    pub status: ActionStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoken: Option<String>,
}

impl ActionResult {
    pub fn success(intent: Intent, message: impl Into<String>, spoken: impl Into<String>) -> Self {
        Self {
            intent,
            status: ActionStatus::Success,
            message: message.into(),
            spoken: Some(spoken.into()),
        }
    }

    pub fn warning(intent: Intent, message: impl Into<String>) -> Self {
        Self {
            intent,
            status: ActionStatus::Warning,
            message: message.into(),
            spoken: None,
        }
    }

    pub fn error(intent: Intent, message: impl Into<String>) -> Self {
        Self {
            intent,
            status: ActionStatus::Error,
            message: message.into(),
            spoken: None,
        }
    }

    pub fn with_spoken(mut self, spoken: impl Into<String>) -> Self {
        self.spoken = Some(spoken.into());
        self
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a command asks the assistant to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    PlayMusic,
    TellJoke,
    SearchWeb,
    Greeting,
    Unknown,
}

impl Intent {
    /// Every intent, in the order the labels are offered to a classifier.
    pub const ALL: [Intent; 5] = [
        Intent::PlayMusic,
        Intent::TellJoke,
        Intent::SearchWeb,
        Intent::Greeting,
        Intent::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Intent::PlayMusic => "play_music",
            Intent::TellJoke => "tell_joke",
            Intent::SearchWeb => "search_web",
            Intent::Greeting => "greeting",
            Intent::Unknown => "unknown",
        }
    }

    /// Candidate labels for zero-shot classification.
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|i| i.label()).collect()
    }

    /// Map a classifier label back to an intent. Anything unrecognized is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Intent::Unknown)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "play_music" => Ok(Intent::PlayMusic),
            "tell_joke" => Ok(Intent::TellJoke),
            "search_web" => Ok(Intent::SearchWeb),
            "greeting" => Ok(Intent::Greeting),
            "unknown" => Ok(Intent::Unknown),
            other => Err(format!("Unknown intent label: {other}")),
        }
    }
}

/// One ranked entry of a classifier result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Sort scores best-first. NaN scores sink to the bottom.
pub fn rank(scores: &mut [LabelScore]) {
    scores.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or_else(|| a.score.is_nan().cmp(&b.score.is_nan()))
    });
}

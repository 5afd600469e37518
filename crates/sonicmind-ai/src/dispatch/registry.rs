//! Intent → handler mapping, keyword tie-break rules and payload extraction.

use sonicmind_core::interfaces::{SpeechSynthesizer, VideoSearch, WebSearch};
use sonicmind_core::{ActionResult, AssistantResult, Intent};

use super::jokes::random_joke;

pub const PLAY_KEYWORD: &str = "play";
pub const SEARCH_KEYWORD: &str = "search";

pub const GREETING: &str = "Hello! How can I help you today?";
pub const MISSING_SONG: &str = "Please specify which song you want to play.";
pub const MISSING_QUERY: &str = "Please tell me what to search for.";
pub const NOT_UNDERSTOOD: &str = "Could not understand your command.";
pub const NOT_UNDERSTOOD_SPOKEN: &str = "Sorry, I didn't understand the command.";

/// The fixed set of actions a command can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    PlayMusic,
    TellJoke,
    SearchWeb,
    Greet,
    Unknown,
}

/// Collaborators a handler may call.
pub struct ActionContext<'a> {
    pub video: &'a dyn VideoSearch,
    pub web: &'a dyn WebSearch,
    pub synthesizer: &'a dyn SpeechSynthesizer,
}

impl ActionContext<'_> {
    /// Speak best-effort. Synthesis failures never fail the command.
    async fn say(&self, text: &str) {
        if let Err(e) = self.synthesizer.speak(text).await {
            tracing::warn!("Speech synthesis failed (ignored): {e}");
        }
    }
}

impl Handler {
    pub fn intent(self) -> Intent {
        match self {
            Handler::PlayMusic => Intent::PlayMusic,
            Handler::TellJoke => Intent::TellJoke,
            Handler::SearchWeb => Intent::SearchWeb,
            Handler::Greet => Intent::Greeting,
            Handler::Unknown => Intent::Unknown,
        }
    }

    /// Keyword stripped from the text to obtain this handler's payload.
    pub fn payload_keyword(self) -> Option<&'static str> {
        match self {
            Handler::PlayMusic => Some(PLAY_KEYWORD),
            Handler::SearchWeb => Some(SEARCH_KEYWORD),
            _ => None,
        }
    }

    /// Run the handler against the raw command text.
    ///
    /// Only a failing video or web action produces `Err`.
    pub async fn execute(self, text: &str, ctx: &ActionContext<'_>) -> AssistantResult<ActionResult> {
        let intent = self.intent();
        let payload = self
            .payload_keyword()
            .and_then(|keyword| extract_payload(text, keyword));
        match self {
            Handler::PlayMusic => {
                let Some(song) = payload else {
                    return Ok(ActionResult::warning(intent, MISSING_SONG));
                };
                let spoken = format!("Playing {song}");
                ctx.say(&spoken).await;
                tracing::info!("Playing '{song}'");
                ctx.video.play(&song).await?;
                Ok(ActionResult::success(
                    intent,
                    format!("Playing {song} on YouTube..."),
                    spoken,
                ))
            }
            Handler::TellJoke => {
                let joke = random_joke();
                ctx.say(joke).await;
                Ok(ActionResult::success(intent, joke, joke))
            }
            Handler::SearchWeb => {
                let Some(query) = payload else {
                    return Ok(ActionResult::warning(intent, MISSING_QUERY));
                };
                let spoken = format!("Searching for {query}");
                ctx.say(&spoken).await;
                tracing::info!("Searching for '{query}'");
                ctx.web.search(&query).await?;
                Ok(ActionResult::success(
                    intent,
                    format!("Searching Google for {query}..."),
                    spoken,
                ))
            }
            Handler::Greet => {
                ctx.say(GREETING).await;
                Ok(ActionResult::success(intent, GREETING, GREETING))
            }
            Handler::Unknown => {
                ctx.say(NOT_UNDERSTOOD_SPOKEN).await;
                Ok(ActionResult::warning(intent, NOT_UNDERSTOOD).with_spoken(NOT_UNDERSTOOD_SPOKEN))
            }
        }
    }
}

/// Fixed intent → handler table plus the ordered keyword overrides.
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    keyword_rules: Vec<(&'static str, Intent)>,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            keyword_rules: vec![
                (PLAY_KEYWORD, Intent::PlayMusic),
                (SEARCH_KEYWORD, Intent::SearchWeb),
            ],
        }
    }

    pub fn resolve(&self, intent: Intent) -> Handler {
        match intent {
            Intent::PlayMusic => Handler::PlayMusic,
            Intent::TellJoke => Handler::TellJoke,
            Intent::SearchWeb => Handler::SearchWeb,
            Intent::Greeting => Handler::Greet,
            Intent::Unknown => Handler::Unknown,
        }
    }

    /// First keyword rule whose trigger appears in the text.
    pub fn keyword_intent(&self, text: &str) -> Option<Intent> {
        self.keyword_rules
            .iter()
            .find(|(keyword, _)| contains_keyword(text, keyword))
            .map(|(_, intent)| *intent)
    }

    /// Tie-break between the classifier label and the keyword rules.
    /// A trigger keyword in the text always wins.
    pub fn apply_override(&self, classified: Intent, text: &str) -> Intent {
        match self.keyword_intent(text) {
            Some(keyword_intent) => {
                if keyword_intent != classified {
                    tracing::info!(
                        "Keyword override: classifier said {classified}, using {keyword_intent}"
                    );
                }
                keyword_intent
            }
            None => classified,
        }
    }
}

/// ASCII case-insensitive substring test.
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    text.to_ascii_lowercase()
        .contains(&keyword.to_ascii_lowercase())
}

/// Remove every occurrence of `keyword` (ASCII case-insensitive) and trim.
/// Returns `None` when nothing is left.
pub fn extract_payload(text: &str, keyword: &str) -> Option<String> {
    let needle = keyword.to_ascii_lowercase();
    let stripped = if needle.is_empty() {
        text.to_string()
    } else {
        // ASCII lowercasing keeps byte offsets aligned with `text`.
        let lower = text.to_ascii_lowercase();
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for (idx, _) in lower.match_indices(&needle) {
            out.push_str(&text[last..idx]);
            last = idx + needle.len();
        }
        out.push_str(&text[last..]);
        out
    };

    let payload = stripped.trim();
    (!payload.is_empty()).then(|| payload.to_string())
}

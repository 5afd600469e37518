use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub actions: ActionsConfig,
}

/// Which intent classifier to use and how to reach it.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// "huggingface" for the hosted zero-shot endpoint, "keyword" for the offline heuristic.
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Name of the environment variable holding the API token.
    #[serde(default = "default_api_token_env")]
    pub api_token_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Top scores below this are treated as `unknown` (0.0 disables the check).
    #[serde(default)]
    pub min_confidence: f32,
}

fn default_backend() -> String {
    "huggingface".into()
}
fn default_model() -> String {
    "typeform/distilbert-base-uncased-mnli".into()
}
fn default_api_url() -> String {
    "https://api-inference.huggingface.co".into()
}
fn default_api_token_env() -> String {
    "HF_API_TOKEN".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            model: default_model(),
            api_url: default_api_url(),
            api_token_env: default_api_token_env(),
            timeout_secs: default_timeout_secs(),
            min_confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    /// Whether the microphone listener is built at startup.
    #[serde(default = "default_true")]
    pub listen_enabled: bool,
    #[serde(default = "default_whisper_model")]
    pub whisper_model: String,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Trailing silence that ends an utterance.
    #[serde(default = "default_silence_secs")]
    pub silence_secs: f32,
    #[serde(default = "default_max_record_secs")]
    pub max_record_secs: u32,
    /// "piper", "command", or "none".
    #[serde(default = "default_tts_engine")]
    pub tts_engine: String,
    #[serde(default = "default_piper_binary")]
    pub piper_binary: String,
    #[serde(default)]
    pub piper_model: String,
    #[serde(default)]
    pub piper_config: String,
    /// Player fed piper's raw 22.05 kHz PCM on stdin.
    #[serde(default = "default_piper_player")]
    pub piper_player: String,
    /// Program that takes the text to speak as its last argument.
    #[serde(default = "default_tts_command")]
    pub tts_command: String,
}

fn default_true() -> bool {
    true
}
fn default_whisper_model() -> String {
    "models/ggml-base.en.bin".into()
}
fn default_sample_rate() -> u32 {
    16000
}
fn default_silence_secs() -> f32 {
    1.5
}
fn default_max_record_secs() -> u32 {
    15
}
fn default_tts_engine() -> String {
    "command".into()
}
fn default_piper_binary() -> String {
    "piper".into()
}
fn default_piper_player() -> String {
    "aplay -r 22050 -f S16_LE -c 1 -q".into()
}
fn default_tts_command() -> String {
    "espeak".into()
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            listen_enabled: true,
            whisper_model: default_whisper_model(),
            sample_rate: default_sample_rate(),
            silence_secs: default_silence_secs(),
            max_record_secs: default_max_record_secs(),
            tts_engine: default_tts_engine(),
            piper_binary: default_piper_binary(),
            piper_model: String::new(),
            piper_config: String::new(),
            piper_player: default_piper_player(),
            tts_command: default_tts_command(),
        }
    }
}

/// Settings for the playback and search actions.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionsConfig {
    /// Log target URLs instead of opening a browser or fetching pages.
    #[serde(default)]
    pub dry_run: bool,
    /// Resolve the first matching video and open it directly, rather than the results page.
    #[serde(default = "default_true")]
    pub direct_play: bool,
    #[serde(default = "default_youtube_url")]
    pub youtube_url: String,
    #[serde(default = "default_search_url")]
    pub search_url: String,
}

fn default_youtube_url() -> String {
    "https://www.youtube.com".into()
}
fn default_search_url() -> String {
    "https://www.google.com/search".into()
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            direct_play: true,
            youtube_url: default_youtube_url(),
            search_url: default_search_url(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config with fallback chain: explicit path → ./config/default.toml → hardcoded defaults.
    pub fn load_or_default(explicit_path: Option<&Path>) -> Self {
        if let Some(path) = explicit_path {
            match Self::load(path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {e}", path.display());
                }
            }
        }

        let default_path = Path::new("config/default.toml");
        if default_path.exists() {
            match Self::load(default_path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    tracing::warn!("Failed to load default config: {e}");
                }
            }
        }

        tracing::info!("Using hardcoded default configuration");
        Self::default()
    }
}

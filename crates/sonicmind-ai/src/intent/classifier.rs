use std::time::Duration;

use async_trait::async_trait;
use sonicmind_core::config::ClassifierConfig;
use sonicmind_core::intent::{rank, Intent, LabelScore};
use sonicmind_core::interfaces::IntentClassifier;
use sonicmind_core::{AssistantError, AssistantResult};

use super::parser::parse_classification_response;

/// Client for a hosted zero-shot classification model (Hugging Face inference API shape).
pub struct ZeroShotClassifier {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl ZeroShotClassifier {
    /// Build the client. The API token is read once from the configured env var.
    pub fn new(config: &ClassifierConfig) -> AssistantResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AssistantError::Config(format!("Failed to build HTTP client: {e}")))?;

        let token = std::env::var(&config.api_token_env)
            .ok()
            .filter(|t| !t.trim().is_empty());
        if token.is_none() {
            tracing::warn!(
                "{} not set, calling classifier endpoint anonymously",
                config.api_token_env
            );
        }

        let endpoint = endpoint_url(&config.api_url, &config.model);
        tracing::info!("Zero-shot classifier endpoint: {endpoint}");

        Ok(Self {
            client,
            endpoint,
            token,
        })
    }
}

fn endpoint_url(api_url: &str, model: &str) -> String {
    format!("{}/models/{}", api_url.trim_end_matches('/'), model.trim_matches('/'))
}

#[async_trait]
impl IntentClassifier for ZeroShotClassifier {
    async fn classify(&self, text: &str, labels: &[&str]) -> AssistantResult<Vec<LabelScore>> {
        let body = serde_json::json!({
            "inputs": text,
            "parameters": { "candidate_labels": labels },
        });

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AssistantError::Classifier(format!("Request failed: {e}")))?;
        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|e| AssistantError::Classifier(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let detail = parse_classification_response(&payload)
                .err()
                .map(|e| e.to_string())
                .unwrap_or(payload);
            return Err(AssistantError::Classifier(format!("HTTP {status}: {detail}")));
        }

        let scores = parse_classification_response(&payload)?;
        tracing::debug!("Classifier scores: {scores:?}");
        Ok(scores)
    }
}

/// Offline classifier that scores labels by keyword hits.
///
/// Text with no hits at all goes entirely to `unknown`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    fn keywords(intent: Intent) -> &'static [&'static str] {
        match intent {
            Intent::PlayMusic => &["play", "song", "music", "listen to", "track"],
            Intent::TellJoke => &["joke", "funny", "laugh", "make me smile"],
            Intent::SearchWeb => &["search", "google", "look up", "find", "what is", "who is"],
            Intent::Greeting => &[
                "hello",
                "hi",
                "hey",
                "greetings",
                "good morning",
                "good afternoon",
                "good evening",
            ],
            Intent::Unknown => &[],
        }
    }

    fn hits(normalized: &str, intent: Intent) -> usize {
        Self::keywords(intent)
            .iter()
            .filter(|kw| normalized.contains(&format!(" {kw} ")))
            .count()
    }
}

/// Lowercase, collapse punctuation to spaces and pad so whole-word phrases
/// can be matched with `contains(" phrase ")`.
fn normalize(text: &str) -> String {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();
    format!(" {} ", words.join(" "))
}

#[async_trait]
impl IntentClassifier for KeywordClassifier {
    async fn classify(&self, text: &str, labels: &[&str]) -> AssistantResult<Vec<LabelScore>> {
        if labels.is_empty() {
            return Err(AssistantError::Classifier("No candidate labels".into()));
        }

        let normalized = normalize(text);
        let counts: Vec<(&str, usize)> = labels
            .iter()
            .map(|label| (*label, Self::hits(&normalized, Intent::from_label(label))))
            .collect();
        let total: usize = counts.iter().map(|(_, n)| n).sum();

        let mut scores: Vec<LabelScore> = counts
            .into_iter()
            .map(|(label, n)| {
                let score = if total == 0 {
                    if label == Intent::Unknown.label() {
                        1.0
                    } else {
                        0.0
                    }
                } else {
                    n as f32 / total as f32
                };
                LabelScore::new(label, score)
            })
            .collect();

        rank(&mut scores);
        Ok(scores)
    }
}

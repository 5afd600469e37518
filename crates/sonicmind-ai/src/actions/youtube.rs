use std::time::Duration;

use async_trait::async_trait;
use sonicmind_core::config::ActionsConfig;
use sonicmind_core::interfaces::VideoSearch;
use sonicmind_core::{AssistantError, AssistantResult};
use url::Url;

use super::Browser;

const ACTION: &str = "Video playback";
const VIDEO_ID_LEN: usize = 11;

/// Plays the best YouTube match for a query.
///
/// With `direct_play` the results page is fetched and the first video is
/// opened; otherwise (or if nothing can be resolved) the results page itself
/// is opened.
pub struct YouTubePlayer {
    client: reqwest::Client,
    base_url: String,
    direct_play: bool,
    browser: Browser,
}

impl YouTubePlayer {
    pub fn new(config: &ActionsConfig) -> AssistantResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AssistantError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.youtube_url.trim_end_matches('/').to_string(),
            direct_play: config.direct_play,
            browser: Browser::new(config.dry_run),
        })
    }

    pub fn results_url(&self, query: &str) -> AssistantResult<Url> {
        Url::parse_with_params(&format!("{}/results", self.base_url), &[("search_query", query)])
            .map_err(|e| AssistantError::external_action(ACTION, format!("bad YouTube URL: {e}")))
    }

    pub fn watch_url(&self, video_id: &str) -> AssistantResult<Url> {
        Url::parse_with_params(&format!("{}/watch", self.base_url), &[("v", video_id)])
            .map_err(|e| AssistantError::external_action(ACTION, format!("bad YouTube URL: {e}")))
    }

    async fn resolve_first_video(&self, results: &Url) -> AssistantResult<Option<String>> {
        let response = self
            .client
            .get(results.as_str())
            .send()
            .await
            .map_err(|e| AssistantError::external_action(ACTION, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::external_action(ACTION, format!("HTTP {status}")));
        }

        let page = response
            .text()
            .await
            .map_err(|e| AssistantError::external_action(ACTION, e))?;
        Ok(first_video_id(&page).map(str::to_string))
    }
}

#[async_trait]
impl VideoSearch for YouTubePlayer {
    async fn play(&self, query: &str) -> AssistantResult<()> {
        let results = self.results_url(query)?;

        if !self.direct_play || self.browser.is_dry_run() {
            return self.browser.open(ACTION, results.as_str()).await;
        }

        match self.resolve_first_video(&results).await? {
            Some(id) => {
                tracing::debug!("First video for '{query}': {id}");
                let watch = self.watch_url(&id)?;
                self.browser.open(ACTION, watch.as_str()).await
            }
            None => {
                tracing::warn!("No video found for '{query}', opening results page");
                self.browser.open(ACTION, results.as_str()).await
            }
        }
    }
}

/// First `watch?v=<id>` occurrence in a results page.
pub fn first_video_id(page: &str) -> Option<&str> {
    const MARKER: &str = "watch?v=";
    let mut rest = page;
    while let Some(pos) = rest.find(MARKER) {
        let tail = &rest[pos + MARKER.len()..];
        let id_len = tail
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_')
            .count();
        if id_len == VIDEO_ID_LEN {
            return Some(&tail[..VIDEO_ID_LEN]);
        }
        rest = tail;
    }
    None
}

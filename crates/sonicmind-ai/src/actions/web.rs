use async_trait::async_trait;
use sonicmind_core::config::ActionsConfig;
use sonicmind_core::interfaces::WebSearch;
use sonicmind_core::{AssistantError, AssistantResult};
use url::Url;

use super::Browser;

const ACTION: &str = "Web search";

/// Opens a search engine results page for the query.
pub struct GoogleSearch {
    search_url: String,
    browser: Browser,
}

impl GoogleSearch {
    pub fn new(config: &ActionsConfig) -> Self {
        Self {
            search_url: config.search_url.clone(),
            browser: Browser::new(config.dry_run),
        }
    }

    pub fn results_url(&self, query: &str) -> AssistantResult<Url> {
        Url::parse_with_params(&self.search_url, &[("q", query)])
            .map_err(|e| AssistantError::external_action(ACTION, format!("bad search URL: {e}")))
    }
}

#[async_trait]
impl WebSearch for GoogleSearch {
    async fn search(&self, query: &str) -> AssistantResult<()> {
        let url = self.results_url(query)?;
        self.browser.open(ACTION, url.as_str()).await
    }
}

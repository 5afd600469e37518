use sonicmind_core::{AssistantError, AssistantResult};

/// Opens URLs in the user's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct Browser {
    dry_run: bool,
}

impl Browser {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Open `url`. `action` names the operation in error messages.
    pub async fn open(&self, action: &str, url: &str) -> AssistantResult<()> {
        if self.dry_run {
            tracing::info!("Dry run, not opening {url}");
            return Ok(());
        }

        tracing::info!("Opening {url}");
        let target = url.to_string();
        tokio::task::spawn_blocking(move || open::that(target))
            .await
            .map_err(|e| AssistantError::external_action(action, e))?
            .map_err(|e| AssistantError::external_action(action, e))
    }
}

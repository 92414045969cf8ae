//! Mutation API and the publish cycle.
//!
//! Mutations change the state store right away. Publishing compresses the
//! whole store into a token and installs a locator for it; the router then
//! feeds that locator back into [`LayoutEngine::process`]. Publish cycles are
//! not serialized: when two overlap, the locator installed last wins.

use crate::engine::{LayoutEngine, ReconcileReport};
use crate::error::SyncResult;
use dashlink_types::{Config, LocatorArgs, LocatorToken, PanelName};
use serde_json::Value;
use tracing::{debug, info};

/// Result of a publish cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new locator was installed.
    Navigated { token: LocatorToken, hash: String },
    /// The locator was already current, so the engine reconciled in place.
    Reprocessed {
        token: LocatorToken,
        report: ReconcileReport,
    },
}

impl PublishOutcome {
    /// The token the layout was stored under.
    pub fn token(&self) -> &LocatorToken {
        match self {
            PublishOutcome::Navigated { token, .. } | PublishOutcome::Reprocessed { token, .. } => {
                token
            }
        }
    }
}

impl LayoutEngine {
    /// Appends a gadget to `panel`. Publishes unless `silent`.
    pub async fn add(
        &self,
        panel: PanelName,
        params: Config,
        silent: bool,
    ) -> SyncResult<Option<PublishOutcome>> {
        self.state.write().await.push(panel, params);
        debug!("Added unit to panel {}", panel);
        self.publish_unless(silent).await
    }

    /// Removes the gadget at `index` from `panel`. Publishes unless `silent`.
    ///
    /// Removing from a panel with no gadgets does nothing.
    pub async fn remove(
        &self,
        panel: PanelName,
        index: usize,
        silent: bool,
    ) -> SyncResult<Option<PublishOutcome>> {
        {
            let mut state = self.state.write().await;
            if state.panel_fingerprints(panel).is_empty() {
                return Ok(None);
            }
            if !state.remove(panel, index) {
                debug!("No unit at {} in panel {}", index, panel);
            }
        }
        self.publish_unless(silent).await
    }

    /// Replaces the gadget at `index` in `panel` and publishes.
    pub async fn swap(
        &self,
        panel: PanelName,
        params: Config,
        index: usize,
    ) -> SyncResult<PublishOutcome> {
        self.state.write().await.replace(panel, index, params)?;
        self.go().await
    }

    /// Replaces the main view configuration and publishes.
    ///
    /// The mounted view is torn down at once and the main region shows a
    /// loading placeholder until the published locator is reconciled.
    pub async fn main(&self, params: Config) -> SyncResult<PublishOutcome> {
        self.clear_main().await;
        self.collab.views.show_loading(&self.config.main_target);
        self.state.write().await.stage_main(params);
        self.go().await
    }

    /// Tears down the primary view and clears the main slot.
    pub async fn clear_main(&self) {
        self.teardown_view().await;
        self.state.write().await.clear_main();
    }

    /// Opens a single gadget in a new surface. The shared layout is untouched.
    ///
    /// Returns the URL that was opened.
    pub async fn launch(&self, params: Config) -> SyncResult<String> {
        let content = Value::Array(vec![params.into_value()]);
        let token = self.collab.compressor.store(&content, &[]).await?;
        let url = format!(
            "{}{}/gadgetscontainer/{}",
            self.config.gadget_page,
            self.collab.router.prefix(),
            token
        );
        info!("Launching gadget at {}", url);
        self.collab.launcher.open(&url);
        Ok(url)
    }

    /// Publishes the current layout as a new locator.
    pub async fn go(&self) -> SyncResult<PublishOutcome> {
        let content = self.state.read().await.to_content();
        let token = self
            .collab
            .compressor
            .store(&content, &self.config.dependencies)
            .await?;

        let router = &self.collab.router;
        let args = LocatorArgs::with_data(token.clone());
        let hash = router.build_hash(self.config.route_view(), &args);
        let current = router.current_locator();

        if current.hash == hash {
            debug!("Locator {} already current, reconciling in place", hash);
            let report = self.process(&current.args).await?;
            return Ok(PublishOutcome::Reprocessed { token, report });
        }

        info!("Publishing layout as {}", hash);
        router.navigate_to(&hash);
        Ok(PublishOutcome::Navigated { token, hash })
    }

    async fn publish_unless(&self, silent: bool) -> SyncResult<Option<PublishOutcome>> {
        if silent {
            return Ok(None);
        }
        self.go().await.map(Some)
    }
}

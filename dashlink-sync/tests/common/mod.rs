//! Shared test helpers for engine tests.

#![allow(dead_code)]

use dashlink_sync::container::mock::RecordingContainer;
use dashlink_sync::context_menu::mock::RecordingMenu;
use dashlink_sync::routing::mock::{MemoryRouter, RecordingLauncher};
use dashlink_sync::view::mock::{MockViewHost, RecordingForm};
use dashlink_sync::{Collaborators, EngineConfig, LayoutEngine, MemoryCompressor, Router};
use dashlink_types::{Config, LayoutState, LocatorArgs, LocatorToken, PanelName};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// An engine wired to in-memory collaborators, with handles to all of them.
pub struct Harness {
    pub engine: Arc<LayoutEngine>,
    pub compressor: Arc<MemoryCompressor>,
    pub router: Arc<MemoryRouter>,
    pub views: Arc<MockViewHost>,
    pub form: Arc<RecordingForm>,
    pub launcher: Arc<RecordingLauncher>,
    pub menu: Arc<RecordingMenu>,
    pub containers: HashMap<PanelName, Arc<RecordingContainer>>,
}

impl Harness {
    /// Analytics-mode engine with a container registered for every panel.
    pub async fn new() -> Self {
        Self::with_config(EngineConfig::default()).await
    }

    /// Blotter-mode engine with a container registered for every panel.
    pub async fn blotter() -> Self {
        Self::with_config(EngineConfig {
            blotter: true,
            ..Default::default()
        })
        .await
    }

    pub async fn with_config(config: EngineConfig) -> Self {
        let compressor = Arc::new(MemoryCompressor::new());
        let router = Arc::new(MemoryRouter::with_prefix("/prototype"));
        let views = Arc::new(MockViewHost::new());
        let form = Arc::new(RecordingForm::new());
        let launcher = Arc::new(RecordingLauncher::new());
        let menu = Arc::new(RecordingMenu::new());

        let engine = Arc::new(LayoutEngine::new(
            config,
            Collaborators {
                compressor: compressor.clone(),
                router: router.clone(),
                views: views.clone(),
                form: form.clone(),
                launcher: launcher.clone(),
                context_menu: menu.clone(),
            },
        ));

        let mut containers = HashMap::new();
        for panel in PanelName::ALL {
            let container = Arc::new(RecordingContainer::new());
            engine.register_container(panel, container.clone()).await;
            containers.insert(panel, container);
        }

        Self {
            engine,
            compressor,
            router,
            views,
            form,
            launcher,
            menu,
            containers,
        }
    }

    pub fn container(&self, panel: PanelName) -> &RecordingContainer {
        &self.containers[&panel]
    }

    /// Stores a layout in the compressor and returns locator args for it.
    pub fn stash(&self, token: &str, layout: Value) -> LocatorArgs {
        let token = LocatorToken::new(token);
        self.compressor.insert(token.clone(), layout);
        LocatorArgs::with_data(token)
    }

    /// Reconciles whatever locator the router currently holds.
    pub async fn follow_router(&self) -> dashlink_sync::ReconcileReport {
        let args = self.router.current_locator().args;
        self.engine.process(&args).await.unwrap()
    }

    /// Decodes the layout stored under a token.
    pub fn decode(&self, token: &LocatorToken) -> LayoutState {
        let content = self.compressor.peek(token).expect("token stored");
        LayoutState::from_value(content).unwrap()
    }

    pub fn reset_container_calls(&self) {
        for container in self.containers.values() {
            container.reset_calls();
        }
    }
}

pub fn gadget(kind: &str) -> Config {
    Config::new(json!({ "type": kind }))
}

pub fn gadget_with(kind: &str, id: u64) -> Config {
    Config::new(json!({ "type": kind, "id": id }))
}

//! Layout engine: reconciles decoded layouts with the live screen.
//!
//! `process` goes locator → state: it resolves the locator token, diffs the
//! decoded layout against the state store and issues the minimal container
//! calls. The publish side (state → locator) lives in `mutation.rs`.

use crate::codec;
use crate::compressor::StateCompressor;
use crate::container::{GadgetUnit, PanelContainer};
use crate::context_menu::{context_items, ContextMenu};
use crate::error::SyncResult;
use crate::routing::{Launcher, Router};
use crate::store::StateStore;
use crate::view::{
    MainForm, PrimaryView, PrimaryViewHost, ViewEvent, ViewEventForwarder, ViewOptions,
};
use dashlink_types::{
    Config, Fingerprint, FingerprintTable, LayoutState, LocatorArgs, MountId, PanelName,
    RouteView,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Configuration for the layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Blotter mode: the main grid offers trade editing and a save control,
    /// and locators route to the blotter view.
    pub blotter: bool,
    /// Dependencies declared to the compressor for layout payloads.
    pub dependencies: Vec<String>,
    /// Page that hosts launched gadgets.
    pub gadget_page: String,
    /// Target the primary view renders into.
    pub main_target: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            blotter: false,
            dependencies: vec!["data".to_string()],
            gadget_page: "./gadget.ftl".to_string(),
            main_target: ".OG-layout-analytics-center".to_string(),
        }
    }
}

impl EngineConfig {
    /// The routed view layout locators load into.
    pub fn route_view(&self) -> RouteView {
        if self.blotter {
            RouteView::Blotter
        } else {
            RouteView::Analytics
        }
    }
}

/// The collaborators an engine drives.
#[derive(Clone)]
pub struct Collaborators {
    pub compressor: Arc<dyn StateCompressor>,
    pub router: Arc<dyn Router>,
    pub views: Arc<dyn PrimaryViewHost>,
    pub form: Arc<dyn MainForm>,
    pub launcher: Arc<dyn Launcher>,
    pub context_menu: Arc<dyn ContextMenu>,
}

/// What one reconciliation changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Whether the primary view was rebuilt.
    pub main_rebuilt: bool,
    /// Indices of the units handed to each panel's container.
    pub changed: BTreeMap<PanelName, Vec<usize>>,
}

impl ReconcileReport {
    /// Total number of units handed to containers.
    pub fn changed_units(&self) -> usize {
        self.changed.values().map(Vec::len).sum()
    }

    /// Returns true if nothing on screen had to change.
    pub fn is_noop(&self) -> bool {
        !self.main_rebuilt && self.changed.is_empty()
    }
}

enum MainChange {
    Rebuild(Config),
    Unchanged(Config),
    Absent,
}

struct MountedView {
    id: MountId,
    view: Box<dyn PrimaryView>,
}

/// The layout engine. Owns the state store; share it as `Arc<LayoutEngine>`.
pub struct LayoutEngine {
    pub(crate) config: EngineConfig,
    pub(crate) collab: Collaborators,
    pub(crate) state: RwLock<StateStore>,
    containers: RwLock<HashMap<PanelName, Arc<dyn PanelContainer>>>,
    mounted: Mutex<Option<MountedView>>,
    events_tx: UnboundedSender<(MountId, ViewEvent)>,
    events_rx: Mutex<UnboundedReceiver<(MountId, ViewEvent)>>,
}

impl LayoutEngine {
    /// Creates an engine with an empty state store.
    pub fn new(config: EngineConfig, collab: Collaborators) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            collab,
            state: RwLock::new(StateStore::new()),
            containers: RwLock::new(HashMap::new()),
            mounted: Mutex::new(None),
            events_tx,
            events_rx: Mutex::new(events_rx),
        }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registers the container that renders `panel`.
    pub async fn register_container(&self, panel: PanelName, container: Arc<dyn PanelContainer>) {
        self.containers.write().await.insert(panel, container);
    }

    /// Removes the container of `panel`.
    pub async fn unregister_container(&self, panel: PanelName) {
        self.containers.write().await.remove(&panel);
    }

    /// Returns a copy of the live layout.
    pub async fn snapshot(&self) -> LayoutState {
        self.state.read().await.snapshot()
    }

    /// Returns a copy of the fingerprint table.
    pub async fn fingerprints(&self) -> FingerprintTable {
        self.state.read().await.fingerprints().clone()
    }

    /// Returns true if every panel's units and fingerprints line up.
    pub async fn is_aligned(&self) -> bool {
        self.state.read().await.is_aligned()
    }

    /// Returns the id of the mounted primary view, if any.
    pub async fn mounted_view(&self) -> Option<MountId> {
        self.mounted.lock().await.as_ref().map(|m| m.id)
    }

    // ── Reconciliation ───────────────────────────────────────────

    /// Resolves the locator arguments and reconciles the screen with them.
    ///
    /// Without a token the incoming layout is empty. A failing fetch leaves
    /// the state untouched.
    pub async fn process(&self, args: &LocatorArgs) -> SyncResult<ReconcileReport> {
        let incoming = match &args.data {
            Some(token) => {
                let content = self
                    .collab
                    .compressor
                    .fetch(token, &self.config.dependencies)
                    .await?;
                LayoutState::from_value(content)?
            }
            None => LayoutState::default(),
        };
        self.reconcile(incoming).await
    }

    /// Reconciles the screen with an already decoded layout.
    pub async fn reconcile(&self, incoming: LayoutState) -> SyncResult<ReconcileReport> {
        // Nothing is written to the store until every unit is fingerprinted.
        let main = incoming.main.as_ref().map(codec::detach).transpose()?;
        let mut panels = Vec::with_capacity(PanelName::ALL.len());
        for panel in PanelName::ALL {
            let units = incoming
                .panel(panel)
                .iter()
                .map(codec::detach)
                .collect::<SyncResult<Vec<_>>>()?;
            panels.push((panel, units));
        }

        let (main_change, changes, expected) = {
            let mut state = self.state.write().await;
            let previous = state.take_panels();

            let main_change = match main {
                Some((fingerprint, config)) if state.main_fingerprint() != Some(&fingerprint) => {
                    debug!("Main view changed ({})", fingerprint.short());
                    state.commit_main(config.clone(), fingerprint);
                    MainChange::Rebuild(config)
                }
                Some((_, config)) => MainChange::Unchanged(config),
                None => MainChange::Absent,
            };

            let mut changes = Vec::new();
            for (panel, units) in panels {
                if units.is_empty() {
                    continue;
                }
                let before = previous.get(&panel).map(Vec::as_slice).unwrap_or(&[]);
                let changed = changed_units(panel, &units, before);
                state.commit_panel(panel, units);
                if !changed.is_empty() {
                    changes.push((panel, changed));
                }
            }

            let expected: Vec<(PanelName, Vec<Fingerprint>)> = PanelName::ALL
                .into_iter()
                .map(|panel| (panel, state.fingerprints().synced(panel)))
                .collect();

            (main_change, changes, expected)
        };

        let mut report = ReconcileReport::default();

        match main_change {
            MainChange::Rebuild(config) => {
                self.collab.form.render(Some(&config));
                self.teardown_view().await;
                self.mount_view(&config).await;
                report.main_rebuilt = true;
            }
            MainChange::Unchanged(config) => self.collab.form.render(Some(&config)),
            MainChange::Absent => self.collab.form.render(None),
        }

        let containers = self.containers.read().await.clone();
        for (panel, changed) in changes {
            let hint = match changed.as_slice() {
                [only] => Some(only.index),
                _ => None,
            };
            report
                .changed
                .insert(panel, changed.iter().map(|unit| unit.index).collect());
            match containers.get(&panel) {
                Some(container) => container.add(changed, hint),
                None => warn!(
                    "No container registered for panel {}, dropping {} units",
                    panel,
                    changed.len()
                ),
            }
        }

        for (panel, fingerprints) in expected {
            if let Some(container) = containers.get(&panel) {
                container.verify(&fingerprints);
            }
        }

        info!(
            "Reconciled layout: main rebuilt={}, {} units changed",
            report.main_rebuilt,
            report.changed_units()
        );
        Ok(report)
    }

    // ── Primary view ─────────────────────────────────────────────

    async fn mount_view(&self, main: &Config) {
        let source = Config::new(json!({ "blotter": self.config.blotter })).merged(main);
        let id = MountId::new();
        let listener = Arc::new(ViewEventForwarder {
            mount: id,
            tx: self.events_tx.clone(),
            context_menu: self.config.blotter,
        });
        let options = ViewOptions {
            target: self.config.main_target.clone(),
            show_context_menu: true,
            show_save_control: self.config.blotter,
            source,
        };

        let view = self.collab.views.mount(options, listener);
        debug!("Mounted primary view {}", id);
        // An overlapping reconcile may have mounted a view since our teardown.
        let displaced = self.mounted.lock().await.replace(MountedView { id, view });
        if let Some(previous) = displaced {
            Self::kill_view(previous);
        }
    }

    pub(crate) async fn teardown_view(&self) {
        let mounted = self.mounted.lock().await.take();
        if let Some(mounted) = mounted {
            Self::kill_view(mounted);
        }
    }

    fn kill_view(mounted: MountedView) {
        mounted.view.unsubscribe();
        mounted.view.kill();
        debug!("Tore down primary view {}", mounted.id);
    }

    /// Applies one event raised by a primary view.
    ///
    /// Events from a view that is no longer mounted are ignored.
    pub async fn handle_view_event(&self, mount: MountId, event: ViewEvent) -> SyncResult<()> {
        enum Action {
            Main(Config),
            Clear,
            Menu(crate::context_menu::GridCell, bool),
        }

        let action = {
            let guard = self.mounted.lock().await;
            let Some(mounted) = guard.as_ref().filter(|m| m.id == mount) else {
                debug!("Dropping {:?} from stale view {}", event, mount);
                return Ok(());
            };
            match event {
                ViewEvent::ViewChange(view) => Action::Main(
                    mounted.view.source().with_field("type", Value::String(view)),
                ),
                ViewEvent::Fatal => Action::Clear,
                ViewEvent::ContextMenu(cell) => {
                    let row_is_node = mounted.view.is_node_row(cell.row);
                    Action::Menu(cell, row_is_node)
                }
            }
        };

        match action {
            Action::Main(params) => {
                self.main(params).await?;
            }
            Action::Clear => {
                warn!("Primary view {} failed, clearing main view", mount);
                self.clear_main().await;
            }
            Action::Menu(cell, row_is_node) => {
                if self.config.blotter {
                    let items = context_items(&cell, row_is_node);
                    self.collab.context_menu.show(&cell, items);
                }
            }
        }
        Ok(())
    }

    /// Applies every queued view event. Returns how many were handled.
    pub async fn pump_view_events(&self) -> SyncResult<usize> {
        let mut handled = 0;
        loop {
            let next = self.events_rx.lock().await.try_recv();
            let Ok((mount, event)) = next else {
                return Ok(handled);
            };
            self.handle_view_event(mount, event).await?;
            handled += 1;
        }
    }
}

fn changed_units(
    panel: PanelName,
    units: &[(Fingerprint, Config)],
    before: &[Option<Fingerprint>],
) -> Vec<GadgetUnit> {
    units
        .iter()
        .enumerate()
        .filter_map(|(index, (fingerprint, config))| {
            let previous = before.get(index).and_then(Option::as_ref);
            if previous == Some(fingerprint) {
                return None;
            }
            debug!("Panel {} unit {} changed ({})", panel, index, fingerprint.short());
            Some(GadgetUnit {
                index,
                fingerprint: fingerprint.clone(),
                config: config.clone(),
            })
        })
        .collect()
}

//! Primary view and main-view form abstractions.
//!
//! The primary view is the grid that renders the `main` configuration. The
//! engine mounts it through a [`PrimaryViewHost`] and listens to it through a
//! [`ViewListener`] it supplies at mount time.

use crate::context_menu::GridCell;
use dashlink_types::{Config, MountId};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Options a primary view is mounted with.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    /// Where the view renders.
    pub target: String,
    /// Whether grid cells offer a cell menu.
    pub show_context_menu: bool,
    /// Whether the view shows its save control.
    pub show_save_control: bool,
    /// The configuration the view renders.
    pub source: Config,
}

/// Events a primary view raises.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// The user switched the view type.
    ViewChange(String),
    /// The view hit an unrecoverable error.
    Fatal,
    /// The user opened the context menu on a cell.
    ContextMenu(GridCell),
}

/// Observer of a mounted primary view.
pub trait ViewListener: Send + Sync {
    fn on_view_change(&self, view: &str);
    fn on_fatal(&self);
    fn on_context_menu(&self, cell: &GridCell);
}

/// A mounted primary view.
pub trait PrimaryView: Send + Sync {
    /// The configuration the view currently renders.
    fn source(&self) -> Config;

    /// Returns true if grid row `row` is a portfolio node row.
    fn is_node_row(&self, row: usize) -> bool;

    /// Drops the listener the view was mounted with.
    fn unsubscribe(&self);

    /// Tears the view down.
    fn kill(&self);
}

/// Mounts primary views into the main region.
pub trait PrimaryViewHost: Send + Sync {
    fn mount(&self, options: ViewOptions, listener: Arc<dyn ViewListener>) -> Box<dyn PrimaryView>;

    /// Shows a loading placeholder in `target` until the next view is mounted.
    fn show_loading(&self, target: &str);
}

/// The editable form for the main view configuration.
///
/// Submissions from the form come back through
/// [`crate::LayoutEngine::main`].
pub trait MainForm: Send + Sync {
    /// Re-renders the form. `None` shows the blank form.
    fn render(&self, data: Option<&Config>);
}

/// Forwards the events of one mounted view into the engine's queue.
pub(crate) struct ViewEventForwarder {
    pub(crate) mount: MountId,
    pub(crate) tx: UnboundedSender<(MountId, ViewEvent)>,
    pub(crate) context_menu: bool,
}

impl ViewEventForwarder {
    fn forward(&self, event: ViewEvent) {
        // The receiver lives as long as the engine.
        let _ = self.tx.send((self.mount, event));
    }
}

impl ViewListener for ViewEventForwarder {
    fn on_view_change(&self, view: &str) {
        self.forward(ViewEvent::ViewChange(view.to_string()));
    }

    fn on_fatal(&self) {
        self.forward(ViewEvent::Fatal);
    }

    fn on_context_menu(&self, cell: &GridCell) {
        if self.context_menu {
            self.forward(ViewEvent::ContextMenu(cell.clone()));
        }
    }
}

/// In-memory views and forms for testing.
pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard};
    use std::time::Duration;

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// State shared between a [`MockView`] and the host that mounted it.
    #[derive(Default)]
    pub struct MockViewState {
        pub options: Option<ViewOptions>,
        pub listener: Mutex<Option<Arc<dyn ViewListener>>>,
        pub killed: AtomicBool,
        pub node_rows: HashSet<usize>,
    }

    impl MockViewState {
        pub fn is_killed(&self) -> bool {
            self.killed.load(Ordering::SeqCst)
        }

        pub fn is_subscribed(&self) -> bool {
            lock(&self.listener).is_some()
        }

        fn listener(&self) -> Option<Arc<dyn ViewListener>> {
            lock(&self.listener).clone()
        }

        /// Raises a view change, as if the user switched the view type.
        pub fn emit_view_change(&self, view: &str) {
            if let Some(listener) = self.listener() {
                listener.on_view_change(view);
            }
        }

        /// Raises a fatal error.
        pub fn emit_fatal(&self) {
            if let Some(listener) = self.listener() {
                listener.on_fatal();
            }
        }

        /// Raises a cell context menu request.
        pub fn emit_context_menu(&self, cell: &GridCell) {
            if let Some(listener) = self.listener() {
                listener.on_context_menu(cell);
            }
        }
    }

    /// A mounted mock view.
    pub struct MockView {
        state: Arc<MockViewState>,
    }

    impl PrimaryView for MockView {
        fn source(&self) -> Config {
            self.state
                .options
                .as_ref()
                .map(|options| options.source.clone())
                .unwrap_or_default()
        }

        fn is_node_row(&self, row: usize) -> bool {
            self.state.node_rows.contains(&row)
        }

        fn unsubscribe(&self) {
            lock(&self.state.listener).take();
        }

        fn kill(&self) {
            self.state.killed.store(true, Ordering::SeqCst);
        }
    }

    /// Mounts [`MockView`]s and records what happened to them.
    #[derive(Default)]
    pub struct MockViewHost {
        mounted: Mutex<Vec<Arc<MockViewState>>>,
        loading: Mutex<Vec<String>>,
        node_rows: Mutex<HashSet<usize>>,
        mount_delay: Mutex<Option<Duration>>,
    }

    impl MockViewHost {
        pub fn new() -> Self {
            Self::default()
        }

        /// Marks grid rows as node rows for views mounted from now on.
        pub fn set_node_rows(&self, rows: impl IntoIterator<Item = usize>) {
            *lock(&self.node_rows) = rows.into_iter().collect();
        }

        /// Blocks every later `mount` for `delay`, like a slow widget build.
        pub fn set_mount_delay(&self, delay: Duration) {
            *lock(&self.mount_delay) = Some(delay);
        }

        /// Every view mounted so far, oldest first.
        pub fn mounted(&self) -> Vec<Arc<MockViewState>> {
            lock(&self.mounted).clone()
        }

        /// The most recently mounted view.
        pub fn last(&self) -> Option<Arc<MockViewState>> {
            lock(&self.mounted).last().cloned()
        }

        /// Number of views mounted so far.
        pub fn mount_count(&self) -> usize {
            lock(&self.mounted).len()
        }

        /// Targets that were put into the loading state.
        pub fn loading(&self) -> Vec<String> {
            lock(&self.loading).clone()
        }
    }

    impl PrimaryViewHost for MockViewHost {
        fn mount(
            &self,
            options: ViewOptions,
            listener: Arc<dyn ViewListener>,
        ) -> Box<dyn PrimaryView> {
            let delay = *lock(&self.mount_delay);
            if let Some(delay) = delay {
                std::thread::sleep(delay);
            }
            let state = Arc::new(MockViewState {
                options: Some(options),
                listener: Mutex::new(Some(listener)),
                killed: AtomicBool::new(false),
                node_rows: lock(&self.node_rows).clone(),
            });
            lock(&self.mounted).push(state.clone());
            Box::new(MockView { state })
        }

        fn show_loading(&self, target: &str) {
            lock(&self.loading).push(target.to_string());
        }
    }

    /// Records every form render.
    #[derive(Debug, Default)]
    pub struct RecordingForm {
        renders: Mutex<Vec<Option<Config>>>,
    }

    impl RecordingForm {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn renders(&self) -> Vec<Option<Config>> {
            lock(&self.renders).clone()
        }
    }

    impl MainForm for RecordingForm {
        fn render(&self, data: Option<&Config>) {
            lock(&self.renders).push(data.cloned());
        }
    }
}

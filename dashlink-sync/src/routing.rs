//! Routing abstraction.
//!
//! The router owns the locator the application currently shows. The engine
//! reads it, asks the router to build new locators and navigates only when
//! a freshly built locator differs from the current one.

use dashlink_types::{Locator, LocatorArgs, RouteView};

/// Hash-history routing.
pub trait Router: Send + Sync {
    /// The locator currently installed.
    fn current_locator(&self) -> Locator;

    /// Builds the hash that loads `view` with `args`.
    fn build_hash(&self, view: RouteView, args: &LocatorArgs) -> String;

    /// Installs a new hash. The router delivers it back to the engine through
    /// [`crate::LayoutEngine::process`].
    fn navigate_to(&self, hash: &str);

    /// Path prefix of the current application (used for launch URLs).
    fn prefix(&self) -> String;
}

/// Opens a URL in a new addressable surface, such as a browser window.
pub trait Launcher: Send + Sync {
    fn open(&self, url: &str);
}

/// An in-memory router for testing.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Router keeping its history in memory.
    ///
    /// Hashes look like `/analytics/data=T1`.
    #[derive(Debug, Default)]
    pub struct MemoryRouter {
        current: Mutex<Locator>,
        built: Mutex<HashMap<String, LocatorArgs>>,
        navigations: Mutex<Vec<String>>,
        prefix: String,
    }

    impl MemoryRouter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Router whose application lives under `prefix`.
        pub fn with_prefix(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                ..Self::default()
            }
        }

        /// Every hash navigated to, oldest first.
        pub fn navigations(&self) -> Vec<String> {
            lock(&self.navigations).clone()
        }

        /// Replaces the current locator without recording a navigation.
        pub fn set_current(&self, locator: Locator) {
            *lock(&self.current) = locator;
        }
    }

    impl Router for MemoryRouter {
        fn current_locator(&self) -> Locator {
            lock(&self.current).clone()
        }

        fn build_hash(&self, view: RouteView, args: &LocatorArgs) -> String {
            let hash = match &args.data {
                Some(token) => format!("/{view}/data={token}"),
                None => format!("/{view}"),
            };
            lock(&self.built).insert(hash.clone(), args.clone());
            hash
        }

        fn navigate_to(&self, hash: &str) {
            let args = lock(&self.built).get(hash).cloned().unwrap_or_default();
            *lock(&self.current) = Locator {
                hash: hash.to_string(),
                args,
            };
            lock(&self.navigations).push(hash.to_string());
        }

        fn prefix(&self) -> String {
            self.prefix.clone()
        }
    }

    /// Records opened URLs.
    #[derive(Debug, Default)]
    pub struct RecordingLauncher {
        opened: Mutex<Vec<String>>,
    }

    impl RecordingLauncher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn opened(&self) -> Vec<String> {
            lock(&self.opened).clone()
        }
    }

    impl Launcher for RecordingLauncher {
        fn open(&self, url: &str) {
            lock(&self.opened).push(url.to_string());
        }
    }
}

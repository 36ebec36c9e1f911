//! Per-tree state: the data document, host callbacks, and action dispatch.

use std::{fmt, sync::Arc};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    Action, Props,
    action::{Effect, interpret},
    path::{get_by_path, set_by_path},
};

/// Callback invoked for `api`, `custom`, and unknown actions.
pub type ActionHook = Box<dyn FnMut(&Action)>;

/// Callback invoked for `navigate` actions.
pub type NavigateHook = Box<dyn FnMut(&str)>;

/// Host-supplied callbacks.
#[derive(Default)]
pub struct HostCallbacks {
    /// Receives actions the engine does not interpret itself.
    pub on_action: Option<ActionHook>,
    /// Receives navigation requests.
    pub on_navigate: Option<NavigateHook>,
}

impl fmt::Debug for HostCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCallbacks")
            .field("on_action", &self.on_action.is_some())
            .field("on_navigate", &self.on_navigate.is_some())
            .finish()
    }
}

/// State shared by every node of one render tree.
///
/// The data document is replaced wholesale on every mutation, so a [`snapshot`] taken
/// earlier keeps observing the old document. Each context is independent; nothing is
/// shared between trees.
///
/// [`snapshot`]: SduiContext::snapshot
#[derive(Debug)]
pub struct SduiContext {
    /// Current data document.
    data: Arc<Value>,
    /// Bumped on every mutation.
    revision: u64,
    /// Host hooks.
    host: HostCallbacks,
    /// Last destination of a navigation that had no host hook.
    location: Option<String>,
}

impl SduiContext {
    /// Create a context seeded with `data`.
    pub fn new(data: Props, host: HostCallbacks) -> Self {
        Self {
            data: Arc::new(Value::Object(data)),
            revision: 0,
            host,
            location: None,
        }
    }

    /// Seed data from a schema and caller overrides; caller entries win on collision.
    pub fn seed(schema_data: Option<&Props>, overrides: Props) -> Props {
        let mut merged = schema_data.cloned().unwrap_or_default();
        merged.extend(overrides);
        merged
    }

    /// The current data document.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// A handle to the current document that survives later mutations unchanged.
    pub fn snapshot(&self) -> Arc<Value> {
        Arc::clone(&self.data)
    }

    /// Read a value from the current document.
    pub fn get(&self, path: &str) -> Option<&Value> {
        get_by_path(&self.data, path)
    }

    /// Replace the whole document.
    pub fn set_data(&mut self, data: Value) {
        self.data = Arc::new(data);
        self.revision += 1;
    }

    /// Replace the document with the result of `f` applied to the current one.
    pub fn update_data(&mut self, f: impl FnOnce(&Value) -> Value) {
        let next = f(&self.data);
        self.set_data(next);
    }

    /// Write `value` at `path`, producing a new document.
    pub fn set_path(&mut self, path: &str, value: Value) {
        self.update_data(|doc| set_by_path(doc, path, value));
    }

    /// Number of mutations applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Destination recorded by the last navigation that had no host hook.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Dispatch an action.
    ///
    /// Incomplete `navigate`/`setState` actions are skipped with a warning; host-bound
    /// actions go to `on_action` and are dropped when no hook is installed.
    pub fn handle_action(&mut self, action: &Action) {
        match interpret(action) {
            Effect::Navigate(path) => self.navigate(&path),
            Effect::SetState { path, value } => {
                debug!(path = %path, "set_state");
                self.set_path(&path, value);
            }
            Effect::Forward(action) => match self.host.on_action.as_mut() {
                Some(hook) => {
                    debug!(kind = %action.kind, "forward_action");
                    hook(&action);
                }
                None => debug!(kind = %action.kind, "no on_action hook; action dropped"),
            },
            Effect::Skip(reason) => {
                warn!(kind = %action.kind, "{}; action skipped", reason.describe());
            }
        }
    }

    /// Navigate to `path`.
    ///
    /// Without an `on_navigate` hook there is no browser location to change, so the
    /// destination is recorded in [`location`](Self::location) instead.
    pub fn navigate(&mut self, path: &str) {
        match self.host.on_navigate.as_mut() {
            Some(hook) => {
                debug!(path, "navigate");
                hook(path);
            }
            None => {
                info!(path, "no on_navigate hook; recording location");
                self.location = Some(path.to_string());
            }
        }
    }
}

impl Default for SduiContext {
    fn default() -> Self {
        Self::new(Props::new(), HostCallbacks::default())
    }
}

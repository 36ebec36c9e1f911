//! Interpretation of declarative actions into effects.
//!
//! [`interpret`] is pure: it decides what an action means without touching any state.
//! [`SduiContext::handle_action`](crate::SduiContext::handle_action) applies the result.

use serde_json::Value;

use crate::{Action, ActionKind};

/// What the context should do for an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Change location to the given path.
    Navigate(String),
    /// Write `value` at `path` in the data document.
    SetState {
        /// Dot-path to write.
        path: String,
        /// Value to store; `null` is a legitimate value.
        value: Value,
    },
    /// Hand the action to the host unchanged.
    Forward(Action),
    /// Do nothing.
    Skip(SkipReason),
}

/// Why an action produced no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `navigate` without a string `payload.path`.
    MissingNavigatePath,
    /// `setState` without a string `payload.path`.
    MissingStatePath,
    /// `setState` without a `payload.value` key.
    MissingStateValue,
}

impl SkipReason {
    /// Short description for logs and diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            Self::MissingNavigatePath => "navigate action requires a string payload.path",
            Self::MissingStatePath => "setState action requires a string payload.path",
            Self::MissingStateValue => "setState action requires a payload.value",
        }
    }
}

/// Decide the effect of `action`.
///
/// `setState` checks for the *presence* of `value`, so `false`, `0`, `""` and `null` are
/// all written. `api`, `custom`, and unknown kinds are forwarded to the host verbatim.
pub fn interpret(action: &Action) -> Effect {
    match &action.kind {
        ActionKind::Navigate => match action.payload_value("path").and_then(Value::as_str) {
            Some(path) => Effect::Navigate(path.to_string()),
            None => Effect::Skip(SkipReason::MissingNavigatePath),
        },
        ActionKind::SetState => {
            let Some(path) = action.payload_value("path").and_then(Value::as_str) else {
                return Effect::Skip(SkipReason::MissingStatePath);
            };
            let Some(value) = action.payload_value("value") else {
                return Effect::Skip(SkipReason::MissingStateValue);
            };
            Effect::SetState {
                path: path.to_string(),
                value: value.clone(),
            }
        }
        ActionKind::Api | ActionKind::Custom | ActionKind::Other(_) => {
            Effect::Forward(action.clone())
        }
    }
}

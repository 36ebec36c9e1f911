//! Static checks over a schema.
//!
//! Rendering is fail-open and never rejects a schema. These checks report what the
//! renderer would silently tolerate, for tooling that wants to catch it before delivery.

use std::{collections::HashSet, fmt};

use serde::Serialize;
use tracing::debug;

use crate::{
    Action, ActionKind, Children, ComponentRegistry, Condition, EventName, Operator, Schema,
    SduiNode,
    action::{Effect, interpret},
    render::is_void,
};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The schema renders, but probably not as intended.
    Warning,
    /// Part of the schema cannot do what it declares.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// One finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity.
    pub severity: Severity,
    /// Where in the schema, e.g. `root.children[1].on.click`.
    pub location: String,
    /// What is wrong.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.location, self.message)
    }
}

/// Whether any diagnostic is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}

/// Check `schema` against `registry`. Diagnostics come back in document order.
pub fn validate(schema: &Schema, registry: &ComponentRegistry) -> Vec<Diagnostic> {
    let mut v = Validator {
        registry,
        out: Vec::new(),
    };
    v.node(schema.root(), "root");
    debug!(count = v.out.len(), "schema validated");
    v.out
}

/// Walk state.
struct Validator<'a> {
    /// Registry component types are checked against.
    registry: &'a ComponentRegistry,
    /// Findings so far.
    out: Vec<Diagnostic>,
}

impl Validator<'_> {
    /// Record a finding.
    fn push(&mut self, severity: Severity, location: &str, message: String) {
        self.out.push(Diagnostic {
            severity,
            location: location.to_string(),
            message,
        });
    }

    /// Check one node and recurse.
    fn node(&mut self, node: &SduiNode, loc: &str) {
        if !self.registry.contains(&node.component) {
            self.push(
                Severity::Error,
                loc,
                format!("unknown component `{}`", node.component),
            );
        }
        if let Some(when) = &node.when {
            self.condition(when, &format!("{loc}.when"));
        }
        for (event, action) in node.on.iter().flatten() {
            self.handler(event, action, &format!("{loc}.on.{event}"));
        }

        match &node.children {
            None => {}
            Some(children) if is_void(&node.component) => {
                let what = match children {
                    Children::Text(_) => "text",
                    Children::Nodes(_) => "child nodes",
                };
                self.push(
                    Severity::Warning,
                    &format!("{loc}.children"),
                    format!("`{}` never renders children; {what} ignored", node.component),
                );
            }
            Some(Children::Text(_)) => {}
            Some(Children::Nodes(nodes)) => self.siblings(nodes, loc),
        }
    }

    /// Check a sibling list for duplicate keys, then each child.
    fn siblings(&mut self, nodes: &[SduiNode], parent: &str) {
        let mut seen = HashSet::new();
        for (i, child) in nodes.iter().enumerate() {
            let loc = format!("{parent}.children[{i}]");
            if let Some(key) = &child.key
                && !seen.insert(key.as_str())
            {
                self.push(
                    Severity::Warning,
                    &loc,
                    format!("duplicate key `{key}` among siblings"),
                );
            }
            self.node(child, &loc);
        }
    }

    /// Check a `when` condition.
    fn condition(&mut self, c: &Condition, loc: &str) {
        match &c.operator {
            Operator::Unknown(op) => self.push(
                Severity::Warning,
                loc,
                format!("unknown operator `{op}`; condition always passes"),
            ),
            Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte
                if !c.value.as_ref().is_some_and(|v| v.is_number()) =>
            {
                self.push(
                    Severity::Warning,
                    loc,
                    format!("`{}` needs a numeric value; condition never passes", c.operator),
                );
            }
            _ => {}
        }
    }

    /// Check one `on` entry.
    fn handler(&mut self, event: &EventName, action: &Action, loc: &str) {
        if !event.is_recognized() {
            self.push(
                Severity::Warning,
                loc,
                format!("unrecognized event `{event}`; handler is never wired"),
            );
        }
        if let ActionKind::Other(kind) = &action.kind {
            self.push(
                Severity::Warning,
                loc,
                format!("unknown action type `{kind}`; forwarded to the host"),
            );
        }
        if let Effect::Skip(reason) = interpret(action) {
            self.push(Severity::Error, loc, reason.describe().to_string());
        }
    }
}

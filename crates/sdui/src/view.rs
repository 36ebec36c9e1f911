//! Backend-neutral output of a render pass.
//!
//! Components return [`View`] trees. Hosts either walk them directly, serialize them to
//! JSON, or print them with [`to_html`](crate::to_html).

use serde::Serialize;

use crate::{Action, EventName, Props, SduiContext};

/// A rendered unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    /// Nothing rendered (failed `when`, or a component that renders nothing).
    Empty,
    /// A text run.
    Text {
        /// The text.
        text: String,
    },
    /// A host element.
    Element(Element),
    /// Several siblings without a wrapper.
    Fragment {
        /// The siblings.
        children: Vec<View>,
    },
    /// A visible, non-fatal error marker.
    Placeholder(Placeholder),
}

impl View {
    /// A text view.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Whether nothing was rendered.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The element, when this view is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Direct children of this view.
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Element(el) => &el.children,
            Self::Fragment { children } => children,
            Self::Empty | Self::Text { .. } | Self::Placeholder(_) => &[],
        }
    }

    /// Depth-first pre-order walk over this view and all descendants.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Self)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    /// Find the first element with the given key.
    pub fn find_by_key(&self, key: &str) -> Option<&Element> {
        let mut found = None;
        self.walk(&mut |v| {
            if found.is_none()
                && let Self::Element(el) = v
                && el.key.as_deref() == Some(key)
            {
                found = Some(el);
            }
        });
        found
    }

    /// All elements produced by the given component type, in document order.
    pub fn find_all(&self, component: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.walk(&mut |v| {
            if let Self::Element(el) = v
                && el.component == component
            {
                out.push(el);
            }
        });
        out
    }

    /// Every placeholder in the tree.
    pub fn placeholders(&self) -> Vec<&Placeholder> {
        let mut out = Vec::new();
        self.walk(&mut |v| {
            if let Self::Placeholder(p) = v {
                out.push(p);
            }
        });
        out
    }

    /// Every handler in the tree wired to `event`, in document order.
    pub fn handlers_for(&self, event: &EventName) -> Vec<&EventHandler> {
        let mut out = Vec::new();
        self.walk(&mut |v| {
            if let Self::Element(el) = v {
                out.extend(el.handlers.iter().filter(|h| &h.event == event));
            }
        });
        out
    }

    /// Concatenated text of this view and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |v| match v {
            Self::Text { text } => out.push_str(text),
            Self::Placeholder(p) => out.push_str(&p.message),
            _ => {}
        });
        out
    }
}

/// A rendered host element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    /// Registry key of the component that produced the element.
    pub component: String,
    /// Host tag, e.g. `"button"`.
    pub tag: String,
    /// Stable sibling identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Resolved attributes.
    #[serde(skip_serializing_if = "Props::is_empty")]
    pub attrs: Props,
    /// Wired event handlers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub handlers: Vec<EventHandler>,
    /// Child views.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<View>,
    /// Void elements never carry children.
    #[serde(skip_serializing_if = "is_false")]
    pub void: bool,
}

/// Serde helper for skipping `false` flags.
fn is_false(b: &bool) -> bool {
    !*b
}

impl Element {
    /// An element with no attributes, handlers, or children.
    pub fn new(component: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            tag: tag.into(),
            key: None,
            attrs: Props::new(),
            handlers: Vec::new(),
            children: Vec::new(),
            void: false,
        }
    }

    /// Handler wired to `event`, if any.
    pub fn handler(&self, event: &EventName) -> Option<&EventHandler> {
        self.handlers.iter().find(|h| &h.event == event)
    }

    /// Concatenated text of the element's descendants.
    pub fn text_content(&self) -> String {
        self.children.iter().map(View::text_content).collect()
    }
}

/// An event wired to an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventHandler {
    /// Event that triggers the action.
    pub event: EventName,
    /// Action to dispatch.
    pub action: Action,
    /// Whether the host's default behavior is suppressed before dispatch.
    pub prevent_default: bool,
}

/// Result of firing a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    /// The host should not run its default behavior (form submission) for this event.
    pub default_prevented: bool,
}

impl EventHandler {
    /// Wire `action` to `event`; submit handlers always prevent the default.
    pub fn new(event: EventName, action: Action) -> Self {
        let prevent_default = event == EventName::Submit;
        Self {
            event,
            action,
            prevent_default,
        }
    }

    /// Dispatch the action through `ctx`.
    ///
    /// The default is marked prevented before the action runs, so a host that checks the
    /// flag never performs a native submission alongside the dispatched action.
    pub fn fire(&self, ctx: &mut SduiContext) -> Fired {
        let fired = Fired {
            default_prevented: self.prevent_default,
        };
        ctx.handle_action(&self.action);
        fired
    }
}

/// A visible marker for a node that could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    /// What went wrong.
    #[serde(flatten)]
    pub kind: PlaceholderKind,
    /// Message shown to the user.
    pub message: String,
}

/// Placeholder causes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum PlaceholderKind {
    /// The node's type is not in the registry.
    UnknownComponent {
        /// The unregistered type name.
        name: String,
    },
    /// The schema itself could not be read.
    InvalidSchema,
}

impl Placeholder {
    /// Placeholder for an unregistered component type.
    pub fn unknown_component(name: &str) -> Self {
        Self {
            kind: PlaceholderKind::UnknownComponent {
                name: name.to_string(),
            },
            message: format!("Unknown component: {name}"),
        }
    }

    /// Placeholder for an unreadable schema.
    pub fn invalid_schema(detail: &str) -> Self {
        Self {
            kind: PlaceholderKind::InvalidSchema,
            message: format!("Invalid schema: {detail}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tree() -> View {
        let mut inner = Element::new("Text", "span");
        inner.key = Some("greeting".into());
        inner.children.push(View::text("Hello"));

        let mut outer = Element::new("Card", "div");
        outer.key = Some("root".into());
        outer.children = vec![
            View::Element(inner),
            View::Placeholder(Placeholder::unknown_component("Nope")),
            View::text(" world"),
        ];
        View::Element(outer)
    }

    #[test]
    fn queries_walk_the_tree() {
        let v = tree();
        assert_eq!(v.find_by_key("greeting").unwrap().tag, "span");
        assert!(v.find_by_key("missing").is_none());
        assert_eq!(v.find_all("Text").len(), 1);
        assert_eq!(v.placeholders().len(), 1);
        assert_eq!(v.text_content(), "HelloUnknown component: Nope world");
        assert!(v.handlers_for(&EventName::Click).is_empty());
    }

    #[test]
    fn handlers_for_collects_across_elements() {
        let mut a = Element::new("Button", "button");
        a.handlers
            .push(EventHandler::new(EventName::Click, Action::navigate("/a")));
        let mut b = Element::new("Form", "form");
        b.handlers
            .push(EventHandler::new(EventName::Submit, Action::navigate("/b")));
        b.children.push(View::Element(a));
        let v = View::Element(b);
        assert_eq!(v.handlers_for(&EventName::Click).len(), 1);
        assert_eq!(
            v.handlers_for(&EventName::Submit)[0].action,
            Action::navigate("/b")
        );
    }

    #[test]
    fn submit_handlers_prevent_default() {
        assert!(EventHandler::new(EventName::Submit, Action::navigate("/")).prevent_default);
        assert!(!EventHandler::new(EventName::Click, Action::navigate("/")).prevent_default);
    }

    #[test]
    fn fire_dispatches_through_context() {
        let mut ctx = SduiContext::default();
        let h = EventHandler::new(EventName::Submit, Action::set_state("sent", true));
        let fired = h.fire(&mut ctx);
        assert!(fired.default_prevented);
        assert_eq!(ctx.get("sent"), Some(&json!(true)));
    }

    #[test]
    fn serializes_with_kind_tags() {
        let v = View::Placeholder(Placeholder::unknown_component("X"));
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({
                "kind": "placeholder",
                "error": "unknown_component",
                "name": "X",
                "message": "Unknown component: X"
            })
        );
        assert_eq!(
            serde_json::to_value(View::text("hi")).unwrap(),
            json!({"kind": "text", "text": "hi"})
        );
    }
}

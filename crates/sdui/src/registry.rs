//! The mapping from schema `type` strings to renderable components.

use std::{collections::HashMap, fmt, sync::Arc};

use serde_json::Value;

use crate::{EventHandler, Props, View, defaults};

/// Everything a component receives for one node.
#[derive(Debug)]
pub struct ComponentInput<'a> {
    /// The node's `type`.
    pub component: &'a str,
    /// Stable identity of the node among its siblings.
    pub key: String,
    /// Props with every binding resolved.
    pub props: Props,
    /// Handlers wired from the node's `on` map.
    pub handlers: Vec<EventHandler>,
    /// Rendered children; always `None` for void components.
    pub children: Option<Vec<View>>,
    /// The data document of the current pass, for components that read state directly.
    pub data: &'a Value,
}

/// A renderable unit. The engine never looks inside one; it only calls [`render`].
///
/// [`render`]: Component::render
pub trait Component {
    /// Produce the view for one node.
    fn render(&self, input: ComponentInput<'_>) -> View;
}

impl<F> Component for F
where
    F: Fn(ComponentInput<'_>) -> View,
{
    fn render(&self, input: ComponentInput<'_>) -> View {
        self(input)
    }
}

/// Named components available to a render tree. Read-only during rendering.
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    /// Component name to implementation.
    entries: HashMap<String, Arc<dyn Component>>,
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl ComponentRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in component set.
    pub fn with_defaults() -> Self {
        defaults::registry()
    }

    /// Register `component` under `name`, replacing any existing entry.
    pub fn register(&mut self, name: impl Into<String>, component: impl Component + 'static) {
        self.entries.insert(name.into(), Arc::new(component));
    }

    /// Register an already-shared component.
    pub fn register_shared(&mut self, name: impl Into<String>, component: Arc<dyn Component>) {
        self.entries.insert(name.into(), component);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, component: impl Component + 'static) -> Self {
        self.register(name, component);
        self
    }

    /// Layer `overrides` on top of this registry; override entries win.
    pub fn merge(mut self, overrides: Self) -> Self {
        self.entries.extend(overrides.entries);
        self
    }

    /// Look up a component. `None` is the unregistered case.
    pub fn get(&self, name: &str) -> Option<&dyn Component> {
        self.entries.get(name).map(|c| c.as_ref())
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Element;

    fn tagged(tag: &'static str) -> impl Component {
        move |input: ComponentInput<'_>| View::Element(Element::new(input.component, tag))
    }

    fn render_with(registry: &ComponentRegistry, name: &str) -> Option<View> {
        registry.get(name).map(|c| {
            c.render(ComponentInput {
                component: name,
                key: "0".into(),
                props: Props::new(),
                handlers: Vec::new(),
                children: None,
                data: &Value::Null,
            })
        })
    }

    #[test]
    fn lookup_misses_are_none() {
        let r = ComponentRegistry::new().with("A", tagged("a"));
        assert!(r.contains("A"));
        assert!(r.get("B").is_none());
        assert_eq!(r.names(), vec!["A"]);
    }

    #[test]
    fn merge_prefers_overrides() {
        let base = ComponentRegistry::new()
            .with("Button", tagged("button"))
            .with("Text", tagged("span"));
        let overrides = ComponentRegistry::new().with("Button", tagged("fancy-button"));
        let merged = base.merge(overrides);
        assert_eq!(merged.len(), 2);
        let view = render_with(&merged, "Button").unwrap();
        assert_eq!(view.as_element().unwrap().tag, "fancy-button");
        let view = render_with(&merged, "Text").unwrap();
        assert_eq!(view.as_element().unwrap().tag, "span");
    }

    #[test]
    fn defaults_cover_void_components() {
        let r = ComponentRegistry::with_defaults();
        for name in crate::VOID_COMPONENTS {
            assert!(r.contains(name), "default registry lacks {name}");
        }
    }
}

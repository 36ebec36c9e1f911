//! Recursive node rendering.
//!
//! A schema is compiled once into [`CompiledNode`]s (bindings parsed, unknown events
//! dropped) and then rendered any number of times against successive data documents.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::{
    Action, Children, ComponentInput, ComponentRegistry, Condition, EventHandler, EventName,
    Placeholder, SduiNode, View, condition::evaluate, props::CompiledProps, registry::Component,
    template::Template,
};

/// Component types that never receive children.
pub const VOID_COMPONENTS: [&str; 9] = [
    "Divider",
    "Input",
    "Textarea",
    "Checkbox",
    "Switch",
    "Progress",
    "Skeleton",
    "Image",
    "ScrollProgress",
];

/// Identity given to a root node without an explicit key.
pub const ROOT_KEY: &str = "root";

/// Whether `component` is in the void set.
pub fn is_void(component: &str) -> bool {
    VOID_COMPONENTS.contains(&component)
}

/// Everything a render pass reads. Threaded explicitly through every recursive call.
#[derive(Debug, Clone, Copy)]
pub struct RenderEnv<'a> {
    /// Data document for this pass.
    pub data: &'a Value,
    /// Components available to the tree.
    pub registry: &'a ComponentRegistry,
}

/// Compiled children of a node.
#[derive(Debug, Clone, PartialEq)]
enum CompiledChildren {
    /// No children.
    None,
    /// Text, possibly with bindings.
    Text(Template),
    /// Nested nodes.
    Nodes(Vec<CompiledNode>),
}

/// A schema node with its templates parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledNode {
    /// Registry key.
    component: String,
    /// Explicit sibling identity.
    key: Option<String>,
    /// Render gate.
    when: Option<Condition>,
    /// Compiled props.
    props: CompiledProps,
    /// Recognized events and their actions.
    handlers: Vec<(EventName, Action)>,
    /// Compiled children.
    children: CompiledChildren,
}

impl CompiledNode {
    /// Compile `node` and its whole subtree.
    pub fn compile(node: &SduiNode) -> Self {
        let handlers = node
            .on
            .iter()
            .flatten()
            .filter_map(|(event, action)| {
                if event.is_recognized() {
                    Some((event.clone(), action.clone()))
                } else {
                    debug!(
                        component = %node.component,
                        event = %event,
                        "unrecognized event; handler not wired"
                    );
                    None
                }
            })
            .collect();

        let children = match &node.children {
            None => CompiledChildren::None,
            Some(Children::Text(text)) => CompiledChildren::Text(Template::parse(text)),
            Some(Children::Nodes(nodes)) => {
                CompiledChildren::Nodes(nodes.iter().map(Self::compile).collect())
            }
        };

        Self {
            component: node.component.clone(),
            key: node.key.clone(),
            when: node.when.clone(),
            props: node
                .props
                .as_ref()
                .map(CompiledProps::compile)
                .unwrap_or_default(),
            handlers,
            children,
        }
    }

    /// Registry key of this node.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Identity used when this node is rendered as a root.
    pub fn root_key(&self) -> &str {
        self.key.as_deref().unwrap_or(ROOT_KEY)
    }
}

/// Render one compiled node under the identity `key`.
///
/// Never fails: a failed gate renders [`View::Empty`] and an unregistered type renders a
/// placeholder while its siblings render normally.
pub fn render(node: &CompiledNode, env: &RenderEnv<'_>, key: &str) -> View {
    if let Some(when) = &node.when
        && !evaluate(when, env.data)
    {
        trace!(component = %node.component, key, "condition false; node skipped");
        return View::Empty;
    }

    let Some(component) = env.registry.get(&node.component) else {
        warn!(component = %node.component, key, "unknown component; rendering placeholder");
        return View::Placeholder(Placeholder::unknown_component(&node.component));
    };

    let props = node.props.resolve(env.data);
    let handlers = node
        .handlers
        .iter()
        .map(|(event, action)| EventHandler::new(event.clone(), action.clone()))
        .collect();

    let children = if is_void(&node.component) {
        None
    } else {
        match &node.children {
            CompiledChildren::None => None,
            CompiledChildren::Text(template) => Some(vec![View::text(template.render(env.data))]),
            CompiledChildren::Nodes(nodes) => {
                let explicit: HashSet<&str> =
                    nodes.iter().filter_map(|c| c.key.as_deref()).collect();
                Some(
                    nodes
                        .iter()
                        .enumerate()
                        .map(|(i, child)| match &child.key {
                            Some(k) => render(child, env, k),
                            None => render(child, env, &child_key(key, i, &explicit)),
                        })
                        .collect(),
                )
            }
        }
    };

    trace!(component = %node.component, key, "render");
    component.render(ComponentInput {
        component: &node.component,
        key: key.to_string(),
        props,
        handlers,
        children,
        data: env.data,
    })
}

/// Positional identity for the unkeyed child at `index`, kept clear of explicit sibling keys.
fn child_key(parent: &str, index: usize, explicit: &HashSet<&str>) -> String {
    let mut key = format!("{parent}.{index}");
    while explicit.contains(key.as_str()) {
        key.push('~');
    }
    key
}

/// Compile and render `node` as a root in one step.
pub fn render_node(node: &SduiNode, env: &RenderEnv<'_>) -> View {
    let compiled = CompiledNode::compile(node);
    render(&compiled, env, compiled.root_key())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{ActionKind, Operator, path::get_by_path};

    fn node(v: Value) -> SduiNode {
        serde_json::from_value(v).unwrap()
    }

    fn render_with(n: &SduiNode, data: &Value) -> View {
        let registry = ComponentRegistry::with_defaults();
        render_node(
            n,
            &RenderEnv {
                data,
                registry: &registry,
            },
        )
    }

    #[test]
    fn failed_gate_skips_subtree() {
        let n = node(json!({
            "type": "Box",
            "when": {"path": "show", "operator": "eq", "value": true},
            "children": [{"type": "Text", "children": "hidden"}]
        }));
        assert!(render_with(&n, &json!({"show": false})).is_empty());
        let shown = render_with(&n, &json!({"show": true}));
        assert_eq!(shown.text_content(), "hidden");
    }

    #[test]
    fn void_components_get_no_children() {
        let n = node(json!({
            "type": "Input",
            "children": [{"type": "Button", "children": "nope"}]
        }));
        let v = render_with(&n, &json!({}));
        let el = v.as_element().unwrap();
        assert!(el.void);
        assert!(el.children.is_empty());
    }

    #[test]
    fn unknown_type_does_not_stop_siblings() {
        let n = node(json!({
            "type": "Box",
            "children": [
                {"type": "Text", "children": "before"},
                {"type": "NotRegistered"},
                {"type": "Text", "children": "after"}
            ]
        }));
        let v = render_with(&n, &json!({}));
        let children = v.children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].text_content(), "before");
        assert_eq!(
            children[1],
            View::Placeholder(Placeholder::unknown_component("NotRegistered"))
        );
        assert_eq!(children[2].text_content(), "after");
    }

    #[test]
    fn keys_come_from_schema_or_position() {
        let n = node(json!({
            "type": "List",
            "children": [
                {"type": "ListItem", "key": "first"},
                {"type": "ListItem"},
                {"type": "ListItem", "children": [{"type": "Text"}]}
            ]
        }));
        let v = render_with(&n, &json!({}));
        assert_eq!(v.as_element().unwrap().key.as_deref(), Some("root"));
        assert!(v.find_by_key("first").is_some());
        assert!(v.find_by_key("root.1").is_some());
        assert_eq!(v.find_by_key("root.2.0").unwrap().component, "Text");
    }

    #[test]
    fn synthesized_keys_avoid_explicit_siblings() {
        let n = node(json!({
            "type": "List",
            "children": [
                {"type": "ListItem", "key": "root.1", "children": "explicit"},
                {"type": "ListItem", "children": "positional"}
            ]
        }));
        let v = render_with(&n, &json!({}));
        let keys: Vec<_> = v
            .children()
            .iter()
            .filter_map(|c| c.as_element().and_then(|e| e.key.clone()))
            .collect();
        assert_eq!(keys, vec!["root.1", "root.1~"]);
        assert_eq!(v.find_by_key("root.1").unwrap().text_content(), "explicit");
    }

    #[test]
    fn components_read_data_they_were_not_given() {
        let registry = ComponentRegistry::with_defaults().merge(ComponentRegistry::new().with(
            "Select",
            |input: ComponentInput<'_>| {
                let options = get_by_path(input.data, "form.options")
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len);
                View::text(format!("{options} options"))
            },
        ));
        let data = json!({"form": {"options": ["a", "b", "c"]}});
        let n = node(json!({"type": "Box", "children": [{"type": "Select"}]}));
        let v = render_node(
            &n,
            &RenderEnv {
                data: &data,
                registry: &registry,
            },
        );
        assert_eq!(v.text_content(), "3 options");
    }

    #[test]
    fn text_children_interpolate() {
        let n = node(json!({"type": "Text", "children": "Hi {{ user.name }}, {{ n }} new"}));
        let v = render_with(&n, &json!({"user": {"name": "Ada"}, "n": 3}));
        assert_eq!(v.text_content(), "Hi Ada, 3 new");
        let v = render_with(&n, &json!({}));
        assert_eq!(v.text_content(), "Hi ,  new");
    }

    #[test]
    fn props_resolve_each_pass() {
        let compiled = CompiledNode::compile(&node(json!({
            "type": "Progress",
            "props": {"value": "{{ pct }}"}
        })));
        let registry = ComponentRegistry::with_defaults();
        for pct in [10, 90] {
            let data = json!({"pct": pct});
            let env = RenderEnv {
                data: &data,
                registry: &registry,
            };
            let v = render(&compiled, &env, "p");
            assert_eq!(v.as_element().unwrap().attrs["value"], json!(pct));
        }
    }

    #[test]
    fn recognized_events_are_wired() {
        let n = SduiNode::new("Form")
            .with_action(EventName::Submit, Action::navigate("/done"))
            .with_action(EventName::Change, Action::set_state("dirty", true))
            .with_action(
                EventName::Other("hover".into()),
                Action::new(ActionKind::Custom),
            );
        let v = render_with(&n, &json!({}));
        let el = v.as_element().unwrap();
        assert_eq!(el.handlers.len(), 2);
        assert!(el.handler(&EventName::Submit).unwrap().prevent_default);
        assert!(!el.handler(&EventName::Change).unwrap().prevent_default);
        assert!(el.handler(&EventName::Other("hover".into())).is_none());
    }

    #[test]
    fn unknown_operator_renders() {
        let n = SduiNode::new("Text")
            .with_text("shown")
            .with_when(Condition::new("x", Operator::Unknown("matches".into()), None));
        assert_eq!(render_with(&n, &json!({})).text_content(), "shown");
    }

    #[test]
    fn void_set_is_fixed() {
        assert!(is_void("Image"));
        assert!(!is_void("Box"));
        assert!(!is_void("input"));
    }
}

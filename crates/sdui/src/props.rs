//! Resolution of `{{ path }}` bindings inside node props.

use serde_json::{Map, Value};

use crate::{
    Props,
    path::get_by_path,
    template::{Segment, Template},
};

/// A prop value compiled once from the schema and resolved on every render pass.
#[derive(Debug, Clone, PartialEq)]
pub enum PropTemplate {
    /// A value with no bindings anywhere inside it.
    Static(Value),
    /// A string that is exactly one binding; resolves to the raw value.
    Binding(String),
    /// A string mixing text and bindings; resolves to a string.
    Interpolated(Template),
    /// An array containing at least one binding.
    Array(Vec<Self>),
    /// An object containing at least one binding.
    Object(Vec<(String, Self)>),
}

impl PropTemplate {
    /// Compile a JSON value, collapsing binding-free subtrees into `Static`.
    pub fn compile(value: &Value) -> Self {
        match value {
            Value::String(s) => {
                let template = Template::parse(s);
                if let Some(path) = template.whole_binding() {
                    Self::Binding(path.to_string())
                } else if template.has_bindings() {
                    Self::Interpolated(template)
                } else {
                    Self::Static(value.clone())
                }
            }
            Value::Array(items) => {
                let compiled: Vec<Self> = items.iter().map(Self::compile).collect();
                if compiled.iter().all(Self::is_static) {
                    Self::Static(value.clone())
                } else {
                    Self::Array(compiled)
                }
            }
            Value::Object(map) => {
                let compiled: Vec<(String, Self)> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::compile(v)))
                    .collect();
                if compiled.iter().all(|(_, v)| v.is_static()) {
                    Self::Static(value.clone())
                } else {
                    Self::Object(compiled)
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => Self::Static(value.clone()),
        }
    }

    /// Whether this template resolves to the same value regardless of data.
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }

    /// Resolve against `document`. `None` means the value is undefined.
    pub fn resolve(&self, document: &Value) -> Option<Value> {
        match self {
            Self::Static(v) => Some(v.clone()),
            Self::Binding(path) => get_by_path(document, path).cloned(),
            Self::Interpolated(template) => Some(Value::String(template.render(document))),
            Self::Array(items) => Some(Value::Array(
                items
                    .iter()
                    .map(|item| item.resolve(document).unwrap_or(Value::Null))
                    .collect(),
            )),
            Self::Object(entries) => Some(Value::Object(resolve_entries(entries, document))),
        }
    }

    /// Paths referenced by this template, in source order.
    pub fn bindings(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_bindings(&mut out);
        out
    }

    /// Append referenced paths to `out`.
    fn collect_bindings<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Static(_) => {}
            Self::Binding(path) => out.push(path),
            Self::Interpolated(template) => {
                out.extend(template.segments().iter().filter_map(|s| match s {
                    Segment::Binding(path) => Some(path.as_str()),
                    Segment::Literal(_) => None,
                }));
            }
            Self::Array(items) => items.iter().for_each(|i| i.collect_bindings(out)),
            Self::Object(entries) => entries.iter().for_each(|(_, v)| v.collect_bindings(out)),
        }
    }
}

/// Compiled props of a node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledProps {
    /// Prop name to compiled value, in schema order.
    entries: Vec<(String, PropTemplate)>,
}

impl CompiledProps {
    /// Compile a props map.
    pub fn compile(props: &Props) -> Self {
        Self {
            entries: props
                .iter()
                .map(|(k, v)| (k.clone(), PropTemplate::compile(v)))
                .collect(),
        }
    }

    /// Resolve every prop against `document`.
    pub fn resolve(&self, document: &Value) -> Props {
        resolve_entries(&self.entries, document)
    }

    /// Whether there are no props.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve object entries, dropping keys whose value is undefined.
fn resolve_entries(entries: &[(String, PropTemplate)], document: &Value) -> Map<String, Value> {
    entries
        .iter()
        .filter_map(|(k, v)| v.resolve(document).map(|v| (k.clone(), v)))
        .collect()
}

/// Resolve every binding in `props` against `document`.
///
/// A string that is exactly `{{ path }}` takes the raw bound value (a number stays a
/// number); any other string with bindings is interpolated into a string. Props whose
/// whole-value binding is undefined are left out.
pub fn resolve_props(props: &Props, document: &Value) -> Props {
    CompiledProps::compile(props).resolve(document)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn props(v: Value) -> Props {
        match v {
            Value::Object(m) => m,
            _ => panic!("props fixture must be an object"),
        }
    }

    #[test]
    fn whole_binding_preserves_type() {
        let out = resolve_props(&props(json!({"count": "{{ n }}"})), &json!({"n": 5}));
        assert_eq!(out["count"], json!(5));

        let out = resolve_props(
            &props(json!({"user": "{{user}}"})),
            &json!({"user": {"name": "Ada"}}),
        );
        assert_eq!(out["user"], json!({"name": "Ada"}));
    }

    #[test]
    fn in_string_interpolation_stringifies() {
        let out = resolve_props(&props(json!({"label": "Hi {{ n }}!"})), &json!({"n": 5}));
        assert_eq!(out["label"], json!("Hi 5!"));
    }

    #[test]
    fn missing_interpolation_is_empty_string() {
        let out = resolve_props(
            &props(json!({"label": "Hi {{ missing.path }}!"})),
            &json!({}),
        );
        assert_eq!(out["label"], json!("Hi !"));
    }

    #[test]
    fn missing_whole_binding_drops_key() {
        let out = resolve_props(&props(json!({"value": "{{ nope }}", "a": 1})), &json!({}));
        assert!(!out.contains_key("value"));
        assert_eq!(out["a"], json!(1));
    }

    #[test]
    fn recurses_into_arrays_and_objects() {
        let doc = json!({"n": 2, "name": "Ada"});
        let out = resolve_props(
            &props(json!({
                "items": ["{{ n }}", "x {{ name }}", "{{ gone }}", 7],
                "style": {"width": "{{ n }}", "title": "{{ name }}!"},
                "flags": [true, null],
            })),
            &doc,
        );
        assert_eq!(out["items"], json!([2, "x Ada", null, 7]));
        assert_eq!(out["style"], json!({"width": 2, "title": "Ada!"}));
        assert_eq!(out["flags"], json!([true, null]));
    }

    #[test]
    fn binding_free_values_compile_static() {
        let t = PropTemplate::compile(&json!({"a": [1, "two", {"b": false}]}));
        assert!(t.is_static());
        let t = PropTemplate::compile(&json!({"a": [1, "{{ x }}"]}));
        assert!(!t.is_static());
        assert_eq!(t.bindings(), vec!["x"]);
    }

    #[test]
    fn bindings_lists_every_path() {
        let t = PropTemplate::compile(&json!({"a": "{{ x }} and {{ y.z }}", "b": ["{{ w }}"]}));
        let mut paths = t.bindings();
        paths.sort_unstable();
        assert_eq!(paths, vec!["w", "x", "y.z"]);
    }
}

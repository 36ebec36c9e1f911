//! Built-in component adapters.
//!
//! Each adapter maps a widget name onto a host tag with a base CSS class. Styling beyond
//! the class name is left to the host stylesheet.

use serde_json::Value;

use crate::{
    ComponentInput, ComponentRegistry, Element, Props, View,
    registry::Component,
    render::is_void,
};

/// Plain adapters: component name, host tag, base class.
const TAGS: &[(&str, &str, &str)] = &[
    ("Box", "div", "sdui-box"),
    ("Container", "div", "sdui-container"),
    ("Section", "section", "sdui-section"),
    ("Stack", "div", "sdui-stack"),
    ("Flex", "div", "sdui-flex"),
    ("Grid", "div", "sdui-grid"),
    ("Header", "header", "sdui-header"),
    ("Footer", "footer", "sdui-footer"),
    ("Nav", "nav", "sdui-nav"),
    ("Card", "div", "sdui-card"),
    ("CardHeader", "div", "sdui-card-header"),
    ("CardTitle", "h3", "sdui-card-title"),
    ("CardDescription", "p", "sdui-card-description"),
    ("CardContent", "div", "sdui-card-content"),
    ("CardFooter", "div", "sdui-card-footer"),
    ("Text", "span", "sdui-text"),
    ("Paragraph", "p", "sdui-paragraph"),
    ("Label", "label", "sdui-label"),
    ("Link", "a", "sdui-link"),
    ("Badge", "span", "sdui-badge"),
    ("Button", "button", "sdui-button"),
    ("Form", "form", "sdui-form"),
    ("Select", "select", "sdui-select"),
    ("Option", "option", "sdui-option"),
    ("List", "ul", "sdui-list"),
    ("ListItem", "li", "sdui-list-item"),
    ("Divider", "hr", "sdui-divider"),
    ("Input", "input", "sdui-input"),
    ("Textarea", "textarea", "sdui-textarea"),
    ("Progress", "progress", "sdui-progress"),
    ("Skeleton", "div", "sdui-skeleton"),
    ("Image", "img", "sdui-image"),
    ("ScrollProgress", "div", "sdui-scroll-progress"),
];

/// A component that renders a fixed host tag.
#[derive(Debug, Clone, Copy)]
pub struct Tag {
    /// Host tag name.
    tag: &'static str,
    /// Base CSS class, prepended to any `className` prop.
    class: &'static str,
}

impl Tag {
    /// An adapter for `tag` carrying `class`.
    pub const fn new(tag: &'static str, class: &'static str) -> Self {
        Self { tag, class }
    }
}

impl Component for Tag {
    fn render(&self, input: ComponentInput<'_>) -> View {
        View::Element(element(input, self.tag, self.class))
    }
}

/// Build the element for `input`, merging the base class and honoring the void set.
fn element(input: ComponentInput<'_>, tag: &str, class: &str) -> Element {
    let void = is_void(input.component);
    let mut el = Element::new(input.component, tag);
    el.key = Some(input.key);
    el.attrs = with_class(input.props, class);
    el.handlers = input.handlers;
    el.void = void;
    if !void {
        el.children = input.children.unwrap_or_default();
    }
    el
}

/// Prepend `base` to the `className` prop.
fn with_class(mut props: Props, base: &str) -> Props {
    let class = match props.get("className").and_then(Value::as_str) {
        Some(extra) if !extra.trim().is_empty() => format!("{base} {}", extra.trim()),
        _ => base.to_string(),
    };
    props.insert("className".to_string(), Value::String(class));
    props
}

/// Set `key` only when the schema did not.
fn default_attr(el: &mut Element, key: &str, value: impl Into<Value>) {
    el.attrs
        .entry(key.to_string())
        .or_insert_with(|| value.into());
}

/// `Heading` picks `h1`..`h6` from its `level` prop (default 2).
fn heading(input: ComponentInput<'_>) -> View {
    let level = input
        .props
        .get("level")
        .and_then(Value::as_u64)
        .filter(|l| (1..=6).contains(l))
        .unwrap_or(2);
    let tag = format!("h{level}");
    let mut el = element(input, &tag, "sdui-heading");
    el.attrs.remove("level");
    View::Element(el)
}

/// `Checkbox` is a checkbox input.
fn checkbox(input: ComponentInput<'_>) -> View {
    let mut el = element(input, "input", "sdui-checkbox");
    el.attrs.insert("type".into(), "checkbox".into());
    View::Element(el)
}

/// `Switch` is a checkbox input with the switch role.
fn switch(input: ComponentInput<'_>) -> View {
    let mut el = element(input, "input", "sdui-switch");
    el.attrs.insert("type".into(), "checkbox".into());
    default_attr(&mut el, "role", "switch");
    View::Element(el)
}

/// `Alert` announces itself to assistive technology.
fn alert(input: ComponentInput<'_>) -> View {
    let mut el = element(input, "div", "sdui-alert");
    default_attr(&mut el, "role", "alert");
    View::Element(el)
}

/// The default registry.
pub fn registry() -> ComponentRegistry {
    let mut r = ComponentRegistry::new();
    for (name, tag, class) in TAGS {
        r.register(*name, Tag::new(tag, class));
    }
    r.register("Heading", heading);
    r.register("Checkbox", checkbox);
    r.register("Switch", switch);
    r.register("Alert", alert);
    r
}

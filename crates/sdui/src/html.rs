//! Server-side HTML output for rendered views.

use std::fmt::Write as _;

use serde_json::Value;

use crate::{Element, PageSchema, Placeholder, View};

/// Host tags HTML defines as void.
const HTML_VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Serialize a view tree to an HTML fragment.
///
/// Event handlers become `data-sdui-on-<event>` attributes carrying the action as JSON so
/// a client script can rebind them.
pub fn to_html(view: &View) -> String {
    let mut out = String::new();
    write_view(&mut out, view);
    out
}

/// Serialize a view as a complete document with the page's title and metadata.
pub fn to_html_page(view: &View, page: &PageSchema) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n");
    if let Some(title) = &page.title {
        let _ignored = writeln!(out, "<title>{}</title>", escape_html(title));
    }
    if let Some(meta) = &page.meta {
        if let Some(description) = &meta.description {
            let _ignored = writeln!(
                out,
                "<meta name=\"description\" content=\"{}\" />",
                escape_html(description)
            );
        }
        if let Some(keywords) = &meta.keywords {
            let _ignored = writeln!(
                out,
                "<meta name=\"keywords\" content=\"{}\" />",
                escape_html(&keywords.join(", "))
            );
        }
    }
    out.push_str("</head>\n<body>\n");
    write_view(&mut out, view);
    out.push_str("\n</body>\n</html>\n");
    out
}

/// Append `view` to `out`.
fn write_view(out: &mut String, view: &View) {
    match view {
        View::Empty => {}
        View::Text { text } => out.push_str(&escape_html(text)),
        View::Element(el) => write_element(out, el),
        View::Fragment { children } => children.iter().for_each(|c| write_view(out, c)),
        View::Placeholder(p) => write_placeholder(out, p),
    }
}

/// Append one element and its subtree.
fn write_element(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attrs {
        write_attr(out, name, value);
    }
    for handler in &el.handlers {
        if let Ok(action) = serde_json::to_string(&handler.action) {
            let _ignored = write!(
                out,
                " data-sdui-on-{}=\"{}\"",
                handler.event,
                escape_html(&action)
            );
        }
    }

    if el.void && HTML_VOID_TAGS.contains(&el.tag.as_str()) {
        out.push_str(" />");
        return;
    }
    out.push('>');
    if !el.void {
        el.children.iter().for_each(|c| write_view(out, c));
    }
    let _ignored = write!(out, "</{}>", el.tag);
}

/// Append one attribute. Values with no attribute form are skipped.
fn write_attr(out: &mut String, name: &str, value: &Value) {
    let name = match name {
        "className" => "class",
        "htmlFor" => "for",
        other => other,
    };
    if !is_attr_name(name) {
        return;
    }
    match value {
        Value::Bool(true) => {
            out.push(' ');
            out.push_str(name);
        }
        Value::String(s) => {
            let _ignored = write!(out, " {name}=\"{}\"", escape_html(s));
        }
        Value::Number(n) => {
            let _ignored = write!(out, " {name}=\"{n}\"");
        }
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => {}
    }
}

/// Whether `name` can be written as an attribute name without escaping.
fn is_attr_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

/// Append a placeholder marker.
fn write_placeholder(out: &mut String, p: &Placeholder) {
    let _ignored = write!(
        out,
        "<div class=\"sdui-error\" role=\"alert\">{}</div>",
        escape_html(&p.message)
    );
}

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

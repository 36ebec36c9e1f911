use sdui::{
    ComponentInput, ComponentRegistry, Element, PlaceholderKind, RenderOptions, Schema,
    SduiRenderer, View, render_json, to_html,
};
use serde_json::{Value, json};

/// Build a renderer from inline JSON.
fn renderer(text: &str) -> SduiRenderer {
    SduiRenderer::from_json(text).unwrap().build()
}

fn object(v: Value) -> serde_json::Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => panic!("fixture must be an object"),
    }
}

#[test]
fn conditional_node_suppresses_subtree() {
    let schema = r#"{"root": {"type": "Box", "children": [
        {"type": "Card", "key": "gated",
         "when": {"path": "show", "operator": "eq", "value": true},
         "children": [{"type": "Text", "key": "inner", "children": "secret"}]},
        {"type": "Text", "key": "always", "children": "visible"}
    ]}, "data": {"show": false}}"#;
    let mut r = renderer(schema);
    let v = r.render();
    assert!(v.find_by_key("gated").is_none());
    assert!(v.find_by_key("inner").is_none());
    assert_eq!(v.text_content(), "visible");

    r.context_mut().set_path("show", json!(true));
    let v = r.render();
    assert_eq!(v.find_by_key("inner").unwrap().text_content(), "secret");
}

#[test]
fn void_element_drops_schema_children() {
    let r = renderer(r#"{"type": "Input", "children": [{"type": "Button", "children": "x"}]}"#);
    let v = r.render();
    let input = v.as_element().unwrap();
    assert_eq!(input.component, "Input");
    assert!(input.children.is_empty());
    assert!(v.find_all("Button").is_empty());
}

#[test]
fn unknown_type_renders_placeholder_beside_siblings() {
    let r = renderer(
        r#"{"type": "Stack", "children": [
            {"type": "NotRegistered"},
            {"type": "Text", "children": "sibling"}
        ]}"#,
    );
    let v = r.render();
    let placeholders = v.placeholders();
    assert_eq!(placeholders.len(), 1);
    assert_eq!(
        placeholders[0].kind,
        PlaceholderKind::UnknownComponent {
            name: "NotRegistered".into()
        }
    );
    assert_eq!(v.find_all("Text")[0].text_content(), "sibling");
}

#[test]
fn registry_override_wins_over_default() {
    let custom = ComponentRegistry::new().with("Button", |input: ComponentInput<'_>| {
        let mut el = Element::new(input.component, "my-button");
        el.attrs = input.props;
        View::Element(el)
    });
    let r = SduiRenderer::from_json(r#"{"type": "Button", "props": {"label": "{{ l }}"}}"#)
        .unwrap()
        .components(custom)
        .data(object(json!({"l": "Save"})))
        .build();
    let v = r.render();
    let el = v.as_element().unwrap();
    assert_eq!(el.tag, "my-button");
    assert_eq!(el.attrs["label"], json!("Save"));
}

#[test]
fn bare_node_and_page_both_render() {
    let bare = renderer(r#"{"type": "Text", "children": "{{ who }}"}"#);
    assert_eq!(bare.render().text_content(), "");
    assert!(bare.page().is_none());

    let page = renderer(
        r#"{"id": "p", "data": {"who": "page data"},
            "root": {"type": "Text", "children": "{{ who }}"}}"#,
    );
    assert_eq!(page.render().text_content(), "page data");
    assert_eq!(page.page().unwrap().id, "p");
}

#[test]
fn malformed_json_renders_error_view() {
    for text in ["{", "not json", r#"{"type": 3}"#, "[]"] {
        let v = render_json(text, RenderOptions::default());
        let View::Placeholder(p) = &v else {
            panic!("expected placeholder for {text:?}, got {v:?}");
        };
        assert_eq!(p.kind, PlaceholderKind::InvalidSchema);
        assert!(!p.message.contains("line"), "{}", p.message);
    }
}

#[test]
fn whole_value_props_keep_types_through_render() {
    let r = SduiRenderer::from_json(
        r#"{"type": "Progress", "props": {"value": "{{ pct }}", "aria-label": "{{ pct }}% done"}}"#,
    )
    .unwrap()
    .data(object(json!({"pct": 40})))
    .build();
    let v = r.render();
    let el = v.as_element().unwrap();
    assert_eq!(el.attrs["value"], json!(40));
    assert_eq!(el.attrs["aria-label"], json!("40% done"));
}

#[test]
fn renders_to_html() {
    let mut r = renderer(
        r#"{"type": "Card", "props": {"className": "wide"}, "children": [
            {"type": "Heading", "props": {"level": 1}, "children": "Hi <{{ name }}>"},
            {"type": "Input", "props": {"disabled": true, "value": "{{ name }}"}},
            {"type": "Button", "on": {"click": {"type": "custom"}}, "children": "Go"}
        ]}"#,
    );
    r.context_mut().set_path("name", json!("Ada"));
    assert_eq!(
        to_html(&r.render()),
        "<div class=\"sdui-card wide\">\
         <h1 class=\"sdui-heading\">Hi &lt;Ada&gt;</h1>\
         <input class=\"sdui-input\" disabled value=\"Ada\" />\
         <button class=\"sdui-button\" data-sdui-on-click=\"{&quot;type&quot;:&quot;custom&quot;}\">Go</button>\
         </div>"
    );
}

#[test]
fn views_serialize_for_hosts() {
    let r = renderer(r#"{"type": "Text", "key": "t", "children": "hi"}"#);
    let json = serde_json::to_value(r.render()).unwrap();
    assert_eq!(
        json,
        json!({
            "kind": "element",
            "component": "Text",
            "tag": "span",
            "key": "t",
            "attrs": {"className": "sdui-text"},
            "children": [{"kind": "text", "text": "hi"}]
        })
    );
}

#[test]
fn schema_round_trips_through_serde() {
    let schema = Schema::from_json(
        r#"{"root": {"type": "Box", "when": {"path": "a", "operator": "exists"}}, "id": "x"}"#,
    )
    .unwrap();
    let back = serde_json::to_string(&schema).unwrap();
    assert_eq!(Schema::from_json(&back).unwrap(), schema);
}

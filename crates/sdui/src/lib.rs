//! Server-driven UI engine.
//!
//! A JSON schema describes a component tree. The engine binds `{{ path }}` tokens against a
//! data document, gates nodes on conditions, wires UI events to declarative actions, and
//! renders each node through a [`ComponentRegistry`] into a backend-neutral [`View`].
//!
//! ```
//! use sdui::{EventName, SduiRenderer};
//!
//! let mut renderer = SduiRenderer::from_json(
//!     r#"{"id": "home", "data": {"count": 0}, "root": {
//!         "type": "Button",
//!         "children": "Clicked {{ count }} times",
//!         "on": {"click": {"type": "setState", "payload": {"path": "count", "value": 1}}}
//!     }}"#,
//! )
//! .unwrap()
//! .build();
//!
//! let view = renderer.render();
//! let click = view.handlers_for(&EventName::Click)[0].clone();
//! renderer.fire(&click);
//! assert_eq!(renderer.render().text_content(), "Clicked 1 times");
//! ```

pub mod action;
mod condition;
mod context;
pub mod defaults;
mod error;
mod html;
pub mod path;
pub mod props;
mod registry;
pub mod render;
mod renderer;
mod schema;
pub mod template;
pub mod validate;
mod view;

pub use action::{Effect, SkipReason, interpret};
pub use condition::{evaluate, strict_equals};
pub use context::{ActionHook, HostCallbacks, NavigateHook, SduiContext};
pub use error::{Error, excerpt_at};
pub use html::{escape_html, to_html, to_html_page};
pub use path::{get_by_path, set_by_path};
pub use props::resolve_props;
pub use registry::{Component, ComponentInput, ComponentRegistry};
pub use render::{RenderEnv, VOID_COMPONENTS, is_void, render_node};
pub use renderer::{RenderOptions, RendererBuilder, SduiRenderer, render_json};
pub use schema::{
    Action, ActionKind, Children, Condition, EventName, Operator, PageMeta, PageSchema, Props,
    Schema, SchemaKind, SduiNode,
};
pub use template::{Template, interpolate};
pub use validate::{Diagnostic, Severity, validate};
pub use view::{Element, EventHandler, Fired, Placeholder, PlaceholderKind, View};

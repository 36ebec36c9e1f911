//! The renderer entry point: one schema, one context, many render passes.

use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    Action, Component, ComponentRegistry, Error, EventHandler, Fired, HostCallbacks,
    PageSchema, Placeholder, Props, Schema, SduiContext, View,
    context::{ActionHook, NavigateHook},
    render::{CompiledNode, RenderEnv, render},
};

/// A schema bound to its own data document and component registry.
///
/// ```
/// use sdui::{Schema, SduiRenderer};
///
/// let schema = Schema::from_json(r#"{"type": "Text", "children": "Hi {{ name }}"}"#).unwrap();
/// let mut renderer = SduiRenderer::builder(schema).build();
/// renderer.context_mut().set_path("name", "Ada".into());
/// assert_eq!(renderer.render().text_content(), "Hi Ada");
/// ```
#[derive(Debug)]
pub struct SduiRenderer {
    /// The loaded schema.
    schema: Schema,
    /// The root node, compiled once.
    root: CompiledNode,
    /// Defaults merged with caller overrides.
    registry: ComponentRegistry,
    /// Data document and host hooks.
    context: SduiContext,
}

/// Configures an [`SduiRenderer`].
pub struct RendererBuilder {
    /// Schema to render.
    schema: Schema,
    /// Caller-supplied components, layered over the defaults at build time.
    components: ComponentRegistry,
    /// Caller-supplied initial data, layered over the schema's data at build time.
    data: Props,
    /// Host hooks.
    host: HostCallbacks,
}

impl fmt::Debug for RendererBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererBuilder")
            .field("schema", &self.schema)
            .field("components", &self.components)
            .field("data", &self.data)
            .field("host", &self.host)
            .finish()
    }
}

impl RendererBuilder {
    /// Add component overrides; entries here replace defaults of the same name.
    pub fn components(mut self, components: ComponentRegistry) -> Self {
        self.components = self.components.merge(components);
        self
    }

    /// Add a single component override.
    pub fn component(mut self, name: impl Into<String>, component: impl Component + 'static) -> Self {
        self.components.register(name, component);
        self
    }

    /// Initial data; wins over the schema's own `data` on key collision.
    pub fn data(mut self, data: Props) -> Self {
        self.data.extend(data);
        self
    }

    /// Receive `api`, `custom`, and unknown actions.
    pub fn on_action(mut self, hook: impl FnMut(&Action) + 'static) -> Self {
        self.host.on_action = Some(Box::new(hook));
        self
    }

    /// Receive navigation requests.
    pub fn on_navigate(mut self, hook: impl FnMut(&str) + 'static) -> Self {
        self.host.on_navigate = Some(Box::new(hook));
        self
    }

    /// Seed the context and compile the schema.
    pub fn build(self) -> SduiRenderer {
        let data = SduiContext::seed(self.schema.initial_data(), self.data);
        let registry = ComponentRegistry::with_defaults().merge(self.components);
        let root = CompiledNode::compile(self.schema.root());
        debug!(
            kind = ?self.schema.kind(),
            root = root.component(),
            components = registry.len(),
            "renderer built"
        );
        SduiRenderer {
            schema: self.schema,
            root,
            registry,
            context: SduiContext::new(data, self.host),
        }
    }
}

impl SduiRenderer {
    /// Start configuring a renderer for `schema`.
    pub fn builder(schema: impl Into<Schema>) -> RendererBuilder {
        RendererBuilder {
            schema: schema.into(),
            components: ComponentRegistry::new(),
            data: Props::new(),
            host: HostCallbacks::default(),
        }
    }

    /// Parse `text` and start configuring a renderer for it.
    pub fn from_json(text: &str) -> Result<RendererBuilder, Error> {
        Ok(Self::builder(Schema::from_json(text)?))
    }

    /// Render the whole tree against the current data document.
    pub fn render(&self) -> View {
        let env = RenderEnv {
            data: self.context.data(),
            registry: &self.registry,
        };
        render(&self.root, &env, self.root.root_key())
    }

    /// Dispatch an action through the context.
    pub fn handle_action(&mut self, action: &Action) {
        self.context.handle_action(action);
    }

    /// Fire a handler taken from a rendered view.
    pub fn fire(&mut self, handler: &EventHandler) -> Fired {
        handler.fire(&mut self.context)
    }

    /// Replace the whole data document.
    pub fn set_data(&mut self, data: Value) {
        self.context.set_data(data);
    }

    /// The current data document.
    pub fn data(&self) -> &Value {
        self.context.data()
    }

    /// The context backing this renderer.
    pub fn context(&self) -> &SduiContext {
        &self.context
    }

    /// Mutable access to the context.
    pub fn context_mut(&mut self) -> &mut SduiContext {
        &mut self.context
    }

    /// The loaded schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Page id, title, and metadata when the schema is a page.
    pub fn page(&self) -> Option<&PageSchema> {
        self.schema.page()
    }

    /// The merged component registry.
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }
}

/// Options for [`render_json`].
#[derive(Default)]
pub struct RenderOptions {
    /// Component overrides.
    pub components: Option<ComponentRegistry>,
    /// Initial data overrides.
    pub data: Props,
    /// Receives `api`, `custom`, and unknown actions.
    pub on_action: Option<ActionHook>,
    /// Receives navigation requests.
    pub on_navigate: Option<NavigateHook>,
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("components", &self.components)
            .field("data", &self.data)
            .field("on_action", &self.on_action.is_some())
            .field("on_navigate", &self.on_navigate.is_some())
            .finish()
    }
}

/// Parse and render a JSON schema in one call.
///
/// Malformed input renders an invalid-schema placeholder instead of failing. The
/// placeholder message carries no line or column numbers.
pub fn render_json(text: &str, options: RenderOptions) -> View {
    match SduiRenderer::from_json(text) {
        Ok(builder) => {
            let mut builder = builder.data(options.data);
            if let Some(components) = options.components {
                builder = builder.components(components);
            }
            builder.host = HostCallbacks {
                on_action: options.on_action,
                on_navigate: options.on_navigate,
            };
            builder.build().render()
        }
        Err(e) => {
            warn!(error = %e, "invalid schema; rendering placeholder");
            View::Placeholder(Placeholder::invalid_schema(&e.to_string()))
        }
    }
}

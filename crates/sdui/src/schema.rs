//! Wire types for server-driven UI documents.
//!
//! A schema is either a bare [`SduiNode`] or a [`PageSchema`] wrapping a root node with
//! page metadata and initial data. Both arrive as UTF-8 JSON; [`Schema::from_json`] is the
//! usual entry point.

use std::{collections::BTreeMap, fmt, fs, path::Path};

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::{Map, Value};
use tracing::warn;

use crate::Error;

/// Arbitrary key-value pairs: node props, action payloads, and data documents.
pub type Props = Map<String, Value>;

/// A node in the UI tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SduiNode {
    /// Registry key of the component that renders this node.
    #[serde(rename = "type")]
    pub component: String,
    /// Props passed to the component; string values may contain `{{ path }}` bindings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,
    /// Nested nodes or literal/bound text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Children>,
    /// Stable identity among siblings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Gate for this node and its subtree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<Condition>,
    /// Event name to action wiring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<BTreeMap<EventName, Action>>,
}

impl SduiNode {
    /// Create a node of the given component type with nothing else set.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            props: None,
            children: None,
            key: None,
            when: None,
            on: None,
        }
    }

    /// Set a single prop.
    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props
            .get_or_insert_with(Props::new)
            .insert(name.into(), value.into());
        self
    }

    /// Set text children.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children = Some(Children::Text(text.into()));
        self
    }

    /// Set node children.
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = Some(Children::Nodes(children));
        self
    }

    /// Set the sibling identity key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Gate the node on a condition.
    pub fn with_when(mut self, condition: Condition) -> Self {
        self.when = Some(condition);
        self
    }

    /// Wire an event to an action.
    pub fn with_action(mut self, event: EventName, action: Action) -> Self {
        self.on.get_or_insert_with(BTreeMap::new).insert(event, action);
        self
    }
}

/// Children of a node: either text or nested nodes, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Children {
    /// Literal text, possibly containing `{{ path }}` bindings.
    Text(String),
    /// Nested nodes.
    Nodes(Vec<SduiNode>),
}

/// A single comparison against a value in the data document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Dot-separated path into the data document.
    pub path: String,
    /// Comparison to apply.
    pub operator: Operator,
    /// Right-hand side. `None` means the key was absent; a JSON `null` is `Some(Null)`.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
}

impl Condition {
    /// Build a condition.
    pub fn new(path: impl Into<String>, operator: Operator, value: Option<Value>) -> Self {
        Self {
            path: path.into(),
            operator,
            value,
        }
    }
}

/// Deserialize a field that is present in the input, keeping a JSON `null` as `Some(Null)`.
fn deserialize_present<'de, D>(d: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(d).map(Some)
}

/// Comparison operators understood by conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    /// Strict equality.
    Eq,
    /// Strict inequality.
    Neq,
    /// Numeric greater-than.
    Gt,
    /// Numeric less-than.
    Lt,
    /// Numeric greater-or-equal.
    Gte,
    /// Numeric less-or-equal.
    Lte,
    /// Value is present and not null.
    Exists,
    /// Value is absent or null.
    NotExists,
    /// An operator this engine does not know; evaluates to `true`.
    Unknown(String),
}

impl Operator {
    /// Wire spelling of the operator.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lte => "lte",
            Self::Exists => "exists",
            Self::NotExists => "notExists",
            Self::Unknown(s) => s,
        }
    }
}

impl From<String> for Operator {
    fn from(s: String) -> Self {
        match s.as_str() {
            "eq" => Self::Eq,
            "neq" => Self::Neq,
            "gt" => Self::Gt,
            "lt" => Self::Lt,
            "gte" => Self::Gte,
            "lte" => Self::Lte,
            "exists" => Self::Exists,
            "notExists" => Self::NotExists,
            _ => Self::Unknown(s),
        }
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Unknown(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declarative side effect triggered by a UI event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// What kind of effect this is.
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Kind-specific arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Props>,
}

impl Action {
    /// An action with no payload.
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            payload: None,
        }
    }

    /// A `navigate` action to `path`.
    pub fn navigate(path: impl Into<String>) -> Self {
        let path: String = path.into();
        Self::new(ActionKind::Navigate).with_payload("path", path)
    }

    /// A `setState` action writing `value` at `path`.
    pub fn set_state(path: impl Into<String>, value: impl Into<Value>) -> Self {
        let path: String = path.into();
        Self::new(ActionKind::SetState)
            .with_payload("path", path)
            .with_payload("value", value)
    }

    /// Add a payload entry.
    pub fn with_payload(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload
            .get_or_insert_with(Props::new)
            .insert(key.into(), value.into());
        self
    }

    /// Look up a payload entry by key.
    pub fn payload_value(&self, key: &str) -> Option<&Value> {
        self.payload.as_ref().and_then(|p| p.get(key))
    }
}

/// Kinds of actions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    /// Change the current location.
    Navigate,
    /// Write a value into the data document.
    SetState,
    /// Host-handled API call.
    Api,
    /// Host-handled custom action.
    Custom,
    /// A kind this engine does not know; forwarded to the host like `Custom`.
    Other(String),
}

impl ActionKind {
    /// Wire spelling of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Navigate => "navigate",
            Self::SetState => "setState",
            Self::Api => "api",
            Self::Custom => "custom",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ActionKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "navigate" => Self::Navigate,
            "setState" => Self::SetState,
            "api" => Self::Api,
            "custom" => Self::Custom,
            _ => Self::Other(s),
        }
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events a node can wire actions to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventName {
    /// Pointer activation.
    Click,
    /// Form submission.
    Submit,
    /// Value change on an input.
    Change,
    /// An event name this engine does not wire.
    Other(String),
}

impl EventName {
    /// Wire spelling of the event.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::Submit => "submit",
            Self::Change => "change",
            Self::Other(s) => s,
        }
    }

    /// Whether the renderer wires this event.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for EventName {
    fn from(s: String) -> Self {
        match s.as_str() {
            "click" => Self::Click,
            "submit" => Self::Submit,
            "change" => Self::Change,
            _ => Self::Other(s),
        }
    }
}

impl From<EventName> for String {
    fn from(event: EventName) -> Self {
        match event {
            EventName::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A root node wrapped with page metadata and initial data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSchema {
    /// Page identifier.
    #[serde(default)]
    pub id: String,
    /// Page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Descriptive metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
    /// Initial data document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Props>,
    /// The tree to render.
    pub root: SduiNode,
}

/// Page-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Short page description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Search keywords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// Any other metadata entries, kept verbatim.
    #[serde(flatten)]
    pub extra: Props,
}

/// Which shape a top-level schema document has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// A bare node.
    Node,
    /// A page wrapping a root node.
    Page,
}

/// Key of the optional explicit discriminant.
const KIND_KEY: &str = "__kind";

impl SchemaKind {
    /// Classify a top-level document.
    ///
    /// An explicit `"__kind": "page" | "node"` wins. Otherwise a `root` key without a
    /// `type` key marks a page, and anything else is read as a node. A document with both
    /// `root` and `type` is read as a page.
    pub fn detect(value: &Value) -> Result<Self, Error> {
        let Some(obj) = value.as_object() else {
            return Err(Error::Schema {
                path: None,
                message: "expected a JSON object describing a node or a page".to_string(),
            });
        };

        if let Some(kind) = obj.get(KIND_KEY) {
            return match kind.as_str() {
                Some("page") => Ok(Self::Page),
                Some("node") => Ok(Self::Node),
                _ => Err(Error::Schema {
                    path: None,
                    message: format!("unknown {KIND_KEY} {kind}; expected \"page\" or \"node\""),
                }),
            };
        }

        match (obj.contains_key("root"), obj.contains_key("type")) {
            (true, false) => Ok(Self::Page),
            (true, true) => {
                warn!(
                    "schema has both `root` and `type`; reading it as a page (set {} to disambiguate)",
                    KIND_KEY
                );
                Ok(Self::Page)
            }
            (false, _) => Ok(Self::Node),
        }
    }
}

/// A top-level schema document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Schema {
    /// A bare node.
    Node(SduiNode),
    /// A full page.
    Page(PageSchema),
}

impl Schema {
    /// Parse a schema from JSON text.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| Error::from_json(&e, text, None))?;
        Self::from_value(value)
    }

    /// Build a schema from an already-parsed JSON value.
    pub fn from_value(mut value: Value) -> Result<Self, Error> {
        let kind = SchemaKind::detect(&value)?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove(KIND_KEY);
        }
        let shape_err = |e: serde_json::Error| Error::Schema {
            path: None,
            message: e.to_string(),
        };
        match kind {
            SchemaKind::Node => serde_json::from_value(value).map(Self::Node).map_err(shape_err),
            SchemaKind::Page => serde_json::from_value(value).map(Self::Page).map_err(shape_err),
        }
    }

    /// Read and parse a schema file.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|e| Error::Read {
            path: Some(path.to_path_buf()),
            message: e.to_string(),
        })?;
        let value: Value =
            serde_json::from_str(&text).map_err(|e| Error::from_json(&e, &text, Some(path)))?;
        Self::from_value(value).map_err(|e| e.with_path(path))
    }

    /// Which shape this schema has.
    pub fn kind(&self) -> SchemaKind {
        match self {
            Self::Node(_) => SchemaKind::Node,
            Self::Page(_) => SchemaKind::Page,
        }
    }

    /// The node rendering starts from.
    pub fn root(&self) -> &SduiNode {
        match self {
            Self::Node(node) => node,
            Self::Page(page) => &page.root,
        }
    }

    /// Initial data embedded in the schema, if any.
    pub fn initial_data(&self) -> Option<&Props> {
        match self {
            Self::Node(_) => None,
            Self::Page(page) => page.data.as_ref(),
        }
    }

    /// Page metadata when this is a page schema.
    pub fn page(&self) -> Option<&PageSchema> {
        match self {
            Self::Node(_) => None,
            Self::Page(page) => Some(page),
        }
    }
}

impl From<SduiNode> for Schema {
    fn from(node: SduiNode) -> Self {
        Self::Node(node)
    }
}

impl From<PageSchema> for Schema {
    fn from(page: PageSchema) -> Self {
        Self::Page(page)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(d)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

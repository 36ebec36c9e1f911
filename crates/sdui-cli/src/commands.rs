//! The work behind each subcommand, kept apart from argument parsing and process exit.

use std::{fs, path::Path};

use clap::ValueEnum;
use sdui::{
    Action, ComponentRegistry, Diagnostic, Error as SchemaError, Props, Schema, SduiRenderer,
    View, to_html, to_html_page, validate,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading or parsing a schema or data file failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A command-line value could not be used.
    #[error("{flag}: {message}")]
    Argument {
        /// The offending flag.
        flag: &'static str,
        /// What was wrong with it.
        message: String,
    },
    /// The rendered output could not be serialized.
    #[error("failed to serialize output: {0}")]
    Output(String),
}

impl CliError {
    /// Human-facing report.
    pub fn pretty(&self) -> String {
        match self {
            Self::Schema(e) => e.pretty(),
            other => other.to_string(),
        }
    }
}

/// Output format for `render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// HTML; page schemas produce a full document.
    #[default]
    Html,
    /// The view tree as JSON.
    Json,
    /// Text content only.
    Text,
}

/// Inputs to `render`.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    /// Schema file.
    pub schema: &'a Path,
    /// Optional JSON object merged over the schema's data.
    pub data: Option<&'a Path>,
    /// `PATH=JSON` assignments applied as `setState` actions.
    pub set: &'a [String],
    /// JSON actions dispatched after the assignments.
    pub actions: &'a [String],
    /// Output format.
    pub format: Format,
}

/// Load, mutate, and render a schema, returning the printed output.
pub fn render(req: &RenderRequest<'_>) -> Result<String, CliError> {
    let schema = Schema::from_path(req.schema)?;
    let mut builder = SduiRenderer::builder(schema).on_action(|action: &Action| {
        info!(kind = %action.kind, payload = ?action.payload, "action forwarded to host");
    });
    if let Some(path) = req.data {
        builder = builder.data(load_data(path)?);
    }
    let mut renderer = builder.build();

    for raw in req.set {
        let (path, value) = parse_assignment(raw)?;
        renderer.handle_action(&Action::set_state(path, value));
    }
    for raw in req.actions {
        let action: Action = serde_json::from_str(raw).map_err(|e| CliError::Argument {
            flag: "--action",
            message: format!("{raw}: {e}"),
        })?;
        renderer.handle_action(&action);
    }
    debug!(revision = renderer.context().revision(), "rendering");

    let view = renderer.render();
    format_view(&view, renderer.schema(), req.format)
}

/// Print `view` in `format`.
fn format_view(view: &View, schema: &Schema, format: Format) -> Result<String, CliError> {
    match format {
        Format::Html => Ok(match schema.page() {
            Some(page) => to_html_page(view, page),
            None => to_html(view),
        }),
        Format::Json => {
            serde_json::to_string_pretty(view).map_err(|e| CliError::Output(e.to_string()))
        }
        Format::Text => Ok(view.text_content()),
    }
}

/// Result of `check`.
#[derive(Debug)]
pub struct CheckReport {
    /// The normalized schema as JSON, when requested.
    pub dump: Option<String>,
    /// Validation findings.
    pub diagnostics: Vec<Diagnostic>,
}

/// Load and validate a schema against the default components.
pub fn check(path: &Path, dump: bool) -> Result<CheckReport, CliError> {
    let schema = Schema::from_path(path)?;
    let dump = if dump {
        Some(serde_json::to_string_pretty(&schema).map_err(|e| CliError::Output(e.to_string()))?)
    } else {
        None
    };
    let diagnostics = validate(&schema, &ComponentRegistry::with_defaults());
    Ok(CheckReport { dump, diagnostics })
}

/// Read a JSON object from `path`.
pub fn load_data(path: &Path) -> Result<Props, CliError> {
    let text = fs::read_to_string(path).map_err(|e| SchemaError::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| SchemaError::from_json(&e, &text, Some(path)))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CliError::Argument {
            flag: "--data",
            message: format!("{} must contain a JSON object, found {other}", path.display()),
        }),
    }
}

/// Split `PATH=VALUE`. The value is read as JSON, falling back to a plain string.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), CliError> {
    let Some((path, value)) = raw.split_once('=') else {
        return Err(CliError::Argument {
            flag: "--set",
            message: format!("expected PATH=VALUE, got `{raw}`"),
        });
    };
    let path = path.trim();
    if path.is_empty() {
        return Err(CliError::Argument {
            flag: "--set",
            message: format!("empty path in `{raw}`"),
        });
    }
    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((path.to_string(), value))
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        path::PathBuf,
        process,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use serde_json::json;

    use super::*;

    /// A temp file removed when dropped.
    struct Fixture {
        /// Location in the temp dir.
        path: PathBuf,
    }

    impl Fixture {
        /// The file location.
        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ignored = fs::remove_file(&self.path);
        }
    }

    /// Write `contents` to a fresh file in the temp dir.
    fn fixture(name: &str, contents: &str) -> Fixture {
        static N: AtomicUsize = AtomicUsize::new(0);
        let n = N.fetch_add(1, Ordering::SeqCst);
        let path = env::temp_dir().join(format!("sdui-cli-{}-{n}-{name}", process::id()));
        fs::write(&path, contents).unwrap();
        Fixture { path }
    }

    fn request<'a>(schema: &'a Path, set: &'a [String], format: Format) -> RenderRequest<'a> {
        RenderRequest {
            schema,
            data: None,
            set,
            actions: &[],
            format,
        }
    }

    #[test]
    fn assignments_parse_json_or_text() {
        assert_eq!(parse_assignment("a.b=5").unwrap(), ("a.b".into(), json!(5)));
        assert_eq!(parse_assignment("on=true").unwrap(), ("on".into(), json!(true)));
        assert_eq!(parse_assignment("v=null").unwrap(), ("v".into(), Value::Null));
        assert_eq!(parse_assignment("name=Ada").unwrap(), ("name".into(), json!("Ada")));
        assert_eq!(
            parse_assignment("q=a=b").unwrap(),
            ("q".into(), json!("a=b"))
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn render_applies_set_and_actions() {
        let schema = fixture(
            "page.json",
            r#"{"id": "p", "title": "T", "data": {"n": 1},
                "root": {"type": "Text", "children": "{{ user.name }} has {{ n }}"}}"#,
        );
        let set = vec!["user.name=Ada".to_string()];
        let actions = vec![r#"{"type": "setState", "payload": {"path": "n", "value": 7}}"#.to_string()];
        let out = render(&RenderRequest {
            actions: &actions,
            ..request(schema.path(), &set, Format::Text)
        })
        .unwrap();
        assert_eq!(out, "Ada has 7");

        let html = render(&request(schema.path(), &set, Format::Html)).unwrap();
        assert!(html.contains("<title>T</title>"));
        assert!(html.contains("<span class=\"sdui-text\">Ada has 1</span>"));
    }

    #[test]
    fn render_merges_data_file() {
        let schema = fixture("node.json", r#"{"type": "Text", "children": "{{ greeting }}"}"#);
        let data = fixture("data.json", r#"{"greeting": "hello"}"#);
        let out = render(&RenderRequest {
            data: Some(data.path()),
            ..request(schema.path(), &[], Format::Json)
        })
        .unwrap();
        let view: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(view["children"][0]["text"], json!("hello"));
    }

    #[test]
    fn bad_inputs_are_errors() {
        let schema = fixture("bad.json", "{\"type\": ");
        let err = render(&request(schema.path(), &[], Format::Text)).unwrap_err();
        let report = err.pretty();
        assert!(report.starts_with("Schema parse error at "), "{report}");
        assert!(report.contains('^'), "{report}");

        let list = fixture("list.json", "[1]");
        assert!(matches!(
            load_data(list.path()),
            Err(CliError::Argument { flag: "--data", .. })
        ));

        let missing = env::temp_dir().join("sdui-cli-definitely-missing.json");
        assert!(matches!(
            check(&missing, false),
            Err(CliError::Schema(SchemaError::Read { .. }))
        ));
    }

    #[test]
    fn fixtures_are_removed_on_drop() {
        let f = fixture("gone.json", "{}");
        let path = f.path().to_path_buf();
        assert!(path.exists());
        drop(f);
        assert!(!path.exists());
    }

    #[test]
    fn check_reports_diagnostics_and_dump() {
        let schema = fixture(
            "check.json",
            r#"{"__kind": "node", "type": "Box", "children": [{"type": "Nope"}]}"#,
        );
        let report = check(schema.path(), true).unwrap();
        assert_eq!(report.diagnostics.len(), 1);
        let dumped: Value = serde_json::from_str(report.dump.as_deref().unwrap()).unwrap();
        assert_eq!(dumped["children"][0]["type"], json!("Nope"));
        assert!(dumped.get("__kind").is_none());
    }
}

//! The `{{ path }}` binding micro-language.
//!
//! A string is tokenized once into literal and binding segments. A template that is
//! exactly one binding is a *whole-value* binding and resolves to the raw JSON value;
//! anything else interpolates and always yields a string.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::path::get_by_path;

/// Matches one `{{ path }}` token, capturing the trimmed path.
static BINDING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*(.+?)\s*\}\}").expect("binding pattern compiles"));

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied through unchanged.
    Literal(String),
    /// A dot-path into the data document.
    Binding(String),
}

/// A parsed template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Segments in source order; adjacent literals never occur.
    segments: Vec<Segment>,
}

impl Template {
    /// Tokenize `source` in a single pass.
    pub fn parse(source: &str) -> Self {
        if !source.contains("{{") {
            return Self::literal(source);
        }

        let mut segments = Vec::new();
        let mut last = 0;
        for caps in BINDING.captures_iter(source) {
            let (Some(whole), Some(path)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(source[last..whole.start()].to_string()));
            }
            segments.push(Segment::Binding(path.as_str().to_string()));
            last = whole.end();
        }
        if last < source.len() {
            segments.push(Segment::Literal(source[last..].to_string()));
        }
        Self { segments }
    }

    /// A template with no bindings.
    fn literal(source: &str) -> Self {
        let segments = if source.is_empty() {
            Vec::new()
        } else {
            vec![Segment::Literal(source.to_string())]
        };
        Self { segments }
    }

    /// The parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The path when the whole template is a single binding with no surrounding text.
    pub fn whole_binding(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [Segment::Binding(path)] => Some(path),
            _ => None,
        }
    }

    /// Whether the template contains any binding.
    pub fn has_bindings(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Binding(_)))
    }

    /// Interpolate against `document`; undefined bindings become empty strings.
    pub fn render(&self, document: &Value) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Binding(path) => {
                    if let Some(value) = get_by_path(document, path) {
                        out.push_str(&stringify(value));
                    }
                }
            }
        }
        out
    }
}

/// Interpolate `source` against `document` in one call.
pub fn interpolate(source: &str, document: &Value) -> String {
    Template::parse(source).render(document)
}

/// Text form of a JSON value as it appears inside interpolated strings.
///
/// Strings are inserted raw and arrays or objects are written as compact JSON. Integral
/// floats below 1e21 print every digit with no fractional part; larger ones keep the
/// exponent form.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

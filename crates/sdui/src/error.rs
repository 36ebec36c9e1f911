//! Error types for schema loading and parsing.

use std::{
    cmp::{max, min},
    fmt::Write as _,
    path::{Path, PathBuf},
};

use thiserror::Error;

#[derive(Debug, Error, Clone)]
/// Errors produced while loading or parsing a schema.
pub enum Error {
    #[error("{message}")]
    /// I/O or filesystem read error.
    Read {
        /// Optional path associated with the read error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// JSON syntax error with a concrete line/column location and excerpt.
    Parse {
        /// Optional path associated with the parse error.
        path: Option<PathBuf>,
        /// 1-based line number.
        line: usize,
        /// 1-based column number.
        col: usize,
        /// Human-readable error message.
        message: String,
        /// Rendered excerpt including a caret at the error location.
        excerpt: String,
    },
    #[error("{message}")]
    /// Well-formed JSON that does not describe a node or a page.
    Schema {
        /// Optional path associated with the schema error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
}

impl Error {
    /// Build an error from a `serde_json` failure against `source`.
    ///
    /// Syntax and EOF errors become [`Error::Parse`] with an excerpt; data errors
    /// (valid JSON, wrong shape) become [`Error::Schema`].
    pub fn from_json(err: &serde_json::Error, source: &str, path: Option<&Path>) -> Self {
        let message = strip_location(&err.to_string());
        if err.is_syntax() || err.is_eof() {
            let line = err.line().max(1);
            let col = err.column().max(1);
            Self::Parse {
                path: path.map(Path::to_path_buf),
                line,
                col,
                message,
                excerpt: excerpt_at(source, line, col),
            }
        } else {
            Self::Schema {
                path: path.map(Path::to_path_buf),
                message,
            }
        }
    }

    /// Attach a path to an error that does not carry one yet.
    pub fn with_path(self, p: &Path) -> Self {
        match self {
            Self::Read { path: None, message } => Self::Read {
                path: Some(p.to_path_buf()),
                message,
            },
            Self::Parse {
                path: None,
                line,
                col,
                message,
                excerpt,
            } => Self::Parse {
                path: Some(p.to_path_buf()),
                line,
                col,
                message,
                excerpt,
            },
            Self::Schema {
                path: None,
                message,
            } => Self::Schema {
                path: Some(p.to_path_buf()),
                message,
            },
            other => other,
        }
    }

    /// Render a human-friendly error message including location and an excerpt when available.
    pub fn pretty(&self) -> String {
        match self {
            Self::Read { path, message } => match path {
                Some(p) => format!("Read error at {}: {}", p.display(), message),
                None => format!("Read error: {}", message),
            },
            Self::Parse {
                path,
                line,
                col,
                message,
                excerpt,
            } => match path {
                Some(p) => format!(
                    "Schema parse error at {}:{}:{}\n{}\n{}",
                    p.display(),
                    line,
                    col,
                    message,
                    excerpt
                ),
                None => format!(
                    "Schema parse error at line {}, column {}\n{}\n{}",
                    line, col, message, excerpt
                ),
            },
            Self::Schema { path, message } => match path {
                Some(p) => format!("Invalid schema at {}\n{}", p.display(), message),
                None => format!("Invalid schema\n{}", message),
            },
        }
    }

    /// Access the optional path attached to this error.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Schema { path, .. } => {
                path.as_deref()
            }
        }
    }
}

/// Drop the trailing " at line L column C" that `serde_json` appends to its messages.
fn strip_location(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_string(),
        None => message.to_string(),
    }
}

/// Build a small 2-3 line excerpt with a caret at `(line_no, col_no)`.
pub fn excerpt_at(source: &str, line_no: usize, col_no: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let total = lines.len();
    let start = max(1usize, line_no.saturating_sub(2));
    let end = min(total, line_no + 1);

    let mut out = String::new();
    for n in start..=end {
        let text = lines.get(n - 1).copied().unwrap_or("");
        let _ignored = writeln!(out, " {:>4} | {}", n, text);
        if n == line_no {
            let prefix = format!(" {:>4} | ", n);
            let _ignored = writeln!(
                out,
                "{}{}^",
                " ".repeat(prefix.len()),
                " ".repeat(col_no.saturating_sub(1))
            );
        }
    }
    out
}

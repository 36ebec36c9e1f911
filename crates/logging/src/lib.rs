#![warn(missing_docs)]

//! Shared logging helpers, CLI argument definitions, and tracing utilities for the sdui
//! workspace.
//!
//! - [`fmt`]: Render tracing events to logfmt strings
//! - [`capture`]: Record events at or above a level for later inspection
//! - CLI argument parsing for log level configuration

use std::env;

use clap::Args;
use tracing_subscriber::EnvFilter;

pub mod capture;
pub mod fmt;

/// Logging controls for CLI apps.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Set global log level to trace (our crates only)
    #[arg(long, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Set global log level to debug (our crates only)
    #[arg(long, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Set a single global log level for our crates (error|warn|info|debug|trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Set an explicit tracing filter directive (overrides other flags)
    /// e.g. "sdui=trace,sdui_cli=debug"
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl LogArgs {
    /// The filter spec these arguments select.
    pub fn spec(&self) -> String {
        compute_spec(
            self.trace,
            self.debug,
            self.log_level.as_deref(),
            self.log_filter.as_deref(),
        )
    }

    /// An `EnvFilter` for these arguments.
    pub fn env_filter(&self) -> EnvFilter {
        env_filter_from_spec(&self.spec())
    }
}

/// List of crate targets that constitute "our" logs.
pub fn our_crates() -> &'static [&'static str] {
    &["sdui", "sdui_cli", "logging"]
}

/// Build a filter directive string that sets the same `level` for all of our crates.
pub fn level_spec_for(level: &str) -> String {
    let lvl = level.to_ascii_lowercase();
    our_crates()
        .iter()
        .map(|t| format!("{}={}", t, lvl))
        .collect::<Vec<_>>()
        .join(",")
}

/// Compute the final filter spec string with precedence:
/// - `log_filter`
/// - `trace`/`debug`/`log_level` (crate-scoped)
/// - `RUST_LOG` env
/// - default to crate-scoped `info`
pub fn compute_spec(
    trace: bool,
    debug: bool,
    log_level: Option<&str>,
    log_filter: Option<&str>,
) -> String {
    let rust_log = env::var("RUST_LOG").ok();
    spec_with_env(trace, debug, log_level, log_filter, rust_log.as_deref())
}

/// [`compute_spec`] with the `RUST_LOG` value supplied by the caller.
pub fn spec_with_env(
    trace: bool,
    debug: bool,
    log_level: Option<&str>,
    log_filter: Option<&str>,
    rust_log: Option<&str>,
) -> String {
    if let Some(spec) = log_filter {
        return spec.to_string();
    }
    if trace {
        return level_spec_for("trace");
    }
    if debug {
        return level_spec_for("debug");
    }
    if let Some(lvl) = log_level {
        return level_spec_for(lvl);
    }
    match rust_log {
        Some(spec) if !spec.trim().is_empty() => spec.to_string(),
        _ => level_spec_for("info"),
    }
}

/// Create an `EnvFilter` from a spec string.
pub fn env_filter_from_spec(spec: &str) -> EnvFilter {
    EnvFilter::new(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_spec_covers_our_crates() {
        assert_eq!(level_spec_for("WARN"), "sdui=warn,sdui_cli=warn,logging=warn");
    }

    #[test]
    fn precedence() {
        let env = Some("sdui=trace");
        assert_eq!(spec_with_env(true, false, Some("warn"), Some("x=debug"), env), "x=debug");
        assert_eq!(spec_with_env(true, false, Some("warn"), None, env), level_spec_for("trace"));
        assert_eq!(spec_with_env(false, true, Some("warn"), None, env), level_spec_for("debug"));
        assert_eq!(spec_with_env(false, false, Some("warn"), None, env), level_spec_for("warn"));
        assert_eq!(spec_with_env(false, false, None, None, env), "sdui=trace");
        assert_eq!(spec_with_env(false, false, None, None, Some("  ")), level_spec_for("info"));
        assert_eq!(spec_with_env(false, false, None, None, None), level_spec_for("info"));
    }

    #[test]
    fn args_spec_uses_flags() {
        let args = LogArgs {
            debug: true,
            ..LogArgs::default()
        };
        assert_eq!(args.spec(), level_spec_for("debug"));
    }
}

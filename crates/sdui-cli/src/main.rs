//! Binary entrypoint for the `sdui` command-line tool.
use std::{io, path::PathBuf, process};

use clap::{Parser, Subcommand};
use logging::{self as logshared, capture::CaptureLayer};
use sdui::validate::has_errors;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*};

/// Subcommand implementations.
mod commands;

use crate::commands::{Format, RenderRequest};

#[derive(Parser, Debug)]
#[command(name = "sdui", about = "Render and validate server-driven UI schemas", version)]
/// Command-line interface for the `sdui` binary.
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,

    /// Logging controls
    #[command(flatten)]
    log: logshared::LogArgs,
}

#[derive(Subcommand, Debug)]
/// Top-level CLI subcommands.
enum Command {
    /// Render a schema and print the result.
    Render {
        /// Schema file (a bare node or a page)
        schema: PathBuf,

        /// JSON object file merged over the schema's data
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,

        /// Apply a setState before rendering; VALUE is JSON or plain text
        #[arg(long = "set", value_name = "PATH=VALUE")]
        set: Vec<String>,

        /// Dispatch a JSON action before rendering
        #[arg(long = "action", value_name = "JSON")]
        actions: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Html)]
        format: Format,

        /// Exit non-zero if anything was logged at warn or above while rendering
        #[arg(long)]
        strict: bool,
    },
    /// Load and validate a schema then exit.
    Check {
        /// Schema file to check
        schema: PathBuf,

        /// Dump the normalized schema as JSON to stdout
        #[arg(long)]
        dump: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let env_filter = cli.log.env_filter();
    let (capture, warnings) = CaptureLayer::new(Level::WARN);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .without_time()
                .with_writer(io::stderr)
                .with_filter(env_filter),
        )
        .with(capture)
        .try_init()
        .ok();

    match &cli.command {
        Command::Render {
            schema,
            data,
            set,
            actions,
            format,
            strict,
        } => {
            let req = RenderRequest {
                schema,
                data: data.as_deref(),
                set,
                actions,
                format: *format,
            };
            match commands::render(&req) {
                Ok(out) => println!("{out}"),
                Err(e) => {
                    eprintln!("{}", e.pretty());
                    process::exit(1);
                }
            }
            if *strict && !warnings.is_empty() {
                eprintln!("{} warning(s) logged while rendering", warnings.len());
                for entry in warnings.entries() {
                    eprintln!("  {entry}");
                }
                process::exit(1);
            }
        }
        Command::Check { schema, dump } => match commands::check(schema, *dump) {
            Ok(report) => {
                if let Some(json) = &report.dump {
                    println!("{json}");
                }
                for d in &report.diagnostics {
                    eprintln!("{d}");
                }
                if has_errors(&report.diagnostics) {
                    process::exit(1);
                }
                println!("OK");
            }
            Err(e) => {
                eprintln!("{}", e.pretty());
                process::exit(1);
            }
        },
    }
}

mod render;

use std::fs;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tplint_core::{ValidateOptions, validate_with_options};
use tplint_diagnostics::{self as diag, Diagnostic, Severity};

use crate::render::{Format, print_summary, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "tplint",
    version,
    about = "tplint — validate component template markup"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Validate a template file.
    Check {
        file: String,
        /// Path to the component's controller source. Scanned for literal
        /// id/class references; never executed.
        #[arg(long)]
        controller: Option<String>,
        /// Path to globally-available script source. Scanned for literal
        /// id/class references; never executed.
        #[arg(long)]
        ambient: Option<String>,
    },

    /// Explain a diagnostic ID (e.g. TPL1303).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Check {
            file,
            controller,
            ambient,
        } => cmd_check(&file, controller.as_deref(), ambient.as_deref(), format)?,
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }

    Ok(())
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_check(
    file: &str,
    controller_path: Option<&str>,
    ambient_path: Option<&str>,
    format: Format,
) -> Result<()> {
    let input =
        fs::read_to_string(file).with_context(|| format!("failed to read template '{file}'"))?;

    let mut options = ValidateOptions::default();
    if let Some(path) = controller_path {
        options.controller_source = fs::read_to_string(path)
            .with_context(|| format!("failed to read controller source '{path}'"))?;
    }
    if let Some(path) = ambient_path {
        options.ambient_source = fs::read_to_string(path)
            .with_context(|| format!("failed to read ambient source '{path}'"))?;
    }

    match validate_with_options(&input, file, &options) {
        Ok(result) => {
            match format {
                Format::Json => {
                    let out = serde_json::json!({
                        "ok": result.ok,
                        "issues": result.issues,
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                Format::Pretty => {
                    render_diagnostics(&input, file, &result.issues, format);
                    print_summary(&result.issues);
                    if result.ok {
                        eprintln!("template ok");
                    }
                }
            }
            exit_on_errors(&result.issues);
        }
        Err(fatal) => {
            // The fatal channel discards all diagnostics: the file could not
            // be validated at all. Distinct exit code from lint errors.
            match format {
                Format::Json => {
                    let out = serde_json::json!({
                        "ok": false,
                        "fatal": fatal.to_string(),
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                Format::Pretty => {
                    eprintln!("fatal: {fatal}");
                }
            }
            process::exit(2);
        }
    }

    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let text = diag::explain(id);
            let out = serde_json::json!({
                "id": id,
                "explanation": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Explanation is the expected output — write to stdout, not stderr.
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{}: (no explanation available)", id);
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Exit with code 1 if any diagnostic is an error.
/// Warnings and info do not cause a non-zero exit.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics
        .iter()
        .any(|d| matches!(d.severity, Severity::Error))
    {
        process::exit(1);
    }
}

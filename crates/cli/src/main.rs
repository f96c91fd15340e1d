mod render;

use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use flaglint_config::{RuleConfig, SortOrder, load_config_from_str};
use flaglint_core::{
    SourceType, default_source_type, fix_source_as, lint_source_as, source_type_for_path,
};
use flaglint_diagnostics::{self as diag, Diagnostic, Severity};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::render::{FileReport, Format, print_summary, render_diagnostics_pretty, render_lint_json};

/// Environment variable holding the log filter (e.g. `flaglint_core=trace`).
const LOG_ENV: &str = "FLAGLINT_LOG";

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "flaglint",
    version,
    about = "Check and fix commander option flag declarations in JavaScript and TypeScript"
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
    /// Lint source files. Use `-` to read from stdin.
    Lint {
        #[arg(required = true)]
        files: Vec<String>,
        #[command(flatten)]
        rule: RuleArgs,
        /// Exit 1 when any diagnostic is reported, not only errors.
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Apply suggested fixes to a source file and print the result.
    Fix {
        file: String,
        #[command(flatten)]
        rule: RuleArgs,
        /// Write the fixed source back to the file (in-place).
        #[arg(long, short, conflicts_with = "check")]
        write: bool,
        /// Check whether fixes would change the file (exit 1 if so). For CI.
        #[arg(long, conflicts_with = "write")]
        check: bool,
    },

    /// Explain a diagnostic ID (e.g. FLG1002).
    Explain { id: String },
}

/// Rule options shared by `lint` and `fix`. Flags override the config file.
#[derive(Args, Debug)]
struct RuleArgs {
    /// Flag kind used as the sort key: "short" or "long".
    #[arg(long)]
    order: Option<SortOrder>,
    /// Method name treated as a flag declaration (default "option").
    #[arg(long)]
    method: Option<String>,
    /// Path to a JSON file with rule options.
    #[arg(long)]
    config: Option<String>,
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Lint {
            files,
            rule,
            deny_warnings,
        } => cmd_lint(&files, &resolve_config(&rule)?, deny_warnings, format)?,
        Cmd::Fix {
            file,
            rule,
            write,
            check,
        } => cmd_fix(&file, &resolve_config(&rule)?, write, check, format)?,
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }

    Ok(())
}

/// Log to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = std::env::var(LOG_ENV).unwrap_or_else(|_| "warn".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(io::stderr)
        .with_target(true)
        .compact()
        .try_init();
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_lint(files: &[String], config: &RuleConfig, deny_warnings: bool, format: Format) -> Result<()> {
    let mut reports = Vec::with_capacity(files.len());
    for file in files {
        let input = read_input(file)?;
        let result = lint_source_as(&input, source_type(file), config);
        debug!(file = %file, issues = result.issues.len(), "linted");
        if format == Format::Pretty {
            render_diagnostics_pretty(&input, display_name(file), &result.issues);
        }
        reports.push(FileReport::new(display_name(file), &input, result.issues));
    }

    let all: Vec<&Diagnostic> = reports.iter().flat_map(FileReport::iter).collect();
    let failed = all.iter().any(|d| matches!(d.severity, Severity::Error))
        || (deny_warnings && !all.is_empty());

    match format {
        Format::Json => render_lint_json(!failed, &reports)?,
        Format::Pretty => {
            print_summary(all.iter().copied());
            if all.is_empty() {
                eprintln!("lint ok");
            }
        }
    }

    if failed {
        process::exit(1);
    }
    Ok(())
}

fn cmd_fix(file: &str, config: &RuleConfig, write: bool, check: bool, format: Format) -> Result<()> {
    if write && file == "-" {
        bail!("--write cannot be used when reading from stdin");
    }
    let input = read_input(file)?;
    let result = fix_source_as(&input, source_type(file), config)
        .with_context(|| format!("failed to apply fixes to '{}'", display_name(file)))?;
    debug!(
        file = %file,
        passes = result.passes,
        remaining = result.remaining.len(),
        "fixed"
    );

    // Whatever could not be fixed is still worth seeing.
    if format == Format::Pretty && !result.remaining.is_empty() {
        render_diagnostics_pretty(&result.output, display_name(file), &result.remaining);
        print_summary(result.remaining.iter());
    }

    if check {
        status_message(
            format,
            "check",
            !result.changed,
            "no fixes needed",
            "fixes available",
            display_name(file),
            &result.remaining,
        )?;
        if result.changed {
            process::exit(1);
        }
    } else if write {
        if result.changed {
            fs::write(file, &result.output)
                .with_context(|| format!("failed to write '{file}'"))?;
        }
        status_message(
            format,
            "write",
            result.changed,
            "fixed",
            "no fixes needed",
            display_name(file),
            &result.remaining,
        )?;
    } else {
        // Default: print fixed source to stdout.
        print!("{}", result.output);
    }

    Ok(())
}

/// Emit a status message for --check / --write in the appropriate format.
fn status_message(
    format: Format,
    mode: &str,
    condition: bool,
    if_true: &str,
    if_false: &str,
    file: &str,
    remaining: &[Diagnostic],
) -> Result<()> {
    let msg = if condition { if_true } else { if_false };
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "mode": mode,
                "status": msg,
                "file": file,
                "remaining": remaining,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            eprintln!("{msg}: {file}");
        }
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    // Accept rule message names (`invalidOrder`) as well as codes.
    let code = diag::codes::code_for_message_id(id).unwrap_or(id);
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "id": code,
                "name": diag::codes::message_id_for_code(code),
                "explanation": diag::explain(code),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // The explanation is the command output, so it goes to stdout.
            if let Some(text) = diag::explain(code) {
                use ariadne::Fmt;
                match diag::codes::message_id_for_code(code) {
                    Some(name) => println!("{} ({name}): {text}", code.fg(ariadne::Color::Cyan)),
                    None => println!("{}: {text}", code.fg(ariadne::Color::Cyan)),
                }
            } else {
                println!("{code}: (no explanation available)");
                println!("known codes: {}", diag::codes::ALL.join(", "));
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Build the rule options: config file first, then command-line overrides.
fn resolve_config(args: &RuleArgs) -> Result<RuleConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{path}'"))?;
            load_config_from_str(&text).with_context(|| format!("invalid config file '{path}'"))?
        }
        None => RuleConfig::default(),
    };
    if let Some(order) = args.order {
        config.order = order;
    }
    if let Some(method) = &args.method {
        config.method.clone_from(method);
    }
    config.validate().context("invalid rule options")?;
    Ok(config)
}

/// Read a file, or stdin for `-`.
fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        return Ok(input);
    }
    fs::read_to_string(file).with_context(|| format!("failed to read '{file}'"))
}

/// Language to parse `file` as; stdin is read as a TypeScript module.
fn source_type(file: &str) -> SourceType {
    if file == "-" { default_source_type() } else { source_type_for_path(file) }
}

fn display_name(file: &str) -> &str {
    if file == "-" { "<stdin>" } else { file }
}

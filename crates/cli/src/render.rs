//! Pretty diagnostic rendering using ariadne, and the JSON lint envelope.
//!
//! Pretty output goes to stderr so that `flaglint fix` can stream source on
//! stdout; JSON output goes to stdout.

use std::io::{self, IsTerminal};

use anyhow::Result;
use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use flaglint_diagnostics::{Diagnostic, LineIndex, Severity, codes};
use serde::Serialize;

// ── Output format ───────────────────────────────────────────────────────

/// Output format for diagnostic rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or pick based on whether stdout is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ if io::stdout().is_terminal() => Format::Pretty,
            _ => Format::Json,
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: &Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Info => ReportKind::Advice,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Info => Color::Blue,
        _ => Color::Yellow,
    }
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Render diagnostics for one file with source context to stderr.
pub(crate) fn render_diagnostics_pretty(source: &str, filename: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    // Spans are byte offsets.
    let config = Config::default()
        .with_compact(false)
        .with_index_type(IndexType::Byte);
    let mut cache = (filename, Source::from(source));

    for diag in diagnostics {
        let Some(span) = diag.span else {
            eprintln!("{}[{}]: {}", diag.severity, diag.id, diag.message);
            continue;
        };
        let start = span.start.min(source.len());
        let end = span.end.min(source.len()).max(start);

        let mut builder = Report::build(report_kind(&diag.severity), (filename, start..end))
            .with_code(diag.id.as_ref())
            .with_message(&diag.message)
            .with_config(config)
            .with_label(
                Label::new((filename, start..end))
                    .with_message(label_message(diag))
                    .with_color(severity_color(&diag.severity)),
            );

        if let Some(note) = fix_note(diag) {
            builder = builder.with_note(note);
        }
        if let Some(explanation) = diag.explain() {
            builder = builder.with_help(explanation);
        }

        builder.finish().eprint(&mut cache).ok();
    }
}

/// A short label for the underlined span; the header already has the message.
fn label_message(diag: &Diagnostic) -> String {
    let ctx = diag.context.as_ref();
    let get = |key: &str| ctx.and_then(|c| c.get(key)).map(String::as_str);
    match diag.id.as_ref() {
        codes::INVALID_FORMAT => "not a valid flag specifier".to_string(),
        codes::INVALID_ORDER => match get("correct") {
            Some(correct) => format!("expected \"{correct}\""),
            None => diag.message.clone(),
        },
        codes::NOT_SORTED => match (get("current"), get("prev")) {
            (Some(current), Some(prev)) => format!("\"{current}\" sorts before \"{prev}\""),
            _ => diag.message.clone(),
        },
        _ => diag.message.clone(),
    }
}

fn fix_note(diag: &Diagnostic) -> Option<String> {
    let fix = diag.fix.as_ref()?;
    Some(match fix.edits.as_slice() {
        [edit] => format!("fix: replace with {}", edit.replacement),
        _ => "fix: swap this declaration with the previous one (run `flaglint fix`)".to_string(),
    })
}

// ── JSON rendering ──────────────────────────────────────────────────────

/// A diagnostic with its 1-based line and byte column.
#[derive(Debug, Serialize)]
pub(crate) struct Located {
    #[serde(flatten)]
    pub(crate) diagnostic: Diagnostic,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<usize>,
}

/// Diagnostics for one linted input.
#[derive(Debug, Serialize)]
pub(crate) struct FileReport {
    /// Path as given on the command line, or `<stdin>`.
    pub(crate) file: String,
    /// Diagnostics in source order.
    pub(crate) diagnostics: Vec<Located>,
}

impl FileReport {
    pub(crate) fn new(file: &str, source: &str, diagnostics: Vec<Diagnostic>) -> Self {
        let index = LineIndex::new(source);
        let diagnostics = diagnostics
            .into_iter()
            .map(|diagnostic| {
                let position = diagnostic.span.map(|span| index.line_col(span.start));
                Located {
                    line: position.map(|(line, _)| line + 1),
                    column: position.map(|(_, col)| col + 1),
                    diagnostic,
                }
            })
            .collect();
        Self {
            file: file.to_string(),
            diagnostics,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().map(|l| &l.diagnostic)
    }
}

/// Print `{ "ok": .., "files": [..] }` to stdout.
pub(crate) fn render_lint_json(ok: bool, reports: &[FileReport]) -> Result<()> {
    let out = serde_json::json!({
        "ok": ok,
        "files": reports,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured summary line showing error/warning/info counts.
///
/// Example: `1 error, 2 warnings`
pub(crate) fn print_summary<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) {
    use ariadne::Fmt;

    let (mut errors, mut warnings, mut infos) = (0usize, 0usize, 0usize);
    for d in diagnostics {
        match d.severity {
            Severity::Error => errors += 1,
            Severity::Info => infos += 1,
            _ => warnings += 1,
        }
    }
    if errors + warnings + infos == 0 {
        return;
    }

    let plural = |n: usize| if n == 1 { "" } else { "s" };
    let mut parts = Vec::new();
    if errors > 0 {
        parts.push(format!("{errors} error{}", plural(errors)).fg(Color::Red).to_string());
    }
    if warnings > 0 {
        parts.push(
            format!("{warnings} warning{}", plural(warnings))
                .fg(Color::Yellow)
                .to_string(),
        );
    }
    if infos > 0 {
        parts.push(format!("{infos} info").fg(Color::Blue).to_string());
    }
    eprintln!("{}", parts.join(", "));
}

use crate::rule::check_program;
use crate::source::default_source_type;
use flaglint_config::RuleConfig;
use flaglint_diagnostics::{Diagnostic, FixError, Severity, apply_fixes, codes};
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use serde::Serialize;
use tracing::debug;

/// Upper bound on lint → apply rounds in [`fix_source`].
pub const MAX_FIX_PASSES: usize = 10;

/// Result of linting one source buffer.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    /// `true` if no errors were found (warnings and info are allowed).
    pub ok: bool,
    /// All diagnostics, in source order.
    pub issues: Vec<Diagnostic>,
}

/// Lint `source`, read as a TypeScript module, with the option-flags rule.
pub fn lint_source(source: &str, config: &RuleConfig) -> LintResult {
    lint_source_as(source, default_source_type(), config)
}

/// Lint `source` parsed as `source_type`.
///
/// A file that does not parse is not checked; each parser error becomes an
/// error-severity diagnostic instead.
pub fn lint_source_as(source: &str, source_type: SourceType, config: &RuleConfig) -> LintResult {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, source_type).parse();
    let issues = if parsed.errors.is_empty() {
        check_program(source, &parsed.program, config)
    } else {
        debug!(errors = parsed.errors.len(), "source did not parse");
        parsed
            .errors
            .iter()
            .map(|error| Diagnostic::error(codes::PARSE_ERROR, error.to_string(), None))
            .collect()
    };
    let ok = !issues.iter().any(|d| matches!(d.severity, Severity::Error));
    LintResult { ok, issues }
}

/// Result of [`fix_source`].
#[derive(Debug, Clone, Serialize)]
pub struct FixResult {
    /// The rewritten source.
    pub output: String,
    /// Number of rounds that changed the text.
    pub passes: usize,
    /// `true` if `output` differs from the input.
    pub changed: bool,
    /// Diagnostics still reported on `output`.
    pub remaining: Vec<Diagnostic>,
}

/// Apply suggested fixes until none applies or [`MAX_FIX_PASSES`] is reached.
///
/// Each round lints the current text and applies every fix that does not
/// overlap an earlier one, so a long unsorted chain settles over several
/// rounds.
pub fn fix_source(source: &str, config: &RuleConfig) -> Result<FixResult, FixError> {
    fix_source_as(source, default_source_type(), config)
}

/// [`fix_source`] for `source` parsed as `source_type`.
pub fn fix_source_as(
    source: &str,
    source_type: SourceType,
    config: &RuleConfig,
) -> Result<FixResult, FixError> {
    let mut output = source.to_string();
    let mut passes = 0usize;
    let mut result = lint_source_as(&output, source_type, config);
    while passes < MAX_FIX_PASSES {
        let fixes = result.issues.iter().filter_map(|d| d.fix.as_ref());
        let applied = apply_fixes(&output, fixes)?;
        if applied.applied == 0 || applied.output == output {
            break;
        }
        debug!(
            pass = passes + 1,
            applied = applied.applied,
            skipped = applied.skipped,
            "applied fixes"
        );
        output = applied.output;
        passes += 1;
        result = lint_source_as(&output, source_type, config);
    }
    Ok(FixResult {
        changed: output != source,
        output,
        passes,
        remaining: result.issues,
    })
}

//! Diagnostics for the flaglint toolchain.
//!
//! Provides [`Diagnostic`], [`Severity`], [`Span`], [`LineIndex`], and the
//! [`Fix`]/[`Edit`] pair used to attach suggested source rewrites to a
//! diagnostic. Diagnostic codes are defined in the [`codes`] module; fixes
//! are applied to a buffer with [`apply_fixes`].

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;
mod fix;

pub use fix::{Applied, FixError, apply_fixes};

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

// ── LineIndex ────────────────────────────────────────────────────────────

/// Maps byte offsets in a source string to line and column positions.
///
/// Lines and columns are **0-indexed** internally. Use [`LineIndex::line_col`]
/// to get a `(line, col)` pair and add 1 when displaying to users.
///
/// The index is built in O(n) time and each lookup is O(log n) via binary
/// search.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line.
    /// `line_starts[0]` is always 0.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Build a `LineIndex` from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0usize];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a 0-indexed `(line, column)` pair.
    ///
    /// If `offset` is past the end of the source, the last line is returned
    /// with the column measured from that line's start.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next.saturating_sub(1),
        };
        let col = offset.saturating_sub(self.line_starts[line]);
        (line, col)
    }
}

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error.
    Error,
    /// Style or correctness warning.
    Warn,
    /// Informational note.
    Info,
}

/// Byte span in the source input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

// ── Fixes ────────────────────────────────────────────────────────────────

/// Replace the text covered by `span` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// Byte range of the original source to replace.
    pub span: Span,
    /// Replacement text.
    pub replacement: String,
}

impl Edit {
    /// Create an edit.
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }
}

/// A suggested rewrite: one or more edits applied together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// The edits making up this fix, in source order.
    pub edits: Vec<Edit>,
}

impl Fix {
    /// Create a fix from a list of edits.
    pub fn new(edits: Vec<Edit>) -> Self {
        Self { edits }
    }

    /// Create a fix consisting of a single edit.
    pub fn single(edit: Edit) -> Self {
        Self { edits: vec![edit] }
    }

    /// The span covering every edit of this fix, or `None` for an empty fix.
    pub fn range(&self) -> Option<Span> {
        let mut iter = self.edits.iter().map(|e| e.span);
        let first = iter.next()?;
        Some(iter.fold(first, Span::cover))
    }
}

/// A diagnostic message produced by the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"FLG1002"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Optional byte span in the source input that this diagnostic relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Machine-readable display data (e.g. `correct`, `current`, `prev`).
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
    /// Suggested rewrite, when one can be offered safely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
            fix: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Error, message, span)
    }

    /// Attach machine-readable context metadata (builder pattern).
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Attach a suggested fix (builder pattern).
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

// ── Code metadata ────────────────────────────────────────────────────────

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    match id {
        codes::PARSE_ERROR => Some(
            "The file could not be parsed as JavaScript or TypeScript, so none of its option \
             declarations were checked. The parser is chosen from the file extension; input \
             without a known extension is read as a TypeScript module. Fix the syntax error \
             and lint again.",
        ),
        codes::INVALID_FORMAT => Some(
            "The option flag specifier is malformed. A specifier declares one short flag \
             (a hyphen and a single letter, like -p), one long flag (two hyphens and a word, \
             like --port), or one of each, optionally followed by a value placeholder such \
             as <number> or [value]. Specifiers with no flags, repeated flags of the same \
             kind, unrecognised words, or more than two flags are rejected. No automatic \
             fix is offered because the intended flags are ambiguous.",
        ),
        codes::INVALID_ORDER => Some(
            "The long flag is written before the short flag. Write the short flag first, \
             separated by a comma: \"-p, --port <number>\". The automatic fix rewrites the \
             string literal and keeps any trailing value placeholder verbatim.",
        ),
        codes::NOT_SORTED => Some(
            "Successive option declarations in a builder chain should be sorted \
             alphabetically by their sort key: the long flag name by default, or the short \
             flag name when the rule is configured with order \"short\". Only adjacent pairs \
             are compared. The automatic fix swaps the two declarations in place; run the \
             fixer again to settle longer chains.",
        ),
        _ => None,
    }
}

/// Default severity for a diagnostic code, if known.
pub fn severity_for_code(id: &str) -> Option<Severity> {
    match id {
        codes::PARSE_ERROR => Some(Severity::Error),
        codes::INVALID_FORMAT | codes::INVALID_ORDER | codes::NOT_SORTED => Some(Severity::Warn),
        _ => None,
    }
}

/// Message template for a diagnostic code, with `{key}` placeholders.
pub fn message_template_for(id: &str) -> Option<&'static str> {
    match id {
        codes::INVALID_FORMAT => Some("Option flags must be \"-[char], --[word]\" or one of them."),
        codes::INVALID_ORDER => Some("Short flag must come before long flag: \"{correct}\""),
        codes::NOT_SORTED => Some(
            "Options should be sorted alphabetically. \"{current}\" should be before \"{prev}\".",
        ),
        _ => None,
    }
}

/// Render the message template for `id`, substituting `{key}` placeholders.
///
/// Unknown placeholders are left as written. Returns `fallback` when the code
/// has no template.
pub fn render_message(id: &str, substitutions: &[(&str, &str)], fallback: &str) -> String {
    let Some(template) = message_template_for(id) else {
        return fallback.to_string();
    };
    let substitution_map: HashMap<&str, &str> = substitutions.iter().copied().collect();
    let mut rendered = String::with_capacity(template.len() + 16);
    let mut scan_from = 0usize;
    while let Some(open_rel) = template[scan_from..].find('{') {
        let open = scan_from + open_rel;
        rendered.push_str(&template[scan_from..open]);
        let after_open = open + 1;
        if let Some(close_rel) = template[after_open..].find('}') {
            let close = after_open + close_rel;
            let key = &template[after_open..close];
            if let Some(value) = substitution_map.get(key) {
                rendered.push_str(value);
            } else {
                rendered.push_str(&template[open..=close]);
            }
            scan_from = close + 1;
        } else {
            rendered.push_str(&template[open..]);
            return rendered;
        }
    }
    rendered.push_str(&template[scan_from..]);
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── LineIndex ────────────────────────────────────────────────────────

    #[test]
    fn line_index_single_line() {
        let idx = LineIndex::new("program.option('-p')");
        assert_eq!(idx.line_col(0), (0, 0));
        assert_eq!(idx.line_col(8), (0, 8));
    }

    #[test]
    fn line_index_chain_across_lines() {
        let idx = LineIndex::new("program\n  .option('-a')\n  .option('-b')");
        assert_eq!(idx.line_col(0), (0, 0));
        assert_eq!(idx.line_col(8), (1, 0));
        assert_eq!(idx.line_col(10), (1, 2)); // '.'
        assert_eq!(idx.line_col(24), (2, 0));
        assert_eq!(idx.line_col(100), (2, 76));
    }

    #[test]
    fn line_index_empty_input() {
        let idx = LineIndex::new("");
        assert_eq!(idx.line_col(0), (0, 0));
    }

    #[test]
    fn line_index_multibyte_utf8() {
        // '€' is 3 bytes in UTF-8
        let idx = LineIndex::new("€\na");
        assert_eq!(idx.line_col(3), (0, 3));
        assert_eq!(idx.line_col(4), (1, 0));
    }

    // ── Span ────────────────────────────────────────────────────────────

    #[test]
    fn span_cover() {
        assert_eq!(Span::new(5, 10).cover(Span::new(2, 7)), Span::new(2, 10));
        assert_eq!(Span::new(0, 1).cover(Span::new(4, 6)), Span::new(0, 6));
    }

    #[test]
    #[should_panic(expected = "Span end (3) < start (5)")]
    fn span_new_inverted_panics() {
        Span::new(5, 3);
    }

    // ── Fix ─────────────────────────────────────────────────────────────

    #[test]
    fn fix_range_covers_all_edits() {
        let fix = Fix::new(vec![
            Edit::new(Span::new(10, 20), "b"),
            Edit::new(Span::new(20, 35), "a"),
        ]);
        assert_eq!(fix.range(), Some(Span::new(10, 35)));
        assert_eq!(Fix::new(Vec::new()).range(), None);
    }

    // ── Diagnostic ──────────────────────────────────────────────────────

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::new(codes::INVALID_FORMAT, Severity::Warn, "bad flags", None);
        assert_eq!(format!("{}", d), "warn[FLG1001]: bad flags");
        let d = Diagnostic::error(codes::PARSE_ERROR, "Unexpected token", None);
        assert_eq!(format!("{}", d), "error[FLG0001]: Unexpected token");
    }

    #[test]
    fn diagnostic_serde_omits_none_fields() {
        let d = Diagnostic::new(codes::INVALID_FORMAT, Severity::Warn, "test", None);
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("span"), "None span should be omitted: {json}");
        assert!(!json.contains("context"), "None context should be omitted: {json}");
        assert!(!json.contains("fix"), "None fix should be omitted: {json}");
    }

    #[test]
    fn diagnostic_with_fix_serde_roundtrip() {
        let d = Diagnostic::new(codes::INVALID_ORDER, Severity::Warn, "reorder", Some(Span::new(15, 36)))
            .with_context(BTreeMap::from([("correct".into(), "-p, --port".into())]))
            .with_fix(Fix::single(Edit::new(Span::new(15, 36), "'-p, --port'")));
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"replacement\""), "fix should be serialized: {json}");
        let d2: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(d, d2);
    }

    #[test]
    fn every_code_has_explanation_and_severity() {
        for code in codes::ALL {
            assert!(explain(code).is_some(), "{code} has no explanation");
            assert!(severity_for_code(code).is_some(), "{code} has no severity");
            let id = codes::message_id_for_code(code).unwrap();
            assert_eq!(codes::code_for_message_id(id), Some(*code));
        }
        assert!(explain("FLG9999").is_none());
    }

    #[test]
    fn rule_codes_are_templated_warnings() {
        for code in [codes::INVALID_FORMAT, codes::INVALID_ORDER, codes::NOT_SORTED] {
            assert!(message_template_for(code).is_some(), "{code} has no template");
            assert_eq!(severity_for_code(code), Some(Severity::Warn));
        }
        assert_eq!(severity_for_code(codes::PARSE_ERROR), Some(Severity::Error));
        assert_eq!(message_template_for(codes::PARSE_ERROR), None);
    }

    // ── Templates ───────────────────────────────────────────────────────

    #[test]
    fn render_message_substitutes_keys() {
        let msg = render_message(codes::NOT_SORTED, &[("current", "apple"), ("prev", "banana")], "");
        assert_eq!(
            msg,
            "Options should be sorted alphabetically. \"apple\" should be before \"banana\"."
        );
    }

    #[test]
    fn render_message_keeps_unknown_placeholders() {
        let msg = render_message(codes::INVALID_ORDER, &[], "");
        assert_eq!(msg, "Short flag must come before long flag: \"{correct}\"");
    }

    #[test]
    fn render_message_falls_back_for_unknown_code() {
        assert_eq!(render_message("NOPE", &[], "fallback"), "fallback");
    }
}

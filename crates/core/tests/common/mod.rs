//! Shared test helpers for `flaglint_core` integration tests.

#![allow(unreachable_pub)]

use flaglint_core::{Diagnostic, RuleConfig, SortOrder, fix_source, lint_source};

/// Lint with the default options.
pub fn lint(src: &str) -> Vec<Diagnostic> {
    lint_source(src, &RuleConfig::default()).issues
}

/// Lint with the short-flag sort preference.
#[allow(dead_code)]
pub fn lint_short_order(src: &str) -> Vec<Diagnostic> {
    let config = RuleConfig {
        order: SortOrder::Short,
        ..Default::default()
    };
    lint_source(src, &config).issues
}

/// Diagnostic codes in report order.
pub fn ids(issues: &[Diagnostic]) -> Vec<String> {
    issues.iter().map(|d| d.id.to_string()).collect()
}

/// The first diagnostic with `code`, or panic.
#[allow(dead_code)]
pub fn find_diag<'a>(issues: &'a [Diagnostic], code: &str) -> &'a Diagnostic {
    issues
        .iter()
        .find(|d| &*d.id == code)
        .unwrap_or_else(|| panic!("expected diagnostic {code} in {issues:#?}"))
}

/// Source text covered by a diagnostic's span.
#[allow(dead_code)]
pub fn span_text<'a>(src: &'a str, diag: &Diagnostic) -> &'a str {
    let span = diag.span.expect("diagnostic without span");
    &src[span.start..span.end]
}

/// Fully fixed text with the default options.
#[allow(dead_code)]
pub fn fixed(src: &str) -> String {
    fix_source(src, &RuleConfig::default())
        .expect("fixes apply cleanly")
        .output
}

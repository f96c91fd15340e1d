//! flaglint core library.
//!
//! Checks commander-style option flag specifiers (`"-p, --port <number>"`)
//! in JavaScript and TypeScript builder chains. The main entry points are
//! [`lint_source`] for diagnostics and [`fix_source`] for applying the
//! suggested rewrites.

#![warn(missing_docs)]

mod lint;
/// The option-flags rule: specifier parsing, checks and fixes.
pub mod rule;
/// Parsing with oxc and AST helpers.
pub mod source;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Entry points
pub use lint::{
    FixResult, LintResult, MAX_FIX_PASSES, fix_source, fix_source_as, lint_source, lint_source_as,
};

// Rule
pub use rule::flags::{FlagKind, FlagToken, ParsedSpecifier};
pub use rule::{Candidate, FlagDeclaration, check_program, classify, predecessor};

// Source types
pub use oxc_span::SourceType;
pub use source::{default_source_type, source_type_for_path};

// Diagnostics and config (re-exported from their crates)
pub use flaglint_config::{RuleConfig, SortOrder};
pub use flaglint_diagnostics::{Diagnostic, Edit, Fix, FixError, Severity, Span, codes};

//! The option-flags rule.
//!
//! Each qualifying call (`<receiver>.option('<flags>', ...)`) goes through
//! three stages: [`flags`] parses the specifier, [`check`] applies the format,
//! internal-order and chain-order rules, and [`fix`] synthesizes rewrites for
//! the violations that have an unambiguous correction.

/// Structural and ordering checks.
pub mod check;
/// Suggested rewrites.
pub mod fix;
/// Specifier parsing.
pub mod flags;

use crate::source::{byte_span, skip_parens, skip_transparent};
use check::{has_valid_format, reversed_flags, unsorted_pair};
use flaglint_config::RuleConfig;
use flaglint_diagnostics::{Diagnostic, Severity, Span, codes, render_message, severity_for_code};
use flags::ParsedSpecifier;
use oxc_ast::ast::{Argument, CallExpression, Expression, Program};
use oxc_ast::{AstKind, Visit};
use oxc_span::GetSpan;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

/// A call whose first argument is a static flag specifier.
#[derive(Debug, Clone, Copy)]
pub struct FlagDeclaration<'p, 'a> {
    /// The call expression.
    pub call: &'p CallExpression<'a>,
    /// The expression the method is invoked on, as written.
    pub receiver: &'p Expression<'a>,
    /// Span of the method name.
    pub method_span: Span,
    /// Value of the first argument.
    pub specifier: &'p str,
    /// Span of the first argument, quotes included.
    pub literal: Span,
    /// Quote character the literal was written with.
    pub quote: char,
}

/// Outcome of the flag-declaration predicate for one call.
#[derive(Debug, Clone, Copy)]
pub enum Candidate<'p, 'a> {
    /// Wrong callee shape, wrong method, or no static string first argument.
    NotApplicable,
    /// A flag declaration the rule checks.
    Declaration(FlagDeclaration<'p, 'a>),
}

/// Decide whether `call` declares an option through `method`.
///
/// The callee must be a static member access (`x.option`, `x?.option`) named
/// `method`, and the first argument a plain string literal. Parentheses
/// around either are ignored. Template literals, computed members and any
/// other argument shape are skipped.
pub fn classify<'p, 'a>(
    source: &str,
    call: &'p CallExpression<'a>,
    method: &str,
) -> Candidate<'p, 'a> {
    let Expression::StaticMemberExpression(member) = skip_parens(&call.callee) else {
        return Candidate::NotApplicable;
    };
    if member.property.name.as_str() != method {
        return Candidate::NotApplicable;
    }
    let Some(first) = call.arguments.first().and_then(Argument::as_expression) else {
        return Candidate::NotApplicable;
    };
    let Expression::StringLiteral(literal) = skip_parens(first) else {
        return Candidate::NotApplicable;
    };
    let literal_span = byte_span(literal.span);
    let Some(quote) = source.get(literal_span.start..).and_then(|rest| rest.chars().next()) else {
        return Candidate::NotApplicable;
    };
    Candidate::Declaration(FlagDeclaration {
        call,
        receiver: &member.object,
        method_span: byte_span(member.property.span),
        specifier: literal.value.as_str(),
        literal: literal_span,
        quote,
    })
}

/// The declaration immediately before `declaration` in its builder chain.
///
/// That is its receiver, when the receiver is itself a flag declaration.
/// Parentheses and non-null assertions between the two are skipped.
pub fn predecessor<'p, 'a>(
    source: &str,
    declaration: &FlagDeclaration<'p, 'a>,
    method: &str,
) -> Option<FlagDeclaration<'p, 'a>> {
    match skip_transparent(declaration.receiver) {
        Expression::CallExpression(previous) => match classify(source, previous, method) {
            Candidate::Declaration(previous) => Some(previous),
            Candidate::NotApplicable => None,
        },
        _ => None,
    }
}

/// Run the rule over every call in `program`, parsed from `source`.
///
/// Diagnostics are returned in source order.
pub fn check_program(source: &str, program: &Program<'_>, config: &RuleConfig) -> Vec<Diagnostic> {
    let mut visitor = FlagVisitor {
        source,
        config,
        issues: Vec::new(),
        checked: 0,
    };
    visitor.visit_program(program);
    let mut issues = visitor.issues;
    issues.sort_by_key(|d| d.span.map(|s| (s.start, s.end)));
    debug!(
        declarations = visitor.checked,
        issues = issues.len(),
        order = %config.order,
        "checked option flags"
    );
    issues
}

struct FlagVisitor<'s> {
    source: &'s str,
    config: &'s RuleConfig,
    issues: Vec<Diagnostic>,
    checked: usize,
}

impl<'a> Visit<'a> for FlagVisitor<'_> {
    fn enter_node(&mut self, kind: AstKind<'a>) {
        let AstKind::CallExpression(call) = kind else {
            return;
        };
        match classify(self.source, call, &self.config.method) {
            Candidate::Declaration(declaration) => {
                self.checked += 1;
                check_declaration(self.source, &declaration, self.config, &mut self.issues);
            }
            Candidate::NotApplicable => {
                trace!(start = call.span.start, "not a flag declaration");
            }
        }
    }
}

fn report(code: &'static str, message: String, span: Span) -> Diagnostic {
    let severity = severity_for_code(code).unwrap_or(Severity::Warn);
    Diagnostic::new(code, severity, message, Some(span))
}

fn check_declaration(
    source: &str,
    declaration: &FlagDeclaration<'_, '_>,
    config: &RuleConfig,
    issues: &mut Vec<Diagnostic>,
) {
    let spec = declaration.specifier;
    let parsed = ParsedSpecifier::parse(spec);

    if !has_valid_format(&parsed) {
        trace!(specifier = spec, tokens = parsed.token_count, "malformed specifier");
        issues.push(report(
            codes::INVALID_FORMAT,
            render_message(codes::INVALID_FORMAT, &[], "invalid option flags"),
            declaration.literal,
        ));
        return;
    }

    if let Some(reversed) = reversed_flags(spec, &parsed) {
        let corrected = fix::corrected_specifier(spec, &reversed);
        let message = render_message(
            codes::INVALID_ORDER,
            &[("correct", corrected.as_str())],
            "short flag must come before long flag",
        );
        let edit = fix::reorder_fix(declaration.literal, declaration.quote, &corrected);
        issues.push(
            report(codes::INVALID_ORDER, message, declaration.literal)
                .with_context(ctx!("correct" => corrected))
                .with_fix(edit),
        );
    }

    let Some(previous) = predecessor(source, declaration, &config.method) else {
        return;
    };
    let previous_parsed = ParsedSpecifier::parse(previous.specifier);
    if !has_valid_format(&previous_parsed) {
        // Already reported on the previous call; it has no trustworthy key.
        return;
    }
    let Some(unsorted) = unsorted_pair(&parsed, &previous_parsed, config.order) else {
        return;
    };

    let message = render_message(
        codes::NOT_SORTED,
        &[("current", unsorted.current.as_str()), ("prev", unsorted.prev.as_str())],
        "options should be sorted alphabetically",
    );
    let mut diagnostic = report(codes::NOT_SORTED, message, declaration.method_span)
        .with_context(ctx!("current" => unsorted.current, "prev" => unsorted.prev));

    // P: end of the previous receiver to the end of the previous call.
    // C: end of the previous call to the end of the current call, so any
    // `)` or `!` between the two calls travels with C.
    let previous_end = byte_span(previous.call.span).end;
    let previous_segment = Span::new(byte_span(previous.receiver.span()).end, previous_end);
    let current_segment = Span::new(previous_end, byte_span(declaration.call.span).end);
    match fix::swap_fix(source, previous_segment, current_segment) {
        Some(swap) => diagnostic = diagnostic.with_fix(swap),
        None => debug!(
            previous = ?previous_segment,
            current = ?current_segment,
            "swap fix withheld for non-adjacent declarations"
        ),
    }
    issues.push(diagnostic);
}

//! Suggested rewrites for reversed flags and unsorted chains.

use super::check::ReversedFlags;
use flaglint_diagnostics::{Edit, Fix, Span};

/// The specifier rewritten as `"<short>, <long><rest>"`.
///
/// `rest` is everything after whichever flag ends last, so a trailing value
/// placeholder survives verbatim.
pub fn corrected_specifier(spec: &str, reversed: &ReversedFlags<'_>) -> String {
    let rest = spec.get(reversed.flags_end()..).unwrap_or_default();
    format!("{}, {}{rest}", reversed.short, reversed.long)
}

/// Replace the whole literal at `literal_span` with `corrected`, written with
/// the literal's original quote character.
pub fn reorder_fix(literal_span: Span, quote: char, corrected: &str) -> Fix {
    Fix::single(Edit::new(literal_span, quote_literal(corrected, quote)))
}

/// Write `value` as a string literal delimited by `quote`.
///
/// Backslashes, the delimiting quote and line breaks are escaped so the
/// literal's value is exactly `value`.
fn quote_literal(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Swap two adjacent invocation segments.
///
/// `previous` runs from the end of the previous call's receiver to the end of
/// the previous call; `current` from there to the end of the current call.
/// Returns `None` unless the segments touch and both lie inside `source`.
pub fn swap_fix(source: &str, previous: Span, current: Span) -> Option<Fix> {
    if previous.end != current.start {
        return None;
    }
    let previous_text = source.get(previous.start..previous.end)?;
    let current_text = source.get(current.start..current.end)?;
    Some(Fix::new(vec![
        Edit::new(previous, current_text),
        Edit::new(current, previous_text),
    ]))
}

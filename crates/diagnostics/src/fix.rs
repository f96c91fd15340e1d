use crate::{Fix, Span};
use thiserror::Error;

/// Errors raised when a fix cannot be applied to a source buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixError {
    /// An edit range falls outside the source or splits a UTF-8 character.
    #[error("edit {start}..{end} is out of bounds for a source of {len} bytes")]
    OutOfBounds {
        /// Start of the offending edit.
        start: usize,
        /// End of the offending edit.
        end: usize,
        /// Source length in bytes.
        len: usize,
    },

    /// Two edits inside the same fix overlap each other.
    #[error("edits {first:?} and {second:?} of one fix overlap")]
    OverlappingEdits {
        /// The earlier edit's span.
        first: Span,
        /// The later edit's span, which starts before `first` ends.
        second: Span,
    },
}

/// Outcome of [`apply_fixes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Source text with every accepted fix applied.
    pub output: String,
    /// Number of fixes that were applied.
    pub applied: usize,
    /// Number of fixes skipped because they overlapped an earlier fix.
    pub skipped: usize,
}

/// Apply a set of fixes to `source`.
///
/// Fixes are ordered by the start of their covered range. A fix whose range
/// overlaps one that was already accepted is skipped whole, never partially
/// applied; running lint again on the output will re-offer it. Edits within
/// a single fix must be disjoint.
pub fn apply_fixes<'a, I>(source: &str, fixes: I) -> Result<Applied, FixError>
where
    I: IntoIterator<Item = &'a Fix>,
{
    let mut ordered: Vec<(Span, Vec<&crate::Edit>)> = Vec::new();
    for fix in fixes {
        let Some(range) = fix.range() else {
            continue;
        };
        let mut edits: Vec<&crate::Edit> = fix.edits.iter().collect();
        edits.sort_by_key(|e| (e.span.start, e.span.end));
        for pair in edits.windows(2) {
            if pair[1].span.start < pair[0].span.end {
                return Err(FixError::OverlappingEdits {
                    first: pair[0].span,
                    second: pair[1].span,
                });
            }
        }
        for edit in &edits {
            check_bounds(source, edit.span)?;
        }
        ordered.push((range, edits));
    }
    ordered.sort_by_key(|(range, _)| (range.start, range.end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0usize;
    let mut applied = 0usize;
    let mut skipped = 0usize;
    // Fixes are atomic: a fix touching text already rewritten is dropped.
    let mut last_end: Option<usize> = None;
    for (range, edits) in ordered {
        if last_end.is_some_and(|end| range.start < end) {
            skipped += 1;
            continue;
        }
        for edit in edits {
            output.push_str(&source[cursor..edit.span.start]);
            output.push_str(&edit.replacement);
            cursor = edit.span.end;
        }
        last_end = Some(range.end);
        applied += 1;
    }
    output.push_str(&source[cursor..]);

    Ok(Applied {
        output,
        applied,
        skipped,
    })
}

fn check_bounds(source: &str, span: Span) -> Result<(), FixError> {
    let in_bounds = span.end <= source.len()
        && source.is_char_boundary(span.start)
        && source.is_char_boundary(span.end);
    if in_bounds {
        Ok(())
    } else {
        Err(FixError::OutOfBounds {
            start: span.start,
            end: span.end,
            len: source.len(),
        })
    }
}

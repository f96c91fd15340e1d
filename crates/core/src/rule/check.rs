//! Structural and ordering checks over parsed flag specifiers.

use super::flags::ParsedSpecifier;
use flaglint_config::SortOrder;

/// The format rule: one or two fragments, each a distinct recognised flag.
///
/// A `false` result is terminal for the declaration; the ordering checks
/// assume a well-formed specifier.
pub fn has_valid_format(parsed: &ParsedSpecifier) -> bool {
    parsed.is_well_formed() && parsed.token_count <= 2
}

/// Both flags present with the long flag written first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversedFlags<'p> {
    /// The short flag text (`-p`).
    pub short: &'p str,
    /// Byte offset of the short flag in the specifier.
    pub short_at: usize,
    /// The long flag text (`--port`).
    pub long: &'p str,
    /// Byte offset of the long flag in the specifier.
    pub long_at: usize,
}

impl ReversedFlags<'_> {
    /// Byte offset just past whichever flag ends last.
    pub fn flags_end(&self) -> usize {
        (self.short_at + self.short.len()).max(self.long_at + self.long.len())
    }
}

/// Locate `short` in `spec`, skipping matches that sit inside a longer
/// hyphenated word (`-p` inside `--port`).
pub fn find_short_flag(spec: &str, short: &str) -> Option<usize> {
    let mut from = 0usize;
    while let Some(rel) = spec.get(from..)?.find(short) {
        let at = from + rel;
        if at == 0 || spec.as_bytes()[at - 1] != b'-' {
            return Some(at);
        }
        from = at + 1;
    }
    None
}

/// The internal-order rule: the short flag must precede the long flag.
///
/// Returns the flag positions when they are reversed. Only meaningful for a
/// well-formed specifier declaring both flags; anything else passes.
pub fn reversed_flags<'p>(spec: &str, parsed: &'p ParsedSpecifier) -> Option<ReversedFlags<'p>> {
    let (short, long) = (parsed.short.as_deref()?, parsed.long.as_deref()?);
    let short_at = find_short_flag(spec, short)?;
    let long_at = spec.find(long)?;
    (short_at > long_at).then_some(ReversedFlags {
        short,
        short_at,
        long,
        long_at,
    })
}

/// Sort keys of two adjacent declarations that are out of order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsorted {
    /// Key of the later declaration, which sorts first.
    pub current: String,
    /// Key of the declaration before it in the chain.
    pub prev: String,
}

/// The chain-order rule for one adjacent pair.
///
/// Both specifiers must already have passed [`has_valid_format`]. Keys
/// compare as plain strings; equal keys are in order.
pub fn unsorted_pair(
    current: &ParsedSpecifier,
    previous: &ParsedSpecifier,
    order: SortOrder,
) -> Option<Unsorted> {
    let current_key = current.sort_key(order)?;
    let prev_key = previous.sort_key(order)?;
    (current_key < prev_key).then_some(Unsorted {
        current: current_key,
        prev: prev_key,
    })
}

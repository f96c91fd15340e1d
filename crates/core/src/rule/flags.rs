//! Flag specifier parsing: placeholder stripping, splitting, classification.

use flaglint_config::SortOrder;
use std::borrow::Cow;

/// Classification of one fragment of a flag specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// `-` followed by exactly one ASCII letter (`-p`).
    Short,
    /// `--` followed by ASCII letters, digits or hyphens (`--dry-run`).
    Long,
    /// Anything else (`port`, `-pp`, `--`, `---x!`).
    Invalid,
}

/// A classified fragment of a flag specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagToken {
    /// How the fragment was classified.
    pub kind: FlagKind,
    /// The fragment text.
    pub text: String,
}

/// Classify a single fragment.
pub fn classify(fragment: &str) -> FlagKind {
    let b = fragment.as_bytes();
    if b.len() == 2 && b[0] == b'-' && b[1].is_ascii_alphabetic() {
        return FlagKind::Short;
    }
    if let Some(name) = fragment.strip_prefix("--")
        && !name.is_empty()
        && name.bytes().all(|c| c.is_ascii_alphanumeric() || c == b'-')
    {
        return FlagKind::Long;
    }
    FlagKind::Invalid
}

/// Remove value placeholders (`<file>`, `[mode]`).
///
/// On each line, everything from the first `<` or `[` to the last `>` or `]`
/// after it is one placeholder run and is removed whole, so
/// `"-o, --out <file> [mode]"` becomes `"-o, --out "`. An opener with no
/// closer after it on the same line is left alone.
pub fn strip_placeholders(spec: &str) -> Cow<'_, str> {
    if !spec.contains(['<', '[']) {
        return Cow::Borrowed(spec);
    }
    let mut out = String::with_capacity(spec.len());
    let mut rest = spec;
    while !rest.is_empty() {
        let line_end = rest
            .find(is_line_terminator)
            .map(|i| i + rest[i..].chars().next().map_or(1, char::len_utf8))
            .unwrap_or(rest.len());
        let (line, tail) = rest.split_at(line_end);
        out.push_str(&strip_line(line));
        rest = tail;
    }
    Cow::Owned(out)
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// ECMAScript `WhiteSpace` and `LineTerminator`, the set `String.prototype.trim`
/// removes. Differs from [`char::is_whitespace`] on U+0085 and U+FEFF.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\u{b}' | '\u{c}' | ' ' | '\u{a0}' | '\u{feff}' | '\u{1680}'
            | '\u{2000}'..='\u{200a}' | '\u{202f}' | '\u{205f}' | '\u{3000}'
    ) || is_line_terminator(c)
}

fn strip_line(line: &str) -> Cow<'_, str> {
    let mut out = String::new();
    let mut cursor = 0usize;
    let mut search_from = 0usize;
    while let Some(rel) = line[search_from..].find(['<', '[']) {
        let open = search_from + rel;
        // The line still carries its terminator; closers never match past it.
        match line[open + 1..].rfind(['>', ']']) {
            Some(close_rel) => {
                let close = open + 1 + close_rel;
                out.push_str(&line[cursor..open]);
                cursor = close + 1;
                search_from = cursor;
            }
            None => break,
        }
    }
    if cursor == 0 {
        return Cow::Borrowed(line);
    }
    out.push_str(&line[cursor..]);
    Cow::Owned(out)
}

/// Split a specifier into classified fragments.
///
/// Placeholders are stripped first, the remainder is trimmed and split on
/// runs of spaces, commas and pipes.
pub fn tokenize(spec: &str) -> Vec<FlagToken> {
    strip_placeholders(spec)
        .trim_matches(is_js_whitespace)
        .split([' ', ',', '|'])
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| FlagToken {
            kind: classify(fragment),
            text: fragment.to_string(),
        })
        .collect()
}

/// The flags declared by one specifier, folded from its tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedSpecifier {
    /// The first short flag seen.
    pub short: Option<String>,
    /// The first long flag seen.
    pub long: Option<String>,
    /// A second flag of the same kind, or an unrecognised fragment, was seen.
    pub has_error: bool,
    /// Number of fragments, valid or not.
    pub token_count: usize,
    /// Every fragment in order.
    pub tokens: Vec<FlagToken>,
}

impl ParsedSpecifier {
    /// Parse a flag specifier string.
    pub fn parse(spec: &str) -> Self {
        let tokens = tokenize(spec);
        let mut parsed = ParsedSpecifier {
            token_count: tokens.len(),
            ..Default::default()
        };
        for token in &tokens {
            let slot = match token.kind {
                FlagKind::Short => &mut parsed.short,
                FlagKind::Long => &mut parsed.long,
                FlagKind::Invalid => {
                    parsed.has_error = true;
                    continue;
                }
            };
            if slot.is_some() {
                parsed.has_error = true;
            } else {
                *slot = Some(token.text.clone());
            }
        }
        parsed.tokens = tokens;
        parsed
    }

    /// One or two fragments, no duplicates, nothing unrecognised, and at
    /// least one flag.
    pub fn is_well_formed(&self) -> bool {
        (1..=2).contains(&self.token_count)
            && !self.has_error
            && (self.short.is_some() || self.long.is_some())
    }

    /// Lower-cased flag name used to order declarations in a chain.
    ///
    /// Prefers the flag kind named by `order` and falls back to the other.
    pub fn sort_key(&self, order: SortOrder) -> Option<String> {
        let (preferred, fallback) = match order {
            SortOrder::Short => (&self.short, &self.long),
            SortOrder::Long => (&self.long, &self.short),
        };
        preferred
            .as_deref()
            .or(fallback.as_deref())
            .map(|flag| flag.trim_start_matches('-').to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(spec: &str) -> Vec<String> {
        tokenize(spec).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn classify_short_long_invalid() {
        assert_eq!(classify("-p"), FlagKind::Short);
        assert_eq!(classify("-P"), FlagKind::Short);
        assert_eq!(classify("--port"), FlagKind::Long);
        assert_eq!(classify("--dry-run"), FlagKind::Long);
        assert_eq!(classify("--http2"), FlagKind::Long);
        assert_eq!(classify("---"), FlagKind::Long);
        assert_eq!(classify("-1"), FlagKind::Invalid);
        assert_eq!(classify("-pp"), FlagKind::Invalid);
        assert_eq!(classify("--"), FlagKind::Invalid);
        assert_eq!(classify("--no_underscore"), FlagKind::Invalid);
        assert_eq!(classify("port"), FlagKind::Invalid);
        assert_eq!(classify("-é"), FlagKind::Invalid);
    }

    #[test]
    fn placeholders_are_stripped() {
        assert_eq!(strip_placeholders("-p, --port <number>"), "-p, --port ");
        assert_eq!(strip_placeholders("-l, --level [n]"), "-l, --level ");
        assert_eq!(strip_placeholders("--out <file> [mode]"), "--out ");
        assert_eq!(strip_placeholders("-a, --all"), "-a, --all");
    }

    #[test]
    fn placeholder_run_is_greedy_to_last_closer() {
        assert_eq!(strip_placeholders("<a> -x <b>"), "");
        assert_eq!(strip_placeholders("-x <a] --y"), "-x  --y");
    }

    #[test]
    fn unclosed_placeholder_is_kept() {
        assert_eq!(strip_placeholders("-p, --port <number"), "-p, --port <number");
        assert_eq!(texts("-p, --port <number"), vec!["-p", "--port", "<number"]);
    }

    #[test]
    fn placeholder_does_not_span_lines() {
        assert_eq!(strip_placeholders("-a <x\n> --b"), "-a <x\n> --b");
        assert_eq!(strip_placeholders("-a <x>\n--b <y>"), "-a \n--b ");
    }

    #[test]
    fn split_on_space_comma_pipe() {
        assert_eq!(texts("-p, --port"), vec!["-p", "--port"]);
        assert_eq!(texts("-p|--port"), vec!["-p", "--port"]);
        assert_eq!(texts("  -p  --port  "), vec!["-p", "--port"]);
        assert_eq!(texts(",,-p,,"), vec!["-p"]);
        assert!(texts("").is_empty());
        assert!(texts("<only placeholder>").is_empty());
    }

    #[test]
    fn tabs_are_not_separators() {
        let tokens = tokenize("-p,\t--port");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, FlagKind::Invalid);
    }

    #[test]
    fn trim_uses_ecmascript_whitespace() {
        assert_eq!(texts("\u{feff}-p\u{3000}"), vec!["-p"]);
        assert_eq!(texts("\u{2028}--port\t"), vec!["--port"]);
        // NEL is not ECMAScript whitespace, so it stays part of the fragment.
        assert_eq!(texts("\u{85}-p"), vec!["\u{85}-p"]);
        assert!(!ParsedSpecifier::parse("\u{85}-p").is_well_formed());
    }

    #[test]
    fn parse_short_and_long() {
        let parsed = ParsedSpecifier::parse("--port, -p <number>");
        assert_eq!(parsed.short.as_deref(), Some("-p"));
        assert_eq!(parsed.long.as_deref(), Some("--port"));
        assert_eq!(parsed.token_count, 2);
        assert!(parsed.is_well_formed());
    }

    #[test]
    fn parse_single_flags_are_well_formed() {
        assert!(ParsedSpecifier::parse("-s").is_well_formed());
        assert!(ParsedSpecifier::parse("--long <value>").is_well_formed());
    }

    #[test]
    fn malformed_specifiers() {
        for spec in [
            "invalid",
            "port <number>",
            "-x, -x",
            "--verbose, --verbose",
            "-a, -b, --c",
            "-p, --port, extra",
            "",
            "<n>",
        ] {
            assert!(
                !ParsedSpecifier::parse(spec).is_well_formed(),
                "{spec:?} should be malformed"
            );
        }
    }

    #[test]
    fn duplicate_keeps_first_flag() {
        let parsed = ParsedSpecifier::parse("-x, -y");
        assert_eq!(parsed.short.as_deref(), Some("-x"));
        assert!(parsed.has_error);
    }

    #[test]
    fn three_distinct_tokens_exceed_arity() {
        let parsed = ParsedSpecifier::parse("-a, --all, --everything");
        assert_eq!(parsed.token_count, 3);
        assert!(parsed.has_error);
        assert!(!parsed.is_well_formed());
    }

    #[test]
    fn sort_key_prefers_configured_kind() {
        let parsed = ParsedSpecifier::parse("-P, --Port <n>");
        assert_eq!(parsed.sort_key(SortOrder::Long).as_deref(), Some("port"));
        assert_eq!(parsed.sort_key(SortOrder::Short).as_deref(), Some("p"));
    }

    #[test]
    fn sort_key_falls_back_to_other_kind() {
        let short_only = ParsedSpecifier::parse("-v");
        assert_eq!(short_only.sort_key(SortOrder::Long).as_deref(), Some("v"));
        let long_only = ParsedSpecifier::parse("--dry-run");
        assert_eq!(long_only.sort_key(SortOrder::Short).as_deref(), Some("dry-run"));
    }

    #[test]
    fn sort_key_absent_without_flags() {
        assert_eq!(ParsedSpecifier::parse("nothing").sort_key(SortOrder::Long), None);
    }

    #[test]
    fn placeholder_never_affects_sort_key() {
        let bare = ParsedSpecifier::parse("-a, --apple");
        let with_arg = ParsedSpecifier::parse("-a, --apple <zzz> [---]");
        assert_eq!(bare.sort_key(SortOrder::Long), with_arg.sort_key(SortOrder::Long));
        assert_eq!(bare.tokens, with_arg.tokens);
    }
}

//! Diagnostic ID constants.
//!
//! `FLG0xxx` codes come from reading the source file, `FLG1xxx` codes from
//! the option-flags rule.

/// The source could not be parsed as JavaScript or TypeScript.
pub const PARSE_ERROR: &str = "FLG0001";

/// Flag specifier is malformed (`invalidFormat`).
pub const INVALID_FORMAT: &str = "FLG1001";
/// Long flag written before short flag (`invalidOrder`).
pub const INVALID_ORDER: &str = "FLG1002";
/// Declaration sorts before the one preceding it in the chain (`notSorted`).
pub const NOT_SORTED: &str = "FLG1003";

/// Every known code, in numeric order.
pub const ALL: &[&str] = &[PARSE_ERROR, INVALID_FORMAT, INVALID_ORDER, NOT_SORTED];

/// Map a message id (`invalidFormat`, ...) to its diagnostic code.
pub fn code_for_message_id(message_id: &str) -> Option<&'static str> {
    match message_id {
        "parseError" => Some(PARSE_ERROR),
        "invalidFormat" => Some(INVALID_FORMAT),
        "invalidOrder" => Some(INVALID_ORDER),
        "notSorted" => Some(NOT_SORTED),
        _ => None,
    }
}

/// Map a diagnostic code back to its message id.
pub fn message_id_for_code(id: &str) -> Option<&'static str> {
    match id {
        PARSE_ERROR => Some("parseError"),
        INVALID_FORMAT => Some("invalidFormat"),
        INVALID_ORDER => Some("invalidOrder"),
        NOT_SORTED => Some("notSorted"),
        _ => None,
    }
}

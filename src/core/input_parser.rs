// src/core/input_parser.rs

//! Parsing and validation of operator lines such as `!2 hello world`.
//!
//! Parsing only recognises the shape of a selection. Validation then checks, in order,
//! the entry number, the parameter count, leading dashes, and forbidden characters;
//! the first failure wins and nothing is invoked.

use crate::{
    constants::FORBIDDEN_PARAM_CHARS,
    models::{MenuEntry, UserSelection},
};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use thiserror::Error;

lazy_static! {
    // "!" DIGIT+ (WHITESPACE+ TOKEN)*
    static ref SELECTION_RE: Regex =
        Regex::new(r"^!([0-9]+)((?:\s+\S+)*)$").expect("selection pattern is valid");
}

/// Why a single parameter token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    LeadingDash,
    ForbiddenChar(char),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeadingDash => write!(f, "it starts with '-'"),
            Self::ForbiddenChar(c) => write!(f, "it contains '{}'", c),
        }
    }
}

/// A selection that parsed but cannot be run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown entry '{requested}' (the menu has {count} entries)")]
    UnknownEntry { requested: String, count: usize },
    #[error(
        "entry {index} expects {} {expected} parameter(s) but {given} were given",
        count_quantifier(.variadic)
    )]
    ParameterCountMismatch {
        index: usize,
        expected: usize,
        variadic: bool,
        given: usize,
    },
    #[error("parameter '{value}' is invalid: {reason}")]
    InvalidParameter { value: String, reason: InvalidReason },
}

fn count_quantifier(variadic: &bool) -> &'static str {
    if *variadic { "at least" } else { "exactly" }
}

/// The raw shape of a selection line, before it is checked against the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSelection<'a> {
    pub index_text: &'a str,
    pub tokens: Vec<&'a str>,
}

/// Recognises a selection line. Returns `None` for anything else; that is not an error,
/// the operator may be typing a different command.
pub fn parse_selection(line: &str) -> Option<RawSelection<'_>> {
    let caps = SELECTION_RE.captures(line.trim())?;
    let index_text = caps.get(1)?.as_str();
    let tokens = caps
        .get(2)
        .map(|m| m.as_str().split_whitespace().collect())
        .unwrap_or_default();
    Some(RawSelection { index_text, tokens })
}

/// Checks a parsed selection against the menu and returns an owned `UserSelection`.
pub fn validate(
    raw: &RawSelection<'_>,
    entries: &[MenuEntry],
) -> Result<UserSelection, ValidationError> {
    // 1. The entry must exist.
    let entry = raw
        .index_text
        .parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|position| entries.get(position))
        .ok_or_else(|| ValidationError::UnknownEntry {
            requested: raw.index_text.to_string(),
            count: entries.len(),
        })?;

    // 2. The arity must match.
    let given = raw.tokens.len();
    if !entry.accepts_token_count(given) {
        return Err(ValidationError::ParameterCountMismatch {
            index: entry.index(),
            expected: entry.required_count(),
            variadic: entry.has_variadic(),
            given,
        });
    }

    // 3. No token may look like an option.
    if let Some(token) = raw.tokens.iter().find(|t| t.starts_with('-')) {
        return Err(ValidationError::InvalidParameter {
            value: token.to_string(),
            reason: InvalidReason::LeadingDash,
        });
    }

    // 4. No token may carry a forbidden character.
    for token in &raw.tokens {
        if let Some(c) = token.chars().find(|c| FORBIDDEN_PARAM_CHARS.contains(c)) {
            return Err(ValidationError::InvalidParameter {
                value: token.to_string(),
                reason: InvalidReason::ForbiddenChar(c),
            });
        }
    }

    Ok(UserSelection {
        entry_index: entry.index(),
        raw_tokens: raw.tokens.iter().map(|t| t.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compiler::compile;
    use crate::models::EntrySource;

    fn menu() -> Vec<MenuEntry> {
        compile(&[
            EntrySource::new("Echo", r#"/bin/echo "$1""#),
            EntrySource::new("Dollar", "/usr/bin/foo $$"),
            EntrySource::new("Cat", "/bin/cat $*"),
        ])
        .into_iter()
        .map(Result::unwrap)
        .collect()
    }

    fn check(line: &str) -> Result<UserSelection, ValidationError> {
        let raw = parse_selection(line).expect("line should parse as a selection");
        validate(&raw, &menu())
    }

    // --- Parsing Tests ---

    #[test]
    fn test_parse_selection_with_tokens() {
        let raw = parse_selection("!12  alpha\tbeta ").unwrap();
        assert_eq!(raw.index_text, "12");
        assert_eq!(raw.tokens, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_parse_selection_without_tokens() {
        let raw = parse_selection("!3\n").unwrap();
        assert_eq!(raw.index_text, "3");
        assert!(raw.tokens.is_empty());
    }

    #[test]
    fn test_non_selections_are_not_parsed() {
        for line in ["", "hello", "!", "!x", "! 1", "!1x", "set cols=80", "1"] {
            assert!(parse_selection(line).is_none(), "'{}' should not parse", line);
        }
    }

    // --- Validation Tests ---

    #[test]
    fn test_valid_selection() {
        let selection = check("!1 hello").unwrap();
        assert_eq!(selection.entry_index, 1);
        assert_eq!(selection.raw_tokens, vec!["hello"]);
    }

    #[test]
    fn test_unknown_entry() {
        assert_eq!(
            check("!99"),
            Err(ValidationError::UnknownEntry {
                requested: "99".to_string(),
                count: 3
            })
        );
        assert!(matches!(check("!0"), Err(ValidationError::UnknownEntry { .. })));
        assert!(matches!(
            check("!99999999999999999999999999"),
            Err(ValidationError::UnknownEntry { .. })
        ));
    }

    #[test]
    fn test_exact_count_required_without_variadic() {
        assert!(matches!(
            check("!1"),
            Err(ValidationError::ParameterCountMismatch { expected: 1, given: 0, variadic: false, .. })
        ));
        assert!(matches!(
            check("!1 a b"),
            Err(ValidationError::ParameterCountMismatch { expected: 1, given: 2, .. })
        ));
        assert!(matches!(
            check("!2 extra"),
            Err(ValidationError::ParameterCountMismatch { expected: 0, given: 1, .. })
        ));
    }

    #[test]
    fn test_variadic_accepts_any_extra_count() {
        assert!(check("!3").is_ok());
        assert_eq!(check("!3 a b c").unwrap().raw_tokens.len(), 3);
    }

    #[test]
    fn test_leading_dash_rejected() {
        assert_eq!(
            check("!1 --bad"),
            Err(ValidationError::InvalidParameter {
                value: "--bad".to_string(),
                reason: InvalidReason::LeadingDash
            })
        );
    }

    #[test]
    fn test_forbidden_char_rejected() {
        assert_eq!(
            check("!1 a;b"),
            Err(ValidationError::InvalidParameter {
                value: "a;b".to_string(),
                reason: InvalidReason::ForbiddenChar(';')
            })
        );
        for bad in ["a>b", "<x", "(", ")", "a|b", "a&"] {
            let line = format!("!1 {}", bad);
            assert!(
                matches!(check(&line), Err(ValidationError::InvalidParameter { .. })),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_checks_run_in_order() {
        // Count is checked before content.
        assert!(matches!(
            check("!1 -x a;b"),
            Err(ValidationError::ParameterCountMismatch { .. })
        ));
        // Every token is checked for a leading dash before any is checked for characters.
        assert!(matches!(
            check("!3 a;b -x"),
            Err(ValidationError::InvalidParameter { reason: InvalidReason::LeadingDash, .. })
        ));
    }

    #[test]
    fn test_dash_inside_token_is_allowed() {
        assert!(check("!1 a-b").is_ok());
    }

    #[test]
    fn test_error_message_states_expected_and_given() {
        let message = check("!1").unwrap_err().to_string();
        assert_eq!(message, "entry 1 expects exactly 1 parameter(s) but 0 were given");
    }
}

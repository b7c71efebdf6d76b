//! # Compiler
//!
//! This module turns the raw `cmd` strings of the settings file into `CompiledTemplate`s.
//! A template is an ordered list of argv tokens, each an ordered list of segments
//! (`Literal`, `ParamRef`, `Variadic`), so that operator parameters are substituted into
//! a fixed argument vector and never re-split by a shell.
//!
//! Grammar inside a token:
//! - `$$` is a literal `$`.
//! - `$` followed by digits is a parameter reference (`$1`, `$12`).
//! - `$*` is the variadic marker and must be the whole token.
//! - Any other `$` is an error.

use crate::{
    core::registry::ParamRegistry,
    models::{CompiledTemplate, EntrySource, MenuEntry, TemplateSegment},
};
use thiserror::Error;

/// A grammar violation in one entry's command template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The section has no `cmd` key (or it is not a string).
    #[error("missing '{key}' key")]
    MissingCommand { key: String },
    /// The command contains no tokens at all.
    #[error("the command is empty")]
    EmptyCommand,
    /// A quote was opened and never closed.
    #[error("unterminated quote in command '{command}'")]
    UnterminatedQuote { command: String },
    /// A `$` that is neither `$$`, `$N`, nor a standalone `$*`.
    #[error("bare '$' at position {position} of token '{token}'")]
    BareDollar { token: String, position: usize },
    /// `$*` shares its token with other characters.
    #[error("'$*' must be a token on its own, found '{token}'")]
    VariadicNotAlone { token: String },
    /// More than one `$*` in the same command.
    #[error("only one '$*' is allowed per command")]
    MultipleVariadic,
    /// `$0`, or an index too large to represent.
    #[error("parameter index '{text}' in token '{token}' is out of range (parameters start at $1)")]
    ParamIndexOutOfRange { token: String, text: String },
}

/// A `ConfigError` tied to the title of the entry it excluded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{title}: {source}")]
pub struct EntryError {
    pub title: String,
    #[source]
    pub source: ConfigError,
}

// --- PUBLIC COMPILER API ---

/// Compiles every loaded entry, keeping failures in place.
///
/// Successful entries are numbered 1, 2, 3... in input order; failed entries take no
/// number, so the menu the operator sees has no holes.
pub fn compile(entries: &[EntrySource]) -> Vec<Result<MenuEntry, EntryError>> {
    let mut next_index = 1;
    entries
        .iter()
        .map(|source| -> Result<MenuEntry, EntryError> {
            let template = compile_template(&source.command).map_err(|source_err| {
                log::warn!("Entry '{}' rejected: {}", source.title, source_err);
                EntryError {
                    title: source.title.clone(),
                    source: source_err,
                }
            })?;

            let gaps = template.unreferenced_indices();
            if !gaps.is_empty() {
                log::warn!(
                    "Entry '{}' never references parameter(s) {:?}; the operator must still supply them.",
                    source.title,
                    gaps
                );
            }

            let registry = ParamRegistry::from_labels(&source.labels);
            registry.check_against(&source.title, &template);

            let entry = MenuEntry::new(next_index, source.title.clone(), template, registry);
            log::debug!(
                "Compiled entry {} '{}': required={}, variadic={}",
                entry.index(),
                entry.title(),
                entry.required_count(),
                entry.has_variadic()
            );
            next_index += 1;
            Ok(entry)
        })
        .collect()
}

/// Compiles a single raw command string.
pub fn compile_template(command: &str) -> Result<CompiledTemplate, ConfigError> {
    let raw_tokens = split_command(command)?;
    if raw_tokens.is_empty() {
        return Err(ConfigError::EmptyCommand);
    }

    let tokens = raw_tokens
        .iter()
        .map(|token| tokenize_argv_token(token))
        .collect::<Result<Vec<_>, _>>()?;

    let variadic_count = tokens
        .iter()
        .filter(|segments| segments.as_slice() == [TemplateSegment::Variadic])
        .count();
    if variadic_count > 1 {
        return Err(ConfigError::MultipleVariadic);
    }

    Ok(CompiledTemplate::new(tokens))
}

// --- HELPER IMPLEMENTATIONS ---

/// Splits a command line on whitespace. Double quotes group whitespace into one token
/// and are stripped; every other character, `'`, `\` and `#` included, is plain text.
fn split_command(command: &str) -> Result<Vec<String>, ConfigError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // A token exists once a quote opened, even if it stays empty (`""`).
    let mut started = false;
    let mut in_quotes = false;

    for ch in command.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                started = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }

    if in_quotes {
        return Err(ConfigError::UnterminatedQuote {
            command: command.to_string(),
        });
    }
    if started {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Splits one argv token into segments, merging adjacent literal text.
fn tokenize_argv_token(token: &str) -> Result<Vec<TemplateSegment>, ConfigError> {
    if token == "$*" {
        return Ok(vec![TemplateSegment::Variadic]);
    }

    let mut segments = Vec::with_capacity(2);

    // Helper to push literals and handle merging.
    let push_literal = |segments: &mut Vec<TemplateSegment>, s: &str| {
        if let Some(TemplateSegment::Literal(last)) = segments.last_mut() {
            last.push_str(s);
        } else {
            segments.push(TemplateSegment::Literal(s.to_string()));
        }
    };

    let mut chars = token.char_indices().peekable();
    while let Some((position, ch)) = chars.next() {
        if ch != '$' {
            let mut buf = [0u8; 4];
            push_literal(&mut segments, ch.encode_utf8(&mut buf));
            continue;
        }

        match chars.peek().map(|&(_, next)| next) {
            Some('$') => {
                chars.next();
                push_literal(&mut segments, "$");
            }
            Some('*') => {
                return Err(ConfigError::VariadicNotAlone {
                    token: token.to_string(),
                });
            }
            Some(next) if next.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                let index = digits
                    .parse::<usize>()
                    .ok()
                    .filter(|index| *index > 0)
                    .ok_or_else(|| ConfigError::ParamIndexOutOfRange {
                        token: token.to_string(),
                        text: digits.clone(),
                    })?;
                segments.push(TemplateSegment::ParamRef(index));
            }
            _ => {
                return Err(ConfigError::BareDollar {
                    token: token.to_string(),
                    position,
                });
            }
        }
    }

    Ok(segments)
}

// src/cli/render.rs

//! Everything the operator sees: the numbered entry list, status lines, and errors.

use crate::{
    core::{
        dispatch::{DispatchError, ErrorKind, Menu},
        input_parser::{InvalidReason, ValidationError},
        registry::{ParamSlot, SlotLabel},
    },
    models::MenuEntry,
    system::executor::InvocationError,
};
use colored::*;
use std::error::Error as _;
use std::io::{self, Write};

/// Greedy word wrap. A word longer than the line gets a line of its own.
pub fn word_wrap(text: &str, columns: usize) -> Vec<String> {
    let width = columns.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn slot_text(slot: &SlotLabel<'_>) -> String {
    match slot.slot {
        ParamSlot::Index(index) => match slot.label {
            Some(label) => format!("<{}>", label),
            None => format!("<{}>", format!(t!("menu.param_placeholder"), index = index)),
        },
        ParamSlot::Variadic => format!(
            "<{}...>",
            slot.label.unwrap_or(t!("menu.variadic_placeholder"))
        ),
    }
}

/// `<LABEL> <param 2> <TEXT...>`, or `None` when the entry takes no parameters.
pub fn param_hint(entry: &MenuEntry) -> Option<String> {
    let slots = entry.registry().display_slots(entry.template());
    if slots.is_empty() {
        return None;
    }
    let parts: Vec<String> = slots.iter().map(slot_text).collect();
    Some(parts.join(" "))
}

/// One menu line, e.g. `2) Show files [params: <FILES...>]`.
pub fn entry_line(entry: &MenuEntry) -> String {
    match param_hint(entry) {
        Some(hint) => format!(
            "{}) {} [{}: {}]",
            entry.index(),
            entry.title(),
            t!("menu.params"),
            hint
        ),
        None => format!("{}) {}", entry.index(), entry.title()),
    }
}

/// Writes the full menu screen.
pub fn render_menu<W: Write>(
    out: &mut W,
    title: &str,
    menu: &Menu,
    columns: usize,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title.bold())?;
    writeln!(out)?;
    for line in word_wrap(t!("menu.intro"), columns) {
        writeln!(out, "{}", line)?;
    }
    writeln!(out)?;

    if menu.is_empty() {
        writeln!(out, "{}", t!("menu.empty"))?;
        return Ok(());
    }

    for entry in menu.entries() {
        let line = entry_line(entry);
        let indent = " ".repeat(format!("{}) ", entry.index()).len());
        let wrapped = word_wrap(&line, columns.saturating_sub(indent.len()).max(1));
        for (i, part) in wrapped.iter().enumerate() {
            if i == 0 {
                writeln!(out, "{}", part)?;
            } else {
                writeln!(out, "{}{}", indent, part)?;
            }
        }
    }
    Ok(())
}

/// A plain status line, such as the loading notice.
pub fn render_status<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message)?;
    out.flush()
}

/// `<kind>: <detail>`, with both halves taken from the message catalogue.
pub fn describe_error(error: &DispatchError) -> String {
    format!("{}: {}", kind_label(error.kind()), error_detail(error))
}

/// An error or refusal line, highlighted.
pub fn render_report<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message.red())?;
    out.flush()
}

fn kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::UnknownEntry => t!("error.kind.unknown_entry"),
        ErrorKind::ParameterCountMismatch => t!("error.kind.parameter_count"),
        ErrorKind::InvalidParameter => t!("error.kind.invalid_parameter"),
        ErrorKind::InvocationError => t!("error.kind.invocation"),
    }
}

fn error_detail(error: &DispatchError) -> String {
    match error {
        DispatchError::Validation(ValidationError::UnknownEntry { requested, count }) => {
            format!(t!("error.unknown_entry"), requested = requested, count = count)
        }
        DispatchError::Validation(ValidationError::ParameterCountMismatch {
            index,
            expected,
            variadic,
            given,
        }) => {
            if *variadic {
                format!(
                    t!("error.param_count_at_least"),
                    index = index,
                    expected = expected,
                    given = given
                )
            } else {
                format!(
                    t!("error.param_count_exact"),
                    index = index,
                    expected = expected,
                    given = given
                )
            }
        }
        DispatchError::Validation(ValidationError::InvalidParameter { value, reason }) => {
            match reason {
                InvalidReason::LeadingDash => format!(t!("error.leading_dash"), value = value),
                InvalidReason::ForbiddenChar(ch) => {
                    format!(t!("error.forbidden_char"), value = value, ch = ch)
                }
            }
        }
        DispatchError::Invocation(e) => invocation_detail(e),
    }
}

fn invocation_detail(error: &InvocationError) -> String {
    match (error.program(), error.source()) {
        (Some(program), Some(reason)) => {
            format!(t!("error.invocation_detail"), program = program, reason = reason)
        }
        _ => t!("error.empty_command").to_string(),
    }
}

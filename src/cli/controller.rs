// src/cli/controller.rs

//! The interactive loop.
//!
//! `MenuController` owns the menu context and walks an explicit state machine:
//!
//! ```text
//! Rendering -> AwaitingInput -> Validating -> Invoking -> Rendering
//!                    ^               |
//!                    +-- Reporting <-+
//! ```
//!
//! Non-selection lines either run an operator command (`quit`, `set cols=...`) or are
//! ignored. End of input and `quit` both lead to `Exit`; no error ends the loop.

use crate::{
    CancellationToken,
    cli::{
        input::{LineSource, ReadOutcome},
        render,
    },
    constants::SUPPORTED_COLUMNS,
    core::dispatch::{self, DispatchError, Menu, Prepared},
    models::BoundCommand,
    system::executor::Launcher,
};
use std::io::{self, Write};
use std::sync::atomic::Ordering;

/// Everything the controller shows and serves, owned in one place.
#[derive(Debug, Clone)]
pub struct MenuContext {
    pub title: String,
    pub menu: Menu,
    pub columns: usize,
}

#[derive(Debug)]
pub enum ControllerState {
    Rendering,
    AwaitingInput,
    Validating(String),
    Invoking(BoundCommand),
    Reporting(String),
    Exit,
}

/// A non-selection line the controller understands.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OperatorCommand<'a> {
    Quit,
    /// `set`, with whatever followed it.
    Set(Option<&'a str>),
}

fn parse_operator_command(line: &str) -> Option<OperatorCommand<'_>> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, Some(rest.trim()).filter(|r| !r.is_empty())),
        None => (line, None),
    };
    match word.to_ascii_lowercase().as_str() {
        "quit" | "exit" if rest.is_none() => Some(OperatorCommand::Quit),
        "set" => Some(OperatorCommand::Set(rest)),
        _ => None,
    }
}

pub struct MenuController<S, W, L> {
    context: MenuContext,
    input: S,
    output: W,
    launcher: L,
    interrupt: Option<CancellationToken>,
    state: ControllerState,
}

impl<S: LineSource, W: Write, L: Launcher> MenuController<S, W, L> {
    pub fn new(context: MenuContext, input: S, output: W, launcher: L) -> Self {
        Self {
            context,
            input,
            output,
            launcher,
            interrupt: None,
            state: ControllerState::Rendering,
        }
    }

    /// Watches `token` for interrupts that arrive outside the line editor, such as a
    /// Ctrl+C while a child owns the terminal.
    pub fn with_interrupt(mut self, token: CancellationToken) -> Self {
        self.interrupt = Some(token);
        self
    }

    pub fn context(&self) -> &MenuContext {
        &self.context
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Hands back the output sink, mainly so tests can inspect what was written.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until `Exit`. Only a failure to talk to the terminal itself is an error.
    pub fn run(&mut self) -> io::Result<()> {
        while !matches!(self.state, ControllerState::Exit) {
            let state = std::mem::replace(&mut self.state, ControllerState::Exit);
            self.state = self.step(state)?;
        }
        log::debug!("Menu controller reached Exit.");
        Ok(())
    }

    fn step(&mut self, state: ControllerState) -> io::Result<ControllerState> {
        match state {
            ControllerState::Rendering => {
                render::render_menu(
                    &mut self.output,
                    &self.context.title,
                    &self.context.menu,
                    self.context.columns,
                )?;
                Ok(ControllerState::AwaitingInput)
            }
            ControllerState::AwaitingInput => self.await_input(),
            ControllerState::Validating(line) => self.validate(&line),
            ControllerState::Invoking(command) => self.invoke(&command),
            ControllerState::Reporting(message) => {
                render::render_report(&mut self.output, &message)?;
                Ok(ControllerState::AwaitingInput)
            }
            ControllerState::Exit => Ok(ControllerState::Exit),
        }
    }

    fn take_interrupt(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|token| token.swap(false, Ordering::SeqCst))
    }

    fn await_input(&mut self) -> io::Result<ControllerState> {
        if self.take_interrupt() {
            render::render_status(&mut self.output, t!("menu.interrupted"))?;
        }

        self.output.flush()?;
        match self.input.read_line(t!("menu.prompt"))? {
            ReadOutcome::Line(line) => Ok(ControllerState::Validating(line)),
            ReadOutcome::Interrupted => {
                log::debug!("Interrupt at the prompt.");
                render::render_status(&mut self.output, t!("menu.interrupted"))?;
                Ok(ControllerState::AwaitingInput)
            }
            ReadOutcome::Eof => {
                log::debug!("End of operator input.");
                writeln!(self.output)?;
                Ok(ControllerState::Exit)
            }
        }
    }

    fn validate(&mut self, line: &str) -> io::Result<ControllerState> {
        let next = match self.context.menu.prepare(line) {
            Prepared::Ready { entry, command } => {
                log::info!("Operator selected entry {} ('{}').", entry.index(), entry.title());
                Some(ControllerState::Invoking(command))
            }
            Prepared::Rejected(e) => Some(ControllerState::Reporting(render::describe_error(
                &DispatchError::from(e),
            ))),
            Prepared::NotASelection => None,
        };
        match next {
            Some(state) => Ok(state),
            None => self.operator_command(line),
        }
    }

    fn operator_command(&mut self, line: &str) -> io::Result<ControllerState> {
        match parse_operator_command(line) {
            Some(OperatorCommand::Quit) => {
                render::render_status(&mut self.output, t!("menu.goodbye"))?;
                Ok(ControllerState::Exit)
            }
            Some(OperatorCommand::Set(None)) => {
                Ok(ControllerState::Reporting(t!("setting.none").to_string()))
            }
            Some(OperatorCommand::Set(Some(setting))) => Ok(self.apply_setting(setting)),
            None => {
                log::debug!("Ignoring operator line '{}'.", line.trim());
                Ok(ControllerState::AwaitingInput)
            }
        }
    }

    fn apply_setting(&mut self, setting: &str) -> ControllerState {
        let (key, value) = setting.split_once('=').unwrap_or((setting, ""));
        match key.trim().to_ascii_lowercase().as_str() {
            "cols" | "columns" => {
                let value = value.trim();
                match value.parse::<usize>() {
                    Ok(cols) if SUPPORTED_COLUMNS.contains(&cols) => {
                        log::debug!("Render width set to {}.", cols);
                        self.context.columns = cols;
                        ControllerState::Rendering
                    }
                    _ => ControllerState::Reporting(format!(t!("setting.bad_columns"), value = value)),
                }
            }
            _ => ControllerState::Reporting(format!(t!("setting.unknown"), setting = key.trim())),
        }
    }

    fn invoke(&mut self, command: &BoundCommand) -> io::Result<ControllerState> {
        render::render_status(&mut self.output, t!("menu.loading"))?;
        let result = dispatch::invoke(command, &mut self.launcher);

        // The child shared the terminal, so it already saw any interrupt.
        if let Some(token) = &self.interrupt {
            token.store(false, Ordering::SeqCst);
        }

        match result {
            Ok(status) => {
                if !status.success() {
                    render::render_status(
                        &mut self.output,
                        &format!(t!("menu.exit_status"), status = status),
                    )?;
                }
                Ok(ControllerState::Rendering)
            }
            Err(e) => Ok(ControllerState::Reporting(render::describe_error(&e))),
        }
    }
}

// src/system/executor.rs

use crate::models::BoundCommand;
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command '{program}' could not be executed: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Lost track of command '{program}' while waiting for it: {source}")]
    WaitFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl InvocationError {
    /// The executable the failure refers to, if any.
    pub fn program(&self) -> Option<&str> {
        match self {
            Self::EmptyCommand => None,
            Self::SpawnFailed { program, .. } | Self::WaitFailed { program, .. } => {
                Some(program.as_str())
            }
        }
    }
}

/// Runs a bound command to completion.
///
/// The controller only talks to this trait, so tests can record invocations instead of
/// spawning processes.
pub trait Launcher {
    fn launch(&mut self, command: &BoundCommand) -> Result<ExitStatus, InvocationError>;
}

impl<L: Launcher + ?Sized> Launcher for &mut L {
    fn launch(&mut self, command: &BoundCommand) -> Result<ExitStatus, InvocationError> {
        (**self).launch(command)
    }
}

/// Spawns the real process: first argv entry as the executable, the rest as literal
/// arguments, no shell in between. The child inherits the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&mut self, command: &BoundCommand) -> Result<ExitStatus, InvocationError> {
        let program = command.program().ok_or(InvocationError::EmptyCommand)?;

        log::info!("Launching: {}", command.display());
        let mut child = StdCommand::new(program)
            .args(command.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| InvocationError::SpawnFailed {
                program: program.to_string(),
                source: e,
            })?;

        // No timeout: a hung child holds the menu until it exits or is killed.
        let status = child.wait().map_err(|e| InvocationError::WaitFailed {
            program: program.to_string(),
            source: e,
        })?;
        log::debug!("Command '{}' (PID {}) finished: {}", program, child.id(), status);
        Ok(status)
    }
}

// src/core/dispatch.rs

//! The active menu and the single runtime operation it exposes: `dispatch(line)`.

use crate::{
    core::{
        binder,
        compiler::EntryError,
        input_parser::{self, ValidationError},
    },
    models::{BoundCommand, MenuEntry},
    system::executor::{InvocationError, Launcher},
};
use std::fmt;
use std::process::ExitStatus;
use thiserror::Error;

/// Every way an operator request can fail after it was recognised as a selection.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

/// The error taxonomy as the operator sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownEntry,
    ParameterCountMismatch,
    InvalidParameter,
    InvocationError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnknownEntry => "UnknownEntry",
            Self::ParameterCountMismatch => "ParameterCountMismatch",
            Self::InvalidParameter => "InvalidParameter",
            Self::InvocationError => "InvocationError",
        };
        f.write_str(name)
    }
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(ValidationError::UnknownEntry { .. }) => ErrorKind::UnknownEntry,
            Self::Validation(ValidationError::ParameterCountMismatch { .. }) => {
                ErrorKind::ParameterCountMismatch
            }
            Self::Validation(ValidationError::InvalidParameter { .. }) => {
                ErrorKind::InvalidParameter
            }
            Self::Invocation(_) => ErrorKind::InvocationError,
        }
    }
}

/// What happened to one operator line.
#[derive(Debug)]
pub enum Outcome {
    /// The line is not a `!N ...` selection; nothing was done.
    NotASelection,
    /// The selection was refused, or the program could not be started.
    Rejected(DispatchError),
    /// The program ran; this is how it exited.
    Invoked(ExitStatus),
}

/// A line that passed parsing, validation and binding, ready to launch.
#[derive(Debug)]
pub enum Prepared<'a> {
    NotASelection,
    Rejected(ValidationError),
    Ready {
        entry: &'a MenuEntry,
        command: BoundCommand,
    },
}

/// The ordered, immutable list of entries the operator can pick from.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    entries: Vec<MenuEntry>,
}

impl Menu {
    pub fn new(entries: Vec<MenuEntry>) -> Self {
        Self { entries }
    }

    /// Splits compiler output into the active menu and the entries it excluded.
    pub fn from_compiled(results: Vec<Result<MenuEntry, EntryError>>) -> (Self, Vec<EntryError>) {
        let mut entries = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(entry) => entries.push(entry),
                Err(e) => errors.push(e),
            }
        }
        (Self::new(entries), errors)
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks an entry up by its 1-based menu number.
    pub fn get(&self, index: usize) -> Option<&MenuEntry> {
        index.checked_sub(1).and_then(|position| self.entries.get(position))
    }

    /// Parses, validates and binds a line without running anything.
    pub fn prepare(&self, line: &str) -> Prepared<'_> {
        let Some(raw) = input_parser::parse_selection(line) else {
            return Prepared::NotASelection;
        };

        let result = input_parser::validate(&raw, &self.entries).and_then(|selection| {
            let entry = self.get(selection.entry_index).ok_or_else(|| {
                ValidationError::UnknownEntry {
                    requested: selection.entry_index.to_string(),
                    count: self.len(),
                }
            })?;
            let command = binder::bind(entry.template(), &selection)?;
            Ok((entry, command))
        });

        match result {
            Ok((entry, command)) => Prepared::Ready { entry, command },
            Err(e) => {
                log::debug!("Rejected '{}': {}", line.trim(), e);
                Prepared::Rejected(e)
            }
        }
    }

    /// Handles one operator line end to end, blocking until any launched program exits.
    ///
    /// This is the one-call entry point for library users. The interactive controller
    /// runs the same two halves, `prepare` then `invoke`, as separate states so it can
    /// print between them.
    pub fn dispatch<L: Launcher + ?Sized>(&self, line: &str, launcher: &mut L) -> Outcome {
        match self.prepare(line) {
            Prepared::NotASelection => Outcome::NotASelection,
            Prepared::Rejected(e) => Outcome::Rejected(e.into()),
            Prepared::Ready { command, .. } => match invoke(&command, launcher) {
                Ok(status) => Outcome::Invoked(status),
                Err(e) => Outcome::Rejected(e),
            },
        }
    }
}

/// Runs a bound command and waits for it. Spawn and wait failures come back as
/// `DispatchError::Invocation`.
pub fn invoke<L: Launcher + ?Sized>(
    command: &BoundCommand,
    launcher: &mut L,
) -> Result<ExitStatus, DispatchError> {
    launcher.launch(command).map_err(|e| {
        log::warn!("{}", e);
        DispatchError::from(e)
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::compiler::compile;
    use crate::models::EntrySource;
    use std::os::unix::process::ExitStatusExt;

    /// Records every argv it is asked to run and reports a fixed status.
    #[derive(Default)]
    struct RecordingLauncher {
        launched: Vec<Vec<String>>,
        fail_spawn: bool,
    }

    impl Launcher for RecordingLauncher {
        fn launch(&mut self, command: &BoundCommand) -> Result<ExitStatus, InvocationError> {
            if self.fail_spawn {
                return Err(InvocationError::SpawnFailed {
                    program: command.program().unwrap_or_default().to_string(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            self.launched.push(command.argv().to_vec());
            Ok(ExitStatus::from_raw(0))
        }
    }

    fn menu() -> Menu {
        let (menu, errors) = Menu::from_compiled(compile(&[
            EntrySource::new("Echo", r#"/bin/echo "$1""#),
            EntrySource::new("Broken", "foo $"),
            EntrySource::new("Dollar", "/usr/bin/foo $$"),
            EntrySource::new("Cat", "/bin/cat $*"),
        ]));
        assert_eq!(errors.len(), 1);
        menu
    }

    #[test]
    fn test_broken_entry_is_absent() {
        let menu = menu();
        assert_eq!(menu.len(), 3);
        let titles: Vec<_> = menu.entries().iter().map(|e| e.title()).collect();
        assert_eq!(titles, vec!["Echo", "Dollar", "Cat"]);
        assert_eq!(menu.get(2).map(|e| e.title()), Some("Dollar"));
        assert!(menu.get(0).is_none());
    }

    #[test]
    fn test_dispatch_invokes_bound_argv() {
        let mut launcher = RecordingLauncher::default();
        let menu = menu();

        assert!(matches!(menu.dispatch("!1 hello", &mut launcher), Outcome::Invoked(s) if s.success()));
        assert!(matches!(menu.dispatch("!2", &mut launcher), Outcome::Invoked(_)));
        assert!(matches!(menu.dispatch("!3 a b", &mut launcher), Outcome::Invoked(_)));
        assert!(matches!(menu.dispatch("!3", &mut launcher), Outcome::Invoked(_)));

        assert_eq!(
            launcher.launched,
            vec![
                vec!["/bin/echo".to_string(), "hello".to_string()],
                vec!["/usr/bin/foo".to_string(), "$".to_string()],
                vec!["/bin/cat".to_string(), "a".to_string(), "b".to_string()],
                vec!["/bin/cat".to_string()],
            ]
        );
    }

    #[test]
    fn test_rejections_never_reach_the_launcher() {
        let mut launcher = RecordingLauncher::default();
        let menu = menu();

        let cases = [
            ("!99", ErrorKind::UnknownEntry),
            ("!1", ErrorKind::ParameterCountMismatch),
            ("!1 --bad", ErrorKind::InvalidParameter),
            ("!1 a;b", ErrorKind::InvalidParameter),
        ];
        for (line, expected) in cases {
            match menu.dispatch(line, &mut launcher) {
                Outcome::Rejected(e) => assert_eq!(e.kind(), expected, "line '{}'", line),
                other => panic!("'{}' should be rejected, got {:?}", line, other),
            }
        }
        assert!(launcher.launched.is_empty());
    }

    #[test]
    fn test_non_selection_lines() {
        let mut launcher = RecordingLauncher::default();
        let menu = menu();
        assert!(matches!(menu.dispatch("hello", &mut launcher), Outcome::NotASelection));
        assert!(matches!(menu.dispatch("", &mut launcher), Outcome::NotASelection));
        assert!(launcher.launched.is_empty());
    }

    #[test]
    fn test_spawn_failure_is_reported_as_invocation_error() {
        let mut launcher = RecordingLauncher {
            fail_spawn: true,
            ..Default::default()
        };
        match menu().dispatch("!1 hi", &mut launcher) {
            Outcome::Rejected(e) => assert_eq!(e.kind(), ErrorKind::InvocationError),
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_exposes_the_entry() {
        let menu = menu();
        match menu.prepare("!3 x") {
            Prepared::Ready { entry, command } => {
                assert_eq!(entry.title(), "Cat");
                assert_eq!(command.argv(), &["/bin/cat".to_string(), "x".to_string()]);
            }
            other => panic!("expected a ready command, got {:?}", other),
        }
    }
}

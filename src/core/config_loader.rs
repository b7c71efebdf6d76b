//! # Config Loader
//!
//! Reads the menu settings file. Every top-level table is one entry, in file order:
//! the table name is the title, `cmd` is the command template, and `"$N"` / `"$*"` keys
//! are parameter labels. An optional top-level `title` string names the menu.
//!
//! Loading never fails because of a single bad entry. Sections that cannot become an
//! `EntrySource` are collected as `EntryError`s so the caller can report them, and the
//! rest of the menu is still served.

use crate::{
    constants::{COMMAND_KEY, TITLE_KEY},
    core::{
        compiler::{self, ConfigError, EntryError},
        dispatch::Menu,
    },
    models::EntrySource,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use toml::{Table, Value};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Could not read settings file '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Settings file '{path}' is not valid TOML")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// The raw contents of a settings file, before template compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuConfig {
    pub title: Option<String>,
    pub entries: Vec<EntrySource>,
    /// Sections that were dropped while reading the file.
    pub skipped: Vec<EntryError>,
}

/// A compiled menu plus everything that fell out of it on the way.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub title: Option<String>,
    pub menu: Menu,
    /// Read-time exclusions first, then compile-time ones.
    pub skipped: Vec<EntryError>,
    /// Number of sections found in the file.
    pub total: usize,
}

impl MenuConfig {
    /// Compiles the entries and folds compile failures into the skipped list.
    pub fn into_report(self) -> LoadReport {
        let total = self.entries.len() + self.skipped.len();
        let (menu, compile_errors) = Menu::from_compiled(compiler::compile(&self.entries));

        let mut skipped = self.skipped;
        skipped.extend(compile_errors);

        log::info!("Loaded {} of {} menu entries.", menu.len(), total);
        LoadReport {
            title: self.title,
            menu,
            skipped,
            total,
        }
    }
}

/// Parses settings text into a `MenuConfig`.
pub fn parse_menu_config(content: &str) -> Result<MenuConfig, toml::de::Error> {
    let table: Table = toml::from_str(content)?;
    let mut config = MenuConfig::default();

    for (key, value) in table {
        match value {
            Value::Table(section) => match read_entry(&key, section) {
                Ok(entry) => config.entries.push(entry),
                Err(source) => {
                    log::warn!("Entry '{}' rejected: {}", key, source);
                    config.skipped.push(EntryError { title: key, source });
                }
            },
            Value::String(title) if key == TITLE_KEY => config.title = Some(title),
            other => log::warn!(
                "Ignoring top-level key '{}' ({}): only '{}' and entry tables are recognised.",
                key,
                other.type_str(),
                TITLE_KEY
            ),
        }
    }

    Ok(config)
}

/// Reads and parses the settings file at `path`.
pub fn load_menu_file(path: &Path) -> Result<MenuConfig, LoaderError> {
    log::debug!("Reading menu settings from '{}'", path.display());
    let content = fs::read_to_string(path).map_err(|e| LoaderError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_menu_config(&content).map_err(|e| LoaderError::TomlParse {
        path: path.display().to_string(),
        source: e,
    })
}

fn read_entry(title: &str, section: Table) -> Result<EntrySource, ConfigError> {
    let mut command = None;
    let mut labels = BTreeMap::new();

    for (key, value) in section {
        match (key.as_str(), value) {
            (COMMAND_KEY, Value::String(cmd)) => command = Some(cmd),
            (COMMAND_KEY, other) => log::warn!(
                "Entry '{}': '{}' must be a string, found {}.",
                title,
                COMMAND_KEY,
                other.type_str()
            ),
            (k, Value::String(label)) if k.starts_with('$') => {
                labels.insert(k.to_string(), label);
            }
            (k, other) if k.starts_with('$') => log::warn!(
                "Entry '{}': label '{}' must be a string, found {}.",
                title,
                k,
                other.type_str()
            ),
            (k, _) => log::warn!("Entry '{}': ignoring unknown key '{}'.", title, k),
        }
    }

    let command = command.ok_or_else(|| ConfigError::MissingCommand {
        key: COMMAND_KEY.to_string(),
    })?;
    Ok(EntrySource {
        title: title.to_string(),
        command,
        labels,
    })
}

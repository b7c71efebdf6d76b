// src/cli/mod.rs

use crate::constants::{DEFAULT_COLUMNS, DEFAULT_TITLE, SUPPORTED_COLUMNS};
use clap::Parser;

pub mod controller;
pub mod input;
pub mod render;

/// vtmenu: a numbered terminal launcher.
///
/// Reads menu entries from a settings file, shows them as a numbered list, and runs
/// the one the operator picks with `!N [params...]`. Parameters are passed to the
/// program as literal arguments; no shell is involved.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
pub struct Cli {
    /// Settings file to load. Defaults to `~/.config/vtmenu/menu.toml`.
    #[arg(long, value_name = "PATH")]
    pub settings: Option<String>,

    /// Menu title. Overrides the `title` key of the settings file.
    #[arg(long)]
    pub title: Option<String>,

    /// Initial render width.
    #[arg(long, default_value_t = DEFAULT_COLUMNS, value_parser = parse_columns)]
    pub columns: usize,

    /// Load the settings, print the menu and the load report, then exit.
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    /// The title to show: command line first, then settings file, then the default.
    pub fn effective_title(&self, from_settings: Option<&str>) -> String {
        self.title
            .as_deref()
            .or(from_settings)
            .unwrap_or(DEFAULT_TITLE)
            .to_string()
    }
}

/// Accepts only the widths a terminal can be switched to.
pub fn parse_columns(value: &str) -> Result<usize, String> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|cols| SUPPORTED_COLUMNS.contains(cols))
        .ok_or_else(|| {
            format!(
                "unsupported width '{}' (expected one of {:?})",
                value, SUPPORTED_COLUMNS
            )
        })
}

// src/constants.rs

//! Fixed names and limits shared across the launcher.

/// The name of the directory holding vtmenu configuration (inside the user config dir).
pub const CONFIG_DIR_NAME: &str = "vtmenu";

/// The name of the menu definition file (inside the config dir).
pub const SETTINGS_FILENAME: &str = "menu.toml";

/// Title used when neither the command line nor the settings file names one.
pub const DEFAULT_TITLE: &str = "Main Menu";

/// Render widths a terminal may be switched between.
pub const SUPPORTED_COLUMNS: [usize; 2] = [80, 132];

/// Width used until the operator or the command line picks another one.
pub const DEFAULT_COLUMNS: usize = 80;

/// Characters an operator-supplied parameter may never contain.
pub const FORBIDDEN_PARAM_CHARS: [char; 7] = [';', '>', '<', '(', ')', '|', '&'];

/// Configuration key holding an entry's command template.
pub const COMMAND_KEY: &str = "cmd";

/// Top-level configuration key holding the menu title.
pub const TITLE_KEY: &str = "title";

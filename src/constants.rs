// src/constants.rs

/// The name of the directory holding typeline configuration (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "typeline";

/// The name of the configuration file (inside `CONFIG_DIR_NAME`).
pub const CONFIG_FILENAME: &str = "config.toml";

/// The prompt printed before each REPL line unless configured otherwise.
pub const DEFAULT_PROMPT: &str = ">>> ";

/// The first token that ends a REPL session unless configured otherwise.
pub const DEFAULT_STOP_WORD: &str = "stop";

/// Prefix of a keyword marker (`-name value`).
pub const KEYWORD_PREFIX: &str = "-";

/// Prefix of a flag reference (`--name`).
pub const FLAG_PREFIX: &str = "--";

/// Separator used in parameter names. Dashes in `--flag-name` are translated to it.
pub const NAME_SEPARATOR: char = '_';

/// The description given to commands that do not declare one.
pub const NO_DESCRIPTION: &str = "No description provided.";

//! typeline: a typed command grammar engine.
//!
//! Commands declare their parameters (`Char`, `Word`, `Sentence`, `Int`, `Float`,
//! `Flag`) through a builder. The schema is validated once at registration, and
//! each input line is tokenized and bound against it before the handler runs.

/// The `typeline` binary's surface: arguments, REPL and built-in commands.
pub mod cli;
/// Fixed names and defaults.
pub mod constants;
/// The engine: schema extraction, tokenizing, binding and dispatch.
pub mod core;
/// Data types shared by the engine and its hosts.
pub mod models;

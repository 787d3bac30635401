// src/core/mod.rs

/// Binds tokens to a parameter schema.
pub mod binder;
/// Commands and their builder.
pub mod command;
/// Loading `config.toml`.
pub mod config;
/// Line-level dispatch.
pub mod parser;
/// Name and alias lookup.
pub mod registry;
/// Validation of declared parameters.
pub mod schema;
/// Splitting lines into tokens.
pub mod tokenizer;

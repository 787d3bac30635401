// src/bin/typeline.rs

//! The `typeline` command-line shell.

use anyhow::{Context, Result};
use clap::Parser as _;
use colored::*;
use std::io;
use typeline::{
    cli::{Cli, builtins, repl},
    core::{config, parser::Parser, registry::CommandRegistry, schema::SchemaExtractor},
    models::AnnotationPolicy,
};

/// The main entry point of `typeline`.
/// It sets up logging, loads the configuration, registers the commands and
/// hands control to the REPL (or runs a single line).
fn main() {
    env_logger::init();

    match run_cli(Cli::parse()) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            // Registration and configuration errors abort start-up.
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when a single `--command` line failed.
fn run_cli(cli: Cli) -> Result<bool> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut config = config::load_config(cli.config.as_deref())?;
    if cli.lenient {
        config.annotation_policy = AnnotationPolicy::Lenient;
    }
    if cli.no_color || !config.color {
        colored::control::set_override(false);
    }

    let extractor = SchemaExtractor::new(config.annotation_policy);
    let mut registry = CommandRegistry::new();
    builtins::register_builtins(&mut registry, &extractor)
        .context("Failed to register the built-in commands")?;

    let parser = Parser::new(&registry)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(line) = &cli.command {
        return repl::run_once(&parser, line, &mut out);
    }

    let end = repl::run(&parser, &config, io::stdin().lock(), &mut out)?;
    log::debug!("Session ended: {:?}", end);
    Ok(true)
}

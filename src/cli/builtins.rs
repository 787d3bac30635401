// src/cli/builtins.rs

// The commands every typeline session starts with.

use anyhow::{Result, anyhow};
use colored::Colorize;
use thiserror::Error;

use crate::{
    cli::{usage_line, warning_line},
    core::{
        command::{Command, Context},
        registry::{CommandRegistry, RegistryError},
        schema::{SchemaExtractor, SignatureError},
    },
    models::{Annotation, AtomicType, BoundArguments, RawParameter, Value},
};

/// Why the built-in commands could not be registered.
#[derive(Error, Debug)]
pub enum BuiltinError {
    /// A built-in declared an invalid parameter list.
    #[error(transparent)]
    Signature(#[from] SignatureError),
    /// A built-in name clashes with an existing command.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Declares the built-in commands and adds them to `registry`.
pub fn register_builtins(
    registry: &mut CommandRegistry,
    extractor: &SchemaExtractor,
) -> Result<(), BuiltinError> {
    registry.register(
        Command::builder("echo", echo)
            .description("Echoes back the text given to it.")
            .parameter(RawParameter::positional("text", Annotation::Sentence))
            .build(extractor)?,
    )?;

    registry.register(
        Command::builder("help", help)
            .description("Lists the documentation of the given command or type.")
            .parameter(RawParameter::positional("name", Annotation::Word))
            .build(extractor)?,
    )?;

    Ok(())
}

fn echo(args: &BoundArguments, context: &mut Context<'_>) -> Result<()> {
    let text = args
        .positional(0)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("echo expects a sentence"))?;
    writeln!(context.out, "{}", text)?;
    Ok(())
}

fn help(args: &BoundArguments, context: &mut Context<'_>) -> Result<()> {
    let name = args
        .positional(0)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("help expects a name"))?;
    let page = render_help(context.registry, name)?;
    write!(context.out, "{}", page)?;
    Ok(())
}

/// Renders the help page for a command (by name or alias) or an atomic type.
///
/// Commands take precedence over types when a name is both.
pub fn render_help(registry: &CommandRegistry, name: &str) -> Result<String> {
    if let Some(command) = registry.get(name) {
        let mut page = format!(
            "{}\n",
            format!("Help on command '{}':", command.name()).yellow().bold()
        );
        if command.is_undocumented() {
            let message = format!("No description given for command '{}'.", command.name());
            log::warn!("{}", message);
            page.push_str(&warning_line(&message));
        } else {
            page.push_str(command.description());
            page.push('\n');
        }

        page.push_str(&format!(
            "\n{} {}\n",
            "Usage:".bold(),
            usage_line(command).cyan()
        ));
        if !command.aliases().is_empty() {
            page.push_str(&format!(
                "{} {}\n",
                "Aliases:".bold(),
                command.aliases().join(", ")
            ));
        }
        return Ok(page);
    }

    if let Some(ty) = AtomicType::from_name(name) {
        return Ok(format!(
            "{}\n{}\n",
            format!("Help on type '{}':", ty).yellow().bold(),
            ty.description()
        ));
    }

    Err(anyhow!("Cannot find an object by the name '{}'.", name))
}

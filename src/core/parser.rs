// src/core/parser.rs

use crate::{
    core::{
        binder::{self, ParseError},
        command::{Command, Context},
        registry::{CommandRegistry, RegistryError},
        tokenizer,
    },
    models::BoundArguments,
};
use anyhow::Result;
use std::io::Write;

/// Turns raw lines into calls against a registry.
///
/// The parser only reads the registry, so any number of parsers (on any number
/// of threads) may share one.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'r> {
    registry: &'r CommandRegistry,
}

/// A command matched to a line, with its arguments bound and ready to run.
#[derive(Debug)]
pub struct Call<'r> {
    /// The resolved command.
    pub command: &'r Command,
    /// Its bound arguments.
    pub arguments: BoundArguments,
}

impl<'r> Parser<'r> {
    /// Creates a parser over `registry`.
    ///
    /// # Errors
    /// `RegistryError::Empty` if there is nothing to dispatch to.
    pub fn new(registry: &'r CommandRegistry) -> Result<Self, RegistryError> {
        if registry.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(Self { registry })
    }

    /// The registry lines are resolved against.
    pub fn registry(&self) -> &'r CommandRegistry {
        self.registry
    }

    /// Tokenizes `line`, resolves the command and binds its arguments.
    ///
    /// Returns `Ok(None)` for a blank line. An unknown command name fails before
    /// any binding is attempted.
    pub fn prepare(&self, line: &str) -> Result<Option<Call<'r>>, ParseError> {
        let tokens = tokenizer::tokenize(line);
        let Some(name) = tokens.first() else {
            return Ok(None);
        };

        let command = self
            .registry
            .get(name)
            .ok_or_else(|| ParseError::UnknownCommand { name: name.clone() })?;

        log::debug!("Line resolved to command '{}': {:?}", command.name(), tokens);
        let arguments = binder::bind(command.schema(), &tokens)?;

        Ok(Some(Call { command, arguments }))
    }

    /// Parses `line` and, if it names a command, runs it with output going to `out`.
    ///
    /// # Errors
    /// A `ParseError` (nothing is invoked), or whatever the handler returns.
    pub fn execute(&self, line: &str, out: &mut dyn Write) -> Result<()> {
        if let Some(call) = self.prepare(line)? {
            call.invoke(self.registry, out)?;
        }
        Ok(())
    }
}

impl Call<'_> {
    /// Runs the handler, giving it `registry` and `out` through its `Context`.
    pub fn invoke(&self, registry: &CommandRegistry, out: &mut dyn Write) -> Result<()> {
        let mut context = Context { registry, out };
        self.command.invoke(&self.arguments, &mut context)
    }
}

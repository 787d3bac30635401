// src/core/command.rs

use crate::{
    constants::NO_DESCRIPTION,
    core::{
        registry::CommandRegistry,
        schema::{SchemaExtractor, SignatureError},
    },
    models::{BoundArguments, ParameterSchema, RawParameter},
};
use anyhow::Result;
use std::fmt;
use std::io::Write;

/// Everything a handler may touch while it runs.
pub struct Context<'a> {
    /// The registry the command was dispatched from, read-only.
    pub registry: &'a CommandRegistry,
    /// Where the handler writes its output.
    pub out: &'a mut dyn Write,
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// The function a command runs once its arguments are bound.
pub type Handler = fn(&BoundArguments, &mut Context<'_>) -> Result<()>;

/// A registered command: a name, its aliases and a validated parameter schema.
#[derive(Clone)]
pub struct Command {
    name: String,
    description: String,
    aliases: Vec<String>,
    schema: ParameterSchema,
    handler: Handler,
}

impl Command {
    /// Starts declaring a command.
    pub fn builder(name: impl Into<String>, handler: Handler) -> CommandBuilder {
        CommandBuilder {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            parameters: Vec::new(),
            renames: Vec::new(),
            handler,
        }
    }

    /// The primary name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description, or a placeholder when none was given.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// `true` when the command was declared without a description.
    pub fn is_undocumented(&self) -> bool {
        self.description == NO_DESCRIPTION
    }

    /// Alternative names, in the order they were added.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The validated parameters.
    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    /// Runs the handler with already bound arguments.
    pub fn invoke(&self, arguments: &BoundArguments, context: &mut Context<'_>) -> Result<()> {
        log::debug!("Invoking command '{}'", self.name);
        (self.handler)(arguments, context)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Declares a command step by step. The schema is extracted, and renames applied,
/// only in `build`, so an illegal signature never yields a `Command`.
#[derive(Debug)]
pub struct CommandBuilder {
    name: String,
    description: Option<String>,
    aliases: Vec<String>,
    parameters: Vec<RawParameter>,
    renames: Vec<(String, String)>,
    handler: Handler,
}

impl CommandBuilder {
    /// Sets the text shown by `help`.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds another name the command can be invoked by.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Appends a parameter, in declaration order.
    pub fn parameter(mut self, parameter: RawParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Exposes parameter `old` under the name `new` (e.g. a short `-n` for `count`).
    pub fn rename(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.renames.push((old.into(), new.into()));
        self
    }

    /// Extracts the schema and applies the renames.
    ///
    /// # Errors
    /// Any `SignatureError` raised by extraction or renaming.
    pub fn build(self, extractor: &SchemaExtractor) -> Result<Command, SignatureError> {
        log::debug!("Building command '{}'", self.name);

        let extraction = extractor.extract(&self.parameters)?;
        let schema = if self.renames.is_empty() {
            extraction.schema
        } else {
            extraction.schema.renamed(&self.renames)?
        };

        Ok(Command {
            name: self.name,
            description: self
                .description
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            aliases: self.aliases,
            schema,
            handler: self.handler,
        })
    }
}

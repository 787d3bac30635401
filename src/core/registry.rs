// src/core/registry.rs

use crate::core::command::Command;
use std::collections::HashMap;
use thiserror::Error;

/// Why a command could not be registered or looked up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The command name is already a name or alias.
    #[error("name '{name}' has already been taken by another command or alias. Choose a different name.")]
    NameTaken {
        /// The clashing name.
        name: String,
    },
    /// One of the aliases is already a name or alias.
    #[error("alias '{alias}' has already been taken by another command. Choose a different alias.")]
    AliasTaken {
        /// The clashing alias.
        alias: String,
    },
    /// A parser was requested over a registry without commands.
    #[error("the list of valid commands is empty.")]
    Empty,
}

/// Stores commands and resolves names and aliases to them.
///
/// Names and aliases share a single namespace, so a lookup is never ambiguous.
#[derive(Debug, Default, Clone)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    name_to_index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command under its name and every alias.
    ///
    /// # Errors
    /// `NameTaken` or `AliasTaken` if any of them is already in use. The registry
    /// is left unchanged in that case.
    pub fn register(&mut self, command: Command) -> Result<(), RegistryError> {
        if self.name_to_index.contains_key(command.name()) {
            return Err(RegistryError::NameTaken {
                name: command.name().to_string(),
            });
        }

        for (i, alias) in command.aliases().iter().enumerate() {
            let repeated = command.aliases().iter().take(i).any(|a| a == alias);
            if repeated || alias == command.name() || self.name_to_index.contains_key(alias) {
                return Err(RegistryError::AliasTaken {
                    alias: alias.clone(),
                });
            }
        }

        let index = self.commands.len();
        self.name_to_index.insert(command.name().to_string(), index);
        for alias in command.aliases() {
            self.name_to_index.insert(alias.clone(), index);
        }

        log::debug!(
            "Registered command '{}' (aliases: {:?})",
            command.name(),
            command.aliases()
        );
        self.commands.push(command);
        Ok(())
    }

    /// Finds a command by its name or one of its aliases.
    pub fn get(&self, name_or_alias: &str) -> Option<&Command> {
        self.name_to_index
            .get(name_or_alias)
            .and_then(|&index| self.commands.get(index))
    }

    /// Commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Number of registered commands, aliases not counted.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// `true` when nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

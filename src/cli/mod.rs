// src/cli/mod.rs

use clap::Parser;
use colored::Colorize;
use std::fmt::Display;
use std::path::PathBuf;

use crate::{
    constants::{FLAG_PREFIX, KEYWORD_PREFIX, NAME_SEPARATOR},
    core::command::Command,
    models::{ParameterKind, ParameterSchema},
};

/// `echo` and `help`.
pub mod builtins;
/// The interactive loop.
pub mod repl;

/// typeline: an interactive shell for typed commands.
///
/// Without `--command`, a prompt is shown and each line is parsed against the
/// registered commands until the stop word (or end of input) is reached.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run a single line and exit instead of starting the prompt.
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    pub command: Option<String>,

    /// Path to a config file. Defaults to `~/.config/typeline/config.toml`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Accept parameters without a type annotation (they default to Word).
    #[arg(long)]
    pub lenient: bool,

    /// Disable coloured output.
    #[arg(long)]
    pub no_color: bool,
}

/// Formats an error for the terminal: `Error: <message>`.
pub fn error_line(error: &dyn Display) -> String {
    format!("{}: {}\n", "Error".red().bold(), error)
}

/// Formats an advisory message for the terminal: `Warning: <message>`.
pub fn warning_line(message: &dyn Display) -> String {
    format!("{}: {}\n", "Warning".yellow().bold(), message)
}

/// Renders how a command is called, e.g. `say <text: Sentence> [-times <Int>] [--loud]`.
pub fn usage_line(command: &Command) -> String {
    let mut parts = vec![command.name().to_string()];
    parts.extend(schema_usage(command.schema()));
    parts.join(" ")
}

fn schema_usage(schema: &ParameterSchema) -> Vec<String> {
    schema
        .parameters()
        .iter()
        .map(|param| {
            let part = if param.is_flag() {
                format!(
                    "{}{}",
                    FLAG_PREFIX,
                    param.name.replace(NAME_SEPARATOR, KEYWORD_PREFIX)
                )
            } else {
                match param.kind {
                    ParameterKind::PositionalOnly => {
                        format!("<{}: {}>", param.name, param.atomic_type)
                    }
                    ParameterKind::KeywordOnly => {
                        format!("{}{} <{}>", KEYWORD_PREFIX, param.name, param.atomic_type)
                    }
                }
            };

            if param.is_optional() {
                format!("[{}]", part)
            } else {
                part
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{command::Context, schema::SchemaExtractor};
    use crate::models::{Annotation, BoundArguments, RawParameter};

    fn noop(_: &BoundArguments, _: &mut Context<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    #[test]
    fn test_usage_line() {
        let command = Command::builder("say", noop)
            .parameter(RawParameter::positional("text", Annotation::Sentence))
            .parameter(RawParameter::keyword("times", Annotation::Int).with_default())
            .parameter(RawParameter::keyword("sep", Annotation::Char))
            .parameter(RawParameter::flag("dry_run"))
            .build(&SchemaExtractor::default())
            .unwrap();

        assert_eq!(
            usage_line(&command),
            "say <text: Sentence> [-times <Int>] -sep <Char> [--dry-run]"
        );
    }

    #[test]
    fn test_cli_args() {
        let cli = Cli::try_parse_from(["typeline", "-c", "echo hi", "--lenient", "--no-color"])
            .unwrap();
        assert_eq!(cli.command.as_deref(), Some("echo hi"));
        assert!(cli.lenient);
        assert!(cli.no_color);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_diagnostic_lines() {
        colored::control::set_override(false);
        assert_eq!(error_line(&"boom"), "Error: boom\n");
        assert_eq!(warning_line(&"careful"), "Warning: careful\n");
    }
}

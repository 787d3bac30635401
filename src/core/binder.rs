// src/core/binder.rs

//! Binds a token stream to a `ParameterSchema`.
//!
//! The binder walks two cursors in lock-step: one over the schema's parameters
//! and one over the tokens. Flags are the only exception, they may appear in
//! any order once the cursor reaches a keyword-only parameter, so a `--name`
//! token advances the token cursor alone.

use crate::{
    constants::{FLAG_PREFIX, KEYWORD_PREFIX, NAME_SEPARATOR},
    models::{AtomicType, BoundArguments, Parameter, ParameterKind, ParameterSchema, Value},
};
use thiserror::Error;

/// Why a line could not be turned into a call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The first token names no registered command or alias.
    #[error("No command was found by the name '{name}'.")]
    UnknownCommand {
        /// The token that was looked up.
        name: String,
    },
    /// A `--name` token matches no flag of the command.
    #[error("No flag found with the name '{flag}'.")]
    UnknownFlag {
        /// The token as typed, prefix included.
        flag: String,
    },
    /// A required keyword parameter was due but another token came instead.
    #[error("Invalid parameter name '{found}': expected '{expected}'.")]
    ExpectedFlagName {
        /// The marker the binder was waiting for, e.g. `-times`.
        expected: String,
        /// The token found at that position.
        found: String,
    },
    /// The tokens ran out before a required parameter got a value.
    #[error("EOL parsing error: parameter '{parameter}' had no value.")]
    UnexpectedEndOfInput {
        /// The parameter name, with its `-` prefix for keyword parameters.
        parameter: String,
    },
    /// A `Char` parameter received something other than one character.
    #[error(
        "Invalid input: expected one character for parameter '{parameter}' but received {count} characters."
    )]
    WrongCharCount {
        /// The `Char` parameter.
        parameter: String,
        /// How many characters the token had.
        count: usize,
    },
    /// A token could not be parsed as an `Int` or `Float`.
    #[error("Cannot convert '{token}' into {}.", describe_target(.target))]
    BadNumber {
        /// The offending token.
        token: String,
        /// The numeric type it was parsed as.
        target: AtomicType,
    },
    /// A token was left over that no parameter can take.
    #[error("Unexpected argument '{token}': the command takes no further arguments here.")]
    UnexpectedArgument {
        /// The leftover token.
        token: String,
    },
}

fn describe_target(target: &AtomicType) -> &'static str {
    match target {
        AtomicType::Int => "a base-10 integer",
        AtomicType::Float => "a decimal number",
        _ => "a number",
    }
}

/// Binds `tokens` against `schema`. `tokens[0]` is the command name and is skipped.
///
/// # Errors
/// Returns the first `ParseError` encountered. Nothing is bound partially.
pub fn bind(schema: &ParameterSchema, tokens: &[String]) -> Result<BoundArguments, ParseError> {
    Binder::new(schema, tokens).run()
}

/// The mutable state of a single bind.
struct Binder<'a> {
    schema: &'a ParameterSchema,
    tokens: &'a [String],
    param_pos: usize,
    token_pos: usize,
    bound: BoundArguments,
}

impl<'a> Binder<'a> {
    fn new(schema: &'a ParameterSchema, tokens: &'a [String]) -> Self {
        Self {
            schema,
            tokens,
            param_pos: 0,
            token_pos: 1,
            bound: BoundArguments::default(),
        }
    }

    fn run(mut self) -> Result<BoundArguments, ParseError> {
        let (schema, tokens) = (self.schema, self.tokens);
        let params = schema.parameters();

        while let Some(token) = tokens.get(self.token_pos) {
            let Some(param) = params.get(self.param_pos) else {
                // Every parameter is processed; only flags may still appear.
                if token.starts_with(FLAG_PREFIX) {
                    self.bind_flag(token)?;
                    continue;
                }
                return Err(ParseError::UnexpectedArgument {
                    token: token.clone(),
                });
            };

            log::trace!(
                "Binding token #{} '{}' against parameter '{}'",
                self.token_pos,
                token,
                param.name
            );

            match param.kind {
                ParameterKind::KeywordOnly => {
                    if token.starts_with(FLAG_PREFIX) {
                        self.bind_flag(token)?;
                        continue;
                    }
                    if param.is_flag() {
                        return Err(ParseError::UnexpectedArgument {
                            token: token.clone(),
                        });
                    }
                    if !self.bind_keyword(param, token)? {
                        // Defaulted parameter that was not addressed: re-examine the
                        // same token against the next parameter.
                        self.param_pos += 1;
                        continue;
                    }
                }
                ParameterKind::PositionalOnly => self.bind_positional(param)?,
            }

            self.param_pos += 1;
            self.token_pos += 1;
        }

        self.finish()
    }

    /// Handles a `--name` token. Advances the token cursor only.
    fn bind_flag(&mut self, token: &str) -> Result<(), ParseError> {
        let name = flag_name(token);
        let flag = self
            .schema
            .flag(&name)
            .ok_or_else(|| ParseError::UnknownFlag {
                flag: token.to_string(),
            })?;

        log::trace!("Flag '{}' set by '{}'", flag.name, token);
        self.bound
            .keyword
            .insert(flag.name.clone(), Value::Flag(true));
        self.token_pos += 1;
        Ok(())
    }

    /// Handles `-name value`. Returns `false` when the parameter is skipped in favour of its default.
    /// On success the token cursor is left on the last consumed token.
    fn bind_keyword(&mut self, param: &Parameter, token: &str) -> Result<bool, ParseError> {
        let expected = format!("{}{}", KEYWORD_PREFIX, param.name);
        if token != expected {
            if param.has_default {
                log::trace!("Parameter '{}' not addressed, leaving it to its default", param.name);
                return Ok(false);
            }
            return Err(ParseError::ExpectedFlagName {
                expected,
                found: token.to_string(),
            });
        }

        let value_pos = self.token_pos + 1;
        if value_pos >= self.tokens.len() {
            return Err(ParseError::UnexpectedEndOfInput { parameter: expected });
        }

        self.token_pos = value_pos;
        let value = self.take_value(param)?;
        self.bound.keyword.insert(param.name.clone(), value);
        Ok(true)
    }

    fn bind_positional(&mut self, param: &Parameter) -> Result<(), ParseError> {
        let value = self.take_value(param)?;
        self.bound.positional.push(value);
        Ok(())
    }

    /// Coerces the token at the cursor (or, for sentences, the run of tokens
    /// starting there) into a value. Leaves the cursor on the last consumed token.
    fn take_value(&mut self, param: &Parameter) -> Result<Value, ParseError> {
        if param.atomic_type == AtomicType::Sentence {
            let end = self.sentence_end(self.token_pos);
            let text = self
                .tokens
                .get(self.token_pos..end)
                .unwrap_or_default()
                .join(" ");
            // `end` is never below 1. For an empty sentence this parks the cursor
            // just before the marker, so the marker is read again.
            self.token_pos = end.saturating_sub(1);
            return Ok(Value::Sentence(text));
        }

        let token = self
            .tokens
            .get(self.token_pos)
            .ok_or_else(|| ParseError::UnexpectedEndOfInput {
                parameter: param.name.clone(),
            })?;
        coerce(param, token)
    }

    /// The index of the first token at or after `start` that is a parameter marker,
    /// or the end of the stream.
    fn sentence_end(&self, start: usize) -> usize {
        self.tokens
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, token)| is_marker(self.schema, token))
            .map_or(self.tokens.len(), |(pos, _)| pos)
    }

    /// Checks what was left unbound once the tokens ran out.
    fn finish(mut self) -> Result<BoundArguments, ParseError> {
        let params = self.schema.parameters();

        for param in params.iter().skip(self.param_pos) {
            if !param.is_optional() {
                let parameter = match param.kind {
                    ParameterKind::PositionalOnly => param.name.clone(),
                    ParameterKind::KeywordOnly => format!("{}{}", KEYWORD_PREFIX, param.name),
                };
                return Err(ParseError::UnexpectedEndOfInput { parameter });
            }
        }

        // Flags are never missing, only true or false.
        for flag in self.schema.flags() {
            self.bound
                .keyword
                .entry(flag.name.clone())
                .or_insert(Value::Flag(false));
        }

        log::debug!("Bound arguments: {:?}", self.bound);
        Ok(self.bound)
    }
}

/// `--dry-run` -> `dry_run`.
fn flag_name(token: &str) -> String {
    token
        .strip_prefix(FLAG_PREFIX)
        .unwrap_or(token)
        .replace('-', &NAME_SEPARATOR.to_string())
}

/// Whether `token` addresses a parameter of `schema`: `-name` for any
/// parameter, `--flag-name` for a flag.
pub fn is_marker(schema: &ParameterSchema, token: &str) -> bool {
    if token.starts_with(FLAG_PREFIX) {
        return schema.flag(&flag_name(token)).is_some();
    }
    token
        .strip_prefix(KEYWORD_PREFIX)
        .is_some_and(|name| schema.get(name).is_some())
}

fn coerce(param: &Parameter, token: &str) -> Result<Value, ParseError> {
    match param.atomic_type {
        AtomicType::Char => {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(ParseError::WrongCharCount {
                    parameter: param.name.clone(),
                    count: token.chars().count(),
                }),
            }
        }
        AtomicType::Word => Ok(Value::Word(token.to_string())),
        AtomicType::Sentence => Ok(Value::Sentence(token.to_string())),
        AtomicType::Int => token.parse::<i64>().map(Value::Int).map_err(|_| {
            ParseError::BadNumber {
                token: token.to_string(),
                target: AtomicType::Int,
            }
        }),
        AtomicType::Float => token.parse::<f64>().map(Value::Float).map_err(|_| {
            ParseError::BadNumber {
                token: token.to_string(),
                target: AtomicType::Float,
            }
        }),
        AtomicType::Flag => Ok(Value::Flag(true)),
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{schema::SchemaExtractor, tokenizer::tokenize};
    use crate::models::{Annotation, AnnotationPolicy, RawParameter};

    // --- Helpers ---
    fn schema(raw: &[RawParameter]) -> ParameterSchema {
        SchemaExtractor::new(AnnotationPolicy::Strict)
            .extract(raw)
            .unwrap()
            .schema
    }

    fn to_tokens(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    fn word_and_count() -> ParameterSchema {
        schema(&[
            RawParameter::positional("w", Annotation::Word),
            RawParameter::keyword("n", Annotation::Int),
        ])
    }

    // --- Positional and keyword binding ---

    #[test]
    fn test_bind_positional_and_keyword() {
        let bound = bind(&word_and_count(), &to_tokens(&["cmd", "hello", "-n", "5"])).unwrap();
        assert_eq!(bound.positional, vec![Value::Word("hello".to_string())]);
        assert_eq!(bound.keyword.len(), 1);
        assert_eq!(bound.keyword("n"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_keyword_marker_without_value_is_end_of_input() {
        let err = bind(&word_and_count(), &to_tokens(&["cmd", "hello", "-n"])).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedEndOfInput {
                parameter: "-n".to_string()
            }
        );
    }

    #[test]
    fn test_wrong_keyword_marker_is_rejected() {
        let err = bind(&word_and_count(), &to_tokens(&["cmd", "hello", "-m", "5"])).unwrap_err();
        assert_eq!(
            err,
            ParseError::ExpectedFlagName {
                expected: "-n".to_string(),
                found: "-m".to_string()
            }
        );
    }

    #[test]
    fn test_missing_required_parameters_are_end_of_input() {
        let err = bind(&word_and_count(), &to_tokens(&["cmd", "hello"])).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEndOfInput { .. }));

        let err = bind(&word_and_count(), &to_tokens(&["cmd"])).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedEndOfInput {
                parameter: "w".to_string()
            }
        );
    }

    #[test]
    fn test_defaulted_keyword_can_be_skipped() {
        let schema = schema(&[
            RawParameter::keyword("times", Annotation::Int).with_default(),
            RawParameter::keyword("sep", Annotation::Char),
        ]);
        let bound = bind(&schema, &to_tokens(&["cmd", "-sep", ","])).unwrap();
        assert_eq!(bound.keyword("times"), None);
        assert_eq!(bound.keyword("sep"), Some(&Value::Char(',')));

        // Skipping the defaulted parameter does not excuse the required one.
        let err = bind(&schema, &to_tokens(&["cmd"])).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedEndOfInput {
                parameter: "-sep".to_string()
            }
        );
    }

    #[test]
    fn test_extra_arguments_are_rejected() {
        let err = bind(
            &word_and_count(),
            &to_tokens(&["cmd", "hello", "-n", "5", "surplus"]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedArgument {
                token: "surplus".to_string()
            }
        );
    }

    // --- Flags ---

    #[test]
    fn test_flags_default_to_false() {
        let schema = schema(&[
            RawParameter::positional("w", Annotation::Word),
            RawParameter::flag("verbose"),
            RawParameter::flag("dry_run"),
        ]);
        let bound = bind(&schema, &to_tokens(&["cmd", "x"])).unwrap();
        assert_eq!(bound.keyword("verbose"), Some(&Value::Flag(false)));
        assert_eq!(bound.keyword("dry_run"), Some(&Value::Flag(false)));
    }

    #[test]
    fn test_flags_in_any_order_with_dash_translation() {
        let schema = schema(&[
            RawParameter::positional("w", Annotation::Word),
            RawParameter::flag("verbose"),
            RawParameter::flag("dry_run"),
        ]);
        let bound = bind(&schema, &to_tokens(&["cmd", "x", "--dry-run"])).unwrap();
        assert!(bound.flag("dry_run"));
        assert!(!bound.flag("verbose"));

        let bound = bind(&schema, &to_tokens(&["cmd", "x", "--dry-run", "--verbose"])).unwrap();
        assert!(bound.flag("dry_run"));
        assert!(bound.flag("verbose"));
    }

    #[test]
    fn test_flag_between_keyword_parameters() {
        let schema = schema(&[
            RawParameter::keyword("a", Annotation::Word),
            RawParameter::keyword("b", Annotation::Word),
            RawParameter::flag("force"),
        ]);
        let bound = bind(&schema, &to_tokens(&["cmd", "--force", "-a", "1", "-b", "2"])).unwrap();
        assert!(bound.flag("force"));
        assert_eq!(bound.keyword("a"), Some(&Value::Word("1".to_string())));
        assert_eq!(bound.keyword("b"), Some(&Value::Word("2".to_string())));
    }

    #[test]
    fn test_unknown_flag() {
        let schema = schema(&[RawParameter::flag("verbose")]);
        let err = bind(&schema, &to_tokens(&["cmd", "--quiet"])).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownFlag {
                flag: "--quiet".to_string()
            }
        );

        // A valued parameter cannot be addressed with `--`.
        let schema = self::schema(&[RawParameter::keyword("n", Annotation::Int)]);
        let err = bind(&schema, &to_tokens(&["cmd", "--n", "3"])).unwrap_err();
        assert!(matches!(err, ParseError::UnknownFlag { .. }));
    }

    #[test]
    fn test_flag_after_all_parameters_is_still_accepted() {
        let schema = schema(&[RawParameter::flag("all")]);
        let bound = bind(&schema, &to_tokens(&["cmd", "--all"])).unwrap();
        assert!(bound.flag("all"));

        let err = bind(&schema, &to_tokens(&["cmd", "all"])).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedArgument { .. }));
    }

    // --- Sentences ---

    #[test]
    fn test_positional_sentence_takes_the_rest_of_the_line() {
        let schema = schema(&[RawParameter::positional("s", Annotation::Sentence)]);
        let bound = bind(&schema, &to_tokens(&["echo", "hello", "world"])).unwrap();
        assert_eq!(bound.positional, vec![Value::Sentence("hello world".to_string())]);
    }

    #[test]
    fn test_sentence_stops_at_keyword_marker() {
        let schema = schema(&[
            RawParameter::positional("text", Annotation::Sentence),
            RawParameter::keyword("times", Annotation::Int),
            RawParameter::flag("loud"),
        ]);
        let bound = bind(
            &schema,
            &to_tokens(&["say", "good", "morning", "-times", "3", "--loud"]),
        )
        .unwrap();
        assert_eq!(bound.positional, vec![Value::Sentence("good morning".to_string())]);
        assert_eq!(bound.keyword("times"), Some(&Value::Int(3)));
        assert!(bound.flag("loud"));
    }

    #[test]
    fn test_sentence_stops_at_flag() {
        let schema = schema(&[
            RawParameter::positional("text", Annotation::Sentence),
            RawParameter::flag("loud"),
        ]);
        let bound = bind(&schema, &to_tokens(&["say", "hi", "there", "--loud"])).unwrap();
        assert_eq!(bound.positional, vec![Value::Sentence("hi there".to_string())]);
        assert!(bound.flag("loud"));
    }

    #[test]
    fn test_sentence_stops_at_single_dash_flag_name() {
        let schema = schema(&[
            RawParameter::positional("text", Annotation::Sentence),
            RawParameter::keyword("msg", Annotation::Sentence).with_default(),
            RawParameter::keyword("n", Annotation::Int).with_default(),
            RawParameter::flag("loud"),
        ]);
        let tokens = tokenize("say a -loud b");

        // The sentence ends at `-loud`; a flag still needs `--` to be set.
        let err = bind(&schema, &tokens).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedArgument {
                token: "-loud".to_string()
            }
        );
    }

    #[test]
    fn test_dash_words_that_are_not_markers_stay_in_sentence() {
        let schema = schema(&[
            RawParameter::positional("text", Annotation::Sentence),
            RawParameter::keyword("n", Annotation::Int).with_default(),
        ]);
        let bound = bind(&schema, &to_tokens(&["say", "a", "-5", "-x", "b"])).unwrap();
        assert_eq!(bound.positional, vec![Value::Sentence("a -5 -x b".to_string())]);
    }

    #[test]
    fn test_keyword_sentence() {
        let schema = schema(&[
            RawParameter::keyword("title", Annotation::Sentence),
            RawParameter::keyword("n", Annotation::Int),
        ]);
        let bound = bind(
            &schema,
            &to_tokens(&["post", "-title", "a", "long", "title", "-n", "2"]),
        )
        .unwrap();
        assert_eq!(
            bound.keyword("title"),
            Some(&Value::Sentence("a long title".to_string()))
        );
        assert_eq!(bound.keyword("n"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_empty_sentence_before_marker() {
        let schema = schema(&[
            RawParameter::positional("text", Annotation::Sentence),
            RawParameter::keyword("n", Annotation::Int),
        ]);
        let bound = bind(&schema, &to_tokens(&["say", "-n", "1"])).unwrap();
        assert_eq!(bound.positional, vec![Value::Sentence(String::new())]);
        assert_eq!(bound.keyword("n"), Some(&Value::Int(1)));
    }

    // --- Coercion ---

    #[test]
    fn test_char_requires_exactly_one_character() {
        let schema = schema(&[RawParameter::positional("c", Annotation::Char)]);
        let bound = bind(&schema, &to_tokens(&["cmd", "ñ"])).unwrap();
        assert_eq!(bound.positional, vec![Value::Char('ñ')]);

        let err = bind(&schema, &to_tokens(&["cmd", "ab"])).unwrap_err();
        assert_eq!(
            err,
            ParseError::WrongCharCount {
                parameter: "c".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn test_numbers() {
        let schema = schema(&[
            RawParameter::positional("i", Annotation::Int),
            RawParameter::positional("f", Annotation::Float),
        ]);
        let bound = bind(&schema, &to_tokens(&["cmd", "-12", "2.5"])).unwrap();
        assert_eq!(bound.positional, vec![Value::Int(-12), Value::Float(2.5)]);

        let err = bind(&schema, &to_tokens(&["cmd", "1.5", "2.5"])).unwrap_err();
        assert_eq!(
            err,
            ParseError::BadNumber {
                token: "1.5".to_string(),
                target: AtomicType::Int
            }
        );
        assert!(err.to_string().contains("base-10 integer"));

        let err = bind(&schema, &to_tokens(&["cmd", "1", "abc"])).unwrap_err();
        assert!(matches!(
            err,
            ParseError::BadNumber {
                target: AtomicType::Float,
                ..
            }
        ));
    }

    #[test]
    fn test_is_marker() {
        let schema = schema(&[
            RawParameter::keyword("n", Annotation::Int),
            RawParameter::flag("dry_run"),
        ]);
        assert!(is_marker(&schema, "-n"));
        assert!(is_marker(&schema, "--dry-run"));
        assert!(is_marker(&schema, "-dry_run"));
        assert!(!is_marker(&schema, "--n"));
        assert!(!is_marker(&schema, "-7"));
        assert!(!is_marker(&schema, "n"));
    }
}

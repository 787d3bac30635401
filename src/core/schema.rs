// src/core/schema.rs

//! Turns a command's declared parameters into a validated `ParameterSchema`.
//!
//! Every rule is checked eagerly: a command whose signature is illegal never
//! produces a schema, so the binder can rely on the schema invariants without
//! re-checking them per line.

use crate::models::{
    Annotation, AnnotationPolicy, AtomicType, NativeKind, Parameter, ParameterKind,
    ParameterSchema, RawParameter,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

lazy_static! {
    static ref PARAMETER_NAME_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Why a parameter list was rejected at registration time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The name is not an identifier and could never be addressed as `-name`.
    #[error("parameter name '{name}' is not a valid identifier.")]
    InvalidName {
        /// The rejected name.
        name: String,
    },
    /// Two parameters share a name.
    #[error("parameter '{name}' is declared more than once.")]
    DuplicateParameter {
        /// The repeated name.
        name: String,
    },
    /// No annotation was given under the strict policy.
    #[error("parameter '{name}' is missing a type annotation.")]
    MissingAnnotation {
        /// The untyped parameter.
        name: String,
    },
    /// A wrapper contradicts the native kind.
    #[error("parameter '{name}' is marked as {marked} but declared as {declared}.")]
    ConflictingKind {
        /// The parameter.
        name: String,
        /// The kind the wrapper asks for.
        marked: ParameterKind,
        /// The kind it was declared with.
        declared: NativeKind,
    },
    /// The parameter can be bound either way and no wrapper settles it.
    #[error(
        "ambiguously positioned parameters like parameter '{name}' are not supported: declare it positional-only or keyword-only."
    )]
    AmbiguousKind {
        /// The parameter.
        name: String,
    },
    /// A `Flag` that would be bound by position.
    #[error("flag parameter '{name}' must be keyword-only.")]
    FlagNotKeywordOnly {
        /// The flag.
        name: String,
    },
    /// A non-flag parameter follows a flag.
    #[error("parameter '{name}' cannot come after a flag. Flags must be after all other parameters.")]
    ParameterAfterFlag {
        /// The misplaced parameter.
        name: String,
    },
    /// The annotation is nested or not one the engine knows.
    #[error("parameter '{name}' has an unsupported annotation: '{annotation}'.")]
    UnsupportedAnnotation {
        /// The parameter.
        name: String,
        /// The annotation as written.
        annotation: String,
    },
    /// A positional parameter follows a positional `Sentence`, which would swallow it.
    #[error("positional parameter '{name}' cannot come after a positional Sentence parameter.")]
    ParameterAfterSentence {
        /// The unreachable parameter.
        name: String,
    },
    /// A rename names a parameter the schema does not have.
    #[error("cannot find parameter by the name '{name}' to rename.")]
    AliasTargetNotFound {
        /// The missing name.
        name: String,
    },
}

/// A non-fatal remark produced while extracting a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureWarning {
    /// A `Positional`/`Keyworded` wrapper repeats what the native kind already says.
    RedundantWrapper {
        /// The parameter.
        name: String,
        /// The kind both the wrapper and the declaration agree on.
        kind: ParameterKind,
    },
    /// No annotation was given and the lenient policy defaulted it to `Word`.
    MissingAnnotation {
        /// The untyped parameter.
        name: String,
    },
}

impl fmt::Display for SignatureWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedundantWrapper { name, kind } => write!(
                f,
                "parameter '{}' is already a {} argument - the type annotation is redundant.",
                name, kind
            ),
            Self::MissingAnnotation { name } => write!(
                f,
                "parameter '{}' is missing a type annotation, defaulting to Word.",
                name
            ),
        }
    }
}

/// A successfully extracted schema together with the warnings raised along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// The validated parameters.
    pub schema: ParameterSchema,
    /// Remarks to show the host; they never block registration.
    pub warnings: Vec<SignatureWarning>,
}

/// Validates raw parameter lists under a configurable annotation policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaExtractor {
    policy: AnnotationPolicy,
}

/// Tracks the ordering rules across the parameter list.
#[derive(Debug, Default)]
struct OrderState {
    seen_flag: bool,
    seen_positional_sentence: bool,
}

impl SchemaExtractor {
    /// Creates an extractor that handles untyped parameters according to `policy`.
    pub fn new(policy: AnnotationPolicy) -> Self {
        Self { policy }
    }

    /// The policy this extractor was created with.
    pub fn policy(&self) -> AnnotationPolicy {
        self.policy
    }

    /// Resolves and validates `raw` in declaration order.
    ///
    /// # Errors
    /// Returns the first `SignatureError` found. No partial schema is produced.
    pub fn extract(&self, raw: &[RawParameter]) -> Result<Extraction, SignatureError> {
        let mut parameters = Vec::with_capacity(raw.len());
        let mut warnings = Vec::new();
        let mut names = HashSet::with_capacity(raw.len());
        let mut order = OrderState::default();

        for param in raw {
            validate_name(&param.name)?;
            if !names.insert(param.name.as_str()) {
                return Err(SignatureError::DuplicateParameter {
                    name: param.name.clone(),
                });
            }

            let resolved = self.resolve(param, &mut warnings)?;
            check_order(&resolved, &mut order)?;
            log::trace!("Resolved parameter: {:?}", resolved);
            parameters.push(resolved);
        }

        for warning in &warnings {
            log::warn!("{}", warning);
        }

        Ok(Extraction {
            schema: ParameterSchema { parameters },
            warnings,
        })
    }

    fn resolve(
        &self,
        param: &RawParameter,
        warnings: &mut Vec<SignatureWarning>,
    ) -> Result<Parameter, SignatureError> {
        let name = &param.name;

        let annotation = match &param.annotation {
            Some(annotation) => annotation.clone(),
            None => match self.policy {
                AnnotationPolicy::Strict => {
                    return Err(SignatureError::MissingAnnotation { name: name.clone() });
                }
                AnnotationPolicy::Lenient => {
                    warnings.push(SignatureWarning::MissingAnnotation { name: name.clone() });
                    Annotation::Word
                }
            },
        };

        let (kind, inner) = match &annotation {
            Annotation::Positional(inner) => (
                unwrap_marker(param, ParameterKind::PositionalOnly, warnings)?,
                inner.as_ref(),
            ),
            Annotation::Keyworded(inner) => (
                unwrap_marker(param, ParameterKind::KeywordOnly, warnings)?,
                inner.as_ref(),
            ),
            Annotation::Flag => match param.native_kind {
                NativeKind::KeywordOnly => (ParameterKind::KeywordOnly, &annotation),
                _ => return Err(SignatureError::FlagNotKeywordOnly { name: name.clone() }),
            },
            _ => match param.native_kind {
                NativeKind::PositionalOnly => (ParameterKind::PositionalOnly, &annotation),
                NativeKind::KeywordOnly => (ParameterKind::KeywordOnly, &annotation),
                NativeKind::Ambiguous => {
                    return Err(SignatureError::AmbiguousKind { name: name.clone() });
                }
            },
        };

        let atomic_type = atomic_type_of(name, inner)?;
        if atomic_type == AtomicType::Flag && kind != ParameterKind::KeywordOnly {
            return Err(SignatureError::FlagNotKeywordOnly { name: name.clone() });
        }

        Ok(Parameter {
            name: name.clone(),
            kind,
            atomic_type,
            has_default: param.has_default,
        })
    }
}

/// Resolves the kind of a `Positional[...]`/`Keyworded[...]` marker against the native declaration.
fn unwrap_marker(
    param: &RawParameter,
    marked: ParameterKind,
    warnings: &mut Vec<SignatureWarning>,
) -> Result<ParameterKind, SignatureError> {
    let conflicting = match marked {
        ParameterKind::PositionalOnly => NativeKind::KeywordOnly,
        ParameterKind::KeywordOnly => NativeKind::PositionalOnly,
    };

    if param.native_kind == conflicting {
        return Err(SignatureError::ConflictingKind {
            name: param.name.clone(),
            marked,
            declared: param.native_kind,
        });
    }

    if param.native_kind != NativeKind::Ambiguous {
        warnings.push(SignatureWarning::RedundantWrapper {
            name: param.name.clone(),
            kind: marked,
        });
    }

    Ok(marked)
}

fn atomic_type_of(name: &str, annotation: &Annotation) -> Result<AtomicType, SignatureError> {
    match annotation {
        Annotation::Char => Ok(AtomicType::Char),
        Annotation::Word => Ok(AtomicType::Word),
        Annotation::Sentence => Ok(AtomicType::Sentence),
        Annotation::Int => Ok(AtomicType::Int),
        Annotation::Float => Ok(AtomicType::Float),
        Annotation::Flag => Ok(AtomicType::Flag),
        // Nested markers, and anything the engine does not know.
        Annotation::Positional(_) | Annotation::Keyworded(_) | Annotation::Other(_) => {
            Err(SignatureError::UnsupportedAnnotation {
                name: name.to_string(),
                annotation: annotation.to_string(),
            })
        }
    }
}

fn check_order(param: &Parameter, order: &mut OrderState) -> Result<(), SignatureError> {
    if param.is_flag() {
        order.seen_flag = true;
        return Ok(());
    }

    if order.seen_flag {
        return Err(SignatureError::ParameterAfterFlag {
            name: param.name.clone(),
        });
    }

    if param.kind == ParameterKind::PositionalOnly {
        if order.seen_positional_sentence {
            return Err(SignatureError::ParameterAfterSentence {
                name: param.name.clone(),
            });
        }
        if param.atomic_type == AtomicType::Sentence {
            order.seen_positional_sentence = true;
        }
    }

    Ok(())
}

fn validate_name(name: &str) -> Result<(), SignatureError> {
    if PARAMETER_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(SignatureError::InvalidName {
            name: name.to_string(),
        })
    }
}

impl ParameterSchema {
    /// Returns a copy of this schema with parameters renamed, leaving `self` untouched.
    ///
    /// # Errors
    /// `AliasTargetNotFound` if an old name is not in the schema, `InvalidName` or
    /// `DuplicateParameter` if a new name is illegal or collides with another parameter.
    pub fn renamed<O, N>(&self, renames: &[(O, N)]) -> Result<Self, SignatureError>
    where
        O: AsRef<str>,
        N: AsRef<str>,
    {
        let mut parameters = self.parameters.clone();

        for (old, new) in renames {
            let (old, new) = (old.as_ref(), new.as_ref());
            validate_name(new)?;

            let position = self
                .parameters
                .iter()
                .position(|p| p.name == old)
                .ok_or_else(|| SignatureError::AliasTargetNotFound {
                    name: old.to_string(),
                })?;

            if let Some(slot) = parameters.get_mut(position) {
                slot.name = new.to_string();
            }
        }

        let mut names = HashSet::with_capacity(parameters.len());
        for param in &parameters {
            if !names.insert(param.name.as_str()) {
                return Err(SignatureError::DuplicateParameter {
                    name: param.name.clone(),
                });
            }
        }

        Ok(Self { parameters })
    }
}

// MARK: --- UNIT TESTS ---

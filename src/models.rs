// src/models.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// --- ATOMIC TYPES AND RESOLVED PARAMETERS ---
// These are the structures produced once at registration time and then shared,
// read-only, by every parse of a command.

/// The closed set of value kinds a command parameter can declare.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomicType {
    /// Exactly one character.
    Char,
    /// A single token, taken verbatim.
    Word,
    /// Greedy text that runs until the next parameter marker or end of input.
    Sentence,
    /// A base-10 integer.
    Int,
    /// A floating point number.
    Float,
    /// A boolean switch, `true` when `--name` is present.
    Flag,
}

impl AtomicType {
    /// All atomic types, in the order they are documented.
    pub const ALL: [Self; 6] = [
        Self::Char,
        Self::Word,
        Self::Sentence,
        Self::Int,
        Self::Float,
        Self::Flag,
    ];

    /// The name used in usage lines and by `help <type>`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Char => "Char",
            Self::Word => "Word",
            Self::Sentence => "Sentence",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Flag => "Flag",
        }
    }

    /// A one-line description of what the type accepts.
    pub fn description(self) -> &'static str {
        match self {
            Self::Char => "Represents a single character.",
            Self::Word => "Represents a single \"word\": one token, taken as-is.",
            Self::Sentence => {
                "Greedy type that takes all content up until a keyworded argument is shown."
            }
            Self::Int => "A base-10 integer, e.g. `42` or `-7`.",
            Self::Float => "A decimal number, e.g. `3.14` or `-0.5`.",
            Self::Flag => "A boolean switch: `true` when `--name` is given, `false` otherwise.",
        }
    }

    /// Looks up a type by its documented name (case-sensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }
}

impl fmt::Display for AtomicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a parameter is bound: by position or through an explicit `-name` marker.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Filled from the next token(s) in order.
    PositionalOnly,
    /// Filled only after its `-name` marker (or `--name` for a flag).
    KeywordOnly,
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PositionalOnly => f.write_str("positional"),
            Self::KeywordOnly => f.write_str("keyworded"),
        }
    }
}

/// A single resolved parameter of a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// The internal name, after any rename.
    pub name: String,
    /// How the binder fills it.
    pub kind: ParameterKind,
    /// What the token(s) are coerced into.
    pub atomic_type: AtomicType,
    /// Whether the host supplies a value when the parameter is left unbound.
    pub has_default: bool,
}

impl Parameter {
    /// `true` for `Flag` parameters.
    pub fn is_flag(&self) -> bool {
        self.atomic_type == AtomicType::Flag
    }

    /// `true` when the binder may leave this parameter unbound.
    pub fn is_optional(&self) -> bool {
        self.has_default || self.is_flag()
    }
}

/// The ordered, validated parameter list of a command.
///
/// Only `SchemaExtractor::extract` and `ParameterSchema::renamed` construct
/// one, so every instance upholds the flag-suffix and sentence-adjacency rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSchema {
    pub(crate) parameters: Vec<Parameter>,
}

impl ParameterSchema {
    /// The parameters in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// `true` for a command that takes no arguments.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Finds a parameter of any type by its internal name.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Finds a `Flag` parameter by its internal name.
    pub fn flag(&self, name: &str) -> Option<&Parameter> {
        self.get(name).filter(|p| p.is_flag())
    }

    /// All `Flag` parameters, in order.
    pub fn flags(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.is_flag())
    }
}

// --- REGISTRATION INPUT ---
// What a host declares for each parameter before extraction resolves it.

/// The bindingness a parameter was declared with.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    /// Can only be passed by position.
    PositionalOnly,
    /// Can only be passed by name.
    KeywordOnly,
    /// Acceptable either by position or by keyword. Rejected by the extractor
    /// unless an explicit `Positional`/`Keyworded` wrapper settles it.
    Ambiguous,
}

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PositionalOnly => f.write_str("positional-only"),
            Self::KeywordOnly => f.write_str("keyword-only"),
            Self::Ambiguous => f.write_str("positional-or-keyword"),
        }
    }
}

/// A declared type annotation, possibly wrapped in an explicit binding marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Annotation {
    /// See [`AtomicType::Char`].
    Char,
    /// See [`AtomicType::Word`].
    Word,
    /// See [`AtomicType::Sentence`].
    Sentence,
    /// See [`AtomicType::Int`].
    Int,
    /// See [`AtomicType::Float`].
    Float,
    /// See [`AtomicType::Flag`].
    Flag,
    /// Forces positional binding for the inner annotation.
    Positional(Box<Annotation>),
    /// Forces keyword binding for the inner annotation.
    Keyworded(Box<Annotation>),
    /// Any annotation the engine does not understand, kept by name for diagnostics.
    Other(String),
}

impl Annotation {
    /// Wraps `inner` in `Positional[..]`.
    pub fn positional(inner: Self) -> Self {
        Self::Positional(Box::new(inner))
    }

    /// Wraps `inner` in `Keyworded[..]`.
    pub fn keyworded(inner: Self) -> Self {
        Self::Keyworded(Box::new(inner))
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char => f.write_str("Char"),
            Self::Word => f.write_str("Word"),
            Self::Sentence => f.write_str("Sentence"),
            Self::Int => f.write_str("Int"),
            Self::Float => f.write_str("Float"),
            Self::Flag => f.write_str("Flag"),
            Self::Positional(inner) => write!(f, "Positional[{}]", inner),
            Self::Keyworded(inner) => write!(f, "Keyworded[{}]", inner),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// One parameter as declared by the host, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawParameter {
    /// The name as declared.
    pub name: String,
    /// How the parameter was declared, before wrappers are applied.
    pub native_kind: NativeKind,
    /// `None` when the declaration carries no annotation at all.
    pub annotation: Option<Annotation>,
    /// Whether the host supplies a default.
    pub has_default: bool,
}

impl RawParameter {
    /// A parameter with an explicit native kind and annotation.
    pub fn new(name: impl Into<String>, native_kind: NativeKind, annotation: Annotation) -> Self {
        Self {
            name: name.into(),
            native_kind,
            annotation: Some(annotation),
            has_default: false,
        }
    }

    /// A positional-only parameter.
    pub fn positional(name: impl Into<String>, annotation: Annotation) -> Self {
        Self::new(name, NativeKind::PositionalOnly, annotation)
    }

    /// A keyword-only parameter, bound with `-name value`.
    pub fn keyword(name: impl Into<String>, annotation: Annotation) -> Self {
        Self::new(name, NativeKind::KeywordOnly, annotation)
    }

    /// A keyword-only boolean flag, set with `--name`.
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, NativeKind::KeywordOnly, Annotation::Flag)
    }

    /// A parameter declared without any annotation.
    pub fn untyped(name: impl Into<String>, native_kind: NativeKind) -> Self {
        Self {
            name: name.into(),
            native_kind,
            annotation: None,
            has_default: false,
        }
    }

    /// Marks the parameter as having a default value.
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }
}

/// What the extractor does with a parameter that has no annotation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationPolicy {
    /// Missing annotations are a `SignatureError`.
    #[default]
    Strict,
    /// Missing annotations default to `Word` with a warning.
    Lenient,
}

// --- BOUND VALUES ---

/// A coerced argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single character.
    Char(char),
    /// One token.
    Word(String),
    /// Tokens joined with single spaces.
    Sentence(String),
    /// A parsed integer.
    Int(i64),
    /// A parsed float.
    Float(f64),
    /// Whether the flag was given.
    Flag(bool),
}

impl Value {
    /// The textual content of a `Word` or `Sentence`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Word(s) | Self::Sentence(s) => Some(s),
            _ => None,
        }
    }

    /// The character of a `Char`.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// The number held by an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Floats, and integers widened to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// The state of a `Flag`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{}", c),
            Self::Word(s) | Self::Sentence(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Flag(b) => write!(f, "{}", b),
        }
    }
}

/// The result of a successful bind, ready to hand to a command handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    /// Positional values, in parameter order.
    pub positional: Vec<Value>,
    /// Keyword and flag values by internal name. Defaulted parameters that were
    /// not given are absent.
    pub keyword: HashMap<String, Value>,
}

impl BoundArguments {
    /// The positional value at `index`.
    pub fn positional(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// The keyword value bound to `name`.
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keyword.get(name)
    }

    /// The state of a flag. Flags that were never bound read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.keyword
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

// --- CONFIGURATION ---

/// Represents the deserialized `config.toml` of the engine.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// How untyped parameters are treated at registration.
    pub annotation_policy: AnnotationPolicy,
    /// Text written before each line is read.
    pub prompt: String,
    /// A line whose first token is this ends the session.
    pub stop_word: String,
    /// Whether diagnostics are coloured.
    pub color: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            annotation_policy: AnnotationPolicy::Strict,
            prompt: crate::constants::DEFAULT_PROMPT.to_string(),
            stop_word: crate::constants::DEFAULT_STOP_WORD.to_string(),
            color: true,
        }
    }
}

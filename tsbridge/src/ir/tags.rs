//! Tag metadata IR.
//!
//! Every field carries one [`TagValue`] per metadata [`Namespace`]. The
//! namespaces are authored independently (a serialization name, a form
//! binding name, validator rules, ...) and are reconciled by the
//! [`FieldResolver`](crate::generator::FieldResolver) according to the active
//! generation context.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Tag values of one field, keyed by namespace in declaration order.
pub type TagSet = IndexMap<Namespace, TagValue>;

/// A metadata channel attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Serialization name (`json:"..."`)
    Json,

    /// Form binding name (`form:"..."`)
    Form,

    /// Route parameter name (`param:"..."`)
    Param,

    /// Query string name (`query:"..."`)
    Query,

    /// URI binding name (`uri:"..."`)
    Uri,

    /// Header binding name (`header:"..."`)
    Header,

    /// Binding-time validation rules (`binding:"..."`)
    Binding,

    /// Pure validation rules (`validate:"..."`)
    Validate,
}

impl Namespace {
    /// All namespaces, in declaration order.
    pub const ALL: [Namespace; 8] = [
        Namespace::Json,
        Namespace::Form,
        Namespace::Param,
        Namespace::Query,
        Namespace::Uri,
        Namespace::Header,
        Namespace::Binding,
        Namespace::Validate,
    ];

    /// The tag key used in raw struct tags.
    pub fn key(&self) -> &'static str {
        match self {
            Namespace::Json => "json",
            Namespace::Form => "form",
            Namespace::Param => "param",
            Namespace::Query => "query",
            Namespace::Uri => "uri",
            Namespace::Header => "header",
            Namespace::Binding => "binding",
            Namespace::Validate => "validate",
        }
    }

    /// Look up a namespace by its raw tag key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| ns.key() == key)
    }

    /// Whether this namespace carries validator rules rather than a name.
    pub fn is_validation(&self) -> bool {
        matches!(self, Namespace::Binding | Namespace::Validate)
    }

    /// Rank used to order validation doc blocks.
    ///
    /// Binding-style rules come before pure validation rules; any other
    /// namespace follows in declaration order.
    pub(crate) fn doc_rank(&self) -> usize {
        match self {
            Namespace::Binding => 0,
            Namespace::Validate => 1,
            other => 2 + *other as usize,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when parsing an unknown namespace key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tag namespace `{0}`")]
pub struct UnknownNamespace(pub String);

impl FromStr for Namespace {
    type Err = UnknownNamespace;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| UnknownNamespace(s.to_string()))
    }
}

/// Name override carried by a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", content = "name", rename_all = "lowercase")]
pub enum NameOverride {
    /// Emit the field under this name
    Rename(String),

    /// Exclude the field from contexts governed by this namespace
    Drop,
}

/// A single validator rule: `min=1`, `required`, `email`, ...
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidatorRule {
    /// Rule name
    pub name: String,

    /// Rule argument, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
}

impl ValidatorRule {
    /// Create a rule without an argument.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg: None,
        }
    }

    /// Create a rule with an argument.
    pub fn with_arg(name: impl Into<String>, arg: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg: Some(arg.into()),
        }
    }
}

impl fmt::Display for ValidatorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arg {
            Some(arg) => write!(f, "{}={}", self.name, arg),
            None => f.write_str(&self.name),
        }
    }
}

/// Parsed content of one namespace on one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagValue {
    /// Name override, or the drop sentinel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<NameOverride>,

    /// Field may be omitted when empty
    pub omit_empty: bool,

    /// Field must be present
    pub required: bool,

    /// Validator rules in declared order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<ValidatorRule>,
}

impl TagValue {
    /// Create an empty tag value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the field name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = Some(NameOverride::Rename(name.into()));
        self
    }

    /// Apply the drop sentinel.
    pub fn dropped(mut self) -> Self {
        self.name = Some(NameOverride::Drop);
        self
    }

    /// Set the omit-empty flag.
    pub fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }

    /// Set the required flag.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Append a validator rule.
    pub fn with_validator(mut self, rule: ValidatorRule) -> Self {
        self.validators.push(rule);
        self
    }

    /// Whether this value says anything about presence.
    pub fn has_requiredness_signal(&self) -> bool {
        self.required || self.omit_empty
    }
}

/// A namespace whose raw content failed its grammar.
///
/// The field resolves as if the namespace were absent; the front-end keeps
/// the record so it can be surfaced as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedTag {
    /// Raw tag key (may not be a known namespace)
    pub key: String,

    /// Raw value, or the unparsed remainder of the tag
    pub raw: String,

    /// Why the grammar rejected it
    pub reason: String,
}

impl MalformedTag {
    /// Create a malformed tag record.
    pub fn new(key: impl Into<String>, raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            raw: raw.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MalformedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}:{}`: {}", self.key, self.raw, self.reason)
    }
}

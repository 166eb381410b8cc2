//! Source type shapes.
//!
//! [`SourceType`] describes a field or alias target the way the front-end
//! sees it in the host language. It is target-agnostic: mapping to
//! declaration expressions happens in
//! [`TypeMapper`](crate::generator::TypeMapper).

use serde::{Deserialize, Serialize};

use super::decl::KeyKind;
use super::graph::DefId;

/// Shape of a host-language type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum SourceType {
    // ==========================================================================
    // Leaves
    // ==========================================================================
    /// Boolean
    Bool,

    /// Any integer or floating point number
    Number,

    /// Text string
    Text,

    /// Point in time, serialized as RFC 3339 text
    Timestamp,

    /// Raw bytes, serialized as text
    Bytes,

    // ==========================================================================
    // Composites
    // ==========================================================================
    /// Pointer; the pointee may be absent
    Pointer(Box<SourceType>),

    /// Ordered sequence (slice, array)
    Sequence(Box<SourceType>),

    /// Associative mapping
    Mapping {
        key: MapKey,
        value: Box<SourceType>,
    },

    // ==========================================================================
    // References
    // ==========================================================================
    /// Reference to a struct or alias definition of the graph
    Named(TypeRef),

    /// Host type the front-end cannot describe further
    Unknown(String),
}

impl SourceType {
    /// Create a pointer to `inner`.
    pub fn pointer(inner: SourceType) -> Self {
        SourceType::Pointer(Box::new(inner))
    }

    /// Create a sequence of `inner`.
    pub fn sequence(inner: SourceType) -> Self {
        SourceType::Sequence(Box::new(inner))
    }

    /// Create a mapping from `key` to `value`.
    pub fn mapping(key: MapKey, value: SourceType) -> Self {
        SourceType::Mapping {
            key,
            value: Box::new(value),
        }
    }

    /// Create an unbound reference, resolved by name against the graph.
    pub fn named(name: impl Into<String>) -> Self {
        SourceType::Named(TypeRef::by_name(name))
    }

    /// Create a reference bound to a specific definition.
    pub fn named_def(name: impl Into<String>, def: DefId) -> Self {
        SourceType::Named(TypeRef::bound(name, def))
    }

    /// Create an opaque host type.
    pub fn unknown(label: impl Into<String>) -> Self {
        SourceType::Unknown(label.into())
    }

    /// Whether the outermost layer is a pointer.
    pub fn is_pointer(&self) -> bool {
        matches!(self, SourceType::Pointer(_))
    }
}

/// Key of a [`SourceType::Mapping`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label")]
pub enum MapKey {
    /// Integer keys
    Integer,

    /// Text keys
    Text,

    /// Any other key type, described by its host-language label
    Unsupported(String),
}

impl MapKey {
    /// The target key kind, if the key is representable.
    pub fn kind(&self) -> Option<KeyKind> {
        match self {
            MapKey::Integer => Some(KeyKind::Integer),
            MapKey::Text => Some(KeyKind::Text),
            MapKey::Unsupported(_) => None,
        }
    }
}

/// Reference from a [`SourceType::Named`] to a definition.
///
/// A bound reference names its definition directly; an unbound one is
/// resolved by name and only succeeds when the name is unique in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Name as written in the host language
    pub name: String,

    /// Definition bound by the front-end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub def: Option<DefId>,
}

impl TypeRef {
    /// Create an unbound reference.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            def: None,
        }
    }

    /// Create a reference bound to `def`.
    pub fn bound(name: impl Into<String>, def: DefId) -> Self {
        Self {
            name: name.into(),
            def: Some(def),
        }
    }
}

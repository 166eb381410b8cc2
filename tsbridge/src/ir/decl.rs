//! Declaration model.
//!
//! Target-neutral declarations produced by the emitter and consumed by
//! renderers. Nullability lives on fields and aliases, never inside a
//! [`TypeExpr`].

use serde::{Deserialize, Serialize};

// =============================================================================
// Type expressions
// =============================================================================

/// Primitive target kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Bool,
    Number,
    String,
    Any,
}

/// Format marker attached to a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// RFC 3339 timestamp text
    Rfc3339,
}

/// Key kind of a [`TypeExpr::MapOf`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    Integer,
    Text,
}

/// Target type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum TypeExpr {
    /// Primitive with an optional format marker
    Primitive {
        kind: PrimitiveKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<Format>,
    },

    /// Array of the inner expression
    ArrayOf(Box<TypeExpr>),

    /// Map from a key kind to the inner expression
    MapOf { key: KeyKind, value: Box<TypeExpr> },

    /// Reference to another declaration by name
    Reference(String),

    /// Placeholder name standing in for an unrepresentable type
    Opaque(String),
}

impl TypeExpr {
    /// Create a primitive without a format.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeExpr::Primitive { kind, format: None }
    }

    /// `boolean`
    pub fn bool() -> Self {
        Self::primitive(PrimitiveKind::Bool)
    }

    /// `number`
    pub fn number() -> Self {
        Self::primitive(PrimitiveKind::Number)
    }

    /// `string`
    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    /// `any`
    pub fn any() -> Self {
        Self::primitive(PrimitiveKind::Any)
    }

    /// RFC 3339 timestamp string.
    pub fn timestamp() -> Self {
        TypeExpr::Primitive {
            kind: PrimitiveKind::String,
            format: Some(Format::Rfc3339),
        }
    }

    /// Array of `inner`.
    pub fn array(inner: TypeExpr) -> Self {
        TypeExpr::ArrayOf(Box::new(inner))
    }

    /// Map from `key` to `value`.
    pub fn map(key: KeyKind, value: TypeExpr) -> Self {
        TypeExpr::MapOf {
            key,
            value: Box::new(value),
        }
    }

    /// Reference to a declaration.
    pub fn reference(name: impl Into<String>) -> Self {
        TypeExpr::Reference(name.into())
    }

    /// Opaque placeholder.
    pub fn opaque(name: impl Into<String>) -> Self {
        TypeExpr::Opaque(name.into())
    }
}

// =============================================================================
// Declarations
// =============================================================================

/// A field after tag reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedField {
    pub name: String,
    pub type_expr: TypeExpr,
    pub optional: bool,
    pub nullable: bool,
    pub exported: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc_lines: Vec<String>,
}

/// Interface (record) declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc: Vec<String>,
    pub exported: bool,
    pub fields: Vec<ResolvedField>,
}

/// Alias declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc: Vec<String>,
    pub exported: bool,
    pub target: TypeExpr,
    pub nullable: bool,

    /// Synthesized for an unresolved reference or unsupported type
    #[serde(default)]
    pub placeholder: bool,
}

impl AliasDecl {
    /// Trivial alias standing in for an opaque name.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: Vec::new(),
            exported: false,
            target: TypeExpr::any(),
            nullable: false,
            placeholder: true,
        }
    }
}

/// One emitted declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Declaration {
    Interface(InterfaceDecl),
    Alias(AliasDecl),
}

/// First structural difference between two declarations of the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatch {
    /// Field where the shapes diverge, if the difference is field-level
    pub field: Option<String>,

    /// Human-readable description
    pub detail: String,
}

impl ShapeMismatch {
    fn declaration(detail: impl Into<String>) -> Self {
        Self {
            field: None,
            detail: detail.into(),
        }
    }

    fn field(field: &str, detail: impl Into<String>) -> Self {
        Self {
            field: Some(field.to_string()),
            detail: detail.into(),
        }
    }
}

impl Declaration {
    /// Declaration name.
    pub fn name(&self) -> &str {
        match self {
            Declaration::Interface(i) => &i.name,
            Declaration::Alias(a) => &a.name,
        }
    }

    /// Doc lines.
    pub fn doc(&self) -> &[String] {
        match self {
            Declaration::Interface(i) => &i.doc,
            Declaration::Alias(a) => &a.doc,
        }
    }

    /// Whether this is a synthesized placeholder alias.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Declaration::Alias(a) if a.placeholder)
    }

    /// Compare structural shapes, ignoring documentation.
    ///
    /// Returns the first difference found, or `None` when both declarations
    /// describe the same shape.
    pub fn shape_mismatch(&self, other: &Declaration) -> Option<ShapeMismatch> {
        match (self, other) {
            (Declaration::Interface(a), Declaration::Interface(b)) => interface_mismatch(a, b),
            (Declaration::Alias(a), Declaration::Alias(b)) => alias_mismatch(a, b),
            (Declaration::Interface(_), Declaration::Alias(_)) => {
                Some(ShapeMismatch::declaration("interface in one group, alias in the other"))
            }
            (Declaration::Alias(_), Declaration::Interface(_)) => {
                Some(ShapeMismatch::declaration("alias in one group, interface in the other"))
            }
        }
    }
}

fn interface_mismatch(a: &InterfaceDecl, b: &InterfaceDecl) -> Option<ShapeMismatch> {
    if a.exported != b.exported {
        return Some(ShapeMismatch::declaration(format!(
            "exported {} vs {}",
            a.exported, b.exported
        )));
    }

    for (left, right) in a.fields.iter().zip(&b.fields) {
        if left.name != right.name {
            return Some(ShapeMismatch::field(
                &left.name,
                format!(
                    "field `{}` vs `{}` at the same position",
                    left.name, right.name
                ),
            ));
        }
        if left.type_expr != right.type_expr {
            return Some(ShapeMismatch::field(
                &left.name,
                format!("type {:?} vs {:?}", left.type_expr, right.type_expr),
            ));
        }
        if left.optional != right.optional {
            return Some(ShapeMismatch::field(
                &left.name,
                format!("optional {} vs {}", left.optional, right.optional),
            ));
        }
        if left.nullable != right.nullable {
            return Some(ShapeMismatch::field(
                &left.name,
                format!("nullable {} vs {}", left.nullable, right.nullable),
            ));
        }
        if left.exported != right.exported {
            return Some(ShapeMismatch::field(
                &left.name,
                format!("exported {} vs {}", left.exported, right.exported),
            ));
        }
    }

    match a.fields.len().cmp(&b.fields.len()) {
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Greater => {
            let extra = &a.fields[b.fields.len()].name;
            Some(ShapeMismatch::field(extra, format!("field `{extra}` missing")))
        }
        std::cmp::Ordering::Less => {
            let extra = &b.fields[a.fields.len()].name;
            Some(ShapeMismatch::field(extra, format!("unexpected field `{extra}`")))
        }
    }
}

fn alias_mismatch(a: &AliasDecl, b: &AliasDecl) -> Option<ShapeMismatch> {
    if a.target != b.target {
        return Some(ShapeMismatch::declaration(format!(
            "target {:?} vs {:?}",
            a.target, b.target
        )));
    }
    if a.nullable != b.nullable {
        return Some(ShapeMismatch::declaration(format!(
            "nullable {} vs {}",
            a.nullable, b.nullable
        )));
    }
    if a.exported != b.exported || a.placeholder != b.placeholder {
        return Some(ShapeMismatch::declaration("alias flags differ"));
    }
    None
}

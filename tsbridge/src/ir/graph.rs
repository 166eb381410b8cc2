//! Type graph IR.
//!
//! The graph is an arena of [`TypeDef`]s addressed by [`DefId`]. Identity is
//! the defining position, not the name: two definitions sharing a name stay
//! distinct entities and are never collapsed here. References between
//! definitions go through [`TypeRef`] so cyclic graphs need no ownership
//! tricks.

use serde::{Deserialize, Serialize};

use super::tags::{MalformedTag, Namespace, TagSet, TagValue};
use super::types::{SourceType, TypeRef};
use crate::parser::parse_struct_tag;

/// Stable identity of a definition inside a [`TypeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefId(usize);

impl DefId {
    /// Create an id from an arena index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Arena index of this id.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Read-only graph of struct and alias definitions produced by a front-end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeGraph {
    definitions: Vec<TypeDef>,
}

/// Outcome of resolving a [`TypeRef`] against the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefResolution {
    /// Exactly one definition matches
    Resolved(DefId),

    /// No definition matches
    Missing,

    /// An unbound reference matches several definitions
    Ambiguous(Vec<DefId>),
}

impl TypeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserialize a graph from the front-end's JSON hand-off format.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Append a definition and return its id.
    pub fn push(&mut self, def: impl Into<TypeDef>) -> DefId {
        let id = DefId::new(self.definitions.len());
        self.definitions.push(def.into());
        id
    }

    /// Get a definition by id.
    pub fn get(&self, id: DefId) -> Option<&TypeDef> {
        self.definitions.get(id.index())
    }

    /// Iterate definitions in defining order.
    pub fn iter(&self) -> impl Iterator<Item = (DefId, &TypeDef)> {
        self.definitions
            .iter()
            .enumerate()
            .map(|(index, def)| (DefId::new(index), def))
    }

    /// Ids of every definition named `name`, in defining order.
    pub fn find_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = DefId> + 'a {
        self.iter()
            .filter(move |(_, def)| def.name() == name)
            .map(|(id, _)| id)
    }

    /// Resolve a reference.
    pub fn resolve(&self, reference: &TypeRef) -> RefResolution {
        if let Some(def) = reference.def {
            return match self.get(def) {
                Some(_) => RefResolution::Resolved(def),
                None => RefResolution::Missing,
            };
        }

        let mut matches: Vec<DefId> = self.find_by_name(&reference.name).collect();
        match matches.len() {
            0 => RefResolution::Missing,
            1 => RefResolution::Resolved(matches.remove(0)),
            _ => RefResolution::Ambiguous(matches),
        }
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the graph has no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// A named definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TypeDef {
    /// Record type with named fields
    Struct(StructDef),

    /// Named alias of another type shape
    Alias(AliasDef),
}

impl TypeDef {
    /// Definition name.
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Struct(s) => &s.name,
            TypeDef::Alias(a) => &a.name,
        }
    }

    /// Whether the host language exports this definition.
    pub fn exported(&self) -> bool {
        match self {
            TypeDef::Struct(s) => s.exported,
            TypeDef::Alias(a) => a.exported,
        }
    }
}

impl From<StructDef> for TypeDef {
    fn from(def: StructDef) -> Self {
        TypeDef::Struct(def)
    }
}

impl From<AliasDef> for TypeDef {
    fn from(def: AliasDef) -> Self {
        TypeDef::Alias(def)
    }
}

fn default_exported() -> bool {
    true
}

/// Record type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    /// Type name
    pub name: String,

    /// Whether the host language exports the type
    #[serde(default = "default_exported")]
    pub exported: bool,

    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDef>,

    /// Doc comment text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// Endpoints that use this type, from route annotations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<EndpointUsage>,
}

impl StructDef {
    /// Create an exported struct without fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exported: true,
            fields: Vec::new(),
            doc: None,
            endpoints: Vec::new(),
        }
    }

    /// Append a field.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the doc comment.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set the exported flag.
    pub fn with_exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    /// Record an endpoint usage.
    pub fn with_endpoint(mut self, endpoint: EndpointUsage) -> Self {
        self.endpoints.push(endpoint);
        self
    }
}

/// Alias definition (`type Status string`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasDef {
    /// Alias name
    pub name: String,

    /// Whether the host language exports the alias
    #[serde(default = "default_exported")]
    pub exported: bool,

    /// Aliased type shape
    pub target: SourceType,

    /// Doc comment text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl AliasDef {
    /// Create an exported alias.
    pub fn new(name: impl Into<String>, target: SourceType) -> Self {
        Self {
            name: name.into(),
            exported: true,
            target,
            doc: None,
        }
    }

    /// Set the doc comment.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set the exported flag.
    pub fn with_exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }
}

/// How an endpoint uses a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointRole {
    /// Request body
    Request,

    /// Response payload
    Response,
}

impl EndpointRole {
    /// Label used in documentation.
    pub fn label(&self) -> &'static str {
        match self {
            EndpointRole::Request => "Request",
            EndpointRole::Response => "Response",
        }
    }
}

/// One use of a type by an HTTP endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointUsage {
    /// HTTP method, as annotated (`get`, `POST`, ...)
    pub method: String,

    /// Route path
    pub path: String,

    /// Request or response
    pub role: EndpointRole,
}

impl EndpointUsage {
    /// Create an endpoint usage.
    pub fn new(method: impl Into<String>, path: impl Into<String>, role: EndpointRole) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            role,
        }
    }
}

/// Field of a [`StructDef`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Host-language identifier
    pub identifier: String,

    /// Field type
    pub source_type: SourceType,

    /// Parsed tag values by namespace
    #[serde(default, skip_serializing_if = "TagSet::is_empty")]
    pub tags: TagSet,

    /// Namespaces whose content failed their grammar
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub malformed_tags: Vec<MalformedTag>,

    /// Doc comment text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// Whether the host language exports the field
    #[serde(default = "default_exported")]
    pub exported: bool,
}

impl FieldDef {
    /// Create an exported field without tags.
    pub fn new(identifier: impl Into<String>, source_type: SourceType) -> Self {
        Self {
            identifier: identifier.into(),
            source_type,
            tags: TagSet::new(),
            malformed_tags: Vec::new(),
            doc: None,
            exported: true,
        }
    }

    /// Set the tag value of one namespace.
    pub fn with_tag(mut self, namespace: Namespace, value: TagValue) -> Self {
        self.tags.insert(namespace, value);
        self
    }

    /// Parse a raw struct tag (`json:"id" binding:"required"`) and merge it
    /// into the field's tags.
    ///
    /// Namespaces already set on the field win over the parsed ones.
    pub fn with_struct_tag(mut self, raw: &str) -> Self {
        let parsed = parse_struct_tag(raw);
        for (namespace, value) in parsed.values {
            self.tags.entry(namespace).or_insert(value);
        }
        self.malformed_tags.extend(parsed.malformed);
        self
    }

    /// Set the doc comment.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set the exported flag.
    pub fn with_exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }
}

/// Split a doc comment into trimmed lines, dropping leading and trailing
/// blank lines.
pub(crate) fn doc_lines(doc: Option<&str>) -> Vec<String> {
    let Some(doc) = doc else {
        return Vec::new();
    };
    let lines: Vec<String> = doc.trim().lines().map(|l| l.trim().to_string()).collect();
    if lines.len() == 1 && lines[0].is_empty() {
        Vec::new()
    } else {
        lines
    }
}

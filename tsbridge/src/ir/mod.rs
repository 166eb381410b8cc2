//! Intermediate Representation (IR) module.
//!
//! This module defines the passive data structures exchanged with the
//! front-end (the type graph and its tag metadata) and the declaration model
//! handed to renderers. None of these types carry behavior beyond
//! construction helpers and structural comparison.

pub mod decl;
pub mod graph;
pub mod tags;
pub mod types;

pub use decl::{
    AliasDecl, Declaration, Format, InterfaceDecl, KeyKind, PrimitiveKind, ResolvedField,
    ShapeMismatch, TypeExpr,
};
pub use graph::{
    AliasDef, DefId, EndpointRole, EndpointUsage, FieldDef, RefResolution, StructDef, TypeDef,
    TypeGraph,
};
pub use tags::{MalformedTag, NameOverride, Namespace, TagSet, TagValue, ValidatorRule};
pub use types::{MapKey, SourceType, TypeRef};

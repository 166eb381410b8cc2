//! Declaration generation.
//!
//! This module turns the type graph into declarations: the field resolver
//! and type mapper work per field, the emitter per group, and the registry
//! merges the groups of a run.

pub mod context;
pub mod emitter;
pub mod registry;
pub mod resolver;
pub mod type_mapper;

pub use context::{
    GenerationContext, MapKeyPolicy, NullabilityMode, RequiredOverlap, UnresolvedPolicy,
};
pub use emitter::{DeclarationEmitter, GroupOutput};
pub use registry::{DeclarationRegistry, MergeOutcome};
pub use resolver::{default_field_name, DropReason, FieldResolver, Resolution};
pub use type_mapper::{map_placeholder_name, Dependency, MapIssue, MapTrace, TypeMapper};

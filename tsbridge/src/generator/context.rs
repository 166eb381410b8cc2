//! Generation context.
//!
//! A context decides which tag namespaces govern a field and how absence is
//! expressed. Each group of a run resolves its fields under one context.

use serde::{Deserialize, Serialize};

use crate::ir::Namespace;

/// How a field's absence is expressed in the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NullabilityMode {
    /// `nullable` mirrors `optional`
    LegacyOptionalOnly,

    /// `optional` and `nullable` are computed independently; pointers are
    /// nullable
    #[default]
    OptionalAndNullable,
}

/// Which `required` signals count when namespaces disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequiredOverlap {
    /// A `required` in any namespace of the context makes the field required
    #[default]
    MostRestrictive,

    /// Only the governing namespace's `required` counts
    GoverningNamespace,
}

/// What to do with a map whose key type has no target representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapKeyPolicy {
    /// Replace the whole map with a `MapBy<Key>` placeholder and warn
    #[default]
    Degrade,

    /// Abort the run
    Strict,
}

/// What to do with a reference that matches no single definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedPolicy {
    /// Emit a placeholder alias and warn
    #[default]
    Placeholder,

    /// Abort the run
    Strict,
}

/// Parameters for resolving fields within one generation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationContext {
    /// Namespaces consulted, highest priority first
    pub namespace_priority: Vec<Namespace>,

    /// Nullability rule
    pub nullability_mode: NullabilityMode,

    /// Requiredness rule across namespaces
    pub required_overlap: RequiredOverlap,

    /// Whether unexported fields and definitions are emitted
    pub include_unexported: bool,
}

impl Default for GenerationContext {
    fn default() -> Self {
        Self {
            namespace_priority: Self::DEFAULT_PRIORITY.to_vec(),
            nullability_mode: NullabilityMode::default(),
            required_overlap: RequiredOverlap::default(),
            include_unexported: true,
        }
    }
}

impl GenerationContext {
    /// Priority used when nothing else is configured.
    pub const DEFAULT_PRIORITY: [Namespace; 8] = [
        Namespace::Json,
        Namespace::Form,
        Namespace::Param,
        Namespace::Query,
        Namespace::Uri,
        Namespace::Header,
        Namespace::Binding,
        Namespace::Validate,
    ];

    /// Context for request and response bodies.
    pub fn request_bodies() -> Self {
        Self::default().with_namespaces(vec![
            Namespace::Json,
            Namespace::Form,
            Namespace::Binding,
            Namespace::Validate,
        ])
    }

    /// Context for route and query parameters.
    pub fn route_params() -> Self {
        Self::default().with_namespaces(vec![
            Namespace::Param,
            Namespace::Uri,
            Namespace::Query,
            Namespace::Binding,
            Namespace::Validate,
        ])
    }

    /// Replace the namespace priority.
    pub fn with_namespaces(mut self, namespaces: Vec<Namespace>) -> Self {
        self.namespace_priority = namespaces;
        self
    }

    /// Set the nullability mode.
    pub fn with_nullability(mut self, mode: NullabilityMode) -> Self {
        self.nullability_mode = mode;
        self
    }

    /// Set the requiredness rule.
    pub fn with_required_overlap(mut self, overlap: RequiredOverlap) -> Self {
        self.required_overlap = overlap;
        self
    }

    /// Set whether unexported items are emitted.
    pub fn with_include_unexported(mut self, include: bool) -> Self {
        self.include_unexported = include;
        self
    }
}

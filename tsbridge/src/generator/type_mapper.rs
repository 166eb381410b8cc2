//! Source to target type mappings.
//!
//! This module provides the [`TypeMapper`], a total structural translation
//! from [`SourceType`] into [`TypeExpr`]. Mapping never fails: anything the
//! target cannot express becomes an opaque placeholder, and the problem is
//! recorded in a [`MapTrace`] for the caller to judge.
//!
//! # Type Mappings
//!
//! | Source type | Target expression |
//! |-------------|-------------------|
//! | `Bool` | `boolean` |
//! | `Number` | `number` |
//! | `Text`, `Bytes` | `string` |
//! | `Timestamp` | `string` (RFC 3339) |
//! | `Pointer(T)` | `T` (nullability lives on the field) |
//! | `Sequence(T)` | `T[]` |
//! | `Mapping(K, V)` | `Record<K, V>` |
//! | `Named(ref)` | reference by name, or placeholder |
//! | `Unknown(label)` | placeholder `label`, or reference when a definition has that name |

use crate::ir::{DefId, MapKey, RefResolution, SourceType, TypeExpr, TypeGraph, TypeRef};

/// Something a mapped expression depends on, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dependency {
    /// A definition of the graph
    Definition(DefId),

    /// A synthesized placeholder alias
    Placeholder(String),
}

/// A problem met while mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapIssue {
    /// No definition matches the reference
    UnresolvedReference { reference: String },

    /// Several definitions share the referenced name; all are emitted
    AmbiguousReference {
        reference: String,
        candidates: usize,
    },

    /// An unknown type's label names a definition of the graph
    UnknownMatchesDefinition { label: String },

    /// The target is unexported and unexported definitions are excluded
    HiddenReference { reference: String },

    /// The map key type has no target representation
    UnsupportedMapKey { key: String, placeholder: String },
}

/// Dependencies and issues collected while mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapTrace {
    pub deps: Vec<Dependency>,
    pub issues: Vec<MapIssue>,
}

impl MapTrace {
    pub fn new() -> Self {
        Self::default()
    }

    fn placeholder(&mut self, name: &str) -> TypeExpr {
        self.deps.push(Dependency::Placeholder(name.to_string()));
        TypeExpr::opaque(name)
    }
}

/// Maps source types to target expressions.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'g> {
    graph: &'g TypeGraph,
    include_unexported: bool,
}

impl<'g> TypeMapper<'g> {
    /// Create a mapper over `graph`.
    pub fn new(graph: &'g TypeGraph, include_unexported: bool) -> Self {
        Self {
            graph,
            include_unexported,
        }
    }

    /// Map a source type, recording dependencies and issues in `trace`.
    pub fn map(&self, ty: &SourceType, trace: &mut MapTrace) -> TypeExpr {
        match ty {
            SourceType::Bool => TypeExpr::bool(),
            SourceType::Number => TypeExpr::number(),
            SourceType::Text | SourceType::Bytes => TypeExpr::string(),
            SourceType::Timestamp => TypeExpr::timestamp(),
            SourceType::Pointer(inner) => self.map(inner, trace),
            SourceType::Sequence(inner) => TypeExpr::array(self.map(inner, trace)),
            SourceType::Mapping { key, value } => self.map_mapping(key, value, trace),
            SourceType::Named(reference) => self.map_named(reference, trace),
            SourceType::Unknown(label) => self.map_unknown(label, trace),
        }
    }

    fn map_mapping(&self, key: &MapKey, value: &SourceType, trace: &mut MapTrace) -> TypeExpr {
        match key.kind() {
            Some(kind) => TypeExpr::map(kind, self.map(value, trace)),
            None => {
                let label = match key {
                    MapKey::Unsupported(label) => label.as_str(),
                    _ => "",
                };
                let placeholder = map_placeholder_name(label);
                trace.issues.push(MapIssue::UnsupportedMapKey {
                    key: label.to_string(),
                    placeholder: placeholder.clone(),
                });
                trace.placeholder(&placeholder)
            }
        }
    }

    fn map_named(&self, reference: &TypeRef, trace: &mut MapTrace) -> TypeExpr {
        match self.graph.resolve(reference) {
            RefResolution::Resolved(id) => {
                let Some(def) = self.graph.get(id) else {
                    return self.unresolved(reference, trace);
                };
                if !self.is_visible(id) {
                    return self.hidden(reference, trace);
                }
                trace.deps.push(Dependency::Definition(id));
                TypeExpr::reference(def.name())
            }
            RefResolution::Ambiguous(candidates) => {
                let visible: Vec<DefId> = candidates
                    .iter()
                    .copied()
                    .filter(|id| self.is_visible(*id))
                    .collect();
                if visible.is_empty() {
                    return self.hidden(reference, trace);
                }

                // Every candidate is emitted under the shared name; the
                // registry rejects candidates whose shapes differ.
                trace.issues.push(MapIssue::AmbiguousReference {
                    reference: reference.name.clone(),
                    candidates: candidates.len(),
                });
                let deps = visible.into_iter().map(Dependency::Definition);
                trace.deps.extend(deps);
                TypeExpr::reference(reference.name.as_str())
            }
            RefResolution::Missing => self.unresolved(reference, trace),
        }
    }

    /// An unknown type named like a definition maps to a reference to it.
    fn map_unknown(&self, label: &str, trace: &mut MapTrace) -> TypeExpr {
        if self.graph.find_by_name(label).next().is_none() {
            return trace.placeholder(label);
        }
        trace.issues.push(MapIssue::UnknownMatchesDefinition {
            label: label.to_string(),
        });
        self.map_named(&TypeRef::by_name(label), trace)
    }

    fn is_visible(&self, id: DefId) -> bool {
        self.include_unexported || self.graph.get(id).is_some_and(|def| def.exported())
    }

    fn hidden(&self, reference: &TypeRef, trace: &mut MapTrace) -> TypeExpr {
        trace.issues.push(MapIssue::HiddenReference {
            reference: reference.name.clone(),
        });
        trace.placeholder(&reference.name)
    }

    fn unresolved(&self, reference: &TypeRef, trace: &mut MapTrace) -> TypeExpr {
        trace.issues.push(MapIssue::UnresolvedReference {
            reference: reference.name.clone(),
        });
        trace.placeholder(&reference.name)
    }
}

/// Placeholder name for a mapping whose key type is unsupported.
///
/// Keeps the alphanumeric characters of the key label and capitalizes the
/// first one: `geo.Point` becomes `MapByGeoPoint`.
pub fn map_placeholder_name(label: &str) -> String {
    let mut sanitized: String = label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if sanitized.is_empty() {
        sanitized.push_str("Unknown");
    }
    let mut chars = sanitized.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    };
    format!("MapBy{capitalized}")
}

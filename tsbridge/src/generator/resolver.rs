//! Field resolution.
//!
//! Reconciles the independently authored tag namespaces of one field into a
//! single [`ResolvedField`] for a given [`GenerationContext`]:
//!
//! - the **name** comes from the first namespace in priority order carrying a
//!   name override, falling back to the snake_case identifier;
//! - **optional** is decided by the governing namespace, the first one in
//!   priority order carrying `required` or `omitempty`;
//! - **nullable** follows the context's [`NullabilityMode`];
//! - **doc lines** append the validator rules of every validation namespace.

use convert_case::{Case, Casing};

use super::context::{GenerationContext, NullabilityMode, RequiredOverlap};
use super::type_mapper::{MapTrace, TypeMapper};
use crate::diagnostics::{DiagnosticKind, DiagnosticSink};
use crate::ir::graph::doc_lines;
use crate::ir::{FieldDef, NameOverride, Namespace, ResolvedField, TagValue};

/// Outcome of resolving one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The field is emitted
    Field(ResolvedField),

    /// The field is excluded from this context
    Dropped(DropReason),
}

/// Why a field was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The `-` sentinel of this namespace
    Sentinel(Namespace),

    /// The field is unexported and unexported items are excluded
    Unexported,
}

/// Resolves fields under one generation context.
#[derive(Debug, Clone, Copy)]
pub struct FieldResolver<'a> {
    ctx: &'a GenerationContext,
    mapper: TypeMapper<'a>,
}

impl<'a> FieldResolver<'a> {
    /// Create a resolver.
    pub fn new(ctx: &'a GenerationContext, mapper: TypeMapper<'a>) -> Self {
        Self { ctx, mapper }
    }

    /// Resolve `field` of the definition `owner`.
    ///
    /// Type dependencies and mapping issues go to `trace`; malformed tags are
    /// reported to `diagnostics`.
    pub fn resolve(
        &self,
        owner: &str,
        field: &FieldDef,
        trace: &mut MapTrace,
        diagnostics: &mut DiagnosticSink,
    ) -> Resolution {
        for malformed in &field.malformed_tags {
            diagnostics.push(
                DiagnosticKind::MalformedTag,
                format!("{owner}.{}", field.identifier),
                malformed.to_string(),
            );
        }

        if !field.exported && !self.ctx.include_unexported {
            return Resolution::Dropped(DropReason::Unexported);
        }

        let name = match self.name_override(field) {
            Some((namespace, NameOverride::Drop)) => {
                return Resolution::Dropped(DropReason::Sentinel(namespace));
            }
            Some((_, NameOverride::Rename(name))) => name.clone(),
            None => default_field_name(&field.identifier),
        };

        let is_pointer = field.source_type.is_pointer();
        let optional = self.is_optional(field, is_pointer);
        let nullable = match self.ctx.nullability_mode {
            NullabilityMode::OptionalAndNullable => is_pointer,
            NullabilityMode::LegacyOptionalOnly => optional,
        };

        Resolution::Field(ResolvedField {
            name,
            type_expr: self.mapper.map(&field.source_type, trace),
            optional,
            nullable,
            exported: field.exported,
            doc_lines: field_doc_lines(field),
        })
    }

    fn name_override<'f>(&self, field: &'f FieldDef) -> Option<(Namespace, &'f NameOverride)> {
        governed_tags(&self.ctx.namespace_priority, field)
            .into_iter()
            .find_map(|(ns, value)| value.name.as_ref().map(|name| (ns, name)))
    }

    fn is_optional(&self, field: &FieldDef, is_pointer: bool) -> bool {
        let tags = governed_tags(&self.ctx.namespace_priority, field);
        let governing = tags
            .iter()
            .map(|(_, value)| *value)
            .find(|value| value.has_requiredness_signal());

        let required = match self.ctx.required_overlap {
            RequiredOverlap::MostRestrictive => tags.iter().any(|(_, value)| value.required),
            RequiredOverlap::GoverningNamespace => governing.is_some_and(|value| value.required),
        };

        let omit_empty = governing.is_some_and(|value| value.omit_empty);
        !required && (is_pointer || omit_empty)
    }
}

/// Tag values of the given namespaces, in priority order.
fn governed_tags<'f>(
    priority: &[Namespace],
    field: &'f FieldDef,
) -> Vec<(Namespace, &'f TagValue)> {
    priority
        .iter()
        .filter_map(|ns| field.tags.get(ns).map(|value| (*ns, value)))
        .collect()
}

/// Fallback field name: the identifier in snake_case.
pub fn default_field_name(identifier: &str) -> String {
    identifier.to_case(Case::Snake)
}

/// Doc comment lines followed by the `@validation` block, if any.
fn field_doc_lines(field: &FieldDef) -> Vec<String> {
    let mut lines = doc_lines(field.doc.as_deref());

    let mut blocks: Vec<(Namespace, &TagValue)> = field
        .tags
        .iter()
        .filter(|(_, value)| !value.validators.is_empty())
        .map(|(ns, value)| (*ns, value))
        .collect();
    if blocks.is_empty() {
        return lines;
    }
    blocks.sort_by_key(|(ns, _)| ns.doc_rank());

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push("@validation".to_string());
    for (namespace, value) in blocks {
        let rules: Vec<String> = value.validators.iter().map(|r| r.to_string()).collect();
        lines.push(format!("  - {}: {}", namespace, rules.join(",")));
    }
    lines
}

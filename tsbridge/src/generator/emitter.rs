//! Declaration emission for one group.
//!
//! The emitter walks a group's roots depth-first and produces declarations
//! in first-discovery order: a definition's declaration comes before the
//! declarations of the definitions it references for the first time.
//! Declarations are memoized per [`DefId`], so a definition reachable from
//! several roots (or from itself) is built exactly once.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;

use super::context::{GenerationContext, MapKeyPolicy, NullabilityMode, UnresolvedPolicy};
use super::resolver::{FieldResolver, Resolution};
use super::type_mapper::{Dependency, MapIssue, MapTrace, TypeMapper};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::error::{RunError, RunResult};
use crate::ir::graph::doc_lines;
use crate::ir::{
    AliasDecl, AliasDef, Declaration, DefId, EndpointRole, InterfaceDecl, StructDef, TypeDef,
    TypeGraph,
};

/// Declarations and diagnostics of one emitted group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOutput {
    /// Group id
    pub group: String,

    /// Declarations in first-discovery order
    pub declarations: Vec<Arc<Declaration>>,

    /// Non-fatal issues in emission order
    pub diagnostics: Vec<Diagnostic>,
}

/// Emits the declarations reachable from a group's roots.
#[derive(Debug, Clone)]
pub struct DeclarationEmitter<'g> {
    graph: &'g TypeGraph,
    group: String,
    ctx: &'g GenerationContext,
    map_key_policy: MapKeyPolicy,
    unresolved_policy: UnresolvedPolicy,
}

impl<'g> DeclarationEmitter<'g> {
    /// Create an emitter for `group` with the default policies.
    pub fn new(graph: &'g TypeGraph, group: impl Into<String>, ctx: &'g GenerationContext) -> Self {
        Self {
            graph,
            group: group.into(),
            ctx,
            map_key_policy: MapKeyPolicy::default(),
            unresolved_policy: UnresolvedPolicy::default(),
        }
    }

    /// Set the unsupported map key policy.
    pub fn with_map_key_policy(mut self, policy: MapKeyPolicy) -> Self {
        self.map_key_policy = policy;
        self
    }

    /// Set the unresolved reference policy.
    pub fn with_unresolved_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved_policy = policy;
        self
    }

    /// Emit every declaration reachable from `roots`.
    #[tracing::instrument(skip_all, fields(group = %self.group, roots = roots.len()))]
    pub fn emit(&self, roots: &[DefId]) -> RunResult<GroupOutput> {
        let resolver = FieldResolver::new(
            self.ctx,
            TypeMapper::new(self.graph, self.ctx.include_unexported),
        );
        let mut diagnostics = DiagnosticSink::new(&self.group);

        let mut stack: Vec<Dependency> = Vec::with_capacity(roots.len());
        for &root in roots {
            match self.graph.get(root) {
                Some(def) if !self.ctx.include_unexported && !def.exported() => {
                    diagnostics.push(
                        DiagnosticKind::SkippedRoot,
                        def.name(),
                        "root is unexported and unexported types are excluded",
                    );
                }
                Some(_) => stack.push(Dependency::Definition(root)),
                None => diagnostics.push(
                    DiagnosticKind::SkippedRoot,
                    format!("#{}", root.index()),
                    "root is not a definition of the graph",
                ),
            }
        }
        stack.reverse();

        let mut memo: IndexMap<DefId, Arc<Declaration>> = IndexMap::new();
        let mut placeholders: HashSet<String> = HashSet::new();
        let mut declarations: Vec<Arc<Declaration>> = Vec::new();

        // Preorder: skipping already discovered items on pop yields the same
        // order as a recursive walk.
        while let Some(item) = stack.pop() {
            match item {
                Dependency::Definition(id) => {
                    if memo.contains_key(&id) {
                        continue;
                    }
                    let Some(def) = self.graph.get(id) else {
                        continue;
                    };

                    let mut trace = MapTrace::new();
                    let declaration =
                        Arc::new(self.build(def, &resolver, &mut trace, &mut diagnostics)?);
                    tracing::trace!(name = declaration.name(), "declaration built");
                    memo.insert(id, Arc::clone(&declaration));
                    declarations.push(declaration);

                    for dep in trace.deps.into_iter().rev() {
                        let discovered = match &dep {
                            Dependency::Definition(id) => memo.contains_key(id),
                            Dependency::Placeholder(name) => placeholders.contains(name),
                        };
                        if !discovered {
                            stack.push(dep);
                        }
                    }
                }
                Dependency::Placeholder(name) => {
                    if placeholders.insert(name.clone()) {
                        let alias = AliasDecl::placeholder(name);
                        declarations.push(Arc::new(Declaration::Alias(alias)));
                    }
                }
            }
        }

        tracing::debug!(
            declarations = declarations.len(),
            diagnostics = diagnostics.len(),
            "group emitted"
        );

        Ok(GroupOutput {
            group: self.group.clone(),
            declarations,
            diagnostics: diagnostics.into_vec(),
        })
    }

    fn build(
        &self,
        def: &TypeDef,
        resolver: &FieldResolver<'_>,
        trace: &mut MapTrace,
        diagnostics: &mut DiagnosticSink,
    ) -> RunResult<Declaration> {
        match def {
            TypeDef::Struct(s) => self.build_interface(s, resolver, trace, diagnostics),
            TypeDef::Alias(a) => self.build_alias(a, trace, diagnostics),
        }
    }

    fn build_interface(
        &self,
        def: &StructDef,
        resolver: &FieldResolver<'_>,
        trace: &mut MapTrace,
        diagnostics: &mut DiagnosticSink,
    ) -> RunResult<Declaration> {
        let mut fields = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            let mut field_trace = MapTrace::new();
            let resolution = resolver.resolve(&def.name, field, &mut field_trace, diagnostics);
            if let Resolution::Field(resolved) = resolution {
                fields.push(resolved);
            }

            let subject = format!("{}.{}", def.name, field.identifier);
            self.apply_issues(&subject, &field_trace.issues, diagnostics)?;
            trace.deps.append(&mut field_trace.deps);
        }

        Ok(Declaration::Interface(InterfaceDecl {
            name: def.name.clone(),
            doc: struct_doc(def),
            exported: def.exported,
            fields,
        }))
    }

    fn build_alias(
        &self,
        def: &AliasDef,
        trace: &mut MapTrace,
        diagnostics: &mut DiagnosticSink,
    ) -> RunResult<Declaration> {
        let mapper = TypeMapper::new(self.graph, self.ctx.include_unexported);
        let target = mapper.map(&def.target, trace);
        self.apply_issues(&def.name, &trace.issues, diagnostics)?;

        let nullable = self.ctx.nullability_mode == NullabilityMode::OptionalAndNullable
            && def.target.is_pointer();

        Ok(Declaration::Alias(AliasDecl {
            name: def.name.clone(),
            doc: doc_lines(def.doc.as_deref()),
            exported: def.exported,
            target,
            nullable,
            placeholder: false,
        }))
    }

    /// Turn mapping issues into diagnostics, or into a fatal error under a
    /// strict policy.
    fn apply_issues(
        &self,
        subject: &str,
        issues: &[MapIssue],
        diagnostics: &mut DiagnosticSink,
    ) -> RunResult<()> {
        for issue in issues {
            match issue {
                MapIssue::UnresolvedReference { reference } => {
                    self.check_unresolved(subject, reference)?;
                    diagnostics.push(
                        DiagnosticKind::UnresolvedReference,
                        subject,
                        format!("no definition named `{reference}`, emitted as placeholder"),
                    );
                }
                MapIssue::AmbiguousReference {
                    reference,
                    candidates,
                } => diagnostics.push(
                    DiagnosticKind::AmbiguousReference,
                    subject,
                    format!("`{reference}` names {candidates} definitions, all emitted"),
                ),
                MapIssue::UnknownMatchesDefinition { label } => diagnostics.push(
                    DiagnosticKind::UnknownMatchesDefinition,
                    subject,
                    format!("unknown `{label}` names a definition, referenced by name"),
                ),
                MapIssue::HiddenReference { reference } => diagnostics.push(
                    DiagnosticKind::HiddenReference,
                    subject,
                    format!("`{reference}` is unexported, emitted as placeholder"),
                ),
                MapIssue::UnsupportedMapKey { key, placeholder } => {
                    if self.map_key_policy == MapKeyPolicy::Strict {
                        return Err(RunError::UnsupportedMapKey {
                            group: self.group.clone(),
                            owner: subject.to_string(),
                            key: key.clone(),
                        });
                    }
                    diagnostics.push(
                        DiagnosticKind::UnsupportedMapKey,
                        subject,
                        format!("map key `{key}` is unsupported, emitted as `{placeholder}`"),
                    );
                }
            }
        }
        Ok(())
    }

    fn check_unresolved(&self, subject: &str, reference: &str) -> RunResult<()> {
        if self.unresolved_policy == UnresolvedPolicy::Strict {
            return Err(RunError::UnresolvedReference {
                group: self.group.clone(),
                owner: subject.to_string(),
                reference: reference.to_string(),
            });
        }
        Ok(())
    }
}

/// Doc lines of a struct, followed by the endpoints that use it.
fn struct_doc(def: &StructDef) -> Vec<String> {
    let mut lines = doc_lines(def.doc.as_deref());
    if def.endpoints.is_empty() {
        return lines;
    }

    let mut routes: IndexMap<String, Vec<EndpointRole>> = IndexMap::new();
    for endpoint in &def.endpoints {
        let key = format!("{} {}", endpoint.method.to_ascii_uppercase(), endpoint.path);
        let roles = routes.entry(key).or_default();
        if !roles.contains(&endpoint.role) {
            roles.push(endpoint.role);
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push("@api Used in the following endpoints:".to_string());
    for (route, roles) in routes {
        let roles: Vec<&str> = roles.iter().map(EndpointRole::label).collect();
        lines.push(format!("- {route} ({})", roles.join(", ")));
    }
    lines
}

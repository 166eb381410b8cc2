//! Run configuration.
//!
//! A [`RunConfig`] describes one generation run: the defaults every group
//! inherits, the emission policies, and the groups themselves. It is plain
//! serde data so front-ends can load it from TOML or JSON.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::generator::{
    GenerationContext, MapKeyPolicy, NullabilityMode, RequiredOverlap, UnresolvedPolicy,
};
use crate::ir::Namespace;

/// Id of the implicit group used when no group is configured.
pub const DEFAULT_GROUP_ID: &str = "default";

/// Configuration of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Emit unexported definitions and fields
    pub include_unexported: bool,

    /// Default nullability mode of every group
    pub nullability_mode: NullabilityMode,

    /// Requiredness rule across namespaces
    pub required_overlap: RequiredOverlap,

    /// Unsupported map key handling
    pub map_key_policy: MapKeyPolicy,

    /// Unresolved reference handling
    pub unresolved_policy: UnresolvedPolicy,

    /// Default namespace priority of every group
    pub default_namespaces: Vec<Namespace>,

    /// Group ids in merge order; empty means declaration order
    pub group_processing_order: Vec<String>,

    /// Groups of the run
    #[serde(rename = "group")]
    pub groups: Vec<GroupConfig>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            include_unexported: true,
            nullability_mode: NullabilityMode::default(),
            required_overlap: RequiredOverlap::default(),
            map_key_policy: MapKeyPolicy::default(),
            unresolved_policy: UnresolvedPolicy::default(),
            default_namespaces: GenerationContext::DEFAULT_PRIORITY.to_vec(),
            group_processing_order: Vec::new(),
            groups: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Create a configuration with default settings and no groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a group.
    pub fn with_group(mut self, group: GroupConfig) -> Self {
        self.groups.push(group);
        self
    }

    /// Set the processing order.
    pub fn with_processing_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_processing_order = order.into_iter().map(Into::into).collect();
        self
    }

    /// Indices into [`groups`](Self::groups) in processing order.
    pub fn processing_order(&self) -> Result<Vec<usize>, ConfigError> {
        let mut ids = HashSet::new();
        for group in &self.groups {
            if !ids.insert(group.id.as_str()) {
                return Err(ConfigError::DuplicateGroup(group.id.clone()));
            }
        }

        if self.group_processing_order.is_empty() {
            return Ok((0..self.groups.len()).collect());
        }

        let mut order = Vec::with_capacity(self.groups.len());
        let mut seen = HashSet::new();
        for id in &self.group_processing_order {
            let Some(index) = self.groups.iter().position(|g| &g.id == id) else {
                return Err(ConfigError::UnknownGroupInOrder(id.clone()));
            };
            if !seen.insert(id.as_str()) {
                return Err(ConfigError::DuplicateGroupInOrder(id.clone()));
            }
            order.push(index);
        }

        if let Some(missing) = self.groups.iter().find(|g| !seen.contains(g.id.as_str())) {
            return Err(ConfigError::MissingGroupInOrder(missing.id.clone()));
        }

        Ok(order)
    }

    /// Generation context of `group`: run defaults plus group overrides.
    pub fn context_for(&self, group: &GroupConfig) -> GenerationContext {
        GenerationContext {
            namespace_priority: group
                .namespaces
                .clone()
                .unwrap_or_else(|| self.default_namespaces.clone()),
            nullability_mode: group.nullability_mode.unwrap_or(self.nullability_mode),
            required_overlap: self.required_overlap,
            include_unexported: self.include_unexported,
        }
    }
}

/// One generation unit: roots plus context overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Unique group id
    pub id: String,

    /// Root definition names; a name shared by several definitions selects
    /// all of them
    #[serde(default)]
    pub roots: Vec<String>,

    /// Namespace priority override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<Vec<Namespace>>,

    /// Nullability mode override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullability_mode: Option<NullabilityMode>,
}

impl GroupConfig {
    /// Create a group with the given roots and no overrides.
    pub fn new<I, S>(id: impl Into<String>, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            roots: roots.into_iter().map(Into::into).collect(),
            namespaces: None,
            nullability_mode: None,
        }
    }

    /// Override the namespace priority.
    pub fn with_namespaces(mut self, namespaces: Vec<Namespace>) -> Self {
        self.namespaces = Some(namespaces);
        self
    }

    /// Override the nullability mode.
    pub fn with_nullability(mut self, mode: NullabilityMode) -> Self {
        self.nullability_mode = Some(mode);
        self
    }
}

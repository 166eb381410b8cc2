//! Declaration registry for merging groups.
//!
//! The registry collects the declarations of every group of a run under
//! their names, keeps the order in which names were first seen, and checks
//! that every recurrence of a name has the same structural shape.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{RunError, RunResult};
use crate::ir::Declaration;

/// What happened to a declaration submitted to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First occurrence of the name
    Inserted,

    /// The name was already registered with the same shape
    Reused,
}

/// Run-scoped registry of merged declarations.
#[derive(Debug, Clone, Default)]
pub struct DeclarationRegistry {
    /// Canonical declaration per name
    by_name: HashMap<String, Arc<Declaration>>,

    /// Names in first-seen order
    order: Vec<String>,

    /// Group that first produced each name
    first_seen_group: HashMap<String, String>,
}

impl DeclarationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one declaration produced by `group`.
    pub fn merge(
        &mut self,
        group: &str,
        declaration: &Arc<Declaration>,
    ) -> RunResult<MergeOutcome> {
        let name = declaration.name();

        let Some(existing) = self.by_name.get(name) else {
            self.by_name.insert(name.to_string(), Arc::clone(declaration));
            self.order.push(name.to_string());
            self.first_seen_group.insert(name.to_string(), group.to_string());
            return Ok(MergeOutcome::Inserted);
        };

        if Arc::ptr_eq(existing, declaration) {
            return Ok(MergeOutcome::Reused);
        }

        match existing.shape_mismatch(declaration) {
            None => Ok(MergeOutcome::Reused),
            Some(mismatch) => Err(RunError::DeclarationConflict {
                name: name.to_string(),
                first_group: self.first_seen_group.get(name).cloned().unwrap_or_default(),
                second_group: group.to_string(),
                field: mismatch.field,
                detail: mismatch.detail,
            }),
        }
    }

    /// Merge every declaration of a group, in order.
    ///
    /// Stops at the first conflict. Declarations merged before the conflict
    /// stay registered.
    pub fn merge_all(&mut self, group: &str, declarations: &[Arc<Declaration>]) -> RunResult<()> {
        for declaration in declarations {
            self.merge(group, declaration)?;
        }
        Ok(())
    }

    /// Get the canonical declaration of a name.
    pub fn get(&self, name: &str) -> Option<&Arc<Declaration>> {
        self.by_name.get(name)
    }

    /// Check if a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Group that first produced `name`.
    pub fn first_seen_group(&self, name: &str) -> Option<&str> {
        self.first_seen_group.get(name).map(String::as_str)
    }

    /// Get the number of registered names.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Declarations in first-seen order.
    pub fn declarations(&self) -> Vec<Arc<Declaration>> {
        self.order
            .iter()
            .filter_map(|name| self.by_name.get(name).cloned())
            .collect()
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use crate::ir::AliasDecl;
    use proptest::prelude::*;

    #[test]
    fn merged_names_are_unique() {
        proptest!(|(groups in prop::collection::vec(prop::collection::vec("[A-E]", 0..6), 1..5))| {
            let mut registry = DeclarationRegistry::new();
            for (index, names) in groups.iter().enumerate() {
                let declarations: Vec<Arc<Declaration>> = names
                    .iter()
                    .map(|n| Arc::new(Declaration::Alias(AliasDecl::placeholder(n.as_str()))))
                    .collect();
                registry.merge_all(&format!("g{index}"), &declarations).unwrap();
            }

            let merged = registry.declarations();
            let mut seen = std::collections::HashSet::new();
            for declaration in &merged {
                prop_assert!(seen.insert(declaration.name().to_string()));
            }
            let expected: std::collections::HashSet<&String> = groups.iter().flatten().collect();
            prop_assert_eq!(merged.len(), expected.len());
        });
    }
}

//! Run driver.
//!
//! A [`Pipeline`] validates the run configuration, emits every group in
//! parallel and merges the results through a [`MergeSequencer`], which
//! applies them strictly in processing order no matter in which order the
//! groups finish.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rayon::prelude::*;

use crate::config::{GroupConfig, RunConfig, DEFAULT_GROUP_ID};
use crate::diagnostics::Diagnostic;
use crate::error::{ConfigError, RunError, RunResult};
use crate::generator::{DeclarationEmitter, DeclarationRegistry, GenerationContext, GroupOutput};
use crate::ir::{Declaration, DefId, TypeGraph};

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// Per-group declarations, in processing order
    pub groups: Vec<GroupOutput>,

    /// Deduplicated declarations of the whole run, in first-seen order
    pub combined: Vec<Arc<Declaration>>,

    /// Diagnostics of every group, in processing order
    pub diagnostics: Vec<Diagnostic>,
}

/// A group ready to be emitted.
#[derive(Debug, Clone)]
pub struct PlannedGroup {
    /// Position in the processing order
    pub sequence: usize,

    pub id: String,

    pub roots: Vec<DefId>,

    pub context: GenerationContext,
}

/// Drives one generation run over a graph.
#[derive(Debug, Clone)]
pub struct Pipeline<'g> {
    graph: &'g TypeGraph,
    config: RunConfig,
}

impl<'g> Pipeline<'g> {
    /// Create a pipeline.
    pub fn new(graph: &'g TypeGraph, config: RunConfig) -> Self {
        Self { graph, config }
    }

    /// The run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Validate the configuration and resolve every group's roots and
    /// context.
    ///
    /// Without configured groups the plan holds a single group rooted at
    /// every definition of the graph.
    pub fn plan(&self) -> Result<Vec<PlannedGroup>, ConfigError> {
        if self.config.groups.is_empty() {
            return Ok(vec![PlannedGroup {
                sequence: 0,
                id: DEFAULT_GROUP_ID.to_string(),
                roots: self.graph.iter().map(|(id, _)| id).collect(),
                context: self
                    .config
                    .context_for(&GroupConfig::new(DEFAULT_GROUP_ID, Vec::<String>::new())),
            }]);
        }

        let order = self.config.processing_order()?;
        let mut plan = Vec::with_capacity(order.len());
        for (sequence, index) in order.into_iter().enumerate() {
            let group = &self.config.groups[index];

            let mut roots = Vec::new();
            for name in &group.roots {
                let before = roots.len();
                roots.extend(self.graph.find_by_name(name));
                if roots.len() == before {
                    return Err(ConfigError::UnknownRoot {
                        group: group.id.clone(),
                        root: name.clone(),
                    });
                }
            }

            plan.push(PlannedGroup {
                sequence,
                id: group.id.clone(),
                roots,
                context: self.config.context_for(group),
            });
        }
        Ok(plan)
    }

    /// Emit and merge every group.
    #[tracing::instrument(skip_all, fields(groups = self.config.groups.len()))]
    pub fn run(&self) -> RunResult<RunOutput> {
        let plan = self.plan()?;
        let sequencer = MergeSequencer::new(plan.iter().map(|g| g.id.clone()).collect());

        plan.par_iter().for_each(|group| {
            if sequencer.is_poisoned() {
                tracing::debug!(group = %group.id, "run poisoned, skipping group");
                return;
            }
            let result = DeclarationEmitter::new(self.graph, &group.id, &group.context)
                .with_map_key_policy(self.config.map_key_policy)
                .with_unresolved_policy(self.config.unresolved_policy)
                .emit(&group.roots);
            sequencer.submit(group.sequence, result);
        });

        sequencer.finish()
    }
}

/// Merges group results in sequence order.
///
/// Results may arrive in any order; each is held until every result with a
/// lower sequence number has been merged. The first failure in sequence
/// order poisons the run and is the error reported by [`finish`].
///
/// [`finish`]: MergeSequencer::finish
#[derive(Debug)]
pub struct MergeSequencer {
    state: Mutex<SequencerState>,
    poisoned: AtomicBool,
}

#[derive(Debug)]
struct SequencerState {
    /// Group ids by sequence number
    ids: Vec<String>,
    next: usize,
    pending: BTreeMap<usize, RunResult<GroupOutput>>,
    registry: DeclarationRegistry,
    merged: Vec<GroupOutput>,
    failure: Option<RunError>,
}

impl MergeSequencer {
    /// Create a sequencer expecting one result per group id, in order.
    pub fn new(ids: Vec<String>) -> Self {
        Self {
            state: Mutex::new(SequencerState {
                ids,
                next: 0,
                pending: BTreeMap::new(),
                registry: DeclarationRegistry::new(),
                merged: Vec::new(),
                failure: None,
            }),
            poisoned: AtomicBool::new(false),
        }
    }

    /// Whether a failure has been merged.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned.load(Ordering::Acquire)
    }

    /// Submit the result of the group at `sequence`.
    pub fn submit(&self, sequence: usize, result: RunResult<GroupOutput>) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if state.failure.is_some() {
            return;
        }

        state.pending.insert(sequence, result);
        while let Some(result) = state.pending.remove(&state.next) {
            let merged = result.and_then(|output| {
                state
                    .registry
                    .merge_all(&output.group, &output.declarations)?;
                Ok(output)
            });

            match merged {
                Ok(output) => {
                    tracing::debug!(
                        group = %output.group,
                        sequence = state.next,
                        total = state.registry.len(),
                        "group merged"
                    );
                    state.merged.push(output);
                    state.next += 1;
                }
                Err(err) => {
                    tracing::debug!(sequence = state.next, error = %err, "run poisoned");
                    state.failure = Some(err);
                    state.pending.clear();
                    self.poisoned.store(true, Ordering::Release);
                    break;
                }
            }
        }
    }

    /// Finish the run.
    pub fn finish(self) -> RunResult<RunOutput> {
        let state = self.state.into_inner();
        if let Some(err) = state.failure {
            return Err(err);
        }
        if state.next < state.ids.len() {
            return Err(RunError::Incomplete {
                missing: state.ids[state.next..].to_vec(),
            });
        }

        let diagnostics = state
            .merged
            .iter()
            .flat_map(|group| group.diagnostics.iter().cloned())
            .collect();
        Ok(RunOutput {
            combined: state.registry.declarations(),
            groups: state.merged,
            diagnostics,
        })
    }
}

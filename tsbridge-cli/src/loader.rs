//! Type graph loading.
//!
//! The front-end that inspects host-language sources hands its type graph
//! over as JSON; this module reads it back.

use std::path::{Path, PathBuf};

use tsbridge::ir::TypeGraph;

use crate::error::{CliResult, LoadError};

/// Loads serialized type graphs.
#[derive(Debug, Clone)]
pub struct GraphLoader {
    path: PathBuf,
}

impl GraphLoader {
    /// Create a loader for the graph at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the graph file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and deserialize the graph.
    pub fn load(&self) -> CliResult<TypeGraph> {
        if !self.path.exists() {
            return Err(LoadError::NotFound {
                path: self.path.clone(),
            }
            .into());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| LoadError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        let graph = TypeGraph::from_json(&content).map_err(|e| LoadError::Json {
            path: self.path.clone(),
            source: e,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            definitions = graph.len(),
            "type graph loaded"
        );
        Ok(graph)
    }
}

//! Error types for the translation engine.
//!
//! Every error here is fatal for the whole run: a run either produces the
//! complete combined output or one of these.

use thiserror::Error;

/// Result type alias for run operations.
pub type RunResult<T> = Result<T, RunError>;

/// Fatal error of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// Two groups produced different shapes under one name.
    #[error(
        "Declaration `{name}` conflicts between groups `{first_group}` and `{second_group}`{}: {detail}",
        .field.as_ref().map(|f| format!(" at field `{f}`")).unwrap_or_default()
    )]
    DeclarationConflict {
        name: String,
        first_group: String,
        second_group: String,
        field: Option<String>,
        detail: String,
    },

    /// A reference matched no single definition under the strict policy.
    #[error("Unresolved reference `{reference}` in `{owner}` (group `{group}`)")]
    UnresolvedReference {
        group: String,
        owner: String,
        reference: String,
    },

    /// A map key type is unsupported under the strict policy.
    #[error("Unsupported map key `{key}` in `{owner}` (group `{group}`)")]
    UnsupportedMapKey {
        group: String,
        owner: String,
        key: String,
    },

    /// The run configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Some groups never reported a result.
    #[error("Run finished without results for groups: {}", .missing.join(", "))]
    Incomplete { missing: Vec<String> },
}

/// Invalid run configuration, detected before any group runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Two groups share an id.
    #[error("Duplicate group id `{0}`")]
    DuplicateGroup(String),

    /// The processing order names a group that does not exist.
    #[error("Processing order names unknown group `{0}`")]
    UnknownGroupInOrder(String),

    /// The processing order names a group twice.
    #[error("Processing order names group `{0}` twice")]
    DuplicateGroupInOrder(String),

    /// The processing order leaves a group out.
    #[error("Processing order omits group `{0}`")]
    MissingGroupInOrder(String),

    /// A root names no definition of the graph.
    #[error("Group `{group}` has unknown root `{root}`")]
    UnknownRoot { group: String, root: String },
}

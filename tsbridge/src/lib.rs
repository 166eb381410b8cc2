//! # tsbridge
//!
//! Translate a graph of tagged record types into deterministic TypeScript
//! declarations.
//!
//! Fields carry several independently authored tag namespaces (serialization
//! names, form and route bindings, validation rules). For every generation
//! group, tsbridge reconciles those namespaces into one name, an
//! `optional`/`nullable` pair and documentation of the validation rules, then
//! merges all groups into a single conflict-checked declaration set whose
//! order depends only on the input.
//!
//! ## Usage
//!
//! ```rust
//! use tsbridge::ir::{FieldDef, SourceType, StructDef, TypeGraph};
//! use tsbridge::render::{RenderOptions, Renderer, TypeScriptRenderer};
//! use tsbridge::{GroupConfig, Pipeline, RunConfig};
//!
//! let mut graph = TypeGraph::new();
//! graph.push(
//!     StructDef::new("Order")
//!         .with_field(FieldDef::new("ID", SourceType::Number).with_struct_tag(r#"json:"id""#))
//!         .with_field(
//!             FieldDef::new("Note", SourceType::pointer(SourceType::Text))
//!                 .with_struct_tag(r#"json:"note,omitempty""#),
//!         ),
//! );
//!
//! let config = RunConfig::new().with_group(GroupConfig::new("orders", ["Order"]));
//! let output = Pipeline::new(&graph, config).run().unwrap();
//!
//! let ts = TypeScriptRenderer::new().render_all(&output.combined, &RenderOptions::default());
//! assert!(ts.contains("note?: string | null;"));
//! ```
//!
//! ## Architecture
//!
//! - [`ir`] - Type graph input and declaration output models
//! - [`parser`] - Raw struct tag grammar
//! - [`generator`] - Field resolution, type mapping, emission and merging
//! - [`pipeline`] - Parallel run driver with ordered merging
//! - [`render`] - Renderer trait and the TypeScript renderer
//! - [`config`] - Run configuration
//! - [`diagnostics`] - Non-fatal issues
//! - [`error`] - Fatal errors

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod ir;
pub mod parser;
pub mod pipeline;
pub mod render;

// Re-export main types for convenience
pub use config::{GroupConfig, RunConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::{ConfigError, RunError, RunResult};
pub use generator::{GenerationContext, GroupOutput, NullabilityMode, RequiredOverlap};
pub use pipeline::{MergeSequencer, Pipeline, RunOutput};
pub use render::{RenderOptions, Renderer, TypeScriptRenderer};

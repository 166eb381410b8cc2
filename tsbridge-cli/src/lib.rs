//! # tsbridge-cli
//!
//! CLI library for generating TypeScript declarations from a serialized
//! type graph.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`loader`] - Type graph loading
//! - [`generator`] - Pipeline run and rendering
//! - [`writer`] - File output and dry-run support
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod generator;
pub mod loader;
pub mod writer;

// Re-export main types for convenience
pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::{GeneratedOutput, Generator};
pub use loader::GraphLoader;
pub use writer::FileWriter;

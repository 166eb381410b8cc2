//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `tsbridge.toml` files
//! and merging with command-line arguments.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tsbridge::render::IndentStyle;
use tsbridge::{RenderOptions, RunConfig};

use crate::error::{CliResult, ConfigError};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "tsbridge.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run configuration handed to the pipeline.
    pub run: RunConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file for generated declarations.
    pub path: PathBuf,

    /// Indentation style.
    pub indent: IndentStyle,

    /// Whether to generate JSDoc comments.
    pub docs: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./generated/types.ts"),
            indent: IndentStyle::default(),
            docs: true,
        }
    }
}

impl OutputConfig {
    /// Renderer options for this output.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new()
            .with_indent(self.indent)
            .with_docs(self.docs)
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, attempts to load from the default location.
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        Self::parse(&config_path, &content)
    }

    /// Parse configuration content read from `path`.
    pub fn parse(path: &Path, content: &str) -> CliResult<Config> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ConfigError::invalid_toml(path.to_path_buf(), e.to_string()))?;
        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref output) = args.output {
            config.output.path = output.clone();
        }

        if let Some(docs) = args.docs {
            config.output.docs = docs;
        }

        if let Some(include_unexported) = args.include_unexported {
            config.run.include_unexported = include_unexported;
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# tsbridge configuration file

[output]
# Output file for generated TypeScript declarations
path = "./generated/types.ts"

# Indentation: "spaces2", "spaces4" or "tabs"
indent = "spaces2"

# Whether to generate JSDoc comments (docs, validation rules, endpoints)
docs = true

[run]
# Emit unexported types and fields, marked with a note
include_unexported = true

# "optional-and-nullable" or "legacy-optional-only"
nullability_mode = "optional-and-nullable"

# How `required` in one namespace meets `omitempty` in another:
# "most-restrictive" or "governing-namespace"
required_overlap = "most-restrictive"

# Map keys other than integers and strings: "degrade" or "strict"
map_key_policy = "degrade"

# References to unknown types: "placeholder" or "strict"
unresolved_policy = "placeholder"

# Namespace priority for field names and requiredness, highest first
default_namespaces = ["json", "form", "param", "query", "uri", "header", "binding", "validate"]

# Group ids in merge order; empty means declaration order
group_processing_order = []

# Without groups every definition of the graph is emitted.
#
# [[run.group]]
# id = "public"
# roots = ["User"]
# namespaces = ["json", "binding"]
# nullability_mode = "legacy-optional-only"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Output file override.
    pub output: Option<PathBuf>,

    /// Docs override.
    pub docs: Option<bool>,

    /// Unexported items override.
    pub include_unexported: Option<bool>,
}

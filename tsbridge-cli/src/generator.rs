//! Declaration generation.
//!
//! Runs the pipeline over a loaded graph and renders the combined
//! declarations as one TypeScript module.

use tsbridge::ir::TypeGraph;
use tsbridge::{Diagnostic, Pipeline, Renderer, TypeScriptRenderer};

use crate::config::Config;
use crate::error::CliResult;

const HEADER: &str = "// Code generated by tsbridge. DO NOT EDIT.\n";

/// Output of a generation run.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    /// Rendered module content
    pub content: String,

    /// Number of combined declarations
    pub declarations: usize,

    /// Number of groups emitted
    pub groups: usize,

    /// Non-fatal issues of the run
    pub diagnostics: Vec<Diagnostic>,
}

/// Generates TypeScript modules from type graphs.
#[derive(Debug, Clone)]
pub struct Generator {
    config: Config,
}

impl Generator {
    /// Create a generator with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the pipeline over `graph` and render the result.
    pub fn generate(&self, graph: &TypeGraph) -> CliResult<GeneratedOutput> {
        let output = Pipeline::new(graph, self.config.run.clone()).run()?;

        let renderer = TypeScriptRenderer::new();
        let body = renderer.render_all(&output.combined, &self.config.output.render_options());

        let mut content = String::with_capacity(HEADER.len() + 1 + body.len());
        content.push_str(HEADER);
        if !body.is_empty() {
            content.push('\n');
            content.push_str(&body);
        }

        tracing::debug!(
            renderer = renderer.id(),
            declarations = output.combined.len(),
            diagnostics = output.diagnostics.len(),
            "module rendered"
        );

        Ok(GeneratedOutput {
            content,
            declarations: output.combined.len(),
            groups: output.groups.len(),
            diagnostics: output.diagnostics,
        })
    }
}

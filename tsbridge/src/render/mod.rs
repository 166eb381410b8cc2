//! Declaration renderers.
//!
//! This module defines the `Renderer` trait that turns the target-neutral
//! declaration model into source text, and the TypeScript implementation.

pub mod typescript;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ir::Declaration;

pub use typescript::TypeScriptRenderer;

/// Trait for declaration renderers.
///
/// Implement this trait to add support for a new target language. Rendering
/// never fails: anything the target cannot express has already been turned
/// into a placeholder by the emitter.
pub trait Renderer: Send + Sync {
    /// Returns the unique identifier for this renderer (e.g. "typescript").
    fn id(&self) -> &'static str;

    /// Returns the file extension for rendered files (e.g. "ts").
    fn file_extension(&self) -> &'static str;

    /// Render a single declaration, without a trailing blank line.
    fn render_declaration(&self, declaration: &Declaration, options: &RenderOptions) -> String;

    /// Render declarations in order, separated by blank lines.
    fn render_all(&self, declarations: &[Arc<Declaration>], options: &RenderOptions) -> String {
        let mut out = String::new();
        for (index, declaration) in declarations.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.render_declaration(declaration, options));
        }
        out
    }
}

/// Renderer options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Indentation style
    pub indent: IndentStyle,

    /// Whether to emit documentation comments
    pub docs: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: IndentStyle::default(),
            docs: true,
        }
    }
}

impl RenderOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation style.
    pub fn with_indent(mut self, indent: IndentStyle) -> Self {
        self.indent = indent;
        self
    }

    /// Set whether to emit documentation comments.
    pub fn with_docs(mut self, docs: bool) -> Self {
        self.docs = docs;
        self
    }
}

/// Indentation style for rendered code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndentStyle {
    /// Two spaces
    #[default]
    Spaces2,

    /// Four spaces
    Spaces4,

    /// One tab
    Tabs,
}

impl IndentStyle {
    /// The indentation string.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndentStyle::Spaces2 => "  ",
            IndentStyle::Spaces4 => "    ",
            IndentStyle::Tabs => "\t",
        }
    }
}

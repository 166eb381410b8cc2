//! TypeScript renderer.
//!
//! Renders interfaces as `export interface`, aliases as `export type` and
//! placeholders as local `type X = any;` declarations. Doc lines become JSDoc
//! blocks.

use std::fmt::Write;

use super::{RenderOptions, Renderer};
use crate::ir::{
    AliasDecl, Declaration, Format, InterfaceDecl, KeyKind, PrimitiveKind, ResolvedField, TypeExpr,
};

const UNEXPORTED_TYPE_NOTE: &str = "Note: This type is unexported in the source package.";
const UNEXPORTED_FIELD_NOTE: &str = "Note: This field is unexported in the source type.";

/// Renders declarations as TypeScript.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptRenderer;

impl TypeScriptRenderer {
    /// Create a new TypeScript renderer.
    pub fn new() -> Self {
        Self
    }

    /// Render a type expression.
    pub fn render_type(&self, expr: &TypeExpr) -> String {
        match expr {
            TypeExpr::Primitive { kind, format } => {
                let base = match kind {
                    PrimitiveKind::Bool => "boolean",
                    PrimitiveKind::Number => "number",
                    PrimitiveKind::String => "string",
                    PrimitiveKind::Any => "any",
                };
                match format {
                    Some(Format::Rfc3339) => format!("{base} /* RFC3339 */"),
                    None => base.to_string(),
                }
            }
            TypeExpr::ArrayOf(inner) => format!("{}[]", self.render_type(inner)),
            TypeExpr::MapOf { key, value } => {
                let key = match key {
                    KeyKind::Integer => "number",
                    KeyKind::Text => "string",
                };
                format!("Record<{key}, {}>", self.render_type(value))
            }
            TypeExpr::Reference(name) => name.clone(),
            TypeExpr::Opaque(name) if is_identifier(name) => name.clone(),
            TypeExpr::Opaque(_) => "any".to_string(),
        }
    }

    fn render_interface(&self, decl: &InterfaceDecl, options: &RenderOptions) -> String {
        let mut out = String::new();
        if options.docs {
            write_doc(&mut out, "", &decl.doc);
            if !decl.exported {
                write_doc(&mut out, "", &[UNEXPORTED_TYPE_NOTE.to_string()]);
            }
        }

        if decl.fields.is_empty() {
            let _ = writeln!(out, "export interface {} {{}}", decl.name);
            return out;
        }

        let _ = writeln!(out, "export interface {} {{", decl.name);
        for field in &decl.fields {
            self.render_field(&mut out, field, options);
        }
        out.push_str("}\n");
        out
    }

    fn render_field(&self, out: &mut String, field: &ResolvedField, options: &RenderOptions) {
        let indent = options.indent.as_str();
        if options.docs {
            write_doc(out, indent, &field.doc_lines);
            if !field.exported {
                write_doc(out, indent, &[UNEXPORTED_FIELD_NOTE.to_string()]);
            }
        }

        let optional = if field.optional { "?" } else { "" };
        let nullable = if field.nullable { " | null" } else { "" };
        let _ = writeln!(
            out,
            "{indent}{}{optional}: {}{nullable};",
            property_name(&field.name),
            self.render_type(&field.type_expr)
        );
    }

    fn render_alias(&self, decl: &AliasDecl, options: &RenderOptions) -> String {
        let mut out = String::new();

        if decl.placeholder {
            if is_identifier(&decl.name) {
                let _ = writeln!(out, "type {} = any;", decl.name);
            } else {
                let _ = writeln!(out, "// `{}` has no TypeScript equivalent", decl.name);
            }
            return out;
        }

        if options.docs {
            write_doc(&mut out, "", &decl.doc);
            if !decl.exported {
                write_doc(&mut out, "", &[UNEXPORTED_TYPE_NOTE.to_string()]);
            }
        }
        let nullable = if decl.nullable { " | null" } else { "" };
        let _ = writeln!(
            out,
            "export type {} = {}{nullable};",
            decl.name,
            self.render_type(&decl.target)
        );
        out
    }
}

impl Renderer for TypeScriptRenderer {
    fn id(&self) -> &'static str {
        "typescript"
    }

    fn file_extension(&self) -> &'static str {
        "ts"
    }

    fn render_declaration(&self, declaration: &Declaration, options: &RenderOptions) -> String {
        match declaration {
            Declaration::Interface(decl) => self.render_interface(decl, options),
            Declaration::Alias(decl) => self.render_alias(decl, options),
        }
    }
}

fn write_doc(out: &mut String, indent: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    let _ = writeln!(out, "{indent}/**");
    for line in lines {
        if line.is_empty() {
            let _ = writeln!(out, "{indent} *");
        } else {
            let _ = writeln!(out, "{indent} * {}", line.replace("*/", "*\\/"));
        }
    }
    let _ = writeln!(out, "{indent} */");
}

/// Whether `name` is a valid identifier and needs no quoting.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn property_name(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        serde_json::to_string(name).unwrap_or_else(|_| format!("\"{name}\""))
    }
}

//! Template literal locator backed by tree-sitter grammars.
//!
//! The grammar is picked from the file extension: TypeScript for `.ts`,
//! `.mts` and `.cts`, TSX for `.tsx`, JavaScript (with JSX) otherwise.

use std::path::Path;

use tracing::debug;
use tree_sitter::{Language, Node, Parser};

use litmin_core::{
    application::{ApplicationError, ports::TemplateLocator},
    domain::{Template, TemplatePart},
    error::LitminResult,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterLocator;

impl TreeSitterLocator {
    pub fn new() -> Self {
        Self
    }

    fn language_for(file_name: &str) -> Language {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("ts" | "mts" | "cts") => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Some("tsx") => tree_sitter_typescript::LANGUAGE_TSX.into(),
            _ => tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

impl TemplateLocator for TreeSitterLocator {
    fn locate(&self, source: &str, file_name: &str) -> LitminResult<Vec<Template>> {
        let failed = |reason: String| ApplicationError::LocatorFailed {
            file: file_name.to_string(),
            reason,
        };

        let mut parser = Parser::new();
        parser
            .set_language(&Self::language_for(file_name))
            .map_err(|e| failed(e.to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| failed("parser produced no syntax tree".into()))?;

        // Pre-order walk, so templates come out in source order with outer
        // templates ahead of the ones nested in their expressions.
        let mut templates = Vec::new();
        let mut cursor = tree.walk();
        loop {
            let node = cursor.node();
            if node.kind() == "template_string" {
                if let Some(template) = template_from(node, source) {
                    templates.push(template);
                } else {
                    debug!(
                        file = %file_name,
                        offset = node.start_byte(),
                        "Skipping malformed template literal"
                    );
                }
            }

            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Ok(templates);
                }
            }
        }
    }
}

fn template_from(node: Node<'_>, source: &str) -> Option<Template> {
    if node.has_error() {
        return None;
    }

    // Between the backticks.
    let start = node.start_byte() + 1;
    let end = node.end_byte().checked_sub(1)?;
    if end < start {
        return None;
    }

    let mut parts = Vec::new();
    let mut part_start = start;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "template_substitution" {
            parts.push(TemplatePart::from_source(source, part_start, child.start_byte())?);
            part_start = child.end_byte();
        }
    }
    parts.push(TemplatePart::from_source(source, part_start, end)?);

    Some(Template::new(tag_of(node, source), parts))
}

/// The tag expression, when `node` is the template of a tagged call.
fn tag_of(node: Node<'_>, source: &str) -> Option<String> {
    let parent = node.parent()?;
    if parent.kind() != "call_expression" {
        return None;
    }
    if parent.child_by_field_name("arguments")?.id() != node.id() {
        return None;
    }
    parent
        .child_by_field_name("function")?
        .utf8_text(source.as_bytes())
        .ok()
        .map(str::to_string)
}

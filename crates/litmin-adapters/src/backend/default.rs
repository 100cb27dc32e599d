use litmin_core::{
    application::ports::{Minified, MinifierBackend},
    domain::{MarkupOptions, StyleOptions, codec},
    error::LitminResult,
};

use super::{markup, style};

/// Markup through minify-html, style sheets through lightningcss.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBackend;

impl DefaultBackend {
    pub fn new() -> Self {
        Self
    }
}

impl MinifierBackend for DefaultBackend {
    /// lightningcss drops the `;` after a value that ends a declaration
    /// block, so the shortened placeholder counts as a separator too.
    fn split(&self, minified: &str, placeholder: &str) -> Vec<String> {
        codec::split_tolerant(minified, placeholder, ';')
    }

    fn minify_markup(&self, markup: &str, options: &MarkupOptions) -> LitminResult<Minified> {
        markup::minify_markup(markup, options)
    }

    fn supports_style(&self) -> bool {
        true
    }

    fn minify_style(&self, style: &str, options: &StyleOptions) -> LitminResult<Minified> {
        style::minify_style(style, options)
    }
}

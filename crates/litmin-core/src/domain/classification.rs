//! Template classification: markup, style, or skip.
//!
//! The default predicates look at the tag name only. Escape markers are
//! whole-file switches: one occurrence anywhere disables that mode for every
//! template in the file.

use crate::domain::Template;

/// Call-like marker that disables style minification for a whole file.
pub const STYLE_ESCAPE_MARKER: &str = "unsafeCSS(";

/// Call-like marker that disables markup minification for a whole file.
pub const MARKUP_ESCAPE_MARKER: &str = "unsafeHTML(";

/// How a template will be minified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Markup,
    Style,
    Skip,
}

impl TemplateKind {
    /// Resolve the mode from the two independent wishes.
    ///
    /// Style wins when both apply; a `css` tag that also mentions `html`
    /// is a style sheet.
    pub fn resolve(wants_markup: bool, wants_style: bool) -> Self {
        match (wants_markup, wants_style) {
            (_, true) => Self::Style,
            (true, false) => Self::Markup,
            (false, false) => Self::Skip,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Markup => "markup",
            Self::Style => "style",
            Self::Skip => "skip",
        }
    }
}

/// Default markup predicate: tag contains `html` or `svg`, case-insensitive.
pub fn is_markup_tag(template: &Template) -> bool {
    template
        .tag_lowercase()
        .is_some_and(|tag| tag.contains("html") || tag.contains("svg"))
}

/// Default style predicate: tag contains `css`, case-insensitive.
pub fn is_style_tag(template: &Template) -> bool {
    template
        .tag_lowercase()
        .is_some_and(|tag| tag.contains("css"))
}

/// Whole-file escape markers found in a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EscapeScan {
    pub style_escaped: bool,
    pub markup_escaped: bool,
}

impl EscapeScan {
    /// Case-exact search for both markers.
    pub fn scan(source: &str) -> Self {
        Self {
            style_escaped: source.contains(STYLE_ESCAPE_MARKER),
            markup_escaped: source.contains(MARKUP_ESCAPE_MARKER),
        }
    }
}

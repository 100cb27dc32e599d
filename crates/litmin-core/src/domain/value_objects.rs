//! Domain value objects: markup and style minification options.
//!
//! These are plain serde-friendly values. Missing fields deserialise to the
//! documented defaults, so a partial config file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Markup ───────────────────────────────────────────────────────────────────

/// Options for markup (HTML / SVG) minification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupOptions {
    /// Treat tag and attribute names case-sensitively (custom elements,
    /// SVG camelCase attributes).
    pub case_sensitive: bool,
    /// Collapse whitespace between and inside elements.
    pub collapse_whitespace: bool,
    /// Decode character references where the decoded form is shorter.
    pub decode_entities: bool,
    /// Minify `<style>` blocks and `style` attributes.
    pub minify_css: bool,
    /// Minify `<script>` blocks.
    pub minify_js: bool,
    /// Keep and minify the content of conditional comments.
    pub process_conditional_comments: bool,
    /// Remove quotes around attribute values where legal.
    pub remove_attribute_quotes: bool,
    /// Remove HTML comments.
    pub remove_comments: bool,
    /// Remove attributes whose value is empty (`class=""` and friends).
    pub remove_empty_attributes: bool,
    /// Remove `type="text/javascript"` from scripts.
    pub remove_script_type_attributes: bool,
    /// Remove `type="text/css"` from styles and links.
    pub remove_style_link_type_attributes: bool,
    /// Replace the doctype with `<!doctype html>`.
    pub use_short_doctype: bool,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            collapse_whitespace: true,
            decode_entities: true,
            minify_css: true,
            minify_js: true,
            process_conditional_comments: true,
            remove_attribute_quotes: false,
            remove_comments: true,
            remove_empty_attributes: true,
            remove_script_type_attributes: true,
            remove_style_link_type_attributes: true,
            use_short_doctype: true,
        }
    }
}

// ── Style ────────────────────────────────────────────────────────────────────

/// Optimisation level for style minification.
///
/// `Zero` leaves the text alone, `One` removes whitespace and shortens values,
/// `Two` additionally restructures rules (merging, reordering).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleLevel {
    Zero,
    #[default]
    One,
    Two,
}

impl StyleLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
        }
    }
}

impl fmt::Display for StyleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "zero" => Ok(Self::Zero),
            "1" | "one" => Ok(Self::One),
            "2" | "two" => Ok(Self::Two),
            other => Err(format!("unknown style level '{other}' (expected 0, 1 or 2)")),
        }
    }
}

/// Options for style (CSS) minification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    pub level: StyleLevel,
    /// Merge adjacent rules with identical selectors or declarations.
    pub merge_rules: bool,
    /// Drop earlier copies of rules that occur verbatim more than once.
    pub remove_duplicate_rules: bool,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            level: StyleLevel::One,
            merge_rules: false,
            remove_duplicate_rules: false,
        }
    }
}

impl StyleOptions {
    /// The override applied to every style minification run over a combined
    /// template document, whatever the caller asked for.
    ///
    /// Structural rewrites cannot be trusted when opaque placeholders stand in
    /// for unknown values, so only level-one optimisation and duplicate-rule
    /// removal survive.
    pub fn placeholder_safe(&self) -> Self {
        Self {
            level: StyleLevel::One,
            merge_rules: false,
            remove_duplicate_rules: true,
        }
    }
}

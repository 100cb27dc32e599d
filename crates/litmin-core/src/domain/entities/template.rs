//! Template entities: one tagged template literal and its literal segments.

use std::fmt;

/// One literal segment of a template, between two expression holes or a
/// string boundary.
///
/// Invariant: `start <= end`, and `text` is exactly the source slice
/// `[start, end)`. Offsets are byte offsets into the original source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplatePart {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl TemplatePart {
    /// Create a part covering `[start, end)` with the given literal text.
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        debug_assert!(start <= end, "template part start after end");
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Build a part by slicing the source.
    ///
    /// Returns `None` when the range is reversed, out of bounds, or splits a
    /// UTF-8 character.
    pub fn from_source(source: &str, start: usize, end: usize) -> Option<Self> {
        if start > end {
            return None;
        }
        source.get(start..end).map(|text| Self::new(start, end, text))
    }

    /// `true` when the segment covers no source text.
    ///
    /// Empty segments are never overwritten.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// One tagged (or untagged) template literal found in a source file.
///
/// A template with `n` parts has `n - 1` expression holes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub tag: Option<String>,
    pub parts: Vec<TemplatePart>,
}

impl Template {
    pub fn new(tag: Option<String>, parts: Vec<TemplatePart>) -> Self {
        Self { tag, parts }
    }

    /// Convenience constructor for a tagged template.
    pub fn tagged(tag: impl Into<String>, parts: Vec<TemplatePart>) -> Self {
        Self::new(Some(tag.into()), parts)
    }

    /// Lower-cased tag name, if any.
    pub fn tag_lowercase(&self) -> Option<String> {
        self.tag.as_deref().map(str::to_lowercase)
    }

    /// Number of `${...}` holes.
    pub fn expression_count(&self) -> usize {
        self.parts.len().saturating_sub(1)
    }

    /// Start offset of the first segment, used for ordering and logging.
    pub fn start(&self) -> Option<usize> {
        self.parts.first().map(|p| p.start)
    }

    /// `true` when part ranges are ordered and pairwise disjoint.
    pub fn has_disjoint_parts(&self) -> bool {
        self.parts
            .windows(2)
            .all(|pair| pair[0].start <= pair[0].end && pair[0].end <= pair[1].start)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.tag, self.start()) {
            (Some(tag), Some(at)) => write!(f, "{tag}`…` at byte {at}"),
            (Some(tag), None) => write!(f, "{tag}`…`"),
            (None, Some(at)) => write!(f, "`…` at byte {at}"),
            (None, None) => f.write_str("`…`"),
        }
    }
}

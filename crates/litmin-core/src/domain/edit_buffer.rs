//! Overwrite-tracked view over an original source string.
//!
//! The buffer owns the original text and a set of disjoint replacement
//! ranges. Rendering and map generation are pure functions of that state.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::{DomainError, SourceMap};

/// One recorded replacement of `[start, end)` in the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overwrite {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// A contiguous run of rendered output and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    /// Original text `[start, end)` copied through.
    Unchanged { start: usize, end: usize },
    /// Original text `[start, end)` replaced by `text`.
    Replaced {
        start: usize,
        end: usize,
        text: &'a str,
    },
}

/// Options for [`EditBuffer::generate_map`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapOptions {
    /// Value of the map's `file` field.
    pub file: Option<String>,
    /// Name recorded in `sources`.
    pub source: String,
    /// Embed the original text in `sourcesContent`.
    pub include_content: bool,
    /// Emit a mapping for every unchanged character instead of one per run.
    pub hires: bool,
}

impl MapOptions {
    /// Options used by default: `file = "<name>.map"`, per-character mappings
    /// and embedded source content.
    pub fn for_file(file_name: &str) -> Self {
        Self {
            file: Some(format!("{file_name}.map")),
            source: file_name.to_string(),
            include_content: true,
            hires: true,
        }
    }
}

/// Mutable overwrite buffer over an immutable original.
#[derive(Debug, Clone)]
pub struct EditBuffer {
    original: String,
    // keyed by start offset; ranges are pairwise disjoint
    edits: BTreeMap<usize, (usize, String)>,
}

impl EditBuffer {
    pub fn new(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            edits: BTreeMap::new(),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    /// Record a replacement of `[start, end)`.
    ///
    /// Requires `start < end <= original.len()`, both offsets on character
    /// boundaries, and no overlap with a range already recorded.
    pub fn overwrite(
        &mut self,
        start: usize,
        end: usize,
        text: impl Into<String>,
    ) -> Result<(), DomainError> {
        let len = self.original.len();
        if start >= end || end > len {
            return Err(DomainError::EditOutOfRange { start, end, len });
        }
        if !self.original.is_char_boundary(start) || !self.original.is_char_boundary(end) {
            return Err(DomainError::EditNotOnCharBoundary { start, end });
        }
        if let Some((&other_start, (other_end, _))) = self.edits.range(..end).next_back() {
            if *other_end > start {
                return Err(DomainError::OverlappingEdit {
                    start,
                    end,
                    other_start,
                    other_end: *other_end,
                });
            }
        }

        self.edits.insert(start, (end, text.into()));
        Ok(())
    }

    /// Number of recorded overwrites.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Recorded overwrites, ordered by start offset.
    pub fn overwrites(&self) -> impl Iterator<Item = Overwrite> + '_ {
        self.edits.iter().map(|(&start, (end, text))| Overwrite {
            start,
            end: *end,
            text: text.clone(),
        })
    }

    /// The output as an ordered sequence of unchanged and replaced runs.
    pub fn chunks(&self) -> Vec<Chunk<'_>> {
        let mut chunks = Vec::with_capacity(self.edits.len() * 2 + 1);
        let mut cursor = 0;
        for (&start, (end, text)) in &self.edits {
            if cursor < start {
                chunks.push(Chunk::Unchanged { start: cursor, end: start });
            }
            chunks.push(Chunk::Replaced {
                start,
                end: *end,
                text,
            });
            cursor = *end;
        }
        if cursor < self.original.len() {
            chunks.push(Chunk::Unchanged {
                start: cursor,
                end: self.original.len(),
            });
        }
        chunks
    }

    /// Render the original with every overwrite applied.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.original.len());
        for chunk in self.chunks() {
            match chunk {
                Chunk::Unchanged { start, end } => out.push_str(&self.original[start..end]),
                Chunk::Replaced { text, .. } => out.push_str(text),
            }
        }
        out
    }

    /// Produce a version 3 source map from the original text to the
    /// rendered text.
    ///
    /// Columns are counted in UTF-16 code units. An overwrite maps the first
    /// column of its replacement, and the first column of every line inside
    /// it, to the start of the replaced range.
    pub fn generate_map(&self, options: &MapOptions) -> Result<SourceMap, DomainError> {
        let mut builder = sourcemap::SourceMapBuilder::new(options.file.as_deref());
        let source_id = builder.add_source(&options.source);
        if options.include_content {
            builder.set_source_contents(source_id, Some(&self.original));
        }

        let mut generated = Cursor::default();
        let mut original = Cursor::default();

        for chunk in self.chunks() {
            match chunk {
                Chunk::Unchanged { start, end } => {
                    let mut at_run_start = true;
                    for ch in self.original[start..end].chars() {
                        if ch == '\n' {
                            generated.advance(ch);
                            original.advance(ch);
                            at_run_start = true;
                            continue;
                        }
                        if options.hires || at_run_start {
                            builder.add_raw(
                                generated.line,
                                generated.column,
                                original.line,
                                original.column,
                                Some(source_id),
                                None,
                                false,
                            );
                        }
                        at_run_start = false;
                        generated.advance(ch);
                        original.advance(ch);
                    }
                }
                Chunk::Replaced { start, end, text } => {
                    let anchor = original;
                    let mut at_line_start = true;
                    for ch in text.chars() {
                        if ch == '\n' {
                            generated.advance(ch);
                            at_line_start = true;
                            continue;
                        }
                        if at_line_start {
                            builder.add_raw(
                                generated.line,
                                generated.column,
                                anchor.line,
                                anchor.column,
                                Some(source_id),
                                None,
                                false,
                            );
                            at_line_start = false;
                        }
                        generated.advance(ch);
                    }
                    for ch in self.original[start..end].chars() {
                        original.advance(ch);
                    }
                }
            }
        }

        SourceMap::from_encoded(&builder.into_sourcemap())
    }
}

impl fmt::Display for EditBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Zero-based line and UTF-16 column.
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    line: u32,
    column: u32,
}

impl Cursor {
    fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += ch.len_utf16() as u32;
        }
    }
}

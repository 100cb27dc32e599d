//! Minifier backends.
//!
//! [`DefaultBackend`] pairs minify-html for markup with lightningcss for
//! style sheets, plus the text fixups both need to keep placeholders intact.

mod default;
mod fixups;
mod markup;
mod style;
mod tags;

pub use default::DefaultBackend;

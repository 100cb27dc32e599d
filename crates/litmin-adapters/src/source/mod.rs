//! Source file adapters.

mod local;
mod memory;

pub use local::{LocalSources, SOURCE_EXTENSIONS, discover};
pub use memory::MemorySources;

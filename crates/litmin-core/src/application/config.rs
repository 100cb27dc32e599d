//! Run-time configuration of the literal minifier.

use std::fmt;
use std::sync::Arc;

use crate::application::ports::{SourceMapGenerator, Validator};
use crate::domain::{MarkupOptions, StyleOptions};

/// Caller-supplied style minifier: combined style text in, minified text out.
pub type StyleFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// How style templates are minified.
#[derive(Clone)]
pub enum StyleMinification {
    /// Style templates pass through the codec unchanged.
    Disabled,
    /// The backend's style minifier with these options.
    Backend(StyleOptions),
    /// A custom function replaces the backend's style minifier.
    Custom(StyleFn),
}

impl Default for StyleMinification {
    fn default() -> Self {
        Self::Backend(StyleOptions::default())
    }
}

impl fmt::Debug for StyleMinification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::Backend(options) => f.debug_tuple("Backend").field(options).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Whether and how a source map is produced for changed files.
#[derive(Clone, Default)]
pub enum SourceMapMode {
    /// [`crate::application::HiresSourceMapGenerator`].
    #[default]
    Default,
    Disabled,
    Custom(Arc<dyn SourceMapGenerator>),
}

impl fmt::Debug for SourceMapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Disabled => f.write_str("Disabled"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Which checks run between the codec steps.
///
/// With validation disabled a short split is tolerated: parts without a
/// minified counterpart are left as they were.
#[derive(Clone, Default)]
pub enum ValidationMode {
    /// [`crate::application::DefaultValidator`].
    #[default]
    Default,
    Disabled,
    Custom(Arc<dyn Validator>),
}

impl fmt::Debug for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Disabled => f.write_str("Disabled"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Everything that changes how templates are minified, apart from the
/// backend, locator and predicates themselves.
#[derive(Debug, Clone, Default)]
pub struct MinifyConfig {
    pub markup: MarkupOptions,
    pub style: StyleMinification,
    pub source_map: SourceMapMode,
    pub validation: ValidationMode,
}

impl MinifyConfig {
    pub fn with_markup(mut self, markup: MarkupOptions) -> Self {
        self.markup = markup;
        self
    }

    pub fn with_style(mut self, style: StyleMinification) -> Self {
        self.style = style;
        self
    }

    pub fn with_source_map(mut self, mode: SourceMapMode) -> Self {
        self.source_map = mode;
        self
    }

    pub fn with_validation(mut self, mode: ValidationMode) -> Self {
        self.validation = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MinifyConfig::default();
        assert!(matches!(config.style, StyleMinification::Backend(ref o) if *o == StyleOptions::default()));
        assert!(matches!(config.source_map, SourceMapMode::Default));
        assert!(matches!(config.validation, ValidationMode::Default));
        assert!(config.markup.collapse_whitespace);
    }

    #[test]
    fn custom_style_debug_hides_closure() {
        let style = StyleMinification::Custom(Arc::new(|s: &str| s.trim().to_string()));
        assert_eq!(format!("{style:?}"), "Custom(..)");
    }
}

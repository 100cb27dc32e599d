//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only ever sees the
//! [`MinifyConfig`] built from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied at the call-site, not here)
//! 2. Environment variables, `LITMIN_` prefix and `__` between sections:
//!    `LITMIN_MARKUP__REMOVE_COMMENTS=false`
//! 3. `--config FILE`, or else `.litmin.toml` in the current directory over
//!    the user config file
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use litmin_core::{
    application::{MinifyConfig, SourceMapMode, StyleMinification},
    domain::{MarkupOptions, StyleOptions},
};

/// Name of the per-project config file.
pub const LOCAL_CONFIG_FILE: &str = ".litmin.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Markup minifier options.
    pub markup: MarkupOptions,
    /// Style minification.
    pub style: StyleConfig,
    /// Source map emission.
    pub source_maps: SourceMapConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub enabled: bool,
    pub options: StyleOptions,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            options: StyleOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceMapConfig {
    pub enabled: bool,
}

impl Default for SourceMapConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, files and the environment.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode built-in defaults")?;
        let mut builder = Config::builder().add_source(defaults);

        builder = match config_file {
            Some(path) => builder.add_source(toml_file(path).required(true)),
            None => builder
                .add_source(toml_file(&Self::config_path()).required(false))
                .add_source(toml_file(Path::new(LOCAL_CONFIG_FILE)).required(false)),
        };

        builder
            .add_source(
                Environment::with_prefix("LITMIN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.litmin.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "litmin", "litmin")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Engine configuration, with the command-line switches applied on top.
    pub fn minify_config(&self, no_css: bool, no_source_map: bool) -> MinifyConfig {
        let style = if self.style.enabled && !no_css {
            StyleMinification::Backend(self.style.options.clone())
        } else {
            StyleMinification::Disabled
        };
        let source_map = if self.source_maps.enabled && !no_source_map {
            SourceMapMode::Default
        } else {
            SourceMapMode::Disabled
        };

        MinifyConfig::default()
            .with_markup(self.markup.clone())
            .with_style(style)
            .with_source_map(source_map)
    }
}

fn toml_file(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml)
}

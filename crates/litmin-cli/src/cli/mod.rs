//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "litmin",
    bin_name = "litmin",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Minify HTML and CSS inside JavaScript template literals",
    long_about = "litmin finds html`...`, svg`...` and css`...` template literals in \
                  JavaScript and TypeScript sources, minifies their content and \
                  leaves every ${expression} untouched. A source map is written \
                  next to each output file.",
    after_help = "EXAMPLES:\n\
        \x20 litmin minify src --out-dir dist\n\
        \x20 litmin minify app.js --stdout\n\
        \x20 litmin minify src --check\n\
        \x20 litmin completions bash > /usr/share/bash-completion/completions/litmin",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Minify the template literals of source files.
    #[command(
        visible_alias = "m",
        about = "Minify template literals in source files",
        after_help = "EXAMPLES:\n\
            \x20 litmin minify src/app.js                  # in place\n\
            \x20 litmin minify src lib --out-dir dist      # mirror into dist/\n\
            \x20 litmin minify src --no-css --no-source-map\n\
            \x20 litmin minify src --check                 # exit 2 if anything would change"
    )]
    Minify(MinifyArgs),

    /// Initialise a litmin configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 litmin init           # user config directory\n\
            \x20 litmin init --local   # .litmin.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 litmin completions bash > ~/.local/share/bash-completion/completions/litmin\n\
            \x20 litmin completions zsh  > ~/.zfunc/_litmin\n\
            \x20 litmin completions fish > ~/.config/fish/completions/litmin.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the litmin configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 litmin config get markup.remove_comments\n\
            \x20 litmin config list\n\
            \x20 litmin config path"
    )]
    Config(ConfigCommands),
}

// ── minify ────────────────────────────────────────────────────────────────────

/// Arguments for `litmin minify`.
#[derive(Debug, Args)]
pub struct MinifyArgs {
    /// Files or directories. Directories are searched recursively for
    /// `.js`, `.mjs`, `.cjs`, `.jsx`, `.ts`, `.mts`, `.cts` and `.tsx` files.
    #[arg(value_name = "FILES", required = true, help = "Files or directories to minify")]
    pub files: Vec<PathBuf>,

    /// Write results under this directory instead of in place.
    #[arg(
        short = 'o',
        long = "out-dir",
        value_name = "DIR",
        help = "Output directory (default: overwrite inputs)"
    )]
    pub out_dir: Option<PathBuf>,

    /// Do not write `.map` files or `sourceMappingURL` comments.
    #[arg(long = "no-source-map", help = "Skip source map generation")]
    pub no_source_map: bool,

    /// Leave `css` templates alone.
    #[arg(long = "no-css", help = "Do not minify style templates")]
    pub no_css: bool,

    /// Report what would change without writing anything.
    #[arg(
        long = "check",
        conflicts_with_all = ["out_dir", "stdout"],
        help = "Exit with an error if any file would change"
    )]
    pub check: bool,

    /// Print the minified code of a single file to stdout.
    #[arg(
        long = "stdout",
        conflicts_with = "out_dir",
        help = "Print the result instead of writing files"
    )]
    pub stdout: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `litmin init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.litmin.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `litmin completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `litmin config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `style.options.level`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the user configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Drydock - toolchain capability and flag resolution for C-family compilers
#[derive(Parser)]
#[command(name = "drydock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the discovered toolchain identity
    Show(ShowArgs),

    /// Sanity-check the toolchain (compile, link, run a probe program)
    Check(CheckArgs),

    /// Resolve abstract build options to compiler arguments
    Flags(FlagsArgs),

    /// List the options the toolchain publishes
    Options(OptionsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Toolchain selection shared by all inspection commands.
#[derive(Args)]
pub struct ToolchainOpts {
    /// Path to the compiler (overrides config and auto-detection)
    #[arg(long, env = "CC")]
    pub cc: Option<PathBuf>,

    /// Toolchain family (gcc, clang, apple-clang), skipping detection
    #[arg(long)]
    pub family: Option<String>,

    /// Compiler version, skipping detection
    #[arg(long)]
    pub compiler_version: Option<String>,

    /// Language frontend (c, objc)
    #[arg(long, default_value = "c")]
    pub language: String,

    /// Machine role the toolchain targets (build, host)
    #[arg(long, default_value = "host")]
    pub machine: String,

    /// Treat the toolchain as a cross compiler
    #[arg(long)]
    pub cross: bool,

    /// Path to an already-chosen linker
    #[arg(long)]
    pub linker: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub toolchain: ToolchainOpts,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub toolchain: ToolchainOpts,

    /// Working directory for the probe (defaults to a temp dir)
    #[arg(long)]
    pub work_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct FlagsArgs {
    #[command(flatten)]
    pub toolchain: ToolchainOpts,

    /// Language standard to select (or "none" for the tool default)
    #[arg(long, default_value = "none")]
    pub std: String,

    /// Warning level (0, 1, 2, 3, everything)
    #[arg(long, default_value = "1")]
    pub warnings: String,

    /// Optimization level (plain, 0, g, 1, 2, 3, s)
    #[arg(long, default_value = "plain")]
    pub opt: String,

    /// Emit JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct OptionsArgs {
    #[command(flatten)]
    pub toolchain: ToolchainOpts,

    /// Emit JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

//! Drydock - toolchain capability and flag resolution for C-family compilers
//!
//! This crate models the compiler capability layer of a build system: for
//! each source language and toolchain family (GCC, Clang, Apple Clang) it
//! determines the exact command-line arguments that express abstract build
//! options (language standard, warning verbosity, optimization level), and
//! verifies that a discovered toolchain actually works before it is trusted
//! for real builds.

pub mod core;
pub mod toolchain;
pub mod util;

pub use crate::core::language::Language;
pub use crate::core::machine::MachineChoice;
pub use crate::core::options::{OptionKey, OptionRegistry, OptionSpec, ResolvedOptions};

pub use crate::toolchain::errors::{SanityStage, ToolchainError};
pub use crate::toolchain::probe::{CommandFlagProbe, FlagProbe, ProbeCache};
pub use crate::toolchain::sanity::ProbeEnvironment;
pub use crate::toolchain::{
    Compiler, CompilerIdentity, FamilyVariant, LinkerRef, OptLevel, WarnLevel,
};

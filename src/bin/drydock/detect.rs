//! Toolchain discovery for the CLI.
//!
//! The library never discovers toolchains itself; this module plays the
//! external-collaborator role, producing a `CompilerIdentity` and family
//! tag from CLI arguments, config files, environment, and PATH.
//!
//! Discovery priority:
//! 1. `--cc` / `--family` / `--compiler-version` arguments
//! 2. Toolchain config file (`.drydock/toolchain.toml` or `~/.drydock/toolchain.toml`)
//! 3. CC environment variable (via the `--cc` env fallback)
//! 4. Auto-detection (searching PATH for cc, gcc, clang)

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use drydock::toolchain::standards::parse_loose_version;
use drydock::util::config::{
    global_toolchain_config_path, load_toolchain_config, project_toolchain_config_path,
    ToolchainConfig,
};
use drydock::util::process::{find_c_compiler, ProcessBuilder};
use drydock::{CompilerIdentity, FamilyVariant, Language, LinkerRef, MachineChoice};

use crate::cli::ToolchainOpts;

/// A discovered toolchain, ready to compose into a `Compiler`.
pub struct Discovered {
    pub identity: CompilerIdentity,
    pub family: FamilyVariant,
    /// Extra compile arguments from config, passed to probes.
    pub extra_cflags: Vec<String>,
}

/// Load toolchain configuration from config files.
fn load_config_from_files() -> ToolchainConfig {
    let cwd = std::env::current_dir().unwrap_or_default();
    let project_path = project_toolchain_config_path(&cwd);
    let global_path = global_toolchain_config_path();

    if let Some(ref global) = global_path {
        load_toolchain_config(global, &project_path)
    } else {
        load_toolchain_config(&PathBuf::new(), &project_path)
    }
}

/// Discover the toolchain selected by the CLI options.
pub fn discover(opts: &ToolchainOpts) -> Result<Discovered> {
    let language: Language = opts
        .language
        .parse()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let machine: MachineChoice = opts
        .machine
        .parse()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let config = load_config_from_files();

    let family_override = opts
        .family
        .as_deref()
        .or(config.toolchain.family.as_deref())
        .map(|s| {
            s.parse::<FamilyVariant>()
                .map_err(|e| anyhow::anyhow!("{}", e))
        })
        .transpose()?;

    let linker = opts
        .linker
        .clone()
        .or_else(|| config.toolchain.linker.clone())
        .map(|path| LinkerRef {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            path,
        });

    // Fully specified on the command line: no toolchain invocation needed.
    if let (Some(family), Some(version)) = (family_override, opts.compiler_version.as_deref()) {
        let program = opts
            .cc
            .clone()
            .or_else(|| config.toolchain.cc.clone())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| family.as_str().to_string());

        let identity = CompilerIdentity::new(
            vec![program],
            version,
            None,
            language,
            machine,
            opts.cross,
            linker,
        )
        .with_context(|| format!("invalid compiler version `{}`", version))?;

        return Ok(Discovered {
            identity,
            family,
            extra_cflags: config.toolchain.extra_cflags.clone(),
        });
    }

    // Find a real compiler to interrogate.
    let cc = opts
        .cc
        .clone()
        .or_else(|| config.toolchain.cc.clone().filter(|p| p.exists()))
        .or_else(find_c_compiler);

    let Some(cc) = cc else {
        bail!(
            "no C compiler found\n\
             \n\
             Drydock requires a C-family compiler (gcc or clang).\n\
             Set the CC environment variable, configure `.drydock/toolchain.toml`,\n\
             or install a compiler."
        );
    };

    let (version, full_version) = query_version(&cc)?;
    let family = match family_override {
        Some(family) => family,
        None => detect_compiler_family(&cc, full_version.as_deref()),
    };

    tracing::debug!(
        "discovered {} ({} {})",
        cc.display(),
        family,
        version
    );

    let identity = CompilerIdentity::new(
        vec![cc.display().to_string()],
        &version,
        full_version,
        language,
        machine,
        opts.cross,
        linker,
    )
    .with_context(|| format!("compiler reported unparseable version `{}`", version))?;

    Ok(Discovered {
        identity,
        family,
        extra_cflags: config.toolchain.extra_cflags.clone(),
    })
}

/// Ask the compiler for its version; returns (version, full first line).
fn query_version(cc: &Path) -> Result<(String, Option<String>)> {
    let output = ProcessBuilder::new(cc)
        .arg("--version")
        .exec()
        .with_context(|| format!("failed to run `{} --version`", cc.display()))?;

    if !output.status.success() {
        bail!(
            "`{} --version` failed:\n{}",
            cc.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first_line = stdout.lines().next().unwrap_or("").trim().to_string();

    let version = first_line
        .split_whitespace()
        .find(|token| token.contains('.') && parse_loose_version(token).is_some())
        .map(|token| {
            let numeric: String = token
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            numeric
        });

    let Some(version) = version else {
        bail!(
            "could not find a version in `{} --version` output: {}",
            cc.display(),
            first_line
        );
    };

    Ok((version, Some(first_line)))
}

/// Detect whether the compiler is GCC, Clang, or Apple Clang.
fn detect_compiler_family(cc: &Path, version_line: Option<&str>) -> FamilyVariant {
    let name = cc
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();

    let version_line = version_line.unwrap_or("").to_lowercase();

    if name.contains("clang") || version_line.contains("clang") {
        if version_line.contains("apple") {
            return FamilyVariant::AppleClang;
        }
        return FamilyVariant::Clang;
    }

    if name.contains("gcc") || version_line.contains("gcc") {
        return FamilyVariant::Gnu;
    }

    // Default to GCC-compatible behavior.
    FamilyVariant::Gnu
}

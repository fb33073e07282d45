//! Compiler capability composition and flag resolution.
//!
//! A [`Compiler`] is a discovered toolchain identity composed with exactly
//! one [`FamilyVariant`]. The identity comes from toolchain discovery
//! (an external collaborator); this module turns abstract build options
//! into concrete command-line arguments and verifies the toolchain works
//! before it is trusted.
//!
//! Resolution is pure and safe to call from any thread. The sanity check
//! and flag probes do blocking process I/O; their results are cached for
//! the lifetime of the configuration.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use semver::Version;

use crate::core::language::Language;
use crate::core::machine::MachineChoice;
use crate::core::options::{OptionKey, OptionSpec, ResolvedOptions};

pub mod errors;
pub mod family;
pub mod probe;
pub mod sanity;
pub mod standards;

pub use family::FamilyVariant;

use errors::ToolchainError;
use probe::{CommandFlagProbe, FlagProbe, ProbeCache, ProbeKey};
use sanity::ProbeEnvironment;

/// Reference to an already-chosen linker.
///
/// Linker selection happens upstream; the compiler only carries the
/// reference through to command assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkerRef {
    /// Short linker name (e.g. `ld64`, `bfd`).
    pub name: String,
    /// Path to the linker binary.
    pub path: PathBuf,
}

/// Identity of a discovered toolchain, as reported by discovery.
///
/// Immutable once constructed; owned by the [`Compiler`] that wraps it.
#[derive(Debug, Clone)]
pub struct CompilerIdentity {
    /// Invocation vector (program plus leading arguments). Never empty.
    pub invocation: Vec<String>,
    /// Detected version, padded to full semver.
    pub version: Version,
    /// Version exactly as the toolchain reported it.
    pub version_raw: String,
    /// Full version line, when discovery captured one.
    pub full_version: Option<String>,
    /// Language frontend this compiler instance drives.
    pub language: Language,
    /// Machine role the produced code targets.
    pub for_machine: MachineChoice,
    /// Whether this is a cross compiler.
    pub is_cross: bool,
    /// Already-chosen linker, if any.
    pub linker: Option<LinkerRef>,
}

impl CompilerIdentity {
    /// Build an identity from discovery output.
    ///
    /// Returns `None` if the invocation vector is empty or the version
    /// string has no leading numeric component.
    pub fn new(
        invocation: Vec<String>,
        version: &str,
        full_version: Option<String>,
        language: Language,
        for_machine: MachineChoice,
        is_cross: bool,
        linker: Option<LinkerRef>,
    ) -> Option<Self> {
        if invocation.is_empty() {
            return None;
        }
        let parsed = standards::parse_loose_version(version)?;
        Some(CompilerIdentity {
            invocation,
            version: parsed,
            version_raw: version.trim().to_string(),
            full_version,
            language,
            for_machine,
            is_cross,
            linker,
        })
    }
}

impl fmt::Display for CompilerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} for {})",
            self.invocation.join(" "),
            self.version_raw,
            self.language.display_name(),
            self.for_machine
        )
    }
}

/// Warning verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarnLevel {
    W0,
    W1,
    W2,
    W3,
    Everything,
}

impl WarnLevel {
    /// Get the level as its option-value string.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarnLevel::W0 => "0",
            WarnLevel::W1 => "1",
            WarnLevel::W2 => "2",
            WarnLevel::W3 => "3",
            WarnLevel::Everything => "everything",
        }
    }
}

impl fmt::Display for WarnLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WarnLevel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(WarnLevel::W0),
            "1" => Ok(WarnLevel::W1),
            "2" => Ok(WarnLevel::W2),
            "3" => Ok(WarnLevel::W3),
            "everything" => Ok(WarnLevel::Everything),
            _ => Err(LevelParseError {
                value: s.to_string(),
                expected: "0, 1, 2, 3, everything",
            }),
        }
    }
}

/// Optimization level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptLevel {
    /// No optimization arguments at all (tool default).
    Plain,
    O0,
    /// Optimize for debugging.
    G,
    O1,
    O2,
    O3,
    /// Optimize for size.
    Os,
}

impl OptLevel {
    /// Get the level as its option-value string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptLevel::Plain => "plain",
            OptLevel::O0 => "0",
            OptLevel::G => "g",
            OptLevel::O1 => "1",
            OptLevel::O2 => "2",
            OptLevel::O3 => "3",
            OptLevel::Os => "s",
        }
    }
}

impl fmt::Display for OptLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OptLevel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(OptLevel::Plain),
            "0" => Ok(OptLevel::O0),
            "g" => Ok(OptLevel::G),
            "1" => Ok(OptLevel::O1),
            "2" => Ok(OptLevel::O2),
            "3" => Ok(OptLevel::O3),
            "s" => Ok(OptLevel::Os),
            _ => Err(LevelParseError {
                value: s.to_string(),
                expected: "plain, 0, g, 1, 2, 3, s",
            }),
        }
    }
}

/// Error returned when parsing an unknown warning/optimization level.
#[derive(Debug, Clone)]
pub struct LevelParseError {
    pub value: String,
    pub expected: &'static str,
}

impl fmt::Display for LevelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown level '{}', valid values: {}",
            self.value, self.expected
        )
    }
}

impl std::error::Error for LevelParseError {}

/// A discovered toolchain composed with its family capabilities.
///
/// Construction binds the family tables at discovery time; everything
/// afterwards is read-only, so a `Compiler` can be shared across worker
/// threads freely.
pub struct Compiler {
    identity: CompilerIdentity,
    family: FamilyVariant,
    probe: Arc<dyn FlagProbe>,
    probe_cache: Arc<ProbeCache>,
    sanity_verdict: OnceLock<Result<(), ToolchainError>>,
}

impl Compiler {
    /// Compose a compiler from its identity and detected family, probing
    /// flag support against the live toolchain.
    pub fn new(identity: CompilerIdentity, family: FamilyVariant) -> Self {
        Compiler::with_probe(
            identity,
            family,
            Arc::new(CommandFlagProbe),
            Arc::new(ProbeCache::new()),
        )
    }

    /// Compose a compiler with an injected flag probe and shared cache.
    ///
    /// Tests use this to avoid invoking a real toolchain; configurations
    /// use it to share one probe cache across all compilers.
    pub fn with_probe(
        identity: CompilerIdentity,
        family: FamilyVariant,
        probe: Arc<dyn FlagProbe>,
        probe_cache: Arc<ProbeCache>,
    ) -> Self {
        Compiler {
            identity,
            family,
            probe,
            probe_cache,
            sanity_verdict: OnceLock::new(),
        }
    }

    /// The wrapped identity.
    pub fn identity(&self) -> &CompilerIdentity {
        &self.identity
    }

    /// The bound family variant.
    pub fn family(&self) -> FamilyVariant {
        self.family
    }

    /// Human-readable name of the language frontend.
    pub fn display_language(&self) -> &'static str {
        self.identity.language.display_name()
    }

    /// Verify the toolchain can compile, link, and (for native builds)
    /// run a minimal probe program.
    ///
    /// Runs at most once per compiler instance: the first verdict is
    /// cached and returned on every later call without re-invoking the
    /// toolchain. A failure is fatal for this toolchain for the rest of
    /// the configuration.
    pub fn sanity_check(
        &self,
        work_dir: &Path,
        env: &ProbeEnvironment,
    ) -> Result<(), ToolchainError> {
        self.sanity_verdict
            .get_or_init(|| sanity::run_sanity_check(&self.identity, work_dir, env))
            .clone()
    }

    /// The options this compiler publishes, keyed so host and build
    /// machine roles never collide.
    pub fn options(&self) -> HashMap<OptionKey, OptionSpec> {
        let mut choices = vec!["none".to_string()];
        choices.extend(
            standards::known_standards(self.family, self.identity.language)
                .into_iter()
                .map(String::from),
        );

        let key = self.std_option_key();
        let spec = OptionSpec::new(
            format!(
                "{} language standard to use",
                self.identity.language.std_option_language().display_name()
            ),
            choices,
            "none",
        );

        HashMap::from([(key, spec)])
    }

    /// The key this compiler's standard option is published under.
    pub fn std_option_key(&self) -> OptionKey {
        OptionKey::new(
            "std",
            self.identity.language.std_option_language(),
            self.identity.for_machine,
        )
    }

    /// Compile arguments for the resolved option values. Pure; performs
    /// no I/O.
    pub fn option_compile_args(
        &self,
        options: &ResolvedOptions,
    ) -> Result<Vec<String>, ToolchainError> {
        let key = self.std_option_key();
        let Some(value) = options.get(&key) else {
            return Err(ToolchainError::MissingOption { key });
        };
        self.standard_flag_args(value)
    }

    /// Arguments selecting a language standard, or nothing for `"none"`.
    pub fn standard_flag_args(&self, value: &str) -> Result<Vec<String>, ToolchainError> {
        standards::standard_flag_args(&self.identity, self.family, value)
    }

    /// Arguments for an optimization level.
    pub fn optimization_args(&self, level: OptLevel) -> &'static [&'static str] {
        self.family.optimization_args(level)
    }

    /// Warning arguments for a verbosity level.
    ///
    /// For `everything` on families without a catch-all flag, the family's
    /// extra-warning corpus is version-gated and then filtered through the
    /// flag-support probe. The result is deterministic for a given probe
    /// cache state and preserves table order.
    pub fn warn_args(&self, level: WarnLevel) -> Vec<String> {
        let mut args: Vec<String> = self
            .family
            .base_warn_args(level)
            .iter()
            .map(|s| s.to_string())
            .collect();

        if level == WarnLevel::Everything && self.family.probes_everything() {
            let corpus = self
                .family
                .extra_warning_flags(self.identity.language, &self.identity.version);
            args.extend(self.supported_warn_args(&corpus));
        }

        args
    }

    /// Filter candidate warning flags to those the toolchain accepts.
    ///
    /// Rejected flags are dropped silently; toolchain releases vary
    /// continuously and an unsupported warning flag is not an error.
    /// Results are cached per `(toolchain, flag)` for the process
    /// lifetime.
    pub fn supported_warn_args(&self, candidates: &[&str]) -> Vec<String> {
        candidates
            .iter()
            .copied()
            .filter(|&flag| {
                let accepted = self
                    .probe_cache
                    .check(ProbeKey::new(&self.identity, flag), || {
                        self.probe.accepts(&self.identity, flag)
                    });
                if !accepted {
                    tracing::debug!(
                        "dropping warning flag {} rejected by {}",
                        flag,
                        self.identity.invocation[0]
                    );
                }
                accepted
            })
            .map(|s| s.to_string())
            .collect()
    }
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("identity", &self.identity)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

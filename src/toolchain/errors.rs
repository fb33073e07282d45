//! Toolchain error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::options::OptionKey;
use crate::util::diagnostic::Diagnostic;

/// Stage of the sanity check at which a toolchain failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanityStage {
    Compile,
    Link,
    Run,
}

impl SanityStage {
    /// Get the stage name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SanityStage::Compile => "compile",
            SanityStage::Link => "link",
            SanityStage::Run => "run",
        }
    }
}

impl std::fmt::Display for SanityStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error from toolchain capability resolution or verification.
///
/// `Clone` so a sanity verdict can be cached on the compiler and handed
/// out on every subsequent call.
#[derive(Debug, Clone, Error, MietteDiagnostic)]
pub enum ToolchainError {
    /// Requested standard is absent from, or version-gated out of, the
    /// family's table. Never silently downgraded.
    #[error("'{value}' is not a supported {language} standard for {family} {version}")]
    #[diagnostic(
        code(drydock::toolchain::unsupported_standard),
        help("Pick one of the accepted standards, or 'none' to use the compiler default")
    )]
    UnsupportedStandard {
        value: String,
        language: String,
        family: String,
        version: String,
        accepted: Vec<String>,
    },

    /// The toolchain failed its one-time compile/link/run probe. Fatal for
    /// this toolchain for the rest of the configuration.
    #[error("compiler sanity check failed at the {stage} stage")]
    #[diagnostic(
        code(drydock::toolchain::sanity_failure),
        help("Fix the toolchain installation or environment and re-run the configuration")
    )]
    SanityFailure { stage: SanityStage, output: String },

    /// A toolchain binary could not be invoked at all.
    #[error("failed to invoke `{program}`: {message}")]
    #[diagnostic(code(drydock::toolchain::spawn))]
    Spawn { program: String, message: String },

    /// Option registration collided with an existing key.
    #[error("option `{key}` is already registered")]
    #[diagnostic(code(drydock::options::duplicate))]
    DuplicateOption { key: OptionKey },

    /// Option registration after the registry was frozen.
    #[error("option registry is frozen, cannot register `{key}`")]
    #[diagnostic(code(drydock::options::frozen))]
    RegistryFrozen { key: OptionKey },

    /// Resolution asked for an option this compiler never published.
    #[error("no resolved value for option `{key}`")]
    #[diagnostic(code(drydock::options::missing))]
    MissingOption { key: OptionKey },
}

impl ToolchainError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ToolchainError::UnsupportedStandard {
                value,
                language,
                family,
                version,
                accepted,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "'{}' is not a supported {} standard for {} {}",
                    value, language, family, version
                ));
                if !accepted.is_empty() {
                    diag = diag
                        .with_context(format!("accepted standards: {}", accepted.join(", ")));
                }
                diag.with_suggestion(
                    "Use 'none' to fall back to the compiler default".to_string(),
                )
            }

            ToolchainError::SanityFailure { stage, output } => {
                let mut diag = Diagnostic::error(format!(
                    "compiler sanity check failed at the {} stage",
                    stage
                ));
                for line in output.lines().take(20) {
                    diag = diag.with_context(line.to_string());
                }
                diag.with_suggestion(
                    "Fix the toolchain installation and re-run; this toolchain \
                     will not be used for any build job"
                        .to_string(),
                )
            }

            ToolchainError::Spawn { program, message } => {
                Diagnostic::error(format!("failed to invoke `{}`", program))
                    .with_context(message.clone())
                    .with_suggestion("Check that the compiler is installed and on PATH".to_string())
            }

            ToolchainError::DuplicateOption { key } => {
                Diagnostic::error(format!("option `{}` is already registered", key))
            }

            ToolchainError::RegistryFrozen { key } => Diagnostic::error(format!(
                "option registry is frozen, cannot register `{}`",
                key
            )),

            ToolchainError::MissingOption { key } => {
                Diagnostic::error(format!("no resolved value for option `{}`", key))
                    .with_suggestion(format!("Set a value for `{}` before resolving flags", key))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::language::Language;
    use crate::core::machine::MachineChoice;

    #[test]
    fn test_unsupported_standard_diagnostic_lists_accepted() {
        let err = ToolchainError::UnsupportedStandard {
            value: "c17".to_string(),
            language: "c".to_string(),
            family: "gcc".to_string(),
            version: "7.5.0".to_string(),
            accepted: vec!["c89".to_string(), "c99".to_string(), "c11".to_string()],
        };

        let rendered = err.to_diagnostic().format(false);
        assert!(rendered.contains("not a supported c standard"));
        assert!(rendered.contains("c89, c99, c11"));
    }

    #[test]
    fn test_sanity_failure_carries_captured_output() {
        let err = ToolchainError::SanityFailure {
            stage: SanityStage::Compile,
            output: "fatal error: stddef.h: No such file or directory".to_string(),
        };

        let rendered = err.to_diagnostic().format(false);
        assert!(rendered.contains("compile stage"));
        assert!(rendered.contains("stddef.h"));
    }

    #[test]
    fn test_missing_option_names_the_key() {
        let err = ToolchainError::MissingOption {
            key: crate::core::options::OptionKey::new("std", Language::C, MachineChoice::Host),
        };
        assert!(err.to_string().contains("host:c:std"));
    }
}

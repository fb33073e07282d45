//! Build-option identity and the process-wide option registry.
//!
//! An [`OptionKey`] uniquely identifies a configurable option scoped by
//! language and machine role, so a cross build never mixes host and build
//! machine settings. The registry is populated additively while toolchains
//! are discovered, then frozen for the remainder of the configuration.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::core::language::Language;
use crate::core::machine::MachineChoice;
use crate::toolchain::errors::ToolchainError;

/// Unique identifier for a configurable build option.
///
/// Two keys are equal iff name, language, and machine all match. Keys are
/// hashed, never ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionKey {
    /// Option name, e.g. `std`.
    pub name: String,
    /// Language the option applies to.
    pub language: Language,
    /// Machine role the option is scoped to.
    pub machine: MachineChoice,
}

impl OptionKey {
    /// Create a new option key.
    pub fn new(name: impl Into<String>, language: Language, machine: MachineChoice) -> Self {
        OptionKey {
            name: name.into(),
            language,
            machine,
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.machine, self.language, self.name)
    }
}

/// Description of a published option: its accepted values and default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Human-readable description.
    pub description: String,
    /// Accepted values, in publication order.
    pub choices: Vec<String>,
    /// Default value.
    pub default: String,
}

impl OptionSpec {
    /// Create a new option spec.
    pub fn new(
        description: impl Into<String>,
        choices: Vec<String>,
        default: impl Into<String>,
    ) -> Self {
        OptionSpec {
            description: description.into(),
            choices,
            default: default.into(),
        }
    }
}

/// Resolved option values, as produced by the configuration stage.
#[derive(Debug, Clone, Default)]
pub struct ResolvedOptions {
    values: HashMap<OptionKey, String>,
}

impl ResolvedOptions {
    /// Create an empty value set.
    pub fn new() -> Self {
        ResolvedOptions::default()
    }

    /// Set a resolved value.
    pub fn set(&mut self, key: OptionKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    /// Look up a resolved value.
    pub fn get(&self, key: &OptionKey) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Process-scoped option registry with an explicit lifecycle.
///
/// Created at the start of a build configuration, populated additively by
/// each discovered compiler, then frozen once discovery completes. Inserts
/// are key-checked: a duplicate key is an error, never a silent overwrite.
#[derive(Debug, Default)]
pub struct OptionRegistry {
    inner: Mutex<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    options: HashMap<OptionKey, OptionSpec>,
    frozen: bool,
}

impl OptionRegistry {
    /// Create an empty, unfrozen registry.
    pub fn new() -> Self {
        OptionRegistry::default()
    }

    /// Register an option. Fails on duplicate keys and after `freeze`.
    pub fn register(&self, key: OptionKey, spec: OptionSpec) -> Result<(), ToolchainError> {
        let mut state = self.inner.lock().expect("option registry poisoned");
        if state.frozen {
            return Err(ToolchainError::RegistryFrozen { key });
        }
        if state.options.contains_key(&key) {
            return Err(ToolchainError::DuplicateOption { key });
        }
        tracing::debug!("registering option {}", key);
        state.options.insert(key, spec);
        Ok(())
    }

    /// Register every option from a compiler's published set.
    pub fn register_all(
        &self,
        options: impl IntoIterator<Item = (OptionKey, OptionSpec)>,
    ) -> Result<(), ToolchainError> {
        for (key, spec) in options {
            self.register(key, spec)?;
        }
        Ok(())
    }

    /// Freeze the registry; all further inserts are rejected.
    pub fn freeze(&self) {
        let mut state = self.inner.lock().expect("option registry poisoned");
        state.frozen = true;
    }

    /// Whether the registry has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.inner.lock().expect("option registry poisoned").frozen
    }

    /// Snapshot of the registered options.
    pub fn snapshot(&self) -> HashMap<OptionKey, OptionSpec> {
        self.inner
            .lock()
            .expect("option registry poisoned")
            .options
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn std_key(machine: MachineChoice) -> OptionKey {
        OptionKey::new("std", Language::C, machine)
    }

    fn std_spec() -> OptionSpec {
        OptionSpec::new(
            "C language standard",
            vec!["none".to_string(), "c11".to_string()],
            "none",
        )
    }

    #[test]
    fn test_key_equality_covers_all_fields() {
        let host = std_key(MachineChoice::Host);
        let build = std_key(MachineChoice::Build);
        assert_ne!(host, build);
        assert_eq!(host, std_key(MachineChoice::Host));
    }

    #[test]
    fn test_duplicate_insert_is_an_error() {
        let registry = OptionRegistry::new();
        registry.register(std_key(MachineChoice::Host), std_spec()).unwrap();

        let err = registry
            .register(std_key(MachineChoice::Host), std_spec())
            .unwrap_err();
        assert!(matches!(err, ToolchainError::DuplicateOption { .. }));

        // Host and build machine keys never collide.
        registry.register(std_key(MachineChoice::Build), std_spec()).unwrap();
    }

    #[test]
    fn test_insert_after_freeze_is_rejected() {
        let registry = OptionRegistry::new();
        registry.freeze();
        assert!(registry.is_frozen());

        let err = registry
            .register(std_key(MachineChoice::Host), std_spec())
            .unwrap_err();
        assert!(matches!(err, ToolchainError::RegistryFrozen { .. }));
    }

    #[test]
    fn test_resolved_options_lookup() {
        let mut resolved = ResolvedOptions::new();
        resolved.set(std_key(MachineChoice::Host), "c11");

        assert_eq!(resolved.get(&std_key(MachineChoice::Host)), Some("c11"));
        assert_eq!(resolved.get(&std_key(MachineChoice::Build)), None);
    }
}

//! Language frontends and their per-language constants.
//!
//! Each frontend supplies a display name, a source extension, and the
//! minimal probe source used by the sanity check. Objective-C shares the
//! C standard set, so its standard option is published under the C tag.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source language handled by a compiler instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C language (default)
    #[default]
    C,
    /// Objective-C language
    #[serde(alias = "objective-c", alias = "obj-c")]
    ObjC,
}

impl Language {
    /// Get the language tag as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::ObjC => "objc",
        }
    }

    /// Human-readable language name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::C => "C",
            Language::ObjC => "Objective-C",
        }
    }

    /// File extension for source files in this language.
    pub fn source_extension(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::ObjC => "m",
        }
    }

    /// Minimal source fragment guaranteed to compile under default settings.
    ///
    /// Written into a scoped work directory by the sanity check; never
    /// user-visible.
    pub fn sanity_source(&self) -> &'static str {
        match self {
            Language::C => "#include <stddef.h>\nint main(void) { return 0; }\n",
            Language::ObjC => "#import <stddef.h>\nint main(void) { return 0; }\n",
        }
    }

    /// The language whose standard set this frontend uses.
    ///
    /// Objective-C accepts the C standards, so its std option is keyed
    /// under `c` and resolved against the C tables.
    pub fn std_option_language(&self) -> Language {
        match self {
            Language::C | Language::ObjC => Language::C,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(Language::C),
            "objc" | "objective-c" | "obj-c" => Ok(Language::ObjC),
            _ => Err(LanguageParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown language tag.
#[derive(Debug, Clone)]
pub struct LanguageParseError(pub String);

impl fmt::Display for LanguageParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language '{}', valid values: c, objc", self.0)
    }
}

impl std::error::Error for LanguageParseError {}

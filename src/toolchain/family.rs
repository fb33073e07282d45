//! Toolchain family variants and their warning policies.
//!
//! Families share the C-like warning ladder but diverge on `everything`:
//! Clang has a single catch-all flag, while GCC builds the list from a
//! version-gated corpus filtered through a live flag-support probe.
//! Apple's Clang is a refinement of Clang that overrides only the table
//! entries that differ; everything else delegates to its parent.

use std::fmt;

use semver::Version;

use crate::core::language::Language;

use super::{OptLevel, WarnLevel};

/// Toolchain family: a group of compilers sharing flag conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FamilyVariant {
    /// GCC (GNU Compiler Collection)
    Gnu,
    /// Clang/LLVM
    Clang,
    /// Apple Clang (macOS)
    AppleClang,
}

/// A flag that only newer family releases accept.
///
/// `since` is `(major, minor)` of the first release with the flag; `None`
/// means every release the family tables cover.
#[derive(Debug, Clone, Copy)]
pub struct GatedFlag {
    pub flag: &'static str,
    pub since: Option<(u64, u64)>,
}

const fn flag(flag: &'static str) -> GatedFlag {
    GatedFlag { flag, since: None }
}

const fn flag_since(flag: &'static str, major: u64, minor: u64) -> GatedFlag {
    GatedFlag {
        flag,
        since: Some((major, minor)),
    }
}

/// Warning ladder shared by the GCC and Clang families.
const DEFAULT_WARN_ARGS: &[&str] = &["-Wall", "-Winvalid-pch"];
const WARN_ARGS_2: &[&str] = &["-Wall", "-Winvalid-pch", "-Wextra"];
const WARN_ARGS_3: &[&str] = &["-Wall", "-Winvalid-pch", "-Wextra", "-Wpedantic"];

/// Extra warnings GCC knows beyond the ladder, used for `everything`.
const GNU_COMMON_WARNING_ARGS: &[GatedFlag] = &[
    flag("-Wcast-qual"),
    flag("-Wconversion"),
    flag("-Wfloat-equal"),
    flag("-Wformat=2"),
    flag("-Winit-self"),
    flag("-Wmissing-declarations"),
    flag("-Wmissing-include-dirs"),
    flag("-Wredundant-decls"),
    flag("-Wshadow"),
    flag("-Wundef"),
    flag("-Wuninitialized"),
    flag("-Wwrite-strings"),
    flag_since("-Wdisabled-optimization", 3, 2),
    flag_since("-Wpacked", 3, 2),
    flag_since("-Wvla", 4, 3),
    flag_since("-Wdouble-promotion", 4, 6),
    flag_since("-Wtrampolines", 4, 6),
    flag_since("-Wshift-negative-value", 6, 1),
    flag_since("-Wduplicated-cond", 6, 1),
    flag_since("-Wduplicated-branches", 7, 1),
];

/// Objective-C selector checking warnings (GCC family only).
const GNU_OBJC_WARNING_ARGS: &[GatedFlag] = &[
    flag("-Wselector"),
    flag_since("-Wstrict-selector-match", 3, 3),
    flag_since("-Wundeclared-selector", 4, 1),
];

const GNU_OPT_PLAIN: &[&str] = &[];
const GNU_OPT_0: &[&str] = &["-O0"];
const GNU_OPT_G: &[&str] = &["-Og"];
const GNU_OPT_1: &[&str] = &["-O1"];
const GNU_OPT_2: &[&str] = &["-O2"];
const GNU_OPT_3: &[&str] = &["-O3"];
const GNU_OPT_S: &[&str] = &["-Os"];
const CLANG_OPT_S: &[&str] = &["-Oz"];

impl FamilyVariant {
    /// Get the family name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            FamilyVariant::Gnu => "gcc",
            FamilyVariant::Clang => "clang",
            FamilyVariant::AppleClang => "apple-clang",
        }
    }

    /// The family this variant refines, if any.
    ///
    /// Vendor variants delegate to their parent's tables and override only
    /// the entries that differ.
    pub fn parent(&self) -> Option<FamilyVariant> {
        match self {
            FamilyVariant::AppleClang => Some(FamilyVariant::Clang),
            FamilyVariant::Gnu | FamilyVariant::Clang => None,
        }
    }

    /// Fixed warning flags for a level, before any probe filtering.
    ///
    /// Level 0 is an explicit empty entry, not a lookup miss. For
    /// `everything` this returns only the fixed part; the probed corpus is
    /// appended by [`Compiler::warn_args`](super::Compiler::warn_args).
    pub fn base_warn_args(&self, level: WarnLevel) -> &'static [&'static str] {
        match level {
            WarnLevel::W0 => &[],
            WarnLevel::W1 => DEFAULT_WARN_ARGS,
            WarnLevel::W2 => WARN_ARGS_2,
            WarnLevel::W3 => WARN_ARGS_3,
            WarnLevel::Everything => match self {
                // Clang's "everything" really is everything.
                FamilyVariant::Clang | FamilyVariant::AppleClang => &["-Weverything"],
                FamilyVariant::Gnu => WARN_ARGS_3,
            },
        }
    }

    /// Whether `everything` is expanded from a probed corpus rather than a
    /// single catch-all flag.
    pub fn probes_everything(&self) -> bool {
        match self {
            FamilyVariant::Gnu => true,
            FamilyVariant::Clang | FamilyVariant::AppleClang => false,
        }
    }

    /// Extra-warning candidates for `everything`, gated by the detected
    /// compiler version. Order is preserved; downstream concatenation is
    /// order-sensitive.
    pub fn extra_warning_flags(&self, language: Language, version: &Version) -> Vec<&'static str> {
        if !self.probes_everything() {
            return Vec::new();
        }

        let mut corpus: Vec<&'static GatedFlag> = GNU_COMMON_WARNING_ARGS.iter().collect();
        if language == Language::ObjC {
            corpus.extend(GNU_OBJC_WARNING_ARGS.iter());
        }

        corpus
            .into_iter()
            .filter(|g| version_gate_ok(version, g.since))
            .map(|g| g.flag)
            .collect()
    }

    /// Optimization flags for a level.
    pub fn optimization_args(&self, level: OptLevel) -> &'static [&'static str] {
        match level {
            OptLevel::Plain => GNU_OPT_PLAIN,
            OptLevel::O0 => GNU_OPT_0,
            OptLevel::G => GNU_OPT_G,
            OptLevel::O1 => GNU_OPT_1,
            OptLevel::O2 => GNU_OPT_2,
            OptLevel::O3 => GNU_OPT_3,
            OptLevel::Os => match self {
                FamilyVariant::Gnu => GNU_OPT_S,
                FamilyVariant::Clang | FamilyVariant::AppleClang => CLANG_OPT_S,
            },
        }
    }
}

/// Check a `(major, minor)` gate against a detected version.
pub(crate) fn version_gate_ok(version: &Version, since: Option<(u64, u64)>) -> bool {
    match since {
        None => true,
        Some((major, minor)) => *version >= Version::new(major, minor, 0),
    }
}

impl fmt::Display for FamilyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FamilyVariant {
    type Err = FamilyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gcc" | "gnu" => Ok(FamilyVariant::Gnu),
            "clang" => Ok(FamilyVariant::Clang),
            "apple-clang" | "appleclang" => Ok(FamilyVariant::AppleClang),
            _ => Err(FamilyParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown family name.
#[derive(Debug, Clone)]
pub struct FamilyParseError(pub String);

impl fmt::Display for FamilyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown toolchain family '{}', valid values: gcc, clang, apple-clang",
            self.0
        )
    }
}

impl std::error::Error for FamilyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_zero_is_empty_for_all_families() {
        for family in [
            FamilyVariant::Gnu,
            FamilyVariant::Clang,
            FamilyVariant::AppleClang,
        ] {
            assert!(family.base_warn_args(WarnLevel::W0).is_empty());
        }
    }

    #[test]
    fn test_warning_ladder_shape() {
        let family = FamilyVariant::Gnu;
        assert_eq!(
            family.base_warn_args(WarnLevel::W1),
            &["-Wall", "-Winvalid-pch"]
        );
        assert_eq!(
            family.base_warn_args(WarnLevel::W3),
            &["-Wall", "-Winvalid-pch", "-Wextra", "-Wpedantic"]
        );
    }

    #[test]
    fn test_clang_everything_is_a_single_flag() {
        assert_eq!(
            FamilyVariant::Clang.base_warn_args(WarnLevel::Everything),
            &["-Weverything"]
        );
        assert!(!FamilyVariant::Clang.probes_everything());
        assert!(FamilyVariant::Gnu.probes_everything());
    }

    #[test]
    fn test_corpus_is_version_gated() {
        let old = FamilyVariant::Gnu.extra_warning_flags(Language::C, &Version::new(4, 8, 0));
        assert!(old.contains(&"-Wvla"));
        assert!(!old.contains(&"-Wduplicated-branches"));

        let new = FamilyVariant::Gnu.extra_warning_flags(Language::C, &Version::new(12, 1, 0));
        assert!(new.contains(&"-Wduplicated-branches"));
    }

    #[test]
    fn test_objc_corpus_adds_selector_warnings() {
        let version = Version::new(12, 1, 0);
        let c = FamilyVariant::Gnu.extra_warning_flags(Language::C, &version);
        let objc = FamilyVariant::Gnu.extra_warning_flags(Language::ObjC, &version);

        assert!(!c.contains(&"-Wselector"));
        assert!(objc.contains(&"-Wselector"));
        assert!(objc.contains(&"-Wundeclared-selector"));
    }

    #[test]
    fn test_apple_clang_delegates_to_clang() {
        assert_eq!(
            FamilyVariant::AppleClang.parent(),
            Some(FamilyVariant::Clang)
        );
        assert_eq!(FamilyVariant::Gnu.parent(), None);
    }

    #[test]
    fn test_size_optimization_differs_per_family() {
        assert_eq!(FamilyVariant::Gnu.optimization_args(OptLevel::Os), &["-Os"]);
        assert_eq!(
            FamilyVariant::Clang.optimization_args(OptLevel::Os),
            &["-Oz"]
        );
        assert!(FamilyVariant::Gnu
            .optimization_args(OptLevel::Plain)
            .is_empty());
    }
}

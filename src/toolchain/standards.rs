//! Language-standard tables, per family and version.
//!
//! Each family accepts a set of standard identifiers; some are gated on a
//! minimum compiler release. Resolution either emits exactly one `-std=`
//! flag or fails with `UnsupportedStandard` - a requested standard is never
//! silently downgraded to a different one.

use semver::Version;

use crate::core::language::Language;

use super::family::{version_gate_ok, FamilyVariant};
use super::CompilerIdentity;
use crate::toolchain::errors::ToolchainError;

/// A standard a family accepts, possibly gated on a minimum release.
///
/// `since` is `(major, minor)` of the first release accepting the
/// standard; `None` means every release the table covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardEntry {
    pub id: &'static str,
    pub since: Option<(u64, u64)>,
}

const fn std_entry(id: &'static str) -> StandardEntry {
    StandardEntry { id, since: None }
}

const fn std_since(id: &'static str, major: u64, minor: u64) -> StandardEntry {
    StandardEntry {
        id,
        since: Some((major, minor)),
    }
}

/// C standards accepted by GCC, with the release that introduced each.
const GNU_C_STDS: &[StandardEntry] = &[
    std_entry("c89"),
    std_entry("c99"),
    std_entry("c11"),
    std_since("c17", 8, 0),
    std_since("c18", 8, 0),
    std_since("c2x", 9, 0),
    std_since("c23", 14, 0),
    std_entry("gnu89"),
    std_entry("gnu99"),
    std_entry("gnu11"),
    std_since("gnu17", 8, 0),
    std_since("gnu18", 8, 0),
    std_since("gnu2x", 9, 0),
    std_since("gnu23", 14, 0),
];

/// C standards accepted by upstream Clang.
const CLANG_C_STDS: &[StandardEntry] = &[
    std_entry("c89"),
    std_entry("c99"),
    std_entry("c11"),
    std_since("c17", 6, 0),
    std_since("c18", 6, 0),
    std_since("c2x", 9, 0),
    std_since("c23", 18, 0),
    std_entry("gnu89"),
    std_entry("gnu99"),
    std_entry("gnu11"),
    std_since("gnu17", 6, 0),
    std_since("gnu18", 6, 0),
    std_since("gnu2x", 9, 0),
    std_since("gnu23", 18, 0),
];

/// Apple reuses Clang's table but versions it on Apple's own release
/// numbering, so the gated entries are overridden. Standards Apple has not
/// shipped at all are removed.
const APPLE_CLANG_STD_OVERRIDES: &[StandardEntry] = &[
    std_since("c17", 10, 0),
    std_since("c18", 10, 0),
    std_since("gnu17", 10, 0),
    std_since("gnu18", 10, 0),
    std_since("c2x", 13, 0),
    std_since("gnu2x", 13, 0),
];

const APPLE_CLANG_STD_REMOVALS: &[&str] = &["c23", "gnu23"];

/// The standards a family's table covers for a language, gates included.
///
/// Vendor variants start from their parent's table and apply explicit
/// per-entry overrides rather than redefining the whole set.
pub fn family_standards(family: FamilyVariant, language: Language) -> Vec<StandardEntry> {
    // Objective-C resolves against the C table.
    let language = language.std_option_language();
    debug_assert_eq!(language, Language::C);

    match family {
        FamilyVariant::Gnu => GNU_C_STDS.to_vec(),
        FamilyVariant::Clang => CLANG_C_STDS.to_vec(),
        FamilyVariant::AppleClang => {
            let parent = family
                .parent()
                .expect("vendor variant must have a parent family");
            let mut entries = family_standards(parent, language);
            entries.retain(|e| !APPLE_CLANG_STD_REMOVALS.contains(&e.id));
            for entry in &mut entries {
                if let Some(over) = APPLE_CLANG_STD_OVERRIDES.iter().find(|o| o.id == entry.id)
                {
                    entry.since = over.since;
                }
            }
            entries
        }
    }
}

/// All standard identifiers a family knows for a language, ignoring gates.
///
/// This is the published choice list for the std option; version gating is
/// enforced at resolution time, not at publication time.
pub fn known_standards(family: FamilyVariant, language: Language) -> Vec<&'static str> {
    family_standards(family, language)
        .iter()
        .map(|e| e.id)
        .collect()
}

/// Resolve a standard-option value to compiler arguments.
///
/// `"none"` means the tool default and emits nothing. Anything else must be
/// in the family's table and pass its version gate, otherwise resolution
/// fails; there is no fallback standard.
pub fn standard_flag_args(
    identity: &CompilerIdentity,
    family: FamilyVariant,
    value: &str,
) -> Result<Vec<String>, ToolchainError> {
    if value == "none" {
        return Ok(Vec::new());
    }

    let entries = family_standards(family, identity.language);
    let accepted = |entries: &[StandardEntry]| {
        entries
            .iter()
            .filter(|e| version_gate_ok(&identity.version, e.since))
            .map(|e| e.id.to_string())
            .collect::<Vec<_>>()
    };

    let Some(entry) = entries.iter().find(|e| e.id == value) else {
        return Err(ToolchainError::UnsupportedStandard {
            value: value.to_string(),
            language: identity.language.std_option_language().to_string(),
            family: family.as_str().to_string(),
            version: identity.version_raw.clone(),
            accepted: accepted(&entries),
        });
    };

    if !version_gate_ok(&identity.version, entry.since) {
        return Err(ToolchainError::UnsupportedStandard {
            value: value.to_string(),
            language: identity.language.std_option_language().to_string(),
            family: family.as_str().to_string(),
            version: identity.version_raw.clone(),
            accepted: accepted(&entries),
        });
    }

    Ok(vec![format!("-std={}", value)])
}

/// Parse a compiler-reported version leniently.
///
/// Toolchains report versions like "15.0" or "9"; pad the missing
/// components and strip any vendor suffix after the numeric part.
pub fn parse_loose_version(s: &str) -> Option<Version> {
    let s = s.trim().trim_start_matches('v');
    if let Ok(v) = Version::parse(s) {
        return Some(v);
    }

    let numeric: String = s
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let mut parts = numeric.split('.').filter(|p| !p.is_empty());

    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let patch = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    Some(Version::new(major, minor, patch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::machine::MachineChoice;

    fn identity(family_version: &str) -> CompilerIdentity {
        CompilerIdentity::new(
            vec!["cc".to_string()],
            family_version,
            None,
            Language::C,
            MachineChoice::Host,
            false,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_clang_15_accepts_c17() {
        let args =
            standard_flag_args(&identity("15.0"), FamilyVariant::Clang, "c17").unwrap();
        assert_eq!(args, vec!["-std=c17".to_string()]);
    }

    #[test]
    fn test_none_emits_no_flag() {
        for family in [
            FamilyVariant::Gnu,
            FamilyVariant::Clang,
            FamilyVariant::AppleClang,
        ] {
            let args = standard_flag_args(&identity("12.0"), family, "none").unwrap();
            assert!(args.is_empty());
        }
    }

    #[test]
    fn test_unknown_standard_is_an_error() {
        let err = standard_flag_args(&identity("15.0"), FamilyVariant::Clang, "c++17")
            .unwrap_err();
        assert!(matches!(err, ToolchainError::UnsupportedStandard { .. }));
    }

    #[test]
    fn test_version_gate_rejects_old_release() {
        // GCC 7.5 predates -std=c17 (GCC 8).
        let err =
            standard_flag_args(&identity("7.5.0"), FamilyVariant::Gnu, "c17").unwrap_err();
        match err {
            ToolchainError::UnsupportedStandard {
                value,
                version,
                accepted,
                ..
            } => {
                assert_eq!(value, "c17");
                assert_eq!(version, "7.5.0");
                assert!(accepted.contains(&"c11".to_string()));
                assert!(!accepted.contains(&"c17".to_string()));
            }
            other => panic!("expected UnsupportedStandard, got {:?}", other),
        }
    }

    #[test]
    fn test_gate_passes_on_new_release() {
        let args = standard_flag_args(&identity("9.3.0"), FamilyVariant::Gnu, "c2x").unwrap();
        assert_eq!(args, vec!["-std=c2x".to_string()]);
    }

    #[test]
    fn test_apple_clang_overrides_parent_gates() {
        // LLVM Clang 10 accepts c2x (gate 9.0); Apple Clang 10 does not
        // (Apple gate 13.0).
        assert!(standard_flag_args(&identity("10.0"), FamilyVariant::Clang, "c2x").is_ok());
        assert!(
            standard_flag_args(&identity("10.0"), FamilyVariant::AppleClang, "c2x").is_err()
        );

        // c23 is removed from Apple's table entirely.
        let apple = known_standards(FamilyVariant::AppleClang, Language::C);
        assert!(!apple.contains(&"c23"));
        assert!(known_standards(FamilyVariant::Clang, Language::C).contains(&"c23"));
    }

    #[test]
    fn test_objc_uses_c_table() {
        let c = known_standards(FamilyVariant::Clang, Language::C);
        let objc = known_standards(FamilyVariant::Clang, Language::ObjC);
        assert_eq!(c, objc);
    }

    #[test]
    fn test_parse_loose_version_pads_components() {
        assert_eq!(parse_loose_version("15.0"), Some(Version::new(15, 0, 0)));
        assert_eq!(parse_loose_version("9"), Some(Version::new(9, 0, 0)));
        assert_eq!(
            parse_loose_version("11.4.0"),
            Some(Version::new(11, 4, 0))
        );
        assert_eq!(parse_loose_version("not-a-version"), None);
    }
}

//! Machine roles for cross-compilation-aware option scoping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which machine a toolchain produces code for.
///
/// A cross-compiling configuration tracks independent option sets for the
/// machine performing the build and the machine the produced binaries run
/// on. Native builds use `Host` for everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MachineChoice {
    /// Tools that run on the machine doing the build.
    Build,
    /// The machine produced binaries will run on (default).
    #[default]
    Host,
}

impl MachineChoice {
    /// Get the machine role as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineChoice::Build => "build",
            MachineChoice::Host => "host",
        }
    }
}

impl fmt::Display for MachineChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MachineChoice {
    type Err = MachineParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "build" => Ok(MachineChoice::Build),
            "host" => Ok(MachineChoice::Host),
            _ => Err(MachineParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown machine role.
#[derive(Debug, Clone)]
pub struct MachineParseError(pub String);

impl fmt::Display for MachineParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown machine role '{}', valid values: build, host", self.0)
    }
}

impl std::error::Error for MachineParseError {}

//! Flag-support probing.
//!
//! Whether a toolchain accepts a given flag is runtime capability
//! discovery. It is modeled as an explicit query so tests can inject a
//! fake instead of invoking a real compiler, with results cached per
//! `(toolchain, flag)` for the process lifetime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::util::process::ProcessBuilder;

use super::CompilerIdentity;

/// Query whether a toolchain accepts a candidate flag.
///
/// Implementations must be side-effect free from the caller's point of
/// view; the result is cached by [`ProbeCache`].
pub trait FlagProbe: Send + Sync {
    fn accepts(&self, identity: &CompilerIdentity, flag: &str) -> bool;
}

/// Cache key: toolchain identity plus the probed flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProbeKey {
    toolchain: String,
    flag: String,
}

impl ProbeKey {
    /// Build a key from a compiler identity and a candidate flag.
    pub fn new(identity: &CompilerIdentity, flag: &str) -> Self {
        ProbeKey {
            toolchain: format!("{} {}", identity.invocation.join(" "), identity.version_raw),
            flag: flag.to_string(),
        }
    }
}

/// Process-lifetime cache of probe results.
///
/// Each key holds a `OnceLock`, so at most one probe runs per
/// `(toolchain, flag)`; concurrent callers block on the cell and reuse the
/// first result instead of re-probing.
#[derive(Debug, Default)]
pub struct ProbeCache {
    entries: Mutex<HashMap<ProbeKey, Arc<OnceLock<bool>>>>,
}

impl ProbeCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        ProbeCache::default()
    }

    /// Look up a probe result, running `probe` only on the first call for
    /// this key.
    pub fn check(&self, key: ProbeKey, probe: impl FnOnce() -> bool) -> bool {
        let cell = {
            let mut entries = self.entries.lock().expect("probe cache poisoned");
            Arc::clone(entries.entry(key).or_default())
        };
        // The lock is released before probing; the OnceLock serializes
        // concurrent probes for the same key.
        *cell.get_or_init(probe)
    }

    /// Number of cached results (probes completed or in flight).
    pub fn len(&self) -> usize {
        self.entries.lock().expect("probe cache poisoned").len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Probe that compiles a trivial source with the candidate flag.
///
/// Runs the toolchain with `-Werror` so a diagnostic about an unknown
/// flag fails the compile instead of warning. The scoped work directory
/// is removed on all exit paths.
#[derive(Debug, Default)]
pub struct CommandFlagProbe;

impl FlagProbe for CommandFlagProbe {
    fn accepts(&self, identity: &CompilerIdentity, flag: &str) -> bool {
        let dir = match tempfile::Builder::new().prefix("drydock-probe").tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::debug!("flag probe could not create work dir: {}", e);
                return false;
            }
        };

        let source = dir
            .path()
            .join(format!("probe.{}", identity.language.source_extension()));
        if std::fs::write(&source, identity.language.sanity_source()).is_err() {
            return false;
        }
        let object = dir.path().join("probe.o");

        let result = ProcessBuilder::new(&identity.invocation[0])
            .args(&identity.invocation[1..])
            .arg("-Werror")
            .arg(flag)
            .arg("-c")
            .arg(&source)
            .arg("-o")
            .arg(&object)
            .cwd(dir.path())
            .exec();

        match result {
            Ok(output) => {
                let ok = output.status.success();
                tracing::debug!(
                    "probed {} for {}: {}",
                    identity.invocation[0],
                    flag,
                    if ok { "accepted" } else { "rejected" }
                );
                ok
            }
            Err(e) => {
                tracing::debug!("flag probe failed to run: {}", e);
                false
            }
        }
    }
}

//! One-time toolchain sanity checking.
//!
//! Before a discovered toolchain is trusted for real builds it must
//! compile and link a minimal probe program, and - unless the build is
//! cross-compiling - run it. A failure at any stage is fatal for that
//! toolchain for the remainder of the configuration; nothing is retried
//! with different flags.

use std::path::Path;

use crate::toolchain::errors::{SanityStage, ToolchainError};
use crate::util::process::ProcessBuilder;

use super::CompilerIdentity;

/// Environment handed to the sanity check by the configuration stage.
#[derive(Debug, Clone, Default)]
pub struct ProbeEnvironment {
    /// Extra environment variables for toolchain invocations.
    pub env: Vec<(String, String)>,
    /// Extra compile arguments required by the configuration (sysroots,
    /// target selection, and the like).
    pub extra_compile_args: Vec<String>,
}

/// Run the compile/link/run probe for a toolchain.
///
/// The probe source is written into a scoped subdirectory of `work_dir`
/// which is removed on every exit path, including interruption.
pub(crate) fn run_sanity_check(
    identity: &CompilerIdentity,
    work_dir: &Path,
    env: &ProbeEnvironment,
) -> Result<(), ToolchainError> {
    std::fs::create_dir_all(work_dir).map_err(|e| ToolchainError::Spawn {
        program: identity.invocation[0].clone(),
        message: format!("cannot create work dir {}: {}", work_dir.display(), e),
    })?;

    let dir = tempfile::Builder::new()
        .prefix("sanity")
        .tempdir_in(work_dir)
        .map_err(|e| ToolchainError::Spawn {
            program: identity.invocation[0].clone(),
            message: format!("cannot create scoped work dir: {}", e),
        })?;

    let source = dir.path().join(format!(
        "sanitycheck.{}",
        identity.language.source_extension()
    ));
    std::fs::write(&source, identity.language.sanity_source()).map_err(|e| {
        ToolchainError::Spawn {
            program: identity.invocation[0].clone(),
            message: format!("cannot write probe source: {}", e),
        }
    })?;

    let object = dir.path().join("sanitycheck.o");
    let binary = dir
        .path()
        .join(format!("sanitycheck{}", std::env::consts::EXE_SUFFIX));

    // Stage 1: compile.
    tracing::debug!(
        "sanity-checking {} ({})",
        identity.invocation.join(" "),
        identity.language.display_name()
    );
    let output = toolchain_command(identity, env)
        .args(&env.extra_compile_args)
        .arg("-c")
        .arg(&source)
        .arg("-o")
        .arg(&object)
        .cwd(dir.path())
        .exec()
        .map_err(|e| spawn_error(identity, e))?;
    if !output.status.success() || !object.exists() {
        return Err(ToolchainError::SanityFailure {
            stage: SanityStage::Compile,
            output: merged_output(&output),
        });
    }

    // Stage 2: link.
    let output = toolchain_command(identity, env)
        .arg(&object)
        .arg("-o")
        .arg(&binary)
        .cwd(dir.path())
        .exec()
        .map_err(|e| spawn_error(identity, e))?;
    if !output.status.success() || !binary.exists() {
        return Err(ToolchainError::SanityFailure {
            stage: SanityStage::Link,
            output: merged_output(&output),
        });
    }

    // Stage 3: run. Cross builds cannot execute host-foreign binaries and
    // are accepted once the link succeeds.
    if identity.is_cross {
        tracing::debug!("cross build: skipping sanity-check execution");
        return Ok(());
    }

    let output = ProcessBuilder::new(&binary)
        .cwd(dir.path())
        .exec()
        .map_err(|e| ToolchainError::SanityFailure {
            stage: SanityStage::Run,
            output: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(ToolchainError::SanityFailure {
            stage: SanityStage::Run,
            output: merged_output(&output),
        });
    }

    Ok(())
}

fn toolchain_command(identity: &CompilerIdentity, env: &ProbeEnvironment) -> ProcessBuilder {
    let mut cmd = ProcessBuilder::new(&identity.invocation[0]).args(&identity.invocation[1..]);
    for (key, value) in &env.env {
        cmd = cmd.env(key, value);
    }
    cmd
}

fn spawn_error(identity: &CompilerIdentity, e: anyhow::Error) -> ToolchainError {
    ToolchainError::Spawn {
        program: identity.invocation[0].clone(),
        message: format!("{:#}", e),
    }
}

fn merged_output(output: &std::process::Output) -> String {
    let mut merged = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        if !merged.is_empty() {
            merged.push('\n');
        }
        merged.push_str(&stderr);
    }
    merged
}

#[cfg(unix)]
#[cfg(test)]
mod tests {
    use super::*;

    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    use crate::core::language::Language;
    use crate::core::machine::MachineChoice;

    fn identity_for(invocation: Vec<String>, is_cross: bool) -> CompilerIdentity {
        CompilerIdentity::new(
            invocation,
            "1.0.0",
            None,
            Language::C,
            MachineChoice::Host,
            is_cross,
            None,
        )
        .unwrap()
    }

    /// Write an executable shell script into `dir` and return its path.
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    /// Fake compiler: produces a runnable shell script at the -o target.
    fn fake_working_compiler(dir: &Path) -> PathBuf {
        write_script(
            dir,
            "fakecc",
            r#"#!/bin/sh
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then shift; out="$1"; fi
  shift
done
[ -n "$out" ] || exit 1
printf '#!/bin/sh\nexit 0\n' > "$out"
chmod +x "$out"
exit 0
"#,
        )
    }

    /// Fake compiler: produces an empty, non-runnable -o target.
    fn fake_nonrunnable_compiler(dir: &Path) -> PathBuf {
        write_script(
            dir,
            "fakecc-norun",
            r#"#!/bin/sh
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then shift; out="$1"; fi
  shift
done
[ -n "$out" ] || exit 1
: > "$out"
exit 0
"#,
        )
    }

    #[test]
    fn test_working_toolchain_passes() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cc = fake_working_compiler(tmp.path());
        let identity = identity_for(vec![cc.display().to_string()], false);

        let work = tmp.path().join("work");
        run_sanity_check(&identity, &work, &ProbeEnvironment::default()).unwrap();
    }

    #[test]
    fn test_compile_failure_reports_compile_stage() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cc = write_script(
            tmp.path(),
            "failcc",
            "#!/bin/sh\necho 'probe.c: unknown type name' >&2\nexit 1\n",
        );
        let identity = identity_for(vec![cc.display().to_string()], false);

        let err = run_sanity_check(&identity, tmp.path(), &ProbeEnvironment::default())
            .unwrap_err();
        match err {
            ToolchainError::SanityFailure { stage, output } => {
                assert_eq!(stage, SanityStage::Compile);
                assert!(output.contains("unknown type name"));
            }
            other => panic!("expected SanityFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_cross_build_never_runs_the_artifact() {
        let tmp = tempfile::TempDir::new().unwrap();
        // The produced artifact is not runnable; only a cross build can
        // pass with it.
        let cc = fake_nonrunnable_compiler(tmp.path());

        let cross = identity_for(vec![cc.display().to_string()], true);
        run_sanity_check(&cross, tmp.path(), &ProbeEnvironment::default()).unwrap();

        let native = identity_for(vec![cc.display().to_string()], false);
        let err =
            run_sanity_check(&native, tmp.path(), &ProbeEnvironment::default()).unwrap_err();
        assert!(matches!(
            err,
            ToolchainError::SanityFailure {
                stage: SanityStage::Run,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_compiler_is_a_spawn_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let identity = identity_for(vec!["/nonexistent/drydock-cc".to_string()], false);

        let err = run_sanity_check(&identity, tmp.path(), &ProbeEnvironment::default())
            .unwrap_err();
        assert!(matches!(err, ToolchainError::Spawn { .. }));
    }

    #[test]
    fn test_scoped_work_dir_is_removed() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cc = fake_working_compiler(tmp.path());
        let identity = identity_for(vec![cc.display().to_string()], false);

        let work = tmp.path().join("work");
        run_sanity_check(&identity, &work, &ProbeEnvironment::default()).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(&work).unwrap().collect();
        assert!(leftovers.is_empty(), "probe directory leaked: {:?}", leftovers);
    }
}

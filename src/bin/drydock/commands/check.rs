//! `drydock check` command

use anyhow::{bail, Result};

use drydock::util::diagnostic;
use drydock::{Compiler, ProbeEnvironment};

use crate::cli::CheckArgs;
use crate::detect;

pub fn execute(args: CheckArgs, no_color: bool) -> Result<()> {
    let discovered = detect::discover(&args.toolchain)?;
    let compiler = Compiler::new(discovered.identity, discovered.family);

    let scratch;
    let work_dir = match args.work_dir {
        Some(ref dir) => dir.clone(),
        None => {
            scratch = tempfile::TempDir::new()?;
            scratch.path().to_path_buf()
        }
    };

    let env = ProbeEnvironment {
        env: Vec::new(),
        extra_compile_args: discovered.extra_cflags,
    };

    println!(
        "Checking {} {} ({})...",
        compiler.family(),
        compiler.identity().version_raw,
        compiler.display_language()
    );

    match compiler.sanity_check(&work_dir, &env) {
        Ok(()) => {
            println!("ok: toolchain compiles, links, and runs a probe program");
            Ok(())
        }
        Err(e) => {
            diagnostic::emit(&e.to_diagnostic(), !no_color);
            bail!("toolchain is not usable");
        }
    }
}

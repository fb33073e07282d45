//! `drydock flags` command

use anyhow::{bail, Result};

use drydock::util::diagnostic;
use drydock::{Compiler, OptLevel, ResolvedOptions, ToolchainError, WarnLevel};

use crate::cli::FlagsArgs;
use crate::detect;

pub fn execute(args: FlagsArgs, no_color: bool) -> Result<()> {
    let warnings: WarnLevel = args
        .warnings
        .parse()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let opt: OptLevel = args.opt.parse().map_err(|e| anyhow::anyhow!("{}", e))?;

    let discovered = detect::discover(&args.toolchain)?;
    let compiler = Compiler::new(discovered.identity, discovered.family);

    let mut resolved = ResolvedOptions::new();
    resolved.set(compiler.std_option_key(), args.std.clone());

    let std_args = match compiler.option_compile_args(&resolved) {
        Ok(args) => args,
        Err(e @ ToolchainError::UnsupportedStandard { .. }) => {
            diagnostic::emit(&e.to_diagnostic(), !no_color);
            bail!("cannot resolve flags");
        }
        Err(e) => return Err(e.into()),
    };

    let warn_args = compiler.warn_args(warnings);
    let opt_args: Vec<String> = compiler
        .optimization_args(opt)
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut all = Vec::new();
    all.extend(std_args.iter().cloned());
    all.extend(opt_args.iter().cloned());
    all.extend(warn_args.iter().cloned());

    if args.json {
        let payload = serde_json::json!({
            "std": std_args,
            "optimization": opt_args,
            "warnings": warn_args,
            "all": all,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("# Flags for {} level={} opt={}:", compiler.family(), warnings, opt);
        println!("{}", all.join(" "));
    }

    Ok(())
}

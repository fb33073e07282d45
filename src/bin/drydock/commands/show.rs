//! `drydock show` command

use anyhow::Result;

use crate::cli::ShowArgs;
use crate::detect;

pub fn execute(args: ShowArgs) -> Result<()> {
    let discovered = detect::discover(&args.toolchain)?;
    let identity = &discovered.identity;

    println!("Toolchain:");
    println!();
    println!("  CC:       {}", identity.invocation.join(" "));
    println!("  Family:   {}", discovered.family);
    println!("  Version:  {}", identity.version_raw);
    if let Some(ref full) = identity.full_version {
        println!("            {}", full);
    }
    println!("  Language: {}", identity.language.display_name());
    println!("  Machine:  {}", identity.for_machine);
    println!("  Cross:    {}", if identity.is_cross { "yes" } else { "no" });
    if let Some(ref linker) = identity.linker {
        println!("  Linker:   {} ({})", linker.name, linker.path.display());
    }

    if !discovered.extra_cflags.is_empty() {
        println!();
        println!("Extra probe flags (from config):");
        for flag in &discovered.extra_cflags {
            println!("  {}", flag);
        }
    }

    Ok(())
}

//! `drydock options` command

use anyhow::Result;

use drydock::{Compiler, OptionRegistry};

use crate::cli::OptionsArgs;
use crate::detect;

pub fn execute(args: OptionsArgs) -> Result<()> {
    let discovered = detect::discover(&args.toolchain)?;
    let compiler = Compiler::new(discovered.identity, discovered.family);

    // Mirror the configuration lifecycle: register, then freeze.
    let registry = OptionRegistry::new();
    registry.register_all(compiler.options())?;
    registry.freeze();

    let options = registry.snapshot();
    let mut keys: Vec<_> = options.keys().cloned().collect();
    keys.sort_by_key(|k| k.to_string());

    if args.json {
        let payload: serde_json::Map<String, serde_json::Value> = keys
            .iter()
            .map(|key| {
                let spec = &options[key];
                (
                    key.to_string(),
                    serde_json::json!({
                        "description": spec.description,
                        "choices": spec.choices,
                        "default": spec.default,
                    }),
                )
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        for key in keys {
            let spec = &options[&key];
            println!("{}", key);
            println!("  {}", spec.description);
            println!("  choices: {}", spec.choices.join(", "));
            println!("  default: {}", spec.default);
        }
    }

    Ok(())
}

//! Command dispatcher
//!
//! Routes CLI commands to their handlers. Settings are loaded and the
//! selection context built once here, before any command runs.

use crate::cli::args::{Cli, Command};
use crate::commands;
use crate::config::Settings;
use crate::error::Result;
use crate::utils::paths;

/// Dispatch the parsed CLI command to the appropriate handler
pub fn dispatch(args: &Cli) -> Result<()> {
    if let Command::Completions { shell } = &args.command {
        return commands::completions::run(*shell);
    }

    let config_path = args
        .global
        .config
        .as_deref()
        .map(paths::expand_home)
        .transpose()?;
    let context = Settings::load(config_path.as_deref())?.into_context()?;
    let format = args.global.format;

    match &args.command {
        Command::Archs => commands::archs::run(&context, format),

        Command::Resolve { wanted } => commands::resolve::run(&context, wanted.as_deref(), format),

        Command::Plan {
            name,
            arch,
            exclude,
            require,
            options,
            wanted,
        } => commands::plan::run(
            &context,
            commands::plan::PlanOptions {
                name: name.clone(),
                arch: arch.clone(),
                exclude: exclude.clone(),
                require: require.clone(),
                options: options.clone(),
                wanted: wanted.clone(),
            },
            format,
        ),

        Command::Check {
            manifest,
            wanted,
            strict,
        } => commands::check::run(&context, manifest, wanted.as_deref(), *strict, format),

        Command::Completions { .. } => Ok(()),
    }
}

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod project_identity;
pub mod ui;
pub mod utils;

pub use crate::core::{
    Backend, BackendCatalog, Capability, EnvSelection, FeatureTable, Selection, Selector,
    SkipReason, TestConstraints, TestRegistration, register,
};
pub use crate::error::{MatrixError, Result};

use clap::Parser;
use std::process::exit;

/// Run archmatrix CLI entrypoint.
pub fn run_cli() {
    ui::init_colors();

    let args = cli::args::Cli::parse();
    ui::set_quiet(args.global.quiet);
    ui::set_verbose(args.global.verbose);

    if let Err(e) = cli::dispatcher::dispatch(&args) {
        ui::error(&format!("{}", e));
        exit(1);
    }
}

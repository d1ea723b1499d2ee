use crate::utils::machine_output::OutputFormat;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "archmatrix",
    about = "Backend test-matrix generator",
    long_about = "Backend test-matrix generator: compute the (arch, feature) configurations a test runs under on this machine",
    version,
    next_line_help = false,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Trace probing and selection steps on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Settings file (defaults to the user config dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List known backends, whether they are usable here, and their capabilities
    Archs,

    /// Show which backends the wanted-archs value allows
    Resolve {
        /// Use this value instead of the environment variable
        #[arg(long, value_name = "VALUE", allow_hyphen_values = true)]
        wanted: Option<String>,
    },

    /// Compute the configurations for one test declaration
    Plan {
        /// Test name used in the output
        #[arg(long, default_value = "test")]
        name: String,

        /// Backends or groups to include (default: all allowed)
        #[arg(long, value_delimiter = ',', value_name = "ARCH", help_heading = "Constraints")]
        arch: Vec<String>,

        /// Backends or groups to exclude
        #[arg(long, value_delimiter = ',', value_name = "ARCH", help_heading = "Constraints")]
        exclude: Vec<String>,

        /// Capabilities every configuration must support
        #[arg(long, value_delimiter = ',', value_name = "CAPABILITY", help_heading = "Constraints")]
        require: Vec<String>,

        /// Runtime option forwarded to every configuration (KEY=VALUE, VALUE parsed as JSON)
        #[arg(long = "option", value_name = "KEY=VALUE", help_heading = "Constraints")]
        options: Vec<String>,

        /// Use this value instead of the environment variable
        #[arg(long, value_name = "VALUE", allow_hyphen_values = true)]
        wanted: Option<String>,
    },

    /// Plan every test declared in a KDL manifest
    Check {
        /// Manifest with `test "name" { ... }` blocks
        manifest: PathBuf,

        /// Use this value instead of the environment variable
        #[arg(long, value_name = "VALUE", allow_hyphen_values = true)]
        wanted: Option<String>,

        /// Fail when any test would be skipped
        #[arg(long)]
        strict: bool,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

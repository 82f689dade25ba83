use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dagcutter",
    about = "Scaffold Airflow data-engineering repositories",
    version
)]
pub struct Cli {
    /// Log filter (overridden by RUST_LOG)
    #[arg(short = 'v', long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new project
    New {
        /// Template directory (default: the bundled template)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Directory the project directory is created in
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Set answers (can be repeated: -d key=value)
        #[arg(short, long = "data", value_name = "KEY=VALUE")]
        data: Vec<String>,

        /// Do not prompt; use defaults for anything not supplied
        #[arg(long)]
        no_input: bool,

        /// Read default answers from this file instead of the user config
        #[arg(long)]
        config_file: Option<PathBuf>,

        /// Reuse the answers of a previous generation (answers file or project directory)
        #[arg(long)]
        replay: Option<PathBuf>,

        /// Generate into an existing project directory
        #[arg(long)]
        overwrite: bool,

        /// Show the files that would be generated without writing anything
        #[arg(long)]
        dry_run: bool,

        /// With --dry-run, print file contents too
        #[arg(long)]
        verbose: bool,
    },

    /// Validate a template directory
    Check {
        /// Path to the template (default: the bundled template)
        path: Option<PathBuf>,
    },

    /// Print the slug derived from a project name
    Slug {
        project_name: String,
    },
}

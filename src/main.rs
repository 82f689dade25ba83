mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use dagcutter::config::env::{EnvSettings, DEFAULT_ENV_PREFIX};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .init();

    match cli.command {
        Commands::New {
            template,
            output_dir,
            data,
            no_input,
            config_file,
            replay,
            overwrite,
            dry_run,
            verbose,
        } => {
            let env = EnvSettings::load(DEFAULT_ENV_PREFIX);
            commands::new::run(
                commands::new::NewArgs {
                    template,
                    output_dir,
                    data,
                    no_input,
                    config_file,
                    replay,
                    overwrite,
                    dry_run,
                    verbose,
                },
                &env,
            )
        }
        Commands::Check { path } => commands::check::run(path),
        Commands::Slug { project_name } => commands::slug::run(&project_name),
    }
}

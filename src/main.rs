use std::error::Error;

use clap::Parser;
use log::warn;

use repofetch::{
    cli::args::{CliArgs, Command},
    config::RepofetchConfig,
    Repofetch,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = CliArgs::parse();

    let config = match RepofetchConfig::load() {
        Ok(config) => Some(config),
        Err(error) => {
            warn!("Ignoring repofetch configuration: {}", error);
            None
        }
    };

    let mut builder = Repofetch::builder();
    if let Some(config) = config {
        if let Some(cache_dir) = config.cache_dir {
            builder = builder.cache_directory(cache_dir);
        }
        if let Some(program) = config.git_program {
            builder = builder.git_program(program);
        }
        if let Some(host) = config.default_host {
            builder = builder.default_host(host);
        }
    }
    if let Some(cache_directory) = cli_args.cache_directory {
        builder = builder.cache_directory(cache_directory);
    }
    if let Some(git_program) = cli_args.git_program {
        builder = builder.git_program(git_program);
    }
    if let Some(default_host) = cli_args.default_host {
        builder = builder.default_host(default_host);
    }
    let repofetch = builder.try_build()?;

    match cli_args.cmd {
        Command::Fetch { repo, git_ref } => {
            let checkout = repofetch.fetch(&repo, git_ref.as_deref())?;
            println!("{}", checkout.dir);
            Ok(())
        }
        Command::ClearCache => repofetch.clear_cache(),
    }
}

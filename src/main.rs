//! lambda-deploy - serverless deployment packager
//!
//! Installs a Python function's dependencies into a staging directory (inside
//! the Lambda runtime image when Docker is available, on the host otherwise),
//! adds the function's source and data files and compresses everything into a
//! single zip archive.

use clap::Parser;

mod archive;
mod cli;
mod commands;
mod config;
mod error;
mod hash;
mod install;
mod package;
mod probe;
mod process;
mod progress;
mod resources;
mod staging;
mod ui;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        None | Some(Commands::Package) => commands::package::run(cli.workspace, cli.verbose),
        Some(Commands::Resources(args)) => commands::resources::run(cli.workspace, args),
        Some(Commands::Version) => commands::version::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

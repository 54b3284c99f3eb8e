//! CLI definitions using clap derive API
//!
//! Running the binary without a subcommand builds the deployment package.
//! Argument types for subcommands with options live in submodules:
//! - resources: Resources command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod resources;

pub use resources::ResourcesArgs;

/// lambda-deploy - serverless deployment packager
///
/// Bundle a Python function's dependencies and source files into a zip archive.
#[derive(Parser, Debug)]
#[command(
    name = "lambda-deploy",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Build zip deployment packages for Python serverless functions",
    long_about = "lambda-deploy installs the dependencies listed in requirements.txt into a staging \
                  directory (inside the Lambda runtime image when Docker is available, with uv or \
                  pip otherwise), copies the function's source files and data directory next to \
                  them and compresses the result into lambda-deployment.zip.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  lambda-deploy                        \x1b[90m# Build lambda-deployment.zip\x1b[0m\n   \
                  lambda-deploy -w backend -v          \x1b[90m# Build for another directory, echo commands\x1b[0m\n   \
                  lambda-deploy resources              \x1b[90m# Check the function's data files\x1b[0m\n"
)]
pub struct Cli {
    /// Workspace directory (defaults to current directory)
    #[arg(long, short = 'w', global = true, env = "LAMBDA_DEPLOY_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the deployment archive (default)
    Package,

    /// Load the function's resource files and report fallbacks
    Resources(ResourcesArgs),

    /// Show version information
    Version,
}

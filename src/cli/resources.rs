use clap::Parser;
use std::path::PathBuf;

/// Arguments for the resources command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Check the workspace data directory:\n    lambda-deploy resources\n\n\
                  Check the staged copy:\n    lambda-deploy resources --data-dir lambda-package/data")]
pub struct ResourcesArgs {
    /// Directory holding linkedin.pdf, summary.txt, style.txt and facts.json
    /// (defaults to the workspace data directory)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

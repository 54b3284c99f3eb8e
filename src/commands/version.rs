//! Version command implementation

use crate::error::Result;

/// Print the version and how this binary was built
pub fn run() -> Result<()> {
    println!("lambda-deploy {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Minimum Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!(
        "  Profile: {}",
        if cfg!(debug_assertions) { "debug" } else { "release" }
    );
    println!("  Target OS: {}", std::env::consts::OS);

    Ok(())
}

//! Command implementations for lambda-deploy CLI

pub mod helpers;
pub mod package;
pub mod resources;
pub mod version;

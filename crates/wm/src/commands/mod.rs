//! CLI command implementations.

mod build;
mod clean;
mod init;

pub(crate) use build::BuildArgs;
pub(crate) use clean::CleanArgs;
pub(crate) use init::InitArgs;

// CLI command definitions

use super::render::{RenderCommand, VersionsCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "kube-provisioners",
    version,
    about = "Render Helm application provisioners without a cluster",
    long_about = "Resolves application catalogue manifests and converges them against an in-memory deployment driver, printing the descriptor a real driver would receive"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Converge one application version and print the generated descriptor
    Render(RenderCommand),

    /// List the versions of an application manifest
    Versions(VersionsCommand),
}

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "calendar-relay")]
#[command(about = "Receives calendar fragments over HTTP and publishes them over SFTP")]
pub struct CliConfig {
    /// Optional TOML file overriding local and remote paths
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

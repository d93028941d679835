use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Roll btrfs systems back to snapper snapshots")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "/etc/snapper-rollback.toml")]
    pub config: PathBuf,
}

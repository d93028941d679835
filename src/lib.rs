use clap::Parser;

pub mod cli;
pub mod command;
pub mod config;
pub mod errors;
pub mod logging;
pub mod snapshots;
pub mod tui;

pub const APP_TITLE: &str = "Snapper Rollback";

pub fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // btrfs subvolume commands need root; refuse before the terminal is
    // touched so the message lands on a normal screen.
    if !nix::unistd::Uid::effective().is_root() {
        anyhow::bail!("snapper-rollback must be run as root");
    }

    logging::init();
    let config = config::Config::load(&cli.config)?;
    log::info!("scanning {}", config.root.display());

    let provider = snapshots::BtrfsRoot::new(config);
    let runner = command::SystemRunner;
    tui::run(APP_TITLE, &provider, &runner)
}

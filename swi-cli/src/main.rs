//! SWI CLI - Command line tool for the stormwater inventory.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "swi-cli",
    version,
    about = "Stormwater infrastructure inventory and hydraulic estimation"
)]
struct Cli {
    #[command(flatten)]
    options: swi_cmd::Options,

    #[command(subcommand)]
    command: swi_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Running {:?}", cli.command);
    swi_cmd::run(&cli.options, cli.command)
}

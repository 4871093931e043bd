//! lemoteur binary entry point

use clap::Parser;

fn main() -> anyhow::Result<()> {
    lemoteur::cli::Cli::parse().run()
}

//! `faq`, the command-line interface to an FAQ workspace.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}

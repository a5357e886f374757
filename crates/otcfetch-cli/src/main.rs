use clap::Parser;
use otcfetch_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Initialize logging as early as possible.
    logging::init(cli.verbose);

    if let Err(err) = cli.run() {
        eprintln!("otcfetch error: {:#}", err);
        std::process::exit(1);
    }
}

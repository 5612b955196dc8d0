mod engine;
mod utils;

use clap::Parser;

use engine::cli::{self, Args};
use engine::config::ExplorerConfig;

fn main() {
    utils::logger::init();

    let args = Args::parse();
    let result = ExplorerConfig::load_or_default(args.config.as_deref())
        .and_then(|config| cli::execute(args.command(), config));

    if let Err(err) = result {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

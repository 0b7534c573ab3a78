use clap::Parser;
use schema2ts_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();

    if let Err(err) = Cli::parse().run().await {
        eprintln!("schema2ts error: {:#}", err);
        std::process::exit(cli::exit_code(&err));
    }
}

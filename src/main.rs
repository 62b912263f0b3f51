mod config;
mod error;
mod random_names;
mod session;
mod words;

use std::process;

use clap::Parser;
use log::{error, warn};

use crate::config::Config;
use crate::random_names::NameGenerator;
use crate::session::{Console, Session};
use crate::words::{WordSet, INSTALL_HINT};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Config::parse();

    let words = match WordSet::load(&config.dictionary).await {
        Ok(words) => words,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}\n{INSTALL_HINT}");
            process::exit(1);
        }
    };
    if words.is_empty() {
        warn!("No usable words in {}", config.dictionary.display());
    }

    let mut session = Session::new(
        words,
        NameGenerator::new(fastrand::Rng::new()),
        config.settings(),
    );
    let mut console = Console::new(tokio::io::stdin(), tokio::io::stdout());

    if let Err(e) = session.run(&mut console).await {
        error!("{e}");
        process::exit(1);
    }
}

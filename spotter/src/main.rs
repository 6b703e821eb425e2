mod config;
mod credentials;
mod darkness;
mod driver;
mod logging;
mod notify;
mod position;
mod service;

use std::process::ExitCode;

use log::{ error, info, debug };

use config::Config;
use driver::Driver;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        },
    };

    // initializing logger
    logging::init(&config.logging);
    debug!("{config:?}");

    // credentials are checked before anything touches the network
    let driver = match driver::startup(&config, |name| std::env::var(name).ok(), Driver::build) {
        Ok(d) => d,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        },
    };

    match driver.run().await {
        Ok(outcome) => {
            info!("{outcome}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        },
    }
}

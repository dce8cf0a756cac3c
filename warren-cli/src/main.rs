#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

mod args;
mod commands;
mod output;
mod settings;
mod transport;

use crate::args::Cli;
use crate::settings::Settings;
use crate::transport::ReqwestTransport;
use clap::Parser;
use warren::operation::Client;
use warren::WarrenError;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).try_init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli)?;
    debug!("using {}", settings.base_url);
    let client = Client::new(ReqwestTransport::new(&settings)?);
    commands::run(cli, &settings, &client)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        if let Some(summary) = err.downcast_ref::<WarrenError>().and_then(WarrenError::summary) {
            eprintln!("{}", summary);
        }
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

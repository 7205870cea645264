//! floorterm - shop-floor terminal for clocking in and out of work orders

use clap::Parser;
use log::LevelFilter;

mod cli;
mod client;
mod config;
mod error;
mod output;
mod session;

use cli::{Cli, Commands, GlobalOptions};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Login { token, expires_at } => cli::login::login(&opts, token, expires_at),
        Commands::Logout => cli::login::logout(&opts),
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("floorterm version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::ClockIn(args) => cli::clock::clock_in(&opts, &args).await,
        Commands::ClockOut(args) => cli::clock::clock_out(&opts, &args).await,
        Commands::Config(command) => cli::config::run(&opts, &command),
    }
}

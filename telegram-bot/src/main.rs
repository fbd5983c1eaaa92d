//! Binary: `telegram-bot run [--token <TOKEN>]`.

use clap::Parser;
use telegram_bot::{load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { token } => match load_config(token) {
            Ok(config) => run_bot(config).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

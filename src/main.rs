//! rufus - chat companion bot.

use std::process::ExitCode;

use clap::Parser;

use rufus::Commands;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Commands::parse();

    match args.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

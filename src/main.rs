use clap::Parser;
use seesaw::cli::{quote, run, Cli, Commands, RunArgs};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let command = cli
        .command
        .clone()
        .unwrap_or_else(|| Commands::Run(RunArgs::default()));

    let result = match &command {
        Commands::Run(args) => run::execute(&cli, args, false).await,
        Commands::Once(args) => run::execute(&cli, args, true).await,
        Commands::Quote(args) => quote::execute(&cli, args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

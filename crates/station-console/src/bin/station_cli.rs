mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{app::App, args::Cli, utils::init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let result = match App::from_cli(&cli) {
        Ok(app) => app.run(cli.command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!("CLI operation failed: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}

use clap::Parser;
use tracing::error;

use craftboot::Cli;

#[tokio::main]
async fn main() {
    craftboot::init_tracing();

    let result = match Cli::parse().into_settings() {
        Ok(settings) => craftboot::run(settings).await,
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        error!("{}", err);
        std::process::exit(err.exit_code());
    }
}

use clap::Parser;
use platform_client::cli::{self, Cli};
use platform_client::infrastructure::logging;
use platform_client::{AppConfig, Platform};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    let cli = Cli::parse();
    let platform = Platform::new(&config)?;

    cli::run(cli, platform).await
}

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use eddy::app::AppContext;
use eddy::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Unpack { path, raw } => {
            commands::unpack(path.as_deref(), raw)?;
        }
        Commands::Crawl { url, options } => {
            let ctx = AppContext::new(cli.config.as_deref())?;
            commands::crawl(&ctx, &url, &options).await?;
        }
        Commands::Media { url, json } => {
            let ctx = AppContext::new(cli.config.as_deref())?;
            commands::media(&ctx, &url, json).await?;
        }
    }

    Ok(())
}

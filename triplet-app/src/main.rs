mod app;
mod terminal;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::{App, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let app = App::new(Cli::parse())?;
    app.run().await?;

    Ok(())
}

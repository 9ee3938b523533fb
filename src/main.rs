use clap::Parser;
use layerkit::cli::{run, Cli};
use layerkit::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;

    let cli = Cli::parse();
    tracing::debug!("layerkit {} (built {})", layerkit::VERSION, layerkit::BUILD_DATE);
    run(cli).await
}

use std::sync::Arc;

use docserver::config::Config;
use docserver::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Arc::new(Config::load()?);
    tracing::info!(root = %cfg.documents.root.display(), "Serving documents");

    tokio::select! {
        res = server::run(cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::config::{Config, ServerConfig};
use crate::http::connection::Connection;

pub async fn bind(cfg: &ServerConfig) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("binding {}", cfg.listen_addr))?;
    info!("Listening on {}", listener.local_addr()?);
    Ok(listener)
}

pub async fn run(cfg: Arc<Config>) -> anyhow::Result<()> {
    let listener = bind(&cfg.server).await?;
    serve(listener, cfg).await
}

/// Accepts connections forever, handing each one to its own task.
///
/// The loop never waits on request processing. With `max_connections` set,
/// spawned tasks queue on a semaphore before they start reading.
pub async fn serve(listener: TcpListener, cfg: Arc<Config>) -> anyhow::Result<()> {
    let limiter = cfg
        .server
        .max_connections
        .map(|n| Arc::new(Semaphore::new(n)));
    let active = Arc::new(AtomicUsize::new(0));

    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let cfg = Arc::clone(&cfg);
        let limiter = limiter.clone();
        let active = Arc::clone(&active);

        tokio::spawn(async move {
            let _permit = match limiter {
                Some(limiter) => match limiter.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => return,
                },
                None => None,
            };

            let in_flight = active.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(%peer, in_flight, "Connection started");

            let mut conn = Connection::new(socket, cfg);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {:#}", peer, e);
            }

            active.fetch_sub(1, Ordering::Relaxed);
        });
    }
}

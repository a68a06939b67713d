use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::{Connection, ConnectionSettings};
use crate::router::Router;
use crate::store::{DirectoryStore, FileStore};

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!("Listening on {}", cfg.server.listen_addr);

    let store = cfg.files.directory.clone().map(DirectoryStore::new);
    let router = Arc::new(Router::new(store));
    let settings = ConnectionSettings {
        read_timeout: cfg.server.read_timeout(),
        limits: cfg.server.limits(),
    };

    serve(listener, router, settings).await
}

/// Accepts connections forever, one task per connection.
///
/// Only an accept failure ends the loop; per-connection errors are logged
/// inside their task.
pub async fn serve<S: FileStore>(
    listener: TcpListener,
    router: Arc<Router<S>>,
    settings: ConnectionSettings,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let router = Arc::clone(&router);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, router, settings);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}

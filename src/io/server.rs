//! Transient static file server backing one render call.
//!
//! The browser engine needs an `http://` origin for the authored HTML so
//! relative asset paths resolve. The server lives on a background thread for
//! exactly the duration of one render; dropping the handle shuts it down on
//! every exit path. Request logging is deliberately absent.

use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::path::Path;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use axum::Router;
use tokio::sync::oneshot;
use tower_http::services::ServeDir;
use tracing::{debug, warn};

pub struct StaticServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl StaticServer {
    /// Serve `root` on an ephemeral localhost port.
    pub fn serve(root: &Path) -> Result<Self> {
        let listener = StdTcpListener::bind(("127.0.0.1", 0)).context("bind static server")?;
        listener
            .set_nonblocking(true)
            .context("set listener nonblocking")?;
        let addr = listener.local_addr().context("read static server addr")?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let root = root.to_path_buf();

        let handle = thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    warn!(err = %err, "failed to build static server runtime");
                    return;
                }
            };
            runtime.block_on(async move {
                let listener = match tokio::net::TcpListener::from_std(listener) {
                    Ok(listener) => listener,
                    Err(err) => {
                        warn!(err = %err, "failed to adopt static server listener");
                        return;
                    }
                };
                let app = Router::new().fallback_service(ServeDir::new(root));
                let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                });
                if let Err(err) = serve.await {
                    warn!(err = %err, "static server error");
                }
            });
        });

        debug!(%addr, "static server started");
        Ok(Self {
            addr,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// URL for a path relative to the served root.
    pub fn url_for(&self, rel_path: &str) -> String {
        format!(
            "http://{}/{}",
            self.addr,
            rel_path.trim_start_matches('/')
        )
    }
}

impl Drop for StaticServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the listener (port 0 picks a free port)
//! - Spawn the server task
//! - Hand back a handle for inspection and shutdown
//!
//! # Design Decisions
//! - Fail fast: bind errors are returned, not logged and swallowed
//! - The listener is bound before `start` returns, so requests can be sent immediately

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::store::TenantStore;

#[derive(Debug, Error)]
pub enum StartError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
}

/// A running fake server.
pub struct FakeErrol {
    addr: SocketAddr,
    tenants: TenantStore,
    shutdown: Shutdown,
    task: JoinHandle<std::io::Result<()>>,
}

impl FakeErrol {
    /// Bind and start serving `config` in a background task.
    pub async fn start(config: ServerConfig) -> Result<Self, StartError> {
        let address = config.listener.bind_address();
        let bind_error = |source| StartError::Bind {
            address: address.clone(),
            source,
        };
        let listener = TcpListener::bind(&address).await.map_err(bind_error)?;
        let addr = listener.local_addr().map_err(bind_error)?;

        let server = HttpServer::new(config);
        let tenants = server.tenants().clone();
        let shutdown = Shutdown::new();
        let task = tokio::spawn(server.run(listener, shutdown.subscribe()));

        tracing::info!(address = %addr, "Fake server listening");
        Ok(Self {
            addr,
            tenants,
            shutdown,
            task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://host:port` of the running server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Live view of the server's state.
    pub fn tenants(&self) -> &TenantStore {
        &self.tenants
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn stop(self) -> std::io::Result<()> {
        self.shutdown.trigger();
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::other(e)),
        }
    }
}

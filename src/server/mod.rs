//! # HTTP Surface
//!
//! A single-endpoint HTTP/1.1 server. Each connection carries exactly one
//! request and is served on its own task; the image work itself runs on the
//! blocking pool.

pub mod handler;
pub mod protocol;

use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration, time::Instant};

use tokio::{
    io::{AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};
use tracing::{debug, info, warn};

use crate::{
    config::ServerConfig,
    error::{Result, ServerError},
    service::TransformService,
};

pub use handler::{AppState, ErrorResponse, HealthResponse, TransformResponse};

/// Time allowed for a client to deliver its full request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    max_body_bytes: usize,
}

impl Server {
    /// Bind the listener described by `config`
    pub async fn bind(config: &ServerConfig, service: TransformService) -> Result<Self> {
        let address = config.address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|e| ServerError::Bind {
                address: address.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            listener,
            state: Arc::new(AppState {
                service,
                allow_origin: config.allow_origin.clone(),
            }),
            max_body_bytes: config.max_body_bytes,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until Ctrl-C
    pub async fn run(self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Could not listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serve until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!("Listening on http://{}", self.local_addr()?);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                item = self.listener.accept() => {
                    match item {
                        Ok((stream, peer)) => {
                            let state = self.state.clone();
                            let max_body_bytes = self.max_body_bytes;
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream, peer, state, max_body_bytes).await {
                                    warn!("Connection from {} failed: {}", peer, e);
                                }
                            });
                        }
                        Err(e) => {
                            // Usually transient (e.g. out of file descriptors)
                            warn!("Accept failed: {}", e);
                        }
                    }
                }
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    return Ok(());
                }
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    state: Arc<AppState>,
    max_body_bytes: usize,
) -> Result<()> {
    let started = Instant::now();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let request = tokio::time::timeout(
        REQUEST_TIMEOUT,
        protocol::read_request(&mut reader, max_body_bytes),
    )
    .await;

    let (label, response) = match request {
        Ok(Ok(Some(request))) => {
            let label = format!("{} {}", request.method, request.path);
            (label, handler::handle(request, state.clone()).await)
        }
        Ok(Ok(None)) => {
            debug!("{} closed without sending a request", peer);
            return Ok(());
        }
        Ok(Err(err)) => ("<unparsed>".to_string(), handler::error_response(&err)),
        Err(_) => {
            debug!("{} timed out before finishing its request", peer);
            return Ok(());
        }
    };

    let response = handler::with_cors(response, &state.allow_origin);
    write_half.write_all(&response.to_bytes()).await?;
    write_half.shutdown().await?;

    info!(
        "{} {} -> {} ({:.1?})",
        peer,
        label,
        response.status.as_u16(),
        started.elapsed()
    );
    Ok(())
}

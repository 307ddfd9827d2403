use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http::StatusCode;
use hyper::body::Incoming;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

use crate::config::{Config, ConfigStore};
use crate::error::{PolicyError, Result};
use crate::proxy::context::EngineContext;
use crate::proxy::handler::handle_request;
use crate::proxy::synthetic::{empty_body, synthetic_error_response};

/// Guard to decrement active connections counter when dropped
struct ConnectionGuard(Arc<AtomicUsize>);

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

pub async fn run(config: Arc<Config>, store: Arc<ConfigStore>) -> Result<()> {
    // The store must be loaded before the first request can be served
    store.get()?;

    let addr = config.listen;
    let listener = TcpListener::bind(addr).await.map_err(PolicyError::Io)?;

    let builder = ConnBuilder::new(TokioExecutor::new());
    let ctx = Arc::new(EngineContext::new(Arc::clone(&config), store));

    // Track active connections for graceful shutdown
    let active_connections = Arc::new(AtomicUsize::new(0));
    let shutdown_signal = Arc::new(AtomicUsize::new(0)); // 0 = running, 1 = shutdown requested

    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).map_err(|e| {
        PolicyError::Io(std::io::Error::other(format!("Failed to setup SIGTERM handler: {e}")))
    })?;
    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt()).map_err(|e| {
        PolicyError::Io(std::io::Error::other(format!("Failed to setup SIGINT handler: {e}")))
    })?;

    info!(?addr, upstream = %config.upstream.address, "starting hardening proxy (h1/h2)");

    loop {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, initiating graceful shutdown");
                shutdown_signal.store(1, Ordering::Relaxed);
                break;
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, initiating graceful shutdown");
                shutdown_signal.store(1, Ordering::Relaxed);
                break;
            }
            result = listener.accept() => {
                let (stream, peer) = match result {
                    Ok((stream, peer)) => (stream, peer),
                    Err(e) => {
                        warn!(error = %e, "accept error");
                        continue;
                    }
                };

                if shutdown_signal.load(Ordering::Relaxed) == 1 {
                    info!("Shutdown requested, rejecting new connection");
                    drop(stream);
                    continue;
                }

                active_connections.fetch_add(1, Ordering::Relaxed);

                let builder = builder.clone();
                let ctx = Arc::clone(&ctx);
                let active_connections = Arc::clone(&active_connections);

                tokio::spawn(async move {
                    // Ensure counter is decremented when connection finishes
                    let _guard = ConnectionGuard(active_connections);

                    let svc = hyper::service::service_fn(move |req: Request<Incoming>| {
                        let ctx = Arc::clone(&ctx);
                        async move {
                            let resp = match handle_request(req, ctx, peer).await {
                                Ok(resp) => resp,
                                Err(e) => {
                                    warn!(?peer, error = %e, "request failed");
                                    let status = StatusCode::from(e);
                                    match synthetic_error_response(status) {
                                        Ok(resp) => resp,
                                        Err(_) => {
                                            let mut resp = hyper::Response::new(empty_body());
                                            *resp.status_mut() =
                                                StatusCode::INTERNAL_SERVER_ERROR;
                                            resp
                                        }
                                    }
                                }
                            };
                            Ok::<_, hyper::Error>(resp)
                        }
                    });

                    if let Err(e) = builder.serve_connection(TokioIo::new(stream), svc).await {
                        warn!(?peer, error = %e, "serve_connection error");
                    }
                });
            }
        }
    }

    info!(
        "Waiting for active connections to finish (timeout: {}s)",
        config.timeout.shutdown_secs
    );
    let shutdown_timeout = Duration::from_secs(config.timeout.shutdown_secs);
    let start = std::time::Instant::now();

    loop {
        let active = active_connections.load(Ordering::Relaxed);
        if active == 0 {
            info!("All connections closed, shutdown complete");
            break;
        }

        if start.elapsed() >= shutdown_timeout {
            warn!(
                active_connections = active,
                "Shutdown timeout reached, {} connections still active", active
            );
            break;
        }

        info!(active_connections = active, "Waiting for connections to close");
        sleep(Duration::from_millis(100)).await;
    }

    info!("Proxy server stopped");
    Ok(())
}

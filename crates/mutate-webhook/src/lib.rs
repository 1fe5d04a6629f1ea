mod api;
mod certs;
pub mod cli;
pub mod config;
pub mod tracing;

use ::tracing::{info, warn};
use admission_mutator::ReviewTransformer;
use anyhow::{anyhow, Result};
use axum::{
    routing::{get, post},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::trace::{self, TraceLayer};

use crate::api::{
    handlers::{mutate_handler, readiness_handler},
    state::ApiServerState,
};
use crate::certs::create_tls_config_and_watch_certificate_changes;
use crate::config::Config;

/// How long in-flight requests are given to complete once a shutdown signal is received
const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

pub struct MutateWebhook {
    router: Router,
    tls_config: Option<RustlsConfig>,
    addr: SocketAddr,
}

impl MutateWebhook {
    pub async fn new_from_config(config: Config) -> Result<Self> {
        let state = Arc::new(ApiServerState {
            transformer: ReviewTransformer::new(),
            verbose: config.verbose,
        });

        let tls_config = match config.tls_config {
            Some(tls_config) => {
                Some(create_tls_config_and_watch_certificate_changes(tls_config).await?)
            }
            None => None,
        };

        let router = Router::new()
            .route("/mutate", post(mutate_handler))
            .route("/readiness", get(readiness_handler))
            .with_state(state)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace::DefaultMakeSpan::new().level(::tracing::Level::INFO))
                    .on_response(trace::DefaultOnResponse::new().level(::tracing::Level::INFO)),
            );

        Ok(Self {
            router,
            tls_config,
            addr: config.addr,
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve requests until a termination signal is received.
    pub async fn run(self) -> Result<()> {
        let handle = Handle::new();
        tokio::spawn(shutdown_on_signal(handle.clone()));

        let service = self.router.into_make_service();
        match self.tls_config {
            Some(tls_config) => {
                info!(address = %self.addr, tls = true, "started HTTPS server");
                axum_server::bind_rustls(self.addr, tls_config)
                    .handle(handle)
                    .serve(service)
                    .await
            }
            None => {
                info!(address = %self.addr, tls = false, "started HTTP server");
                axum_server::bind(self.addr)
                    .handle(handle)
                    .serve(service)
                    .await
            }
        }
        .map_err(|e| anyhow!("Cannot run the webhook server: {e}"))?;

        info!("server stopped");
        Ok(())
    }
}

async fn shutdown_on_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
    handle.graceful_shutdown(Some(GRACEFUL_SHUTDOWN_TIMEOUT));
}

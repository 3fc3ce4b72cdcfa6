//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router for the items API
//! - Attach the interceptor at the configured placement
//! - Wire up middleware (tracing, request ID, body limit, timeout)
//! - Serve with graceful shutdown

use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{BoxError, ServiceBuilder};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::action::{action_audit_middleware, ActionAuditor};
use crate::auditor::Auditor;
use crate::config::{AuditConfig, AuditMode};
use crate::http::handlers::{api_router, ItemStore};
use crate::lifecycle::shutdown::shutdown_signal;
use crate::sink::AuditSink;
use crate::transport::MessageLoggingLayer;

/// HTTP server with audited routes.
pub struct AuditServer {
    router: Router,
    config: AuditConfig,
}

impl AuditServer {
    /// Create a new server writing records to `sink`.
    pub fn new(config: AuditConfig, sink: Arc<dyn AuditSink>) -> Self {
        let auditor = Auditor::new(sink, config.capture.clone(), &config.sink);
        let router = Self::build_router(&config, auditor, ItemStore::default());
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AuditConfig, auditor: Auditor, store: ItemStore) -> Router {
        let api = api_router(store);

        let api = match config.capture.mode {
            AuditMode::Action => api.route_layer(middleware::from_fn_with_state(
                ActionAuditor::new(auditor),
                action_audit_middleware,
            )),
            AuditMode::Transport => api.layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(handle_exchange_error))
                    .layer(MessageLoggingLayer::new(auditor)),
            ),
        };

        api.layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.listener.max_request_body_bytes))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = ?self.config.capture.mode,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }
}

/// The audit layer passes inner errors through unchanged; routes are
/// infallible, so this only guards the service type.
async fn handle_exchange_error(err: BoxError) -> Response {
    tracing::error!(error = %err, "Exchange failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

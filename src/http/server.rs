//! HTTP server setup and dispatch pipeline.
//!
//! # Responsibilities
//! - Create the Axum Router with the three routes
//! - Wire the pipeline: trace → request id → timing → timeout → router
//!   → path validation → limiter → handler
//! - Bind server to listener and serve until shutdown
//! - Run the limiter sweeper alongside the server

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::clock::{Clock, MonotonicClock};
use crate::config::ServiceConfig;
use crate::http::error::ApiError;
use crate::http::handlers::{self, ITEM, ROOT, STATUS};
use crate::http::params::validate_path_params;
use crate::http::timing::process_time_middleware;
use crate::security::limiter::RateLimiter;
use crate::security::policy::RoutePolicy;
use crate::security::rate_limit::rate_limit_middleware;
use crate::security::sweeper::Sweeper;

/// Application state shared by the pipeline stages.
#[derive(Clone)]
pub struct AppState {
    pub limiter: Arc<RateLimiter>,
    pub policy: Arc<RoutePolicy>,
    pub clock: Arc<dyn Clock>,
}

/// HTTP server for the service.
pub struct ApiServer {
    router: Router,
    config: ServiceConfig,
    state: AppState,
}

impl ApiServer {
    /// Create a new server with the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_clock(config, Arc::new(MonotonicClock))
    }

    /// Create a server whose limiter and timing stage read from `clock`.
    pub fn with_clock(config: ServiceConfig, clock: Arc<dyn Clock>) -> Self {
        let state = AppState {
            limiter: Arc::new(RateLimiter::new(clock.clone())),
            policy: Arc::new(RoutePolicy::from_config(&config.rate_limit)),
            clock,
        };

        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        // Later route layers wrap earlier ones, so validation runs before the limiter.
        let routes = Router::new()
            .route(ROOT, get(handlers::root))
            .route(ITEM, get(handlers::read_item))
            .route(STATUS, get(handlers::status))
            .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
            .route_layer(middleware::from_fn(validate_path_params))
            .fallback(not_found)
            .method_not_allowed_fallback(method_not_allowed);

        Self::wrap_pipeline(routes, config, state)
    }

    /// Wrap `routes` in the request-wide layers. Timing sits outside the
    /// timeout so a 408 is stamped too.
    #[allow(deprecated)]
    fn wrap_pipeline(routes: Router, config: &ServiceConfig, state: AppState) -> Router {
        routes.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::from_fn_with_state(state, process_time_middleware))
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
    }

    /// Run the server until the `Shutdown` coordinator fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        if self.state.policy.is_enabled() {
            let sweeper = Sweeper::new(
                self.state.limiter.clone(),
                Duration::from_secs(self.config.rate_limit.sweep_interval_secs),
            );
            tokio::spawn(sweeper.run(shutdown.resubscribe()));
        }

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process dispatch.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.state.limiter
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

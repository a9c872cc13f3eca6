//! HTTP API Layer
//!
//! Hosts quote wizard sessions over a REST API using Axum and passes the
//! plan catalog through.
//!
//! # Architecture
//!
//! - **Sessions**: in-memory [`WizardController`](domain_quote::WizardController)s keyed by session id
//! - **Handlers**: quote sessions, plan catalog, health
//! - **Middleware**: request ids and request logging
//! - **Error Handling**: consistent JSON error bodies
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(config, submitter, catalog);
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod sessions;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_catalog::PlanCatalogPort;
use domain_quote::{QuoteSubmissionPort, TracingNotifier};

use crate::config::ApiConfig;
use crate::handlers::{health, plans, quotes};
use crate::middleware::request_logging;
use crate::sessions::SessionStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub sessions: Arc<SessionStore>,
    pub submitter: Arc<dyn QuoteSubmissionPort>,
    pub catalog: Arc<dyn PlanCatalogPort>,
}

impl AppState {
    /// Builds state whose wizards report notifications to the log
    pub fn new(
        config: ApiConfig,
        submitter: Arc<dyn QuoteSubmissionPort>,
        catalog: Arc<dyn PlanCatalogPort>,
    ) -> Self {
        let sessions = SessionStore::new(
            Arc::clone(&submitter),
            Arc::new(TracingNotifier),
            config.session_ttl(),
        );
        Self {
            config,
            sessions: Arc::new(sessions),
            submitter,
            catalog,
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Quote session routes
    let quote_routes = Router::new()
        .route("/", post(quotes::open_session))
        .route("/:id", get(quotes::get_session).delete(quotes::close_session))
        .route("/:id/fields", put(quotes::set_fields))
        .route("/:id/advance", post(quotes::advance))
        .route("/:id/retreat", post(quotes::retreat))
        .route("/:id/reset", post(quotes::reset));

    // Plan catalog routes
    let plan_routes = Router::new()
        .route("/", get(plans::list_plans))
        .route("/:id", get(plans::get_plan));

    let api_routes = Router::new()
        .nest("/quotes", quote_routes)
        .nest("/plans", plan_routes);

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(axum_middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

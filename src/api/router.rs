//! API router.
//!
//! Returns a composable `Router` with every route nested under `/api/`.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the billing API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/billsheet", post(endpoints::bill_sheets::create))
        .route("/billsheet/list", get(endpoints::bill_sheets::list))
        .route("/billsheet/list/:page", post(endpoints::bill_sheets::page))
        .route(
            "/billsheet/:id",
            get(endpoints::bill_sheets::detail)
                .put(endpoints::bill_sheets::update)
                .delete(endpoints::bill_sheets::remove),
        )
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access));

    Router::new().nest("/api", routes)
}

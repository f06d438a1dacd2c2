use std::sync::Arc;

use axum::{routing::get, Json, Router};
use models::{Account, Customer, Loan, LoanProduct, Notification, Transaction, User};
use serde_json::{json, Value};
use service::Api;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::pages;
use crate::resources::{self, dashboard_stats};

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Build the full application router: login page, health check, entity collections and dashboard.
///
/// `auth_endpoint` is where the sign-in form posts; `None` renders it disabled.
pub fn build_router(api: Api, cors: CorsLayer, auth_endpoint: Option<String>) -> Router {
    let auth_endpoint: Option<Arc<str>> = auth_endpoint.map(Arc::from);
    let login = get(move || pages::login(auth_endpoint.clone()));
    let public = Router::new()
        .route("/", login.clone())
        .route("/login", login)
        .route("/healthz", get(health));

    let entities = Router::new()
        .merge(resources::routes::<Customer>())
        .merge(resources::routes::<Account>())
        .merge(resources::routes::<Transaction>())
        .merge(resources::routes::<LoanProduct>())
        .merge(resources::routes::<Loan>())
        .merge(resources::routes::<Notification>())
        .merge(resources::routes::<User>())
        .route("/api/dashboard/stats", get(dashboard_stats));

    public
        .merge(entities.with_state(api))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

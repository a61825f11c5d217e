use std::sync::Arc;

use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use frontdesk_config::MatchingConfig;
use frontdesk_upstream::BookingApi;

#[derive(Debug, Clone)]
pub struct AppState {
    pub shared_secret: String,
    pub matching: MatchingConfig,
    pub api: BookingApi,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook/find-booking", post(handlers::find_booking))
        .route("/webhook/cancel-booking", post(handlers::cancel_booking))
        .route(
            "/webhook/reschedule-booking",
            post(handlers::reschedule_booking),
        )
        .route("/webhook/normalize-phone", post(handlers::normalize_phone))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

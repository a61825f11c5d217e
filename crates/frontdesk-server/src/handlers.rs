use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::auth;
use crate::payload;
use crate::routes::AppState;
use frontdesk_core::identity::phone;
use frontdesk_core::{
    match_and_select, normalize_identity, now_utc, record, IdentityOptions, RecordValue,
    SelectOptions, SelectionResult,
};
use frontdesk_upstream::{CancelOutcome, UpstreamError};

pub async fn find_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !auth::authorized(&headers, &state.shared_secret) {
        return unauthorized();
    }
    let Some(identity) = payload::caller_identity(&body) else {
        return bad_request("missing full_name or phone_number");
    };

    let options = IdentityOptions {
        require_dob: state.matching.require_dob,
    };
    let identity = match normalize_identity(&identity, options) {
        Ok(identity) => identity,
        Err(err) => return bad_request(&err.to_string()),
    };

    let records = match state.api.fetch_all().await {
        Ok(records) => records,
        Err(err) => return upstream_failure(err),
    };
    debug!(records = records.len(), "matching fetched bookings");

    let result = match_and_select(
        &identity,
        &records,
        now_utc(),
        SelectOptions {
            auto_resolve: state.matching.auto_resolve,
        },
    );

    let body = match result {
        SelectionResult::Found(record) => {
            let mut summary = booking_summary(&record);
            summary["result"] = json!("found");
            summary
        }
        SelectionResult::NotFound => json!({"result": "not_found"}),
        SelectionResult::Ambiguous(records) => json!({
            "result": "ambiguous",
            "candidates": records.iter().map(booking_summary).collect::<Vec<_>>(),
        }),
    };
    respond(StatusCode::OK, body)
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !auth::authorized(&headers, &state.shared_secret) {
        return unauthorized();
    }
    let Some(uid) = payload::booking_uid(&body) else {
        return bad_request("missing booking uid");
    };
    let reason = payload::reason(&body);

    match state.api.cancel(&uid, reason.as_deref()).await {
        Ok(CancelOutcome::Cancelled) => respond(
            StatusCode::OK,
            json!({"ok": true, "already_cancelled": false}),
        ),
        Ok(CancelOutcome::AlreadyCancelled) => respond(
            StatusCode::OK,
            json!({"ok": false, "already_cancelled": true}),
        ),
        // Upstream-reported cancel failures keep the 200 + ok:false contract.
        Err(err) => {
            warn!(uid = %uid, error = %err, "cancel failed");
            respond(
                StatusCode::OK,
                json!({"ok": false, "already_cancelled": false, "error": err.to_string()}),
            )
        }
    }
}

pub async fn reschedule_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !auth::authorized(&headers, &state.shared_secret) {
        return unauthorized();
    }
    let Some(uid) = payload::booking_uid(&body) else {
        return bad_request("missing booking_uid");
    };
    let Some(new_start) = payload::new_start_time(&body) else {
        return bad_request("missing new_start_time");
    };
    let reason = payload::reason(&body);

    match state.api.reschedule(&uid, &new_start, reason.as_deref()).await {
        Ok(()) => respond(
            StatusCode::OK,
            json!({"success": true, "updated_start_time": new_start}),
        ),
        Err(UpstreamError::Api { status, body }) => {
            warn!(uid = %uid, status, "reschedule rejected upstream");
            respond(
                StatusCode::BAD_GATEWAY,
                json!({"success": false, "status": status, "error": body}),
            )
        }
        Err(err) => {
            warn!(uid = %uid, error = %err, "reschedule failed");
            respond(
                StatusCode::BAD_GATEWAY,
                json!({"success": false, "error": err.to_string()}),
            )
        }
    }
}

pub async fn normalize_phone(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !auth::authorized(&headers, &state.shared_secret) {
        return unauthorized();
    }
    let Some(raw) = payload::raw_phone(&body) else {
        return bad_request("missing raw_phone");
    };

    let normalized =
        phone::normalize_phone(&raw).or_else(|_| phone::normalize_spoken_phone(&raw));
    match normalized {
        Ok(e164) => {
            let digits = phone::last10(&e164).unwrap_or_default();
            respond(
                StatusCode::OK,
                json!({
                    "is_valid": true,
                    "normalized_e164": e164,
                    "pretty": phone::pretty10(&digits),
                    "last4": phone::last4(&digits),
                    "digits_count": digits.len(),
                }),
            )
        }
        Err(_) => {
            let digits = phone::digits_only(&raw);
            respond(
                StatusCode::OK,
                json!({
                    "is_valid": false,
                    "normalized_e164": null,
                    "pretty": null,
                    "digits_found": digits,
                    "digits_count": digits.len(),
                    "message": "could not normalize to a US phone number",
                }),
            )
        }
    }
}

fn booking_summary(record: &RecordValue) -> Value {
    json!({
        "booking_uid": record::booking_uid(record),
        "title": record::booking_title(record),
        "start_time": record::start_time_raw(record),
    })
}

fn respond(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn unauthorized() -> Response {
    respond(StatusCode::UNAUTHORIZED, json!({"error": "unauthorized"}))
}

fn bad_request(message: &str) -> Response {
    respond(StatusCode::BAD_REQUEST, json!({"error": message}))
}

fn upstream_failure(err: UpstreamError) -> Response {
    warn!(error = %err, "booking fetch failed");
    match err {
        UpstreamError::Api { status, body } => respond(
            StatusCode::BAD_GATEWAY,
            json!({"error": "upstream api error", "status": status, "response": body}),
        ),
        other => respond(
            StatusCode::BAD_GATEWAY,
            json!({"error": other.to_string()}),
        ),
    }
}

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    Json,
};
use tracing::error;

use crate::error::PanelError;
use crate::panel::PreferencesPanel;
use crate::render;

use super::types::{ErrorResponse, QuotaStateResponse, RefreshQuotaRequest};
use super::ApiState;

type ApiError = (StatusCode, Json<ErrorResponse>);

pub async fn show_panel(State(state): State<Arc<ApiState>>) -> Result<Html<String>, ApiError> {
    let panel = PreferencesPanel::open(state.client.clone())
        .await
        .map_err(upstream_error)?;
    Ok(Html(render::preferences_page(panel.state())))
}

pub async fn show_quota(State(state): State<Arc<ApiState>>) -> Html<String> {
    Html(render::quota_meter(&state.meter.render()))
}

pub async fn refresh_quota(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<RefreshQuotaRequest>,
) -> Result<Json<QuotaStateResponse>, ApiError> {
    state
        .meter
        .update(&state.client, &request.extra)
        .await
        .map_err(|err| match err {
            PanelError::NoBoundUser => bad_request("no_bound_user", &err.to_string()),
            other => upstream_error(other),
        })?;

    let snapshot = state.meter.model().snapshot();
    let severity = snapshot
        .quota_percent
        .map(|percent| state.meter.thresholds().classify(percent));
    Ok(Json(QuotaStateResponse {
        over_quota: state.meter.is_over_quota(),
        state: snapshot,
        severity,
    }))
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "account-panel"
    }))
}

fn bad_request(code: &str, message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
            code: code.to_string(),
        }),
    )
}

fn upstream_error(err: PanelError) -> ApiError {
    error!(error = %err, "account API request failed");
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse {
            error: err.to_string(),
            code: "upstream_error".to_string(),
        }),
    )
}

//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! engine for the actual computation.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{CatalogSummary, HealthResponse, SkyRequest, SkyResponse};
use super::error::AppError;
use super::state::AppState;
use crate::api::{LocalizationHint, RawQuery};
use crate::services::NarrativeBrief;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Reports the service version and the loaded catalog.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let catalog = state.engine.catalog();

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog: CatalogSummary {
            stars: catalog.stars().len(),
            segments: catalog.segments().len(),
            checksum: catalog.checksum().to_string(),
        },
    }))
}

// =============================================================================
// Sky Computation
// =============================================================================

/// POST /v1/sky
///
/// Resolve the address and local time, then compute the sky snapshot and
/// its narrative brief.
pub async fn compute_sky(
    State(state): State<AppState>,
    payload: Result<Json<SkyRequest>, JsonRejection>,
) -> HandlerResult<SkyResponse> {
    let Json(request) = payload?;
    let request_id = Uuid::new_v4();

    let magnitude_limit = match request.magnitude_limit {
        Some(limit) if !limit.is_finite() => {
            return Err(AppError::BadRequest("magnitude_limit must be a finite number".to_string()));
        }
        Some(limit) => limit,
        None => state.engine.settings().magnitude_limit,
    };
    let hint = request
        .lang
        .as_deref()
        .map(LocalizationHint::from_lang)
        .unwrap_or_default();
    let query = RawQuery::new(request.address, request.when);

    info!(
        request_id = %request_id,
        address = %query.address,
        when = %query.local_date_time,
        ?hint,
        "Computing sky"
    );

    let context = match state.engine.resolve_observer(&query, hint).await {
        Ok(context) => context,
        Err(err) => {
            warn!(request_id = %request_id, error = %err, "Observer frame failed");
            return Err(err.into());
        }
    };

    // The transform covers the whole catalog; keep it off the async workers
    let engine = state.engine.clone();
    let snapshot = tokio::task::spawn_blocking(move || engine.compute_sky_data(context, magnitude_limit))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    info!(
        request_id = %request_id,
        stars = snapshot.stars.len(),
        constellations = snapshot.constellation_positions.len(),
        "Sky computed"
    );

    let narrative = NarrativeBrief::from_snapshot(&snapshot, &query.local_date_time);
    Ok(Json(SkyResponse {
        request_id,
        snapshot,
        narrative,
    }))
}

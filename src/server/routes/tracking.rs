//! Location tracking endpoints
//!
//! REST surface for sample ingestion, session log reads, travel-distance
//! queries, and the storefront transition that drives the session
//! lifecycle. All endpoints are ownership-scoped to the calling seller,
//! identified by the `X-Seller-Id` header.

use crate::core::ingestion::{IngestOutcome, LocationRecord};
use crate::server::routes::{ApiResponse, errors};
use crate::server::state::AppState;
use crate::utils::error::{Result, TrackerError};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};
use uuid::Uuid;

/// Header carrying the authenticated seller identity
pub const SELLER_ID_HEADER: &str = "X-Seller-Id";

/// Location sample submission
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordLocationRequest {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Active session to attribute the sample to
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

/// Storefront transition
#[derive(Debug, Deserialize)]
pub struct StorefrontRequest {
    /// New storefront state
    pub open: bool,
}

/// Configure tracking routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tracking")
            .route("/location", web::post().to(record_location))
            .route("/storefront", web::post().to(set_storefront))
            .route("/session/active", web::get().to(active_session))
            .route("/session/{session_id}", web::get().to(session_logs))
            .route(
                "/session/{session_id}/distance",
                web::get().to(session_distance),
            ),
    );
}

/// Record a location sample
///
/// Responds 201 in both policy outcomes: the created log when the sample
/// was persisted, a null payload with a `skipped` status when the sampling
/// policy discarded it. Invalid coordinates are a 400, never persisted.
pub async fn record_location(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<RecordLocationRequest>,
) -> ActixResult<HttpResponse> {
    let seller_id = match seller_id_from(&req) {
        Ok(id) => id,
        Err(e) => return Ok(errors::tracker_error_to_response(e)),
    };

    match state
        .ingestion
        .ingest(
            &seller_id,
            request.latitude,
            request.longitude,
            request.session_id,
        )
        .await
    {
        Ok(IngestOutcome::Recorded(record)) => Ok(HttpResponse::Created()
            .json(ApiResponse::success_with_meta(
                Some(record),
                json!({"status": "ok"}),
            ))),
        Ok(IngestOutcome::Skipped { .. }) => Ok(HttpResponse::Created().json(
            ApiResponse::success_with_meta(
                None::<LocationRecord>,
                json!({"status": "skipped", "message": "sample within sampling thresholds"}),
            ),
        )),
        Err(e) if e.is_recoverable() => Ok(errors::tracker_error_to_response(e)),
        Err(e) => {
            error!(seller_id = %seller_id, error = %e, "location ingestion failed");
            Ok(errors::tracker_error_to_response(e))
        }
    }
}

/// Flip the seller's storefront state
///
/// Opening clocks the seller in (new session); closing clocks out and
/// recomputes the shift's travel distance.
pub async fn set_storefront(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<StorefrontRequest>,
) -> ActixResult<HttpResponse> {
    let seller_id = match seller_id_from(&req) {
        Ok(id) => id,
        Err(e) => return Ok(errors::tracker_error_to_response(e)),
    };

    match state.sessions.set_storefront(&seller_id, request.open).await {
        Ok(session) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_meta(
            session,
            json!({"open": request.open}),
        ))),
        Err(e) => {
            error!(seller_id = %seller_id, error = %e, "storefront transition failed");
            Ok(errors::tracker_error_to_response(e))
        }
    }
}

/// The seller's currently open session
pub async fn active_session(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    let seller_id = match seller_id_from(&req) {
        Ok(id) => id,
        Err(e) => return Ok(errors::tracker_error_to_response(e)),
    };

    match state.sessions.active_session(&seller_id).await {
        Ok(Some(session)) => Ok(HttpResponse::Ok().json(ApiResponse::success(session))),
        Ok(None) => Ok(errors::not_found_error("no active session")),
        Err(e) => Ok(errors::tracker_error_to_response(e)),
    }
}

/// Ordered location logs for one session
pub async fn session_logs(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let session_id = path.into_inner();
    let seller_id = match seller_id_from(&req) {
        Ok(id) => id,
        Err(e) => return Ok(errors::tracker_error_to_response(e)),
    };

    let session = match owned_session(&state, &seller_id, session_id).await {
        Ok(session) => session,
        Err(e) => return Ok(errors::tracker_error_to_response(e)),
    };

    match state.storage.db().location_logs_for_session(session.id).await {
        Ok(models) => {
            let mut records = Vec::with_capacity(models.len());
            for model in &models {
                match LocationRecord::from_model(model) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        // One corrupt row must not abort the batch read.
                        warn!(log_id = %model.id, error = %e, "omitting undecodable location log");
                    }
                }
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
        }
        Err(e) => Ok(errors::tracker_error_to_response(e)),
    }
}

/// Aggregate travel distance for one session
pub async fn session_distance(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let session_id = path.into_inner();
    let seller_id = match seller_id_from(&req) {
        Ok(id) => id,
        Err(e) => return Ok(errors::tracker_error_to_response(e)),
    };

    match owned_session(&state, &seller_id, session_id).await {
        Ok(session) => Ok(HttpResponse::Ok().json(ApiResponse::success(json!({
            "sessionId": session.id,
            "totalDistanceKm": format!("{:.2}", session.total_distance_km),
        })))),
        Err(e) => Ok(errors::tracker_error_to_response(e)),
    }
}

/// Extract the calling seller from the identity header
fn seller_id_from(req: &HttpRequest) -> Result<String> {
    let value = req
        .headers()
        .get(SELLER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();

    if value.is_empty() {
        return Err(TrackerError::validation(format!(
            "missing {} header",
            SELLER_ID_HEADER
        )));
    }
    Ok(value.to_string())
}

/// Fetch a session, verifying it belongs to the calling seller
async fn owned_session(
    state: &AppState,
    seller_id: &str,
    session_id: Uuid,
) -> Result<crate::storage::database::entities::work_session::Model> {
    let session = state
        .storage
        .db()
        .find_session(session_id)
        .await?
        .ok_or_else(|| TrackerError::not_found(format!("session {}", session_id)))?;

    // Sessions of other sellers are indistinguishable from absent ones.
    if session.seller_id != seller_id {
        return Err(TrackerError::not_found(format!("session {}", session_id)));
    }
    Ok(session)
}

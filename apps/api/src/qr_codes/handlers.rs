use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use tracing::info;

use crate::auth::CurrentBusiness;
use crate::errors::AppError;
use crate::models::{NewQrCode, QrCode};
use crate::schema::validate_qr_code;
use crate::state::AppState;

/// POST /api/qr-codes
///
/// The referenced form id is validated for shape only; existence is left
/// to the database's reference constraint.
pub async fn handle_create_qr_code(
    State(state): State<AppState>,
    current: CurrentBusiness,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<QrCode>), AppError> {
    let data = validate_qr_code(&payload).map_err(AppError::Validation)?;

    let qr_code = state
        .storage
        .create_qr_code(NewQrCode {
            business_id: current.id(),
            form_id: data.form_id,
            location_id: data.location_id,
            name: data.name,
        })
        .await?;

    info!("Created QR code {} for business {}", qr_code.id, current.id());
    Ok((StatusCode::CREATED, Json(qr_code)))
}

/// GET /api/qr-codes
pub async fn handle_list_qr_codes(
    State(state): State<AppState>,
    current: CurrentBusiness,
) -> Result<Json<Vec<QrCode>>, AppError> {
    let qr_codes = state.storage.qr_codes_by_business(current.id()).await?;
    Ok(Json(qr_codes))
}

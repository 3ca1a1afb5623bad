use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::CurrentBusiness;
use crate::errors::AppError;
use crate::feedback::submission;
use crate::models::Feedback;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackResponse {
    pub success: bool,
    pub feedback_id: Uuid,
}

/// GET /api/feedback
pub async fn handle_list_feedback(
    State(state): State<AppState>,
    current: CurrentBusiness,
) -> Result<Json<Vec<Feedback>>, AppError> {
    let feedback = state.storage.feedback_by_business(current.id()).await?;
    Ok(Json(feedback))
}

/// POST /api/submit-feedback/:qr_code_id
///
/// The only unauthenticated write in the API; anyone holding a printed
/// code can call it.
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    Path(qr_code_id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<SubmitFeedbackResponse>), AppError> {
    let qr_code_id =
        Uuid::parse_str(&qr_code_id).map_err(|_| AppError::not_found("QR code not found"))?;

    let feedback = submission::submit(state.storage.as_ref(), qr_code_id, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitFeedbackResponse {
            success: true,
            feedback_id: feedback.id,
        }),
    ))
}

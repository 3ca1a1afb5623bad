use axum::{extract::State, Json};

use crate::analytics::overview::{compute_overview, AnalyticsOverview};
use crate::auth::CurrentBusiness;
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/analytics/overview
pub async fn handle_overview(
    State(state): State<AppState>,
    current: CurrentBusiness,
) -> Result<Json<AnalyticsOverview>, AppError> {
    let feedback = state.storage.feedback_by_business(current.id()).await?;
    let qr_codes = state.storage.qr_codes_by_business(current.id()).await?;
    Ok(Json(compute_overview(&feedback, &qr_codes)))
}

use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use tracing::info;

use crate::auth::CurrentBusiness;
use crate::errors::AppError;
use crate::models::{Location, NewLocation};
use crate::schema::validate_location;
use crate::state::AppState;

/// POST /api/locations
pub async fn handle_create_location(
    State(state): State<AppState>,
    current: CurrentBusiness,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Location>), AppError> {
    let data = validate_location(&payload).map_err(AppError::Validation)?;

    let location = state
        .storage
        .create_location(NewLocation {
            business_id: current.id(),
            name: data.name,
            address: data.address,
            latitude: data.latitude,
            longitude: data.longitude,
        })
        .await?;

    info!("Created location {} for business {}", location.id, current.id());
    Ok((StatusCode::CREATED, Json(location)))
}

/// GET /api/locations
pub async fn handle_list_locations(
    State(state): State<AppState>,
    current: CurrentBusiness,
) -> Result<Json<Vec<Location>>, AppError> {
    let locations = state.storage.locations_by_business(current.id()).await?;
    Ok(Json(locations))
}

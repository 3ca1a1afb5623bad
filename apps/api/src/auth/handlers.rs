use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{open_session, CurrentBusiness};
use crate::errors::AppError;
use crate::models::{Business, NewBusiness};
use crate::schema::validate_registration;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Fresh session token plus the business that owns it.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: Uuid,
    pub business: Business,
}

/// POST /api/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let data = validate_registration(&payload).map_err(AppError::Validation)?;

    if state.storage.business_by_email(&data.email).await?.is_some() {
        return Err(AppError::Duplicate("Email already exists".to_string()));
    }

    let password = hash_password(&data.password)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;

    let business = state
        .storage
        .create_business(NewBusiness {
            business_name: data.business_name,
            email: data.email,
            password,
            phone: data.phone,
            subscription_plan: data.subscription_plan,
        })
        .await?;
    let session = open_session(state.storage.as_ref(), business.id).await?;

    info!("Registered business {} ({})", business.id, business.business_name);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: session.token,
            business,
        }),
    ))
}

/// POST /api/login
///
/// Wrong email and wrong password are indistinguishable to the caller.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let business = state
        .storage
        .business_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&req.password, &business.password) {
        return Err(AppError::Unauthorized);
    }

    let session = open_session(state.storage.as_ref(), business.id).await?;
    info!("Business {} logged in", business.id);
    Ok(Json(AuthResponse {
        token: session.token,
        business,
    }))
}

/// POST /api/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    current: CurrentBusiness,
) -> Result<StatusCode, AppError> {
    state.storage.delete_session(current.token).await?;
    info!("Business {} logged out", current.id());
    Ok(StatusCode::OK)
}

/// GET /api/business
pub async fn handle_current_business(current: CurrentBusiness) -> Json<Business> {
    Json(current.business)
}

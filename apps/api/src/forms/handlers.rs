use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentBusiness;
use crate::errors::AppError;
use crate::models::{Form, FormUpdate, NewForm};
use crate::schema::{validate_form, validate_form_update};
use crate::state::AppState;

/// POST /api/forms
pub async fn handle_create_form(
    State(state): State<AppState>,
    current: CurrentBusiness,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Form>), AppError> {
    let data = validate_form(&payload).map_err(AppError::Validation)?;

    let form = state
        .storage
        .create_form(NewForm {
            business_id: current.id(),
            name: data.name,
            description: data.description,
            fields: data.fields,
        })
        .await?;

    info!("Created form {} for business {}", form.id, current.id());
    Ok((StatusCode::CREATED, Json(form)))
}

/// GET /api/forms
pub async fn handle_list_forms(
    State(state): State<AppState>,
    current: CurrentBusiness,
) -> Result<Json<Vec<Form>>, AppError> {
    let forms = state.storage.forms_by_business(current.id()).await?;
    Ok(Json(forms))
}

/// GET /api/forms/:id
///
/// Another tenant's form is indistinguishable from a missing one.
pub async fn handle_get_form(
    State(state): State<AppState>,
    current: CurrentBusiness,
    Path(id): Path<String>,
) -> Result<Json<Form>, AppError> {
    let form = find_owned_form(&state, &current, &id).await?;
    Ok(Json(form))
}

/// PUT /api/forms/:id
pub async fn handle_update_form(
    State(state): State<AppState>,
    current: CurrentBusiness,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Form>, AppError> {
    let existing = find_owned_form(&state, &current, &id).await?;
    let data = validate_form_update(&payload).map_err(AppError::Validation)?;

    let form = state
        .storage
        .update_form(
            existing.id,
            FormUpdate {
                name: data.name,
                description: data.description,
                fields: Some(data.fields),
            },
        )
        .await?;

    info!("Updated form {} for business {}", form.id, current.id());
    Ok(Json(form))
}

/// Resolves a path id to a form owned by the current business. A malformed
/// id, an unknown id, and someone else's form all come back as 404.
async fn find_owned_form(
    state: &AppState,
    current: &CurrentBusiness,
    raw_id: &str,
) -> Result<Form, AppError> {
    let id = Uuid::parse_str(raw_id).map_err(|_| AppError::not_found("Form not found"))?;
    state
        .storage
        .form_by_id(id)
        .await?
        .filter(|form| form.business_id == current.id())
        .ok_or_else(|| AppError::not_found("Form not found"))
}

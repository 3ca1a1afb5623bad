pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analytics::handlers as analytics;
use crate::auth::handlers as auth;
use crate::feedback::handlers as feedback;
use crate::forms::handlers as forms;
use crate::locations::handlers as locations;
use crate::qr_codes::handlers as qr_codes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/register", post(auth::handle_register))
        .route("/api/login", post(auth::handle_login))
        .route("/api/logout", post(auth::handle_logout))
        .route("/api/business", get(auth::handle_current_business))
        // Tenant resources
        .route(
            "/api/locations",
            get(locations::handle_list_locations).post(locations::handle_create_location),
        )
        .route(
            "/api/forms",
            get(forms::handle_list_forms).post(forms::handle_create_form),
        )
        .route(
            "/api/forms/:id",
            get(forms::handle_get_form).put(forms::handle_update_form),
        )
        .route(
            "/api/qr-codes",
            get(qr_codes::handle_list_qr_codes).post(qr_codes::handle_create_qr_code),
        )
        .route("/api/feedback", get(feedback::handle_list_feedback))
        // Public submission entry point
        .route(
            "/api/submit-feedback/:qr_code_id",
            post(feedback::handle_submit_feedback),
        )
        // Analytics
        .route("/api/analytics/overview", get(analytics::handle_overview))
        .with_state(state)
}

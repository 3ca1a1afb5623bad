use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One submitted response. The `qr_code_id`, `form_id`, `business_id` and
/// `location_id` columns are denormalized from the QR code at submission
/// time so analytics never has to join through it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub qr_code_id: Uuid,
    pub form_id: Uuid,
    pub business_id: Uuid,
    pub location_id: Option<Uuid>,
    /// Answers keyed by field id, stored verbatim.
    pub response: Value,
    pub rating: Option<i32>,
    pub sentiment: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub media_urls: Vec<String>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub qr_code_id: Uuid,
    pub form_id: Uuid,
    pub business_id: Uuid,
    pub location_id: Option<Uuid>,
    pub response: Value,
    pub rating: Option<i32>,
    pub sentiment: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub media_urls: Vec<String>,
    pub is_anonymous: bool,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A printable entry point tying a physical spot to a feedback form.
/// `scan_count` counts every submission attempt against the code, valid
/// or not.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QrCode {
    pub id: Uuid,
    pub business_id: Uuid,
    pub form_id: Uuid,
    pub location_id: Option<Uuid>,
    pub name: String,
    pub scan_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewQrCode {
    pub business_id: Uuid,
    pub form_id: Uuid,
    pub location_id: Option<Uuid>,
    pub name: String,
}

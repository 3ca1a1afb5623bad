use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A physical site belonging to a business. Coordinates are kept as the
/// free-form strings clients send them in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLocation {
    pub business_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered tenant. The password field holds the argon2 hash and is
/// never serialized into responses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: Uuid,
    pub business_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub phone: Option<String>,
    pub subscription_plan: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBusiness {
    pub business_name: String,
    pub email: String,
    /// Already hashed by the caller.
    pub password: String,
    pub phone: Option<String>,
    /// Defaults to "Free" when absent.
    pub subscription_plan: Option<String>,
}

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A bearer session. The token itself is the primary key; it is only ever
/// handed to the business that opened it.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: Uuid,
    pub business_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

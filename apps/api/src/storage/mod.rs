pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Business, Feedback, Form, FormUpdate, Location, NewBusiness, NewFeedback, NewForm, NewLocation,
    NewQrCode, QrCode, Session,
};

pub use memory::MemStorage;
pub use postgres::PgStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate: {0}")]
    Duplicate(String),

    #[error("database error: {0}")]
    Database(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence contract for every entity. Backed by Postgres in production
/// and by an in-memory store in tests.
///
/// Lookups return `Ok(None)` for unknown ids; only `update_form` treats a
/// missing row as an error, because it has no way to report partial success.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_business(&self, data: NewBusiness) -> StorageResult<Business>;
    async fn business_by_id(&self, id: Uuid) -> StorageResult<Option<Business>>;
    async fn business_by_email(&self, email: &str) -> StorageResult<Option<Business>>;

    async fn create_location(&self, data: NewLocation) -> StorageResult<Location>;
    async fn location_by_id(&self, id: Uuid) -> StorageResult<Option<Location>>;
    async fn locations_by_business(&self, business_id: Uuid) -> StorageResult<Vec<Location>>;

    async fn create_form(&self, data: NewForm) -> StorageResult<Form>;
    async fn form_by_id(&self, id: Uuid) -> StorageResult<Option<Form>>;
    async fn forms_by_business(&self, business_id: Uuid) -> StorageResult<Vec<Form>>;
    /// Merges the supplied fields onto the stored form and bumps
    /// `updated_at`. Fails with `NotFound` if the form does not exist.
    async fn update_form(&self, id: Uuid, update: FormUpdate) -> StorageResult<Form>;

    async fn create_qr_code(&self, data: NewQrCode) -> StorageResult<QrCode>;
    async fn qr_code_by_id(&self, id: Uuid) -> StorageResult<Option<QrCode>>;
    async fn qr_codes_by_business(&self, business_id: Uuid) -> StorageResult<Vec<QrCode>>;
    /// Adds one to the scan counter. A missing id is a silent no-op.
    async fn increment_scan_count(&self, id: Uuid) -> StorageResult<()>;

    async fn create_feedback(&self, data: NewFeedback) -> StorageResult<Feedback>;
    async fn feedback_by_id(&self, id: Uuid) -> StorageResult<Option<Feedback>>;
    async fn feedback_by_business(&self, business_id: Uuid) -> StorageResult<Vec<Feedback>>;
    async fn feedback_by_qr_code(&self, qr_code_id: Uuid) -> StorageResult<Vec<Feedback>>;

    async fn create_session(
        &self,
        business_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> StorageResult<Session>;
    async fn session_by_token(&self, token: Uuid) -> StorageResult<Option<Session>>;
    async fn delete_session(&self, token: Uuid) -> StorageResult<()>;
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    Business, Feedback, Form, FormUpdate, Location, NewBusiness, NewFeedback, NewForm, NewLocation,
    NewQrCode, QrCode, Session,
};
use crate::storage::{Storage, StorageError, StorageResult};

/// Postgres-backed storage. All ids and timestamps are generated here so
/// the in-memory backend behaves identically.
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        PgStorage { pool }
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn create_business(&self, data: NewBusiness) -> StorageResult<Business> {
        let result = sqlx::query_as::<_, Business>(
            r#"
            INSERT INTO businesses (id, business_name, email, password, phone, subscription_plan, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.business_name)
        .bind(&data.email)
        .bind(&data.password)
        .bind(&data.phone)
        .bind(data.subscription_plan.as_deref().unwrap_or("Free"))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(business) => Ok(business),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StorageError::Duplicate("Email already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn business_by_id(&self, id: Uuid) -> StorageResult<Option<Business>> {
        Ok(
            sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn business_by_email(&self, email: &str) -> StorageResult<Option<Business>> {
        Ok(
            sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_location(&self, data: NewLocation) -> StorageResult<Location> {
        Ok(sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (id, business_id, name, address, latitude, longitude, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.business_id)
        .bind(&data.name)
        .bind(&data.address)
        .bind(&data.latitude)
        .bind(&data.longitude)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?)
    }

    async fn location_by_id(&self, id: Uuid) -> StorageResult<Option<Location>> {
        Ok(
            sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn locations_by_business(&self, business_id: Uuid) -> StorageResult<Vec<Location>> {
        Ok(sqlx::query_as::<_, Location>(
            "SELECT * FROM locations WHERE business_id = $1 ORDER BY created_at ASC",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_form(&self, data: NewForm) -> StorageResult<Form> {
        let now = Utc::now();
        Ok(sqlx::query_as::<_, Form>(
            r#"
            INSERT INTO forms (id, business_id, name, description, fields, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.business_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(Json(&data.fields))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn form_by_id(&self, id: Uuid) -> StorageResult<Option<Form>> {
        Ok(sqlx::query_as::<_, Form>("SELECT * FROM forms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn forms_by_business(&self, business_id: Uuid) -> StorageResult<Vec<Form>> {
        Ok(sqlx::query_as::<_, Form>(
            "SELECT * FROM forms WHERE business_id = $1 ORDER BY created_at ASC",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_form(&self, id: Uuid, update: FormUpdate) -> StorageResult<Form> {
        sqlx::query_as::<_, Form>(
            r#"
            UPDATE forms SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                fields = COALESCE($4, fields),
                updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.fields.map(Json))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::NotFound("Form not found".to_string()))
    }

    async fn create_qr_code(&self, data: NewQrCode) -> StorageResult<QrCode> {
        Ok(sqlx::query_as::<_, QrCode>(
            r#"
            INSERT INTO qr_codes (id, business_id, form_id, location_id, name, scan_count, created_at)
            VALUES ($1, $2, $3, $4, $5, 0, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.business_id)
        .bind(data.form_id)
        .bind(data.location_id)
        .bind(&data.name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?)
    }

    async fn qr_code_by_id(&self, id: Uuid) -> StorageResult<Option<QrCode>> {
        Ok(
            sqlx::query_as::<_, QrCode>("SELECT * FROM qr_codes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn qr_codes_by_business(&self, business_id: Uuid) -> StorageResult<Vec<QrCode>> {
        Ok(sqlx::query_as::<_, QrCode>(
            "SELECT * FROM qr_codes WHERE business_id = $1 ORDER BY created_at ASC",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn increment_scan_count(&self, id: Uuid) -> StorageResult<()> {
        // Atomic in SQL; concurrent scans of the same code never lose counts.
        sqlx::query("UPDATE qr_codes SET scan_count = scan_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_feedback(&self, data: NewFeedback) -> StorageResult<Feedback> {
        Ok(sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback
                (id, qr_code_id, form_id, business_id, location_id, response, rating,
                 sentiment, customer_name, customer_email, customer_phone, media_urls,
                 is_anonymous, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.qr_code_id)
        .bind(data.form_id)
        .bind(data.business_id)
        .bind(data.location_id)
        .bind(&data.response)
        .bind(data.rating)
        .bind(&data.sentiment)
        .bind(&data.customer_name)
        .bind(&data.customer_email)
        .bind(&data.customer_phone)
        .bind(&data.media_urls)
        .bind(data.is_anonymous)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?)
    }

    async fn feedback_by_id(&self, id: Uuid) -> StorageResult<Option<Feedback>> {
        Ok(
            sqlx::query_as::<_, Feedback>("SELECT * FROM feedback WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn feedback_by_business(&self, business_id: Uuid) -> StorageResult<Vec<Feedback>> {
        Ok(sqlx::query_as::<_, Feedback>(
            "SELECT * FROM feedback WHERE business_id = $1 ORDER BY created_at ASC",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn feedback_by_qr_code(&self, qr_code_id: Uuid) -> StorageResult<Vec<Feedback>> {
        Ok(sqlx::query_as::<_, Feedback>(
            "SELECT * FROM feedback WHERE qr_code_id = $1 ORDER BY created_at ASC",
        )
        .bind(qr_code_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_session(
        &self,
        business_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> StorageResult<Session> {
        Ok(sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token, business_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(business_id)
        .bind(Utc::now())
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn session_by_token(&self, token: Uuid) -> StorageResult<Option<Session>> {
        Ok(
            sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn delete_session(&self, token: Uuid) -> StorageResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

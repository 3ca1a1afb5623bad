use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::{
    Business, Feedback, Form, FormUpdate, Location, NewBusiness, NewFeedback, NewForm, NewLocation,
    NewQrCode, QrCode, Session,
};
use crate::storage::{Storage, StorageError, StorageResult};

/// In-memory storage with the same observable behavior as [`PgStorage`].
/// Backs the test suite; nothing survives a restart.
///
/// [`PgStorage`]: crate::storage::PgStorage
#[derive(Default)]
pub struct MemStorage {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    businesses: HashMap<Uuid, Business>,
    locations: HashMap<Uuid, Location>,
    forms: HashMap<Uuid, Form>,
    qr_codes: HashMap<Uuid, QrCode>,
    feedback: HashMap<Uuid, Feedback>,
    sessions: HashMap<Uuid, Session>,
}

impl MemStorage {
    pub fn new() -> Self {
        MemStorage::default()
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Tables>> {
        self.inner
            .lock()
            .map_err(|_| StorageError::Database("storage lock poisoned".to_string()))
    }
}

fn sorted_by_created<T, F>(items: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    let mut items = items;
    items.sort_by_key(|item| created_at(item));
    items
}

#[async_trait]
impl Storage for MemStorage {
    async fn create_business(&self, data: NewBusiness) -> StorageResult<Business> {
        let mut tables = self.lock()?;
        if tables.businesses.values().any(|b| b.email == data.email) {
            return Err(StorageError::Duplicate("Email already exists".to_string()));
        }
        let business = Business {
            id: Uuid::new_v4(),
            business_name: data.business_name,
            email: data.email,
            password: data.password,
            phone: data.phone,
            subscription_plan: data.subscription_plan.unwrap_or_else(|| "Free".to_string()),
            created_at: Utc::now(),
        };
        tables.businesses.insert(business.id, business.clone());
        Ok(business)
    }

    async fn business_by_id(&self, id: Uuid) -> StorageResult<Option<Business>> {
        Ok(self.lock()?.businesses.get(&id).cloned())
    }

    async fn business_by_email(&self, email: &str) -> StorageResult<Option<Business>> {
        Ok(self
            .lock()?
            .businesses
            .values()
            .find(|b| b.email == email)
            .cloned())
    }

    async fn create_location(&self, data: NewLocation) -> StorageResult<Location> {
        let mut tables = self.lock()?;
        let location = Location {
            id: Uuid::new_v4(),
            business_id: data.business_id,
            name: data.name,
            address: data.address,
            latitude: data.latitude,
            longitude: data.longitude,
            created_at: Utc::now(),
        };
        tables.locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn location_by_id(&self, id: Uuid) -> StorageResult<Option<Location>> {
        Ok(self.lock()?.locations.get(&id).cloned())
    }

    async fn locations_by_business(&self, business_id: Uuid) -> StorageResult<Vec<Location>> {
        let locations = self
            .lock()?
            .locations
            .values()
            .filter(|l| l.business_id == business_id)
            .cloned()
            .collect();
        Ok(sorted_by_created(locations, |l| l.created_at))
    }

    async fn create_form(&self, data: NewForm) -> StorageResult<Form> {
        let mut tables = self.lock()?;
        let now = Utc::now();
        let form = Form {
            id: Uuid::new_v4(),
            business_id: data.business_id,
            name: data.name,
            description: data.description,
            fields: Json(data.fields),
            created_at: now,
            updated_at: now,
        };
        tables.forms.insert(form.id, form.clone());
        Ok(form)
    }

    async fn form_by_id(&self, id: Uuid) -> StorageResult<Option<Form>> {
        Ok(self.lock()?.forms.get(&id).cloned())
    }

    async fn forms_by_business(&self, business_id: Uuid) -> StorageResult<Vec<Form>> {
        let forms = self
            .lock()?
            .forms
            .values()
            .filter(|f| f.business_id == business_id)
            .cloned()
            .collect();
        Ok(sorted_by_created(forms, |f| f.created_at))
    }

    async fn update_form(&self, id: Uuid, update: FormUpdate) -> StorageResult<Form> {
        let mut tables = self.lock()?;
        let form = tables
            .forms
            .get_mut(&id)
            .ok_or_else(|| StorageError::NotFound("Form not found".to_string()))?;
        if let Some(name) = update.name {
            form.name = name;
        }
        if let Some(description) = update.description {
            form.description = Some(description);
        }
        if let Some(fields) = update.fields {
            form.fields = Json(fields);
        }
        form.updated_at = Utc::now();
        Ok(form.clone())
    }

    async fn create_qr_code(&self, data: NewQrCode) -> StorageResult<QrCode> {
        let mut tables = self.lock()?;
        let qr_code = QrCode {
            id: Uuid::new_v4(),
            business_id: data.business_id,
            form_id: data.form_id,
            location_id: data.location_id,
            name: data.name,
            scan_count: 0,
            created_at: Utc::now(),
        };
        tables.qr_codes.insert(qr_code.id, qr_code.clone());
        Ok(qr_code)
    }

    async fn qr_code_by_id(&self, id: Uuid) -> StorageResult<Option<QrCode>> {
        Ok(self.lock()?.qr_codes.get(&id).cloned())
    }

    async fn qr_codes_by_business(&self, business_id: Uuid) -> StorageResult<Vec<QrCode>> {
        let qr_codes = self
            .lock()?
            .qr_codes
            .values()
            .filter(|q| q.business_id == business_id)
            .cloned()
            .collect();
        Ok(sorted_by_created(qr_codes, |q| q.created_at))
    }

    async fn increment_scan_count(&self, id: Uuid) -> StorageResult<()> {
        if let Some(qr_code) = self.lock()?.qr_codes.get_mut(&id) {
            qr_code.scan_count += 1;
        }
        Ok(())
    }

    async fn create_feedback(&self, data: NewFeedback) -> StorageResult<Feedback> {
        let mut tables = self.lock()?;
        let feedback = Feedback {
            id: Uuid::new_v4(),
            qr_code_id: data.qr_code_id,
            form_id: data.form_id,
            business_id: data.business_id,
            location_id: data.location_id,
            response: data.response,
            rating: data.rating,
            sentiment: Some(data.sentiment),
            customer_name: data.customer_name,
            customer_email: data.customer_email,
            customer_phone: data.customer_phone,
            media_urls: data.media_urls,
            is_anonymous: data.is_anonymous,
            created_at: Utc::now(),
        };
        tables.feedback.insert(feedback.id, feedback.clone());
        Ok(feedback)
    }

    async fn feedback_by_id(&self, id: Uuid) -> StorageResult<Option<Feedback>> {
        Ok(self.lock()?.feedback.get(&id).cloned())
    }

    async fn feedback_by_business(&self, business_id: Uuid) -> StorageResult<Vec<Feedback>> {
        let feedback = self
            .lock()?
            .feedback
            .values()
            .filter(|f| f.business_id == business_id)
            .cloned()
            .collect();
        Ok(sorted_by_created(feedback, |f| f.created_at))
    }

    async fn feedback_by_qr_code(&self, qr_code_id: Uuid) -> StorageResult<Vec<Feedback>> {
        let feedback = self
            .lock()?
            .feedback
            .values()
            .filter(|f| f.qr_code_id == qr_code_id)
            .cloned()
            .collect();
        Ok(sorted_by_created(feedback, |f| f.created_at))
    }

    async fn create_session(
        &self,
        business_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> StorageResult<Session> {
        let mut tables = self.lock()?;
        let session = Session {
            token: Uuid::new_v4(),
            business_id,
            created_at: Utc::now(),
            expires_at,
        };
        tables.sessions.insert(session.token, session.clone());
        Ok(session)
    }

    async fn session_by_token(&self, token: Uuid) -> StorageResult<Option<Session>> {
        Ok(self.lock()?.sessions.get(&token).cloned())
    }

    async fn delete_session(&self, token: Uuid) -> StorageResult<()> {
        self.lock()?.sessions.remove(&token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldType, FormField};
    use chrono::Duration;

    fn make_business() -> NewBusiness {
        NewBusiness {
            business_name: "Corner Cafe".to_string(),
            email: "owner@cornercafe.test".to_string(),
            password: "hashed".to_string(),
            phone: None,
            subscription_plan: None,
        }
    }

    fn make_field(id: &str, label: &str) -> FormField {
        FormField {
            id: id.to_string(),
            field_type: FieldType::StarRating,
            label: label.to_string(),
            required: true,
            placeholder: None,
            options: None,
            min: None,
            max: None,
        }
    }

    #[tokio::test]
    async fn test_create_business_defaults_plan_and_rejects_duplicate_email() {
        let storage = MemStorage::new();
        let business = storage.create_business(make_business()).await.unwrap();
        assert_eq!(business.subscription_plan, "Free");

        let fetched = storage.business_by_id(business.id).await.unwrap();
        assert_eq!(fetched.unwrap().email, "owner@cornercafe.test");

        let err = storage.create_business(make_business()).await.unwrap_err();
        assert!(matches!(err, StorageError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_update_form_merges_partial_update() {
        let storage = MemStorage::new();
        let business = storage.create_business(make_business()).await.unwrap();
        let form = storage
            .create_form(NewForm {
                business_id: business.id,
                name: "Visit feedback".to_string(),
                description: Some("How was it?".to_string()),
                fields: vec![make_field("f1", "Rate us")],
            })
            .await
            .unwrap();

        // Only the name is supplied; description and fields must survive.
        let updated = storage
            .update_form(
                form.id,
                FormUpdate {
                    name: Some("Renamed".to_string()),
                    ..FormUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.description.as_deref(), Some("How was it?"));
        assert_eq!(updated.fields.0.len(), 1);
        assert!(updated.updated_at >= form.updated_at);
        assert_eq!(updated.created_at, form.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_form_is_not_found() {
        let storage = MemStorage::new();
        let err = storage
            .update_form(Uuid::new_v4(), FormUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_increment_scan_count_and_missing_id_no_op() {
        let storage = MemStorage::new();
        let business = storage.create_business(make_business()).await.unwrap();
        let form = storage
            .create_form(NewForm {
                business_id: business.id,
                name: "Form".to_string(),
                description: None,
                fields: vec![],
            })
            .await
            .unwrap();
        let qr_code = storage
            .create_qr_code(NewQrCode {
                business_id: business.id,
                form_id: form.id,
                location_id: None,
                name: "Front door".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(qr_code.scan_count, 0);

        storage.increment_scan_count(qr_code.id).await.unwrap();
        storage.increment_scan_count(qr_code.id).await.unwrap();
        storage.increment_scan_count(Uuid::new_v4()).await.unwrap();

        let fetched = storage.qr_code_by_id(qr_code.id).await.unwrap().unwrap();
        assert_eq!(fetched.scan_count, 2);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let storage = MemStorage::new();
        let business = storage.create_business(make_business()).await.unwrap();
        let session = storage
            .create_session(business.id, Utc::now() + Duration::days(7))
            .await
            .unwrap();

        let fetched = storage.session_by_token(session.token).await.unwrap();
        assert_eq!(fetched.unwrap().business_id, business.id);

        storage.delete_session(session.token).await.unwrap();
        assert!(storage
            .session_by_token(session.token)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_lists_are_scoped_to_the_owning_business() {
        let storage = MemStorage::new();
        let first = storage.create_business(make_business()).await.unwrap();
        let second = storage
            .create_business(NewBusiness {
                email: "other@shop.test".to_string(),
                ..make_business()
            })
            .await
            .unwrap();

        storage
            .create_location(NewLocation {
                business_id: first.id,
                name: "Downtown".to_string(),
                address: None,
                latitude: None,
                longitude: None,
            })
            .await
            .unwrap();

        assert_eq!(
            storage.locations_by_business(first.id).await.unwrap().len(),
            1
        );
        assert!(storage
            .locations_by_business(second.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_location_by_id_finds_only_stored_ids() {
        let storage = MemStorage::new();
        let business = storage.create_business(make_business()).await.unwrap();
        let location = storage
            .create_location(NewLocation {
                business_id: business.id,
                name: "Downtown".to_string(),
                address: Some("1 Main St".to_string()),
                latitude: None,
                longitude: None,
            })
            .await
            .unwrap();

        let fetched = storage.location_by_id(location.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Downtown");
        assert_eq!(fetched.address.as_deref(), Some("1 Main St"));
        assert_eq!(fetched.business_id, business.id);

        assert!(storage
            .location_by_id(Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
    }
}

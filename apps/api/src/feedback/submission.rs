//! The public submission pipeline: resolve the scanned code, count the
//! scan, validate the payload, classify it, and persist.
//!
//! Ordering is deliberate. The scan counter moves before validation runs,
//! so an abandoned or malformed submission still registers as a visit, and
//! it is never rolled back when a later step fails.

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::sentiment::classify;
use crate::models::{Feedback, NewFeedback};
use crate::schema::validate_feedback_submission;
use crate::storage::Storage;

/// Runs one submission attempt against the QR code `qr_code_id` was
/// scanned from. Every id stored on the resulting feedback row comes from
/// the QR code itself, never from the payload.
pub async fn submit(
    storage: &dyn Storage,
    qr_code_id: Uuid,
    payload: &Value,
) -> Result<Feedback, AppError> {
    // 1. Resolve the code. Unknown codes record nothing.
    let qr_code = storage
        .qr_code_by_id(qr_code_id)
        .await?
        .ok_or_else(|| AppError::not_found("QR code not found"))?;

    // 2. Count the scan before validating.
    storage.increment_scan_count(qr_code.id).await?;

    // 3. Validate the submitted payload.
    let data = validate_feedback_submission(payload).map_err(AppError::Validation)?;

    // 4. Classify and persist with the code's own tenancy ids.
    let sentiment = classify(data.rating);
    let feedback = storage
        .create_feedback(NewFeedback {
            qr_code_id: qr_code.id,
            form_id: qr_code.form_id,
            business_id: qr_code.business_id,
            location_id: qr_code.location_id,
            response: data.response,
            rating: data.rating,
            sentiment: sentiment.as_str().to_string(),
            customer_name: data.customer_name,
            customer_email: data.customer_email,
            customer_phone: data.customer_phone,
            media_urls: data.media_urls,
            is_anonymous: data.is_anonymous,
        })
        .await?;

    info!(
        "Stored feedback {} for QR code {} (sentiment: {sentiment})",
        feedback.id, qr_code.id
    );
    Ok(feedback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewBusiness, NewForm, NewQrCode, QrCode};
    use crate::storage::MemStorage;
    use serde_json::json;

    async fn seed_qr_code(storage: &MemStorage) -> QrCode {
        let business = storage
            .create_business(NewBusiness {
                business_name: "Corner Cafe".to_string(),
                email: "owner@cornercafe.test".to_string(),
                password: "hashed".to_string(),
                phone: None,
                subscription_plan: None,
            })
            .await
            .unwrap();
        let form = storage
            .create_form(NewForm {
                business_id: business.id,
                name: "Visit feedback".to_string(),
                description: None,
                fields: vec![],
            })
            .await
            .unwrap();
        storage
            .create_qr_code(NewQrCode {
                business_id: business.id,
                form_id: form.id,
                location_id: None,
                name: "Front door".to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_submit_persists_classified_feedback() {
        let storage = MemStorage::new();
        let qr_code = seed_qr_code(&storage).await;

        let feedback = submit(
            &storage,
            qr_code.id,
            &json!({"response": {"f1": "lovely"}, "rating": 5, "customerName": "Ana"}),
        )
        .await
        .unwrap();

        assert_eq!(feedback.sentiment.as_deref(), Some("Positive"));
        assert_eq!(feedback.business_id, qr_code.business_id);
        assert_eq!(feedback.form_id, qr_code.form_id);
        assert!(feedback.media_urls.is_empty());

        let stored = storage.feedback_by_id(feedback.id).await.unwrap();
        assert!(stored.is_some());
        let scanned = storage.qr_code_by_id(qr_code.id).await.unwrap().unwrap();
        assert_eq!(scanned.scan_count, 1);
    }

    #[tokio::test]
    async fn test_submit_to_unknown_code_records_nothing() {
        let storage = MemStorage::new();
        let qr_code = seed_qr_code(&storage).await;

        let err = submit(&storage, Uuid::new_v4(), &json!({"response": {}}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        // Neither the real code's counter nor the feedback table moved.
        let scanned = storage.qr_code_by_id(qr_code.id).await.unwrap().unwrap();
        assert_eq!(scanned.scan_count, 0);
        assert!(storage
            .feedback_by_qr_code(qr_code.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_invalid_payload_still_counts_the_scan() {
        let storage = MemStorage::new();
        let qr_code = seed_qr_code(&storage).await;

        let err = submit(&storage, qr_code.id, &json!({"rating": 4}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let scanned = storage.qr_code_by_id(qr_code.id).await.unwrap().unwrap();
        assert_eq!(scanned.scan_count, 1);
        assert!(storage
            .feedback_by_qr_code(qr_code.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_payload_tenancy_ids_are_overridden() {
        let storage = MemStorage::new();
        let qr_code = seed_qr_code(&storage).await;
        let forged = Uuid::new_v4();

        let feedback = submit(
            &storage,
            qr_code.id,
            &json!({"response": {}, "businessId": forged.to_string(), "formId": forged.to_string()}),
        )
        .await
        .unwrap();

        assert_eq!(feedback.business_id, qr_code.business_id);
        assert_eq!(feedback.form_id, qr_code.form_id);
        assert_ne!(feedback.business_id, forged);
    }

    #[tokio::test]
    async fn test_submit_without_rating_is_neutral() {
        let storage = MemStorage::new();
        let qr_code = seed_qr_code(&storage).await;

        let feedback = submit(&storage, qr_code.id, &json!({"response": {"f2": "fine"}}))
            .await
            .unwrap();

        assert_eq!(feedback.sentiment.as_deref(), Some("Neutral"));
        assert_eq!(feedback.rating, None);
        assert!(feedback.is_anonymous);
    }
}

//! Seeds a demo tenant with a form, QR codes and a spread of feedback so
//! a fresh database has something to show.
//!
//! Safe to run repeatedly; it backs off if the demo business exists.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::auth::password::hash_password;
use api::config::Config;
use api::db::{create_pool, run_migrations};
use api::feedback::submission;
use api::models::{FieldType, FormField, NewBusiness, NewForm, NewLocation, NewQrCode};
use api::storage::{PgStorage, Storage};

const DEMO_EMAIL: &str = "demo@pulse.example";
const DEMO_PASSWORD: &str = "password123";

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let storage = Arc::new(PgStorage::new(pool));
    seed(storage.as_ref()).await
}

async fn seed(storage: &dyn Storage) -> Result<()> {
    if storage.business_by_email(DEMO_EMAIL).await?.is_some() {
        info!("Demo business already seeded; nothing to do");
        return Ok(());
    }

    let password = hash_password(DEMO_PASSWORD)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
    let business = storage
        .create_business(NewBusiness {
            business_name: "Corner Cafe".to_string(),
            email: DEMO_EMAIL.to_string(),
            password,
            phone: Some("+1 555 0100".to_string()),
            subscription_plan: None,
        })
        .await?;

    let location = storage
        .create_location(NewLocation {
            business_id: business.id,
            name: "Downtown".to_string(),
            address: Some("12 Main St".to_string()),
            latitude: Some("40.7128".to_string()),
            longitude: Some("-74.0060".to_string()),
        })
        .await?;

    let form = storage
        .create_form(NewForm {
            business_id: business.id,
            name: "Visit feedback".to_string(),
            description: Some("Tell us how your visit went".to_string()),
            fields: demo_fields(),
        })
        .await?;

    let counter_code = storage
        .create_qr_code(NewQrCode {
            business_id: business.id,
            form_id: form.id,
            location_id: Some(location.id),
            name: "Front counter".to_string(),
        })
        .await?;
    let window_code = storage
        .create_qr_code(NewQrCode {
            business_id: business.id,
            form_id: form.id,
            location_id: Some(location.id),
            name: "Window table".to_string(),
        })
        .await?;

    // Submissions go through the real pipeline so counters and sentiment
    // labels line up with what the API would have produced.
    let submissions = [
        json!({
            "response": {"overall": 5, "comments": "Best flat white in town"},
            "rating": 5,
            "customerName": "Ana",
            "isAnonymous": false
        }),
        json!({
            "response": {"overall": 4, "favorite": "Espresso"},
            "rating": 4
        }),
        json!({
            "response": {"overall": 2, "comments": "Waited fifteen minutes"},
            "rating": 2
        }),
        json!({
            "response": {"comments": "It was fine"}
        }),
    ];
    for payload in &submissions {
        submission::submit(storage, counter_code.id, payload).await?;
    }

    // A few walk-away scans that never turned into feedback.
    for _ in 0..4 {
        storage.increment_scan_count(window_code.id).await?;
    }

    info!(
        "Seeded demo business {} ({} / {})",
        business.id, DEMO_EMAIL, DEMO_PASSWORD
    );
    Ok(())
}

fn demo_fields() -> Vec<FormField> {
    fn field(id: &str, field_type: FieldType, label: &str) -> FormField {
        FormField {
            id: id.to_string(),
            field_type,
            label: label.to_string(),
            required: false,
            placeholder: None,
            options: None,
            min: None,
            max: None,
        }
    }

    let mut overall = field("overall", FieldType::StarRating, "How was your visit?");
    overall.required = true;
    overall.min = Some(1.into());
    overall.max = Some(5.into());

    let mut service = field("service", FieldType::ScaleRating, "Rate our service");
    service.min = Some(1.into());
    service.max = Some(10.into());

    let mut favorite = field("favorite", FieldType::MultipleChoice, "What did you order?");
    favorite.options = Some(vec![
        "Espresso".to_string(),
        "Flat white".to_string(),
        "Pastry".to_string(),
        "Something else".to_string(),
    ]);

    let mut comments = field("comments", FieldType::LongText, "Anything we should know?");
    comments.placeholder = Some("Optional".to_string());

    vec![
        overall,
        service,
        favorite,
        comments,
        field("contact", FieldType::ContactInfo, "Want us to follow up?"),
        field("submit", FieldType::SubmitButton, "Send feedback"),
    ]
}

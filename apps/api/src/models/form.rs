use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// The nine widget kinds the form builder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    ShortText,
    LongText,
    StarRating,
    ScaleRating,
    MultipleChoice,
    ImageUpload,
    VideoUpload,
    ContactInfo,
    SubmitButton,
}

impl FieldType {
    pub const NAMES: [&'static str; 9] = [
        "shortText",
        "longText",
        "starRating",
        "scaleRating",
        "multipleChoice",
        "imageUpload",
        "videoUpload",
        "contactInfo",
        "submitButton",
    ];

    pub fn parse(s: &str) -> Option<FieldType> {
        match s {
            "shortText" => Some(FieldType::ShortText),
            "longText" => Some(FieldType::LongText),
            "starRating" => Some(FieldType::StarRating),
            "scaleRating" => Some(FieldType::ScaleRating),
            "multipleChoice" => Some(FieldType::MultipleChoice),
            "imageUpload" => Some(FieldType::ImageUpload),
            "videoUpload" => Some(FieldType::VideoUpload),
            "contactInfo" => Some(FieldType::ContactInfo),
            "submitButton" => Some(FieldType::SubmitButton),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::ShortText => "shortText",
            FieldType::LongText => "longText",
            FieldType::StarRating => "starRating",
            FieldType::ScaleRating => "scaleRating",
            FieldType::MultipleChoice => "multipleChoice",
            FieldType::ImageUpload => "imageUpload",
            FieldType::VideoUpload => "videoUpload",
            FieldType::ContactInfo => "contactInfo",
            FieldType::SubmitButton => "submitButton",
        }
    }
}

/// One widget inside a form definition. Stored verbatim as JSONB; `min` and
/// `max` keep whatever numeric representation the client sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Number>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub fields: Json<Vec<FormField>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewForm {
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FormField>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct FormUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub fields: Option<Vec<FormField>>,
}

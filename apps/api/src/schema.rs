//! Inbound payload validation.
//!
//! Handlers accept raw `serde_json::Value` bodies and run them through these
//! validators, which walk the whole payload and report every violation
//! (JSON path + message) in one pass instead of stopping at the first.
//!
//! Unknown keys are ignored, and `null` is treated the same as an absent
//! key. Tenancy ids (`businessId` and friends) are never read from payloads;
//! handlers inject them from the session or the scanned QR code.

use std::collections::HashSet;

use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::errors::FieldViolation;
use crate::models::{FieldType, FormField};

pub type ValidationResult<T> = Result<T, Vec<FieldViolation>>;

#[derive(Debug, Clone)]
pub struct RegistrationPayload {
    pub business_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub subscription_plan: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LocationPayload {
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FormPayload {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FormField>,
}

/// Form update. `name` and `description` are merge-style (absent leaves the
/// stored value untouched) but the fields array is always sent whole.
#[derive(Debug, Clone)]
pub struct FormUpdatePayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone)]
pub struct QrCodePayload {
    pub form_id: Uuid,
    pub location_id: Option<Uuid>,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct FeedbackPayload {
    pub response: Value,
    pub rating: Option<i32>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub media_urls: Vec<String>,
    pub is_anonymous: bool,
}

pub fn validate_registration(payload: &Value) -> ValidationResult<RegistrationPayload> {
    let mut violations = Vec::new();
    let Some(obj) = payload_object(payload, &mut violations) else {
        return Err(violations);
    };

    let business_name = require_nonempty_string(obj, "", "businessName", &mut violations);
    let email = require_string(obj, "", "email", &mut violations).and_then(|email| {
        if looks_like_email(&email) {
            Some(email)
        } else {
            violations.push(FieldViolation::new("email", "must be a valid email address"));
            None
        }
    });
    let password = require_string(obj, "", "password", &mut violations).and_then(|password| {
        if password.chars().count() >= 8 {
            Some(password)
        } else {
            violations.push(FieldViolation::new(
                "password",
                "must be at least 8 characters",
            ));
            None
        }
    });
    let phone = optional_string(obj, "", "phone", &mut violations);
    let subscription_plan = optional_string(obj, "", "subscriptionPlan", &mut violations);

    match (business_name, email, password) {
        (Some(business_name), Some(email), Some(password)) if violations.is_empty() => {
            Ok(RegistrationPayload {
                business_name,
                email,
                password,
                phone,
                subscription_plan,
            })
        }
        _ => Err(violations),
    }
}

pub fn validate_location(payload: &Value) -> ValidationResult<LocationPayload> {
    let mut violations = Vec::new();
    let Some(obj) = payload_object(payload, &mut violations) else {
        return Err(violations);
    };

    let name = require_nonempty_string(obj, "", "name", &mut violations);
    let address = optional_string(obj, "", "address", &mut violations);
    let latitude = optional_string(obj, "", "latitude", &mut violations);
    let longitude = optional_string(obj, "", "longitude", &mut violations);

    match name {
        Some(name) if violations.is_empty() => Ok(LocationPayload {
            name,
            address,
            latitude,
            longitude,
        }),
        _ => Err(violations),
    }
}

pub fn validate_form(payload: &Value) -> ValidationResult<FormPayload> {
    let mut violations = Vec::new();
    let Some(obj) = payload_object(payload, &mut violations) else {
        return Err(violations);
    };

    let name = require_nonempty_string(obj, "", "name", &mut violations);
    let description = optional_string(obj, "", "description", &mut violations);
    let fields = match get(obj, "fields") {
        Some(value) => validate_fields(value, &mut violations),
        None => {
            violations.push(FieldViolation::new("fields", "is required"));
            None
        }
    };

    match (name, fields) {
        (Some(name), Some(fields)) if violations.is_empty() => Ok(FormPayload {
            name,
            description,
            fields,
        }),
        _ => Err(violations),
    }
}

/// Unlike `name` and `description`, the fields array must always be present
/// on an update; the builder sends the whole sequence every save.
pub fn validate_form_update(payload: &Value) -> ValidationResult<FormUpdatePayload> {
    let mut violations = Vec::new();
    let Some(obj) = payload_object(payload, &mut violations) else {
        return Err(violations);
    };

    let name = optional_string(obj, "", "name", &mut violations);
    let description = optional_string(obj, "", "description", &mut violations);
    let fields = match get(obj, "fields") {
        Some(value) => validate_fields(value, &mut violations),
        None => {
            violations.push(FieldViolation::new("fields", "is required"));
            None
        }
    };

    match fields {
        Some(fields) if violations.is_empty() => Ok(FormUpdatePayload {
            name,
            description,
            fields,
        }),
        _ => Err(violations),
    }
}

pub fn validate_qr_code(payload: &Value) -> ValidationResult<QrCodePayload> {
    let mut violations = Vec::new();
    let Some(obj) = payload_object(payload, &mut violations) else {
        return Err(violations);
    };

    let name = require_nonempty_string(obj, "", "name", &mut violations);
    let form_id = require_uuid(obj, "", "formId", &mut violations);
    let location_id = optional_uuid(obj, "", "locationId", &mut violations);

    match (name, form_id) {
        (Some(name), Some(form_id)) if violations.is_empty() => Ok(QrCodePayload {
            form_id,
            location_id,
            name,
        }),
        _ => Err(violations),
    }
}

pub fn validate_feedback_submission(payload: &Value) -> ValidationResult<FeedbackPayload> {
    let mut violations = Vec::new();
    let Some(obj) = payload_object(payload, &mut violations) else {
        return Err(violations);
    };

    let response = match get(obj, "response") {
        Some(value) if value.is_object() => Some(value.clone()),
        Some(_) => {
            violations.push(FieldViolation::new("response", "must be an object"));
            None
        }
        None => {
            violations.push(FieldViolation::new("response", "is required"));
            None
        }
    };
    let rating = optional_integer(obj, "", "rating", &mut violations);
    let customer_name = optional_string(obj, "", "customerName", &mut violations);
    let customer_email = optional_string(obj, "", "customerEmail", &mut violations);
    let customer_phone = optional_string(obj, "", "customerPhone", &mut violations);
    let media_urls = optional_string_vec(obj, "", "mediaUrls", &mut violations).unwrap_or_default();
    let is_anonymous = optional_bool(obj, "", "isAnonymous", &mut violations).unwrap_or(true);

    match response {
        Some(response) if violations.is_empty() => Ok(FeedbackPayload {
            response,
            rating,
            customer_name,
            customer_email,
            customer_phone,
            media_urls,
            is_anonymous,
        }),
        _ => Err(violations),
    }
}

/// Validates one entry of a form's `fields` array. `prefix` is the JSON
/// path of the entry itself, e.g. `fields.2`.
fn validate_form_field(
    prefix: &str,
    value: &Value,
    violations: &mut Vec<FieldViolation>,
) -> Option<FormField> {
    let obj = match value.as_object() {
        Some(obj) => obj,
        None => {
            violations.push(FieldViolation::new(prefix, "must be an object"));
            return None;
        }
    };

    let id = require_string(obj, prefix, "id", violations);
    let field_type = match get(obj, "type") {
        Some(Value::String(s)) => match FieldType::parse(s) {
            Some(field_type) => Some(field_type),
            None => {
                violations.push(FieldViolation::new(
                    path_for(prefix, "type"),
                    format!("must be one of: {}", FieldType::NAMES.join(", ")),
                ));
                None
            }
        },
        Some(_) => {
            violations.push(FieldViolation::new(
                path_for(prefix, "type"),
                "must be a string",
            ));
            None
        }
        None => {
            violations.push(FieldViolation::new(path_for(prefix, "type"), "is required"));
            None
        }
    };
    let label = require_string(obj, prefix, "label", violations);
    let required = optional_bool(obj, prefix, "required", violations).unwrap_or(false);
    let placeholder = optional_string(obj, prefix, "placeholder", violations);
    // Options and bounds are accepted on any field type; the builder only
    // renders them where they make sense.
    let options = optional_string_vec(obj, prefix, "options", violations);
    let min = optional_number(obj, prefix, "min", violations);
    let max = optional_number(obj, prefix, "max", violations);

    match (id, field_type, label) {
        (Some(id), Some(field_type), Some(label)) => Some(FormField {
            id,
            field_type,
            label,
            required,
            placeholder,
            options,
            min,
            max,
        }),
        _ => None,
    }
}

fn validate_fields(value: &Value, violations: &mut Vec<FieldViolation>) -> Option<Vec<FormField>> {
    let items = match value.as_array() {
        Some(items) => items,
        None => {
            violations.push(FieldViolation::new("fields", "must be an array"));
            return None;
        }
    };

    let before = violations.len();
    let mut fields = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if let Some(field) = validate_form_field(&format!("fields.{index}"), item, violations) {
            fields.push(field);
        }
    }

    // Field ids address answers inside submissions, so they must be unique
    // within a single form.
    let mut seen = HashSet::new();
    for field in &fields {
        if !seen.insert(field.id.as_str()) {
            violations.push(FieldViolation::new(
                "fields",
                format!("duplicate field id \"{}\"", field.id),
            ));
        }
    }

    if violations.len() > before {
        None
    } else {
        Some(fields)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction helpers (shared across all payload validators)
// ────────────────────────────────────────────────────────────────────────────

fn payload_object<'a>(
    payload: &'a Value,
    violations: &mut Vec<FieldViolation>,
) -> Option<&'a Map<String, Value>> {
    match payload.as_object() {
        Some(obj) => Some(obj),
        None => {
            violations.push(FieldViolation::new("body", "must be a JSON object"));
            None
        }
    }
}

/// Absent and `null` are indistinguishable to every validator.
fn get<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value),
    }
}

fn path_for(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn require_string(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match get(obj, key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            violations.push(FieldViolation::new(path_for(prefix, key), "must be a string"));
            None
        }
        None => {
            violations.push(FieldViolation::new(path_for(prefix, key), "is required"));
            None
        }
    }
}

/// Like `require_string`, but the empty string is rejected. Display names
/// go through here; free-text payload fields do not.
fn require_nonempty_string(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match require_string(obj, prefix, key, violations) {
        Some(s) if s.is_empty() => {
            violations.push(FieldViolation::new(
                path_for(prefix, key),
                "must not be empty",
            ));
            None
        }
        other => other,
    }
}

fn optional_string(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match get(obj, key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            violations.push(FieldViolation::new(path_for(prefix, key), "must be a string"));
            None
        }
        None => None,
    }
}

fn optional_bool(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<bool> {
    match get(obj, key) {
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            violations.push(FieldViolation::new(
                path_for(prefix, key),
                "must be a boolean",
            ));
            None
        }
        None => None,
    }
}

fn optional_number(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<Number> {
    match get(obj, key) {
        Some(Value::Number(n)) => Some(n.clone()),
        Some(_) => {
            violations.push(FieldViolation::new(path_for(prefix, key), "must be a number"));
            None
        }
        None => None,
    }
}

fn optional_integer(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<i32> {
    match get(obj, key) {
        Some(Value::Number(n)) => match n.as_i64().and_then(|v| i32::try_from(v).ok()) {
            Some(v) => Some(v),
            None => {
                violations.push(FieldViolation::new(
                    path_for(prefix, key),
                    "must be an integer",
                ));
                None
            }
        },
        Some(_) => {
            violations.push(FieldViolation::new(
                path_for(prefix, key),
                "must be an integer",
            ));
            None
        }
        None => None,
    }
}

fn optional_string_vec(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<Vec<String>> {
    let items = match get(obj, key) {
        Some(Value::Array(items)) => items,
        Some(_) => {
            violations.push(FieldViolation::new(
                path_for(prefix, key),
                "must be an array of strings",
            ));
            return None;
        }
        None => return None,
    };

    let mut strings = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) => strings.push(s.clone()),
            _ => {
                violations.push(FieldViolation::new(
                    path_for(prefix, key),
                    "must be an array of strings",
                ));
                return None;
            }
        }
    }
    Some(strings)
}

fn require_uuid(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<Uuid> {
    match get(obj, key) {
        Some(Value::String(s)) => match Uuid::parse_str(s) {
            Ok(id) => Some(id),
            Err(_) => {
                violations.push(FieldViolation::new(
                    path_for(prefix, key),
                    "must be a valid id",
                ));
                None
            }
        },
        Some(_) => {
            violations.push(FieldViolation::new(
                path_for(prefix, key),
                "must be a valid id",
            ));
            None
        }
        None => {
            violations.push(FieldViolation::new(path_for(prefix, key), "is required"));
            None
        }
    }
}

fn optional_uuid(
    obj: &Map<String, Value>,
    prefix: &str,
    key: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<Uuid> {
    match get(obj, key) {
        Some(Value::String(s)) => match Uuid::parse_str(s) {
            Ok(id) => Some(id),
            Err(_) => {
                violations.push(FieldViolation::new(
                    path_for(prefix, key),
                    "must be a valid id",
                ));
                None
            }
        },
        Some(_) => {
            violations.push(FieldViolation::new(
                path_for(prefix, key),
                "must be a valid id",
            ));
            None
        }
        None => None,
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

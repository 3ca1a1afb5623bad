use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Business, Session};
use crate::state::AppState;
use crate::storage::{Storage, StorageResult};

/// Sessions live for a week; after that the token stops working and the
/// row is reaped the next time it is presented.
pub const SESSION_TTL_DAYS: i64 = 7;

/// The authenticated business for the current request, resolved from the
/// `Authorization: Bearer <token>` header. Extraction fails with 401 when
/// the header is missing, malformed, expired, or unknown.
#[derive(Debug, Clone)]
pub struct CurrentBusiness {
    pub token: Uuid,
    pub business: Business,
}

impl CurrentBusiness {
    pub fn id(&self) -> Uuid {
        self.business.id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentBusiness {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AppError::Unauthorized)?;

        let session = state
            .storage
            .session_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if session.expires_at <= Utc::now() {
            state.storage.delete_session(token).await?;
            return Err(AppError::Unauthorized);
        }

        let business = state
            .storage
            .business_by_id(session.business_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentBusiness { token, business })
    }
}

/// Opens a fresh session for a business that just registered or logged in.
pub async fn open_session(storage: &dyn Storage, business_id: Uuid) -> StorageResult<Session> {
    storage
        .create_session(business_id, Utc::now() + Duration::days(SESSION_TTL_DAYS))
        .await
}

fn bearer_token(header: &str) -> Option<Uuid> {
    let token = header.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        let id = Uuid::new_v4();
        assert_eq!(bearer_token(&format!("Bearer {id}")), Some(id));
        assert_eq!(bearer_token(&format!("Bearer {id} ")), Some(id));
        assert_eq!(bearer_token(&format!("bearer {id}")), None);
        assert_eq!(bearer_token("Bearer not-a-uuid"), None);
        assert_eq!(bearer_token(""), None);
    }

    #[tokio::test]
    async fn test_open_session_expires_a_week_out() {
        let storage = crate::storage::MemStorage::new();
        let business = storage
            .create_business(crate::models::NewBusiness {
                business_name: "Cafe".to_string(),
                email: "owner@cafe.test".to_string(),
                password: "hashed".to_string(),
                phone: None,
                subscription_plan: None,
            })
            .await
            .unwrap();

        let session = open_session(&storage, business.id).await.unwrap();
        let ttl = session.expires_at - Utc::now();
        assert!(ttl > Duration::days(SESSION_TTL_DAYS - 1));
        assert!(ttl <= Duration::days(SESSION_TTL_DAYS));
    }
}

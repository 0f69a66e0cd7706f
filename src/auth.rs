use crate::{
    errors::AppError,
    models::{Claims, UserRole},
    state::AppState,
};
use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::{HeaderMap, request::Parts};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

/// Authenticated user extractor.
/// Add `auth: AuthUser` as a parameter in any handler that requires
/// authentication; pass it on into the service operations so capability
/// checks travel with the request rather than living in ambient state.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
    /// Employee record linked to this account, if any.
    pub employee_id: Option<Uuid>,
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == UserRole::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            ))
        }
    }

    /// Admins may act on any employee; employees only on their own record.
    pub fn authorize_employee(&self, employee_id: Uuid) -> Result<(), AppError> {
        if self.role == UserRole::Admin || self.employee_id == Some(employee_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You may only access your own records".to_string(),
            ))
        }
    }

    /// The employee record behind this account, required for self-service
    /// operations like leave submission.
    pub fn own_employee_id(&self) -> Result<Uuid, AppError> {
        self.employee_id.ok_or_else(|| {
            AppError::Forbidden("No employee record is linked to this account".to_string())
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let headers: &HeaderMap = &parts.headers;

        let auth_header = headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization format".to_string()))?;

        let secret = state.config.jwt_secret.as_bytes();
        let token_data =
            decode::<Claims>(token, &DecodingKey::from_secret(secret), &Validation::default())
                .map_err(|_| AppError::InvalidToken)?;

        let user_id = Uuid::parse_str(&token_data.claims.sub).map_err(|_| AppError::InvalidToken)?;

        Ok(AuthUser {
            user_id,
            username: token_data.claims.username,
            role: token_data.claims.role,
            employee_id: token_data.claims.employee_id,
        })
    }
}

// A missing Authorization header yields None; a present-but-invalid one is
// still rejected. Used by registration, which is open only on first run.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        if parts.headers.get("Authorization").is_none() {
            return Ok(None);
        }
        <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}

pub fn generate_token(
    user_id: Uuid,
    username: &str,
    role: UserRole,
    employee_id: Option<Uuid>,
    secret: &str,
    expiry_hours: i64,
) -> Result<String, AppError> {
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};

    let now = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + chrono::Duration::hours(expiry_hours)).timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role,
        employee_id,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

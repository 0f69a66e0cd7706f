// src/handlers/user.rs

use crate::{
    auth::{AuthUser, generate_token},
    errors::{AppError, AppResult},
    models::{AuthResponse, LoginRequest, RegisterUserRequest, User, UserPublic, UserRole},
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use bcrypt::{DEFAULT_COST, hash, verify};
use uuid::Uuid;

/// Register a new user account.
/// Requires an admin token, except for the very first registration, which
/// bootstraps the initial administrator.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 401, description = "Admin token required"),
        (status = 409, description = "Username already taken"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn register_user(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    Json(body): Json<RegisterUserRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let user_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await?;

    let role = if user_count == 0 {
        UserRole::Admin
    } else {
        match auth {
            Some(admin) => {
                admin.require_admin()?;
                body.role
            }
            None => {
                return Err(AppError::Unauthorized(
                    "Registration requires an administrator token".to_string(),
                ));
            }
        }
    };

    let existing = sqlx::query_scalar::<_, i32>("SELECT 1 FROM users WHERE username = $1")
        .bind(&body.username)
        .fetch_optional(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "Username '{}' is already taken",
            body.username
        )));
    }

    let password_hash =
        hash(&body.password, DEFAULT_COST).map_err(|e| AppError::Internal(e.to_string()))?;

    let user = sqlx::query_as::<_, User>(
        r#"INSERT INTO users (user_id, username, password_hash, role, created_at)
           VALUES ($1, $2, $3, $4, NOW())
           RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(&body.username)
    .bind(&password_hash)
    .bind(role)
    .fetch_one(&state.db)
    .await?;

    let token = generate_token(
        user.user_id,
        &user.username,
        user.role,
        None,
        &state.config.jwt_secret,
        state.config.jwt_expiry_hours,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "Auth"
)]
pub async fn login_user(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(&body.username)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

    let valid = verify(&body.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let employee_id = sqlx::query_scalar::<_, Uuid>(
        "SELECT employee_id FROM employees WHERE user_id = $1",
    )
    .bind(user.user_id)
    .fetch_optional(&state.db)
    .await?;

    let token = generate_token(
        user.user_id,
        &user.username,
        user.role,
        employee_id,
        &state.config.jwt_secret,
        state.config.jwt_expiry_hours,
    )?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserPublic),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn get_me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<UserPublic>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
        .bind(auth.user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

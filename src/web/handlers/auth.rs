//! Authentication handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::db::{NewUser, UserRepository};
use crate::web::dto::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, UserResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::{require_user, AppState};
use crate::web::middleware::AuthUser;

/// POST /api/auth/register - Create an account.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    crate::auth::validate_password(&req.password)
        .map_err(|e| ApiError::unprocessable(format!("Password error: {}", e)))?;

    let password_hash = crate::auth::hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal("Failed to create user")
    })?;

    let user = UserRepository::new(state.db.pool())
        .create(&NewUser {
            name: req.name,
            email: req.email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "account registered");

    Ok(Json(MessageResponse::new("User registered successfully")))
}

/// POST /api/auth/login - Exchange credentials for an access token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // One failure message for both unknown email and bad password.
    let user = UserRepository::new(state.db.pool())
        .get_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    crate::auth::verify_password(&req.password, &user.password_hash)
        .map_err(|_| ApiError::unauthorized("Invalid email or password"))?;

    let access_token = state.signer.issue(user.id).map_err(|e| {
        tracing::error!("Token issuance failed: {}", e);
        ApiError::internal("Failed to generate token")
    })?;

    Ok(Json(LoginResponse::new(access_token)))
}

/// GET /api/auth/me - Get current account info.
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = require_user(&state, &claims).await?;
    Ok(Json(user.into()))
}

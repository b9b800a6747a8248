//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::auth::password::{hash_password, verify_password, verify_unknown_user};
use crate::core::ServerState;
use crate::db::repository::user::{self, NewUser};
use crate::security_log;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, MIN_PASSWORD_LEN,
    validation_error,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok, ok_with_message};
use shared::models::{AuthResponse, User, UserRole};

// `validator` length bounds are `u64`; mirror the shared `usize` limits
const MAX_EMAIL_LEN_U64: u64 = MAX_EMAIL_LEN as u64;
const MAX_NAME_LEN_U64: u64 = MAX_NAME_LEN as u64;
const MAX_PASSWORD_LEN_U64: u64 = MAX_PASSWORD_LEN as u64;
const MAX_SHORT_TEXT_LEN_U64: u64 = MAX_SHORT_TEXT_LEN as u64;
const MIN_PASSWORD_LEN_U64: u64 = MIN_PASSWORD_LEN as u64;

/// Delay added to every login attempt, on top of one Argon2 verification
const AUTH_FIXED_DELAY_MS: u64 = 250;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email, length(max = MAX_EMAIL_LEN_U64))]
    pub email: String,
    #[validate(length(min = MIN_PASSWORD_LEN_U64, max = MAX_PASSWORD_LEN_U64))]
    pub password: String,
    #[validate(length(min = 1, max = MAX_NAME_LEN_U64))]
    pub first_name: String,
    #[validate(length(min = 1, max = MAX_NAME_LEN_U64))]
    pub last_name: String,
    #[validate(length(max = MAX_SHORT_TEXT_LEN_U64))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = MAX_EMAIL_LEN_U64))]
    pub email: String,
    #[validate(length(min = 1, max = MAX_PASSWORD_LEN_U64))]
    pub password: String,
}

fn issue_token(state: &ServerState, user: User) -> AppResult<AuthResponse> {
    let jwt = state.jwt_service();
    let token = jwt
        .generate_token(user.id, &user.email, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;
    Ok(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: jwt.expires_in(),
        user,
    })
}

/// POST /api/auth/register - create a customer account and sign it in
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    req.validate().map_err(validation_error)?;
    if req.first_name.trim().is_empty() || req.last_name.trim().is_empty() {
        return Err(AppError::validation("First and last name are required"));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hash error: {e}")))?;

    let user = user::create(
        state.pool(),
        NewUser {
            email: req.email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone.filter(|p| !p.trim().is_empty()),
            role: UserRole::Customer,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Customer registered");
    let response = issue_token(&state, user)?;
    Ok(ok_with_message(response, "Account created"))
}

/// POST /api/auth/login - exchange credentials for an access token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    req.validate().map_err(|_| AppError::invalid_credentials())?;

    let credentials = user::find_credentials(state.pool(), &req.email).await?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Same error and the same Argon2 cost for an unknown email and a wrong password
    let verified = match &credentials {
        Some(c) => verify_password(&req.password, &c.password_hash),
        None => verify_unknown_user(&req.password),
    };
    let credentials = match credentials {
        Some(c) if verified => c,
        found => {
            security_log!(
                "WARN",
                "login_failed",
                email = req.email.clone(),
                reason = if found.is_some() {
                    "invalid_password"
                } else {
                    "unknown_email"
                }
            );
            return Err(AppError::invalid_credentials());
        }
    };

    if !credentials.is_active {
        security_log!(
            "WARN",
            "login_disabled_account",
            user_id = credentials.id
        );
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let user = user::find_by_id(state.pool(), credentials.id)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    tracing::info!(
        user_id = user.id,
        email = %user.email,
        role = user.role.as_str(),
        "User logged in"
    );
    Ok(ok(issue_token(&state, user)?))
}

/// GET /api/auth/me - current profile
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = user::find_by_id(state.pool(), current_user.id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(AppError::unauthorized)?;
    Ok(ok(user))
}

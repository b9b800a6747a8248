//! User Repository

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{User, UserRole};
use sqlx::SqlitePool;

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, phone, role, is_active, created_at";

/// User row with credentials, only used by the login path
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
}

/// Data for a new account; `password_hash` is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM app_user WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Emails are stored lowercased; lookups normalize the same way
pub async fn find_credentials(
    pool: &SqlitePool,
    email: &str,
) -> RepoResult<Option<UserCredentials>> {
    let row = sqlx::query_as::<_, UserCredentials>(
        "SELECT id, email, password_hash, role, is_active FROM app_user WHERE email = ?",
    )
    .bind(normalize_email(email))
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: NewUser) -> RepoResult<User> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let email = normalize_email(&data.email);
    sqlx::query(
        "INSERT INTO app_user (id, email, password_hash, first_name, last_name, phone, role, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)",
    )
    .bind(id)
    .bind(&email)
    .bind(&data.password_hash)
    .bind(data.first_name.trim())
    .bind(data.last_name.trim())
    .bind(data.phone.as_deref().map(str::trim))
    .bind(data.role)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::business(
            ErrorCode::EmailAlreadyRegistered,
            format!("Email '{email}' is already registered"),
        ),
        other => other,
    })?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Create the admin account unless the email is already taken.
///
/// Returns `true` when a new account was inserted.
pub async fn ensure_admin(pool: &SqlitePool, email: &str, password_hash: &str) -> RepoResult<bool> {
    if find_credentials(pool, email).await?.is_some() {
        return Ok(false);
    }
    create(
        pool,
        NewUser {
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            first_name: "Pizzeria".into(),
            last_name: "Admin".into(),
            phone: None,
            role: UserRole::Admin,
        },
    )
    .await?;
    Ok(true)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

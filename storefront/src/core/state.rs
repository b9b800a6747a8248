use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::auth::password::hash_password;
use crate::auth::{JwtService, RateLimiter};
use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::db::repository::user;
use crate::session::SessionStore;

/// Shared server state
///
/// Every field is either `Clone`-cheap or behind an `Arc`, so handlers take
/// it by value.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | immutable configuration |
/// | db | SQLite pool |
/// | jwt_service | access tokens |
/// | sessions | cart sessions |
/// | rate_limiter | login / register limits |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub sessions: SessionStore,
    pub rate_limiter: RateLimiter,
    /// Milliseconds since epoch at startup
    pub started_at: i64,
}

impl ServerState {
    /// Build state over an already opened database
    pub fn with_db(config: Config, db: DbService) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let sessions = SessionStore::new(config.session_ttl_minutes);
        Self {
            config,
            db,
            jwt_service,
            sessions,
            rate_limiter: RateLimiter::new(),
            started_at: shared::util::now_millis(),
        }
    }

    /// Open the database, run migrations and bootstrap the admin account
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = if config.database_url == "sqlite::memory:" {
            DbService::in_memory().await?
        } else {
            DbService::new(&config.database_url).await?
        };
        let state = Self::with_db(config.clone(), db);
        state.bootstrap_admin().await?;
        Ok(state)
    }

    /// Create the admin account from configuration when it does not exist yet
    pub async fn bootstrap_admin(&self) -> Result<()> {
        let Some((email, password)) = self.config.admin_credentials() else {
            return Ok(());
        };
        let hash = hash_password(password)
            .map_err(|e| ServerError::Config(format!("Cannot hash ADMIN_PASSWORD: {e}")))?;
        let created = user::ensure_admin(&self.db.pool, email, &hash)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;
        if created {
            tracing::info!(email = %email, "Admin account created");
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Seconds since startup
    pub fn uptime_seconds(&self) -> i64 {
        (shared::util::now_millis() - self.started_at) / 1000
    }

    /// Session purge and rate-limiter cleanup, once a minute
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let sessions = self.sessions.clone();
        tasks.spawn_periodic("session_purge", Duration::from_secs(60), move || {
            let sessions = sessions.clone();
            async move {
                let purged = sessions.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, remaining = sessions.len(), "Expired sessions purged");
                }
            }
        });

        let limiter = self.rate_limiter.clone();
        tasks.spawn_periodic("rate_limit_cleanup", Duration::from_secs(60), move || {
            let limiter = limiter.clone();
            async move { limiter.cleanup() }
        });

        tasks
    }
}

use crate::auth::JwtConfig;
use crate::auth::jwt::generate_printable_secret;
use crate::core::ServerError;

/// Storefront configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_URL | sqlite:pizzeria.db | SQLite database |
/// | HTTP_PORT | 3000 | HTTP port |
/// | ENVIRONMENT | development | development / staging / production |
/// | JWT_SECRET | random (development only) | token signing secret, 32+ chars |
/// | JWT_EXPIRATION_MINUTES | 1440 | token lifetime |
/// | SESSION_TTL_MINUTES | 120 | idle cart session lifetime |
/// | LOW_STOCK_THRESHOLD | 5 | default low-stock report threshold |
/// | ADMIN_EMAIL / ADMIN_PASSWORD | unset | bootstrap admin account |
/// | LOG_LEVEL | info | log level |
/// | LOG_DIR | unset | daily rolling log files |
/// | TRUST_PROXY | false | key rate limits on `X-Forwarded-For` (set only behind a reverse proxy) |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub jwt: JwtConfig,
    pub session_ttl_minutes: i64,
    pub low_stock_threshold: i64,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// Take the client IP from `X-Forwarded-For`
    pub trust_proxy: bool,
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl Config {
    /// Signing secret: must be set outside development.
    ///
    /// Development runs without `JWT_SECRET` get a random secret, so tokens do
    /// not survive a restart.
    fn jwt_secret(environment: &str) -> Result<String, ServerError> {
        match env_non_empty("JWT_SECRET") {
            Some(secret) if secret.len() >= 32 => Ok(secret),
            Some(_) => Err(ServerError::Config(
                "JWT_SECRET must be at least 32 characters long".into(),
            )),
            None if environment == "development" => {
                tracing::warn!("JWT_SECRET not set, using a temporary random secret");
                generate_printable_secret().map_err(|e| ServerError::Config(e.to_string()))
            }
            None => Err(ServerError::Config(format!(
                "JWT_SECRET must be set in {environment} environment"
            ))),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ServerError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let secret = Self::jwt_secret(&environment)?;

        let config = Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:pizzeria.db".into()),
            http_port: env_parse("HTTP_PORT", 3000),
            jwt: JwtConfig::new(secret, env_parse("JWT_EXPIRATION_MINUTES", 1440)),
            session_ttl_minutes: env_parse("SESSION_TTL_MINUTES", 120),
            low_stock_threshold: env_parse("LOW_STOCK_THRESHOLD", 5),
            admin_email: env_non_empty("ADMIN_EMAIL"),
            admin_password: env_non_empty("ADMIN_PASSWORD"),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: env_non_empty("LOG_DIR"),
            trust_proxy: env_parse("TRUST_PROXY", false),
            environment,
        };
        config.validate()?;
        Ok(config)
    }

    /// Deterministic configuration for tests (in-memory database, random secret)
    pub fn for_tests() -> Self {
        let secret = generate_printable_secret()
            .unwrap_or_else(|_| "storefront-test-secret-0123456789abcdef".to_string());
        Self {
            database_url: "sqlite::memory:".into(),
            http_port: 0,
            environment: "test".into(),
            jwt: JwtConfig::new(secret, 60),
            session_ttl_minutes: 120,
            low_stock_threshold: 5,
            admin_email: Some("admin@pizzeria.test".into()),
            admin_password: Some("admin-password".into()),
            log_level: "debug".into(),
            log_dir: None,
            // test clients tell themselves apart through X-Forwarded-For
            trust_proxy: true,
        }
    }

    fn validate(&self) -> Result<(), ServerError> {
        if self.jwt.expiration_minutes <= 0 {
            return Err(ServerError::Config(
                "JWT_EXPIRATION_MINUTES must be positive".into(),
            ));
        }
        if self.session_ttl_minutes <= 0 {
            return Err(ServerError::Config(
                "SESSION_TTL_MINUTES must be positive".into(),
            ));
        }
        if self.low_stock_threshold < 0 {
            return Err(ServerError::Config(
                "LOW_STOCK_THRESHOLD must not be negative".into(),
            ));
        }
        if self.admin_email.is_some() != self.admin_password.is_some() {
            tracing::warn!("ADMIN_EMAIL and ADMIN_PASSWORD must both be set; admin bootstrap skipped");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Both admin variables, when set
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_tests_is_valid() {
        let config = Config::for_tests();
        assert!(config.validate().is_ok());
        assert!(config.jwt.secret.len() >= 32);
        assert!(!config.is_production());
        assert_eq!(
            config.admin_credentials(),
            Some(("admin@pizzeria.test", "admin-password"))
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::for_tests();
        config.session_ttl_minutes = 0;
        assert!(config.validate().is_err());

        let mut config = Config::for_tests();
        config.jwt.expiration_minutes = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_admin_credentials_need_both() {
        let mut config = Config::for_tests();
        config.admin_password = None;
        assert!(config.admin_credentials().is_none());
    }
}

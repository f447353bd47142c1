use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub database: DatabaseConfig,
    pub upload: UploadConfig,
    pub payments: PaymentsConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Signing key for short-lived access tokens.
    pub access_secret: String,
    /// Signing key for refresh tokens. Distinct from the access key so
    /// compromise of one cannot forge the other.
    pub refresh_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    /// Refresh cookie gets the Secure attribute when set.
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    /// Startup handshake retries with exponential backoff. The only
    /// automatic retry anywhere in the service.
    pub connect_max_retries: u32,
    pub connect_base_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Object store endpoint files are PUT to.
    pub base_url: String,
    pub bucket: String,
    /// Provider label recorded on attachments.
    pub provider: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsConfig {
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub stripe_secret_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// AI draft generation allowance per user per window.
    pub ai_draft_max: u32,
    pub ai_draft_window_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.server.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        if let Ok(v) = env::var("JWT_ACCESS_SECRET") {
            self.security.access_secret = v;
        }
        if let Ok(v) = env::var("JWT_REFRESH_SECRET") {
            self.security.refresh_secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_MINUTES") {
            self.security.access_token_minutes =
                v.parse().unwrap_or(self.security.access_token_minutes);
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_DAYS") {
            self.security.refresh_token_days =
                v.parse().unwrap_or(self.security.refresh_token_days);
        }

        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DB_MAX_RETRIES") {
            self.database.connect_max_retries =
                v.parse().unwrap_or(self.database.connect_max_retries);
        }
        if let Ok(v) = env::var("DB_BASE_DELAY_MS") {
            self.database.connect_base_delay_ms =
                v.parse().unwrap_or(self.database.connect_base_delay_ms);
        }

        if let Ok(v) = env::var("UPLOAD_BASE_URL") {
            self.upload.base_url = v;
        }
        if let Ok(v) = env::var("UPLOAD_BUCKET") {
            self.upload.bucket = v;
        }
        if let Ok(v) = env::var("UPLOAD_PROVIDER") {
            self.upload.provider = v;
        }

        if let Ok(v) = env::var("RAZORPAY_KEY_ID") {
            self.payments.razorpay_key_id = v;
        }
        if let Ok(v) = env::var("RAZORPAY_KEY_SECRET") {
            self.payments.razorpay_key_secret = v;
        }
        if let Ok(v) = env::var("STRIPE_SECRET_KEY") {
            self.payments.stripe_secret_key = v;
        }

        if let Ok(v) = env::var("AI_DRAFT_RATE_MAX") {
            self.rate_limit.ai_draft_max = v.parse().unwrap_or(self.rate_limit.ai_draft_max);
        }
        if let Ok(v) = env::var("AI_DRAFT_RATE_WINDOW_SECS") {
            self.rate_limit.ai_draft_window_secs =
                v.parse().unwrap_or(self.rate_limit.ai_draft_window_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 4000,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            security: SecurityConfig {
                access_secret: "dev-access-secret".to_string(),
                refresh_secret: "dev-refresh-secret".to_string(),
                access_token_minutes: 15,
                refresh_token_days: 7,
                secure_cookies: false,
            },
            database: DatabaseConfig {
                max_connections: 10,
                connect_max_retries: 5,
                connect_base_delay_ms: 1000,
            },
            upload: UploadConfig {
                base_url: "http://localhost:9000".to_string(),
                bucket: "lexcase-dev".to_string(),
                provider: "S3".to_string(),
            },
            payments: PaymentsConfig {
                razorpay_key_id: String::new(),
                razorpay_key_secret: String::new(),
                stripe_secret_key: String::new(),
            },
            rate_limit: RateLimitConfig {
                ai_draft_max: 5,
                ai_draft_window_secs: 3600,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 4000,
                cors_origins: vec!["https://staging.lexcase.example.com".to_string()],
            },
            security: SecurityConfig {
                secure_cookies: true,
                ..Self::development().security
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 4000,
                cors_origins: vec!["https://app.lexcase.example.com".to_string()],
            },
            security: SecurityConfig {
                // Real secrets must come from the environment in production.
                access_secret: String::new(),
                refresh_secret: String::new(),
                access_token_minutes: 15,
                refresh_token_days: 7,
                secure_cookies: true,
            },
            database: DatabaseConfig {
                max_connections: 50,
                connect_max_retries: 5,
                connect_base_delay_ms: 1000,
            },
            ..Self::development()
        }
    }
}

// Global singleton config, initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.security.access_token_minutes, 15);
        assert_eq!(config.security.refresh_token_days, 7);
        assert!(!config.security.secure_cookies);
        assert_eq!(config.rate_limit.ai_draft_max, 5);
    }

    #[test]
    fn production_requires_env_secrets() {
        let config = AppConfig::production();
        assert!(config.security.access_secret.is_empty());
        assert!(config.security.secure_cookies);
        assert!(config.is_production());
    }

    #[test]
    fn access_and_refresh_secrets_differ_by_default() {
        let config = AppConfig::development();
        assert_ne!(config.security.access_secret, config.security.refresh_secret);
    }
}

use once_cell::sync::Lazy;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub blob: BlobConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Static shared secret for the administrative bearer gate.
    pub bearer_token: String,
    /// Signing secret for session JWTs.
    pub jwt_secret: String,
    /// Session token lifetime. Sessions are short-lived by default.
    pub jwt_expiry_secs: i64,
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Read-write token for the blob store. Uploads fail without it.
    pub token: String,
    pub base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Environment defaults first, then specific env vars override.
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs = v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }

        if let Ok(v) = env::var("BEARER_TOKEN") {
            self.security.bearer_token = v;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_SECS") {
            self.security.jwt_expiry_secs = v.parse().unwrap_or(self.security.jwt_expiry_secs);
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        if let Ok(v) = env::var("BLOB_READ_WRITE_TOKEN") {
            self.blob.token = v;
        }
        if let Ok(v) = env::var("BLOB_API_URL") {
            self.blob.base_url = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                acquire_timeout_secs: 30,
            },
            security: SecurityConfig {
                bearer_token: String::new(),
                jwt_secret: String::new(),
                jwt_expiry_secs: 3600,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            blob: BlobConfig {
                token: String::new(),
                base_url: "https://blob.vercel-storage.com".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                acquire_timeout_secs: 5,
            },
            security: SecurityConfig {
                bearer_token: String::new(),
                jwt_secret: String::new(),
                jwt_expiry_secs: 3600,
                // Must be supplied via CORS_ORIGINS in production.
                cors_origins: Vec::new(),
            },
            blob: BlobConfig {
                token: String::new(),
                base_url: "https://blob.vercel-storage.com".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.security.jwt_expiry_secs, 3600);
        assert!(config.security.cors_origins.iter().any(|o| o.contains("localhost")));
    }

    #[test]
    fn production_defaults() {
        let config = AppConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.database.max_connections, 50);
        assert!(config.security.cors_origins.is_empty());
    }
}

/*
 * Responsibility
 * - 環境変数や設定の読み込み (JWT_SECRET, DATABASE_URL, CORS 許可, upload 上限など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // Optional: in-memory credential store when absent
    pub database_url: Option<String>,

    pub jwt_secret: String,
    pub token_ttl_seconds: u64,
    pub token_leeway_seconds: u64,
    pub bcrypt_cost: u32,

    pub admin_username: String,
    pub admin_password: String,

    pub max_upload_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print secrets
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("database", &self.database_url.is_some())
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("token_leeway_seconds", &self.token_leeway_seconds)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("admin_username", &self.admin_username)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process env in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());

        // No fallback secret: a token signed with a well-known key is worthless.
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_ttl_seconds = match lookup("TOKEN_TTL_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|ttl| *ttl > 0)
                .ok_or(ConfigError::Invalid("TOKEN_TTL_SECONDS"))?,
            None => 86_400, // 24h
        };

        let token_leeway_seconds = match lookup("TOKEN_LEEWAY_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("TOKEN_LEEWAY_SECONDS"))?,
            None => 0,
        };

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(v) => v
                .parse::<u32>()
                .ok()
                .filter(|c| (4..=31).contains(c))
                .ok_or(ConfigError::Invalid("BCRYPT_COST"))?,
            None => 10,
        };

        let admin_username = lookup("ADMIN_USERNAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "admin".to_string());
        let admin_password = lookup("ADMIN_PASSWORD")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string());

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(v) => v
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid("MAX_UPLOAD_BYTES"))?,
            None => 20 * 1024 * 1024,
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            database_url,
            jwt_secret,
            token_ttl_seconds,
            token_leeway_seconds,
            bcrypt_cost,
            admin_username,
            admin_password,
            max_upload_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.token_ttl_seconds, 86_400);
        assert_eq!(config.token_leeway_seconds, 0);
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.admin_username, "admin");
        assert_eq!(config.admin_password, DEFAULT_ADMIN_PASSWORD);
        assert!(config.database_url.is_none());
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn missing_secret_fails_startup() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));

        let err = Config::from_lookup(lookup_from(&[("JWT_SECRET", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn out_of_range_bcrypt_cost_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("BCRYPT_COST", "3"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("BCRYPT_COST"));
    }

    #[test]
    fn unparsable_numbers_fail_startup() {
        for (key, value) in [
            ("TOKEN_LEEWAY_SECONDS", "soon"),
            ("TOKEN_LEEWAY_SECONDS", "-5"),
            ("MAX_UPLOAD_BYTES", "20MB"),
            ("MAX_UPLOAD_BYTES", "0"),
            ("TOKEN_TTL_SECONDS", "1d"),
        ] {
            let err = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret"), (key, value)]))
                .unwrap_err();
            assert_eq!(err, ConfigError::Invalid(key), "{key}={value}");
        }
    }

    #[test]
    fn parses_production_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "8080"),
            ("APP_ENV", "PROD"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
            ("DATABASE_URL", "postgres://localhost/app"),
            ("TOKEN_TTL_SECONDS", "3600"),
            ("TOKEN_LEEWAY_SECONDS", "5"),
            ("MAX_UPLOAD_BYTES", "1048576"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert!(config.app_env.is_production());
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/app"));
        assert_eq!(config.token_ttl_seconds, 3600);
        assert_eq!(config.token_leeway_seconds, 5);
        assert_eq!(config.max_upload_bytes, 1_048_576);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "very-private"),
            ("ADMIN_PASSWORD", "hunter22"),
        ]))
        .unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("very-private"));
        assert!(!printed.contains("hunter22"));
    }
}

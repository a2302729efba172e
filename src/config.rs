/*
 * Responsibility
 * - Load settings from environment variables (.env supported)
 * - Validate them up front (startup fails on missing/invalid values)
 * - Token location, verification key/algorithm, permissions key, HTTP limits
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::middleware::http::HttpLimits;
use crate::services::access::{TokenSource, parse_algorithm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
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

// Upper bound for issued token lifetimes: one year.
const MAX_TOKEN_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

// Unset: default. Set but unparseable: startup error, never a silent default.
fn parse_var<T: FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(s) => s.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub token_source: TokenSource,
    // HMAC secret, or PEM key for asymmetric algorithms
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    // None: the claims root is the permission mapping
    pub permissions_key: Option<String>,
    pub token_leeway_seconds: u64,
    // Lifetime of tokens handed out by /set-cookies
    pub token_ttl_seconds: u64,

    pub http: HttpLimits,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_var(lookup("PORT"), "PORT", 8666)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let token_key = lookup("ACCESS_TOKEN_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Authorization".to_string());

        let token_source = match lookup("ACCESS_TOKEN_SOURCE")
            .unwrap_or_else(|| "either".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "header" => TokenSource::header(token_key),
            "cookie" => TokenSource::cookie(token_key),
            "either" => TokenSource::either(token_key),
            _ => return Err(ConfigError::Invalid("ACCESS_TOKEN_SOURCE")),
        };

        let jwt_secret = lookup("ACCESS_JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("ACCESS_JWT_SECRET"))?
            .replace("\\n", "\n");

        let jwt_algorithm = parse_algorithm(
            &lookup("ACCESS_JWT_ALGORITHM").unwrap_or_else(|| "HS256".to_string()),
        )
        .map_err(|_| ConfigError::Invalid("ACCESS_JWT_ALGORITHM"))?;

        let permissions_key = match lookup("ACCESS_PERMISSIONS_KEY") {
            Some(key) if key.trim().is_empty() => None,
            Some(key) => Some(key.trim().to_string()),
            None => Some("userPermissions".to_string()),
        };

        let token_leeway_seconds: u64 = parse_var(
            lookup("ACCESS_TOKEN_LEEWAY_SECONDS"),
            "ACCESS_TOKEN_LEEWAY_SECONDS",
            0,
        )?;

        let token_ttl_seconds: u64 = parse_var(
            lookup("ACCESS_TOKEN_TTL_SECONDS"),
            "ACCESS_TOKEN_TTL_SECONDS",
            8 * 60 * 60,
        )?;
        if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&token_ttl_seconds) {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"));
        }

        let defaults = HttpLimits::default();
        let http = HttpLimits {
            timeout: Duration::from_secs(parse_var(
                lookup("REQUEST_TIMEOUT_SECONDS"),
                "REQUEST_TIMEOUT_SECONDS",
                defaults.timeout.as_secs(),
            )?),
            body_limit_bytes: parse_var(
                lookup("REQUEST_BODY_LIMIT_BYTES"),
                "REQUEST_BODY_LIMIT_BYTES",
                defaults.body_limit_bytes,
            )?,
        };

        Ok(Self {
            addr,
            app_env,
            token_source,
            jwt_secret,
            jwt_algorithm,
            permissions_key,
            token_leeway_seconds,
            token_ttl_seconds,
            http,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("ACCESS_JWT_SECRET", "secret")]).unwrap();

        assert_eq!(config.addr.port(), 8666);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.token_source, TokenSource::either("Authorization"));
        assert_eq!(config.jwt_algorithm, Algorithm::HS256);
        assert_eq!(config.permissions_key.as_deref(), Some("userPermissions"));
        assert_eq!(config.token_leeway_seconds, 0);
        assert_eq!(config.token_ttl_seconds, 28_800);
        assert_eq!(config.http, HttpLimits::default());
    }

    #[test]
    fn test_secret_is_required() {
        assert_eq!(
            load(&[]).err(),
            Some(ConfigError::Missing("ACCESS_JWT_SECRET"))
        );
    }

    #[test]
    fn test_token_source_selection() {
        let config = load(&[
            ("ACCESS_JWT_SECRET", "secret"),
            ("ACCESS_TOKEN_SOURCE", "Cookie"),
            ("ACCESS_TOKEN_KEY", "session"),
        ])
        .unwrap();
        assert_eq!(config.token_source, TokenSource::cookie("session"));

        let err = load(&[
            ("ACCESS_JWT_SECRET", "secret"),
            ("ACCESS_TOKEN_SOURCE", "query"),
        ])
        .err();
        assert_eq!(err, Some(ConfigError::Invalid("ACCESS_TOKEN_SOURCE")));
    }

    #[test]
    fn test_empty_permissions_key_means_root() {
        let config = load(&[
            ("ACCESS_JWT_SECRET", "secret"),
            ("ACCESS_PERMISSIONS_KEY", ""),
        ])
        .unwrap();
        assert_eq!(config.permissions_key, None);
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("ACCESS_JWT_SECRET", "secret"), ("PORT", "http")]).err();
        assert_eq!(err, Some(ConfigError::Invalid("PORT")));

        let err = load(&[
            ("ACCESS_JWT_SECRET", "secret"),
            ("ACCESS_JWT_ALGORITHM", "none"),
        ])
        .err();
        assert_eq!(err, Some(ConfigError::Invalid("ACCESS_JWT_ALGORITHM")));

        for (key, value) in [
            ("ACCESS_TOKEN_LEEWAY_SECONDS", "-5"),
            ("ACCESS_TOKEN_TTL_SECONDS", "eight hours"),
            ("REQUEST_TIMEOUT_SECONDS", "30s"),
            ("REQUEST_BODY_LIMIT_BYTES", "64k"),
        ] {
            let err = load(&[("ACCESS_JWT_SECRET", "secret"), (key, value)]).err();
            assert_eq!(err, Some(ConfigError::Invalid(key)), "{key}={value}");
        }
    }

    #[test]
    fn test_token_ttl_range() {
        for value in ["0", "10000000000000000", "18446744073709551615"] {
            let err = load(&[
                ("ACCESS_JWT_SECRET", "secret"),
                ("ACCESS_TOKEN_TTL_SECONDS", value),
            ])
            .err();
            assert_eq!(err, Some(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS")));
        }

        let config = load(&[
            ("ACCESS_JWT_SECRET", "secret"),
            ("ACCESS_TOKEN_TTL_SECONDS", " 1800 "),
            ("ACCESS_TOKEN_LEEWAY_SECONDS", "5"),
        ])
        .unwrap();
        assert_eq!(config.token_ttl_seconds, 1800);
        assert_eq!(config.token_leeway_seconds, 5);
    }

    #[test]
    fn test_pem_newlines_are_unescaped() {
        let config = load(&[(
            "ACCESS_JWT_SECRET",
            "-----BEGIN PUBLIC KEY-----\\nabc\\n-----END PUBLIC KEY-----",
        )])
        .unwrap();
        assert_eq!(config.jwt_secret.lines().count(), 3);
    }

    #[test]
    fn test_production_env() {
        let config = load(&[("ACCESS_JWT_SECRET", "secret"), ("APP_ENV", "prod")]).unwrap();
        assert!(config.app_env.is_production());
    }
}

/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, admin/user の JWT 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderName;

// jsonwebtoken subtracts the leeway from the current epoch in u64, so it must stay small.
const MAX_JWT_LEEWAY_SECONDS: u64 = 300;

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

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// One named JWT configuration group (admin or user).
#[derive(Clone)]
pub struct JwtGroup {
    pub secret_key: String,
    pub token_name: HeaderName,
    // Lifetime the login service stamps into `exp`. Verification only reads
    // `exp` from the token, so this value is informational here.
    pub ttl_seconds: u64,
}

impl std::fmt::Debug for JwtGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtGroup")
            .field("token_name", &self.token_name)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub admin_jwt: JwtGroup,
    pub user_jwt: JwtGroup,
    pub jwt_leeway_seconds: u64,

    pub request_timeout_seconds: u64,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let admin_jwt = JwtGroup {
            secret_key: required(&lookup, "ADMIN_SECRET_KEY")?,
            token_name: header_name(&lookup, "ADMIN_TOKEN_NAME", "token")?,
            ttl_seconds: number(&lookup, "ADMIN_TTL_SECONDS", 7200)?,
        };

        let user_jwt = JwtGroup {
            secret_key: required(&lookup, "USER_SECRET_KEY")?,
            token_name: header_name(&lookup, "USER_TOKEN_NAME", "authentication")?,
            ttl_seconds: number(&lookup, "USER_TTL_SECONDS", 7200)?,
        };

        let jwt_leeway_seconds = number(&lookup, "JWT_LEEWAY_SECONDS", 0)?;
        if jwt_leeway_seconds > MAX_JWT_LEEWAY_SECONDS {
            return Err(ConfigError::Invalid("JWT_LEEWAY_SECONDS"));
        }
        let request_timeout_seconds = number(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?;
        let request_body_limit_bytes =
            usize::try_from(number(&lookup, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?)
                .map_err(|_| ConfigError::Invalid("REQUEST_BODY_LIMIT_BYTES"))?;

        Ok(Self {
            addr,
            app_env,
            admin_jwt,
            user_jwt,
            jwt_leeway_seconds,
            request_timeout_seconds,
            request_body_limit_bytes,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn header_name<F>(lookup: &F, key: &'static str, default: &str) -> Result<HeaderName, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    HeaderName::from_str(raw.trim()).map_err(|_| ConfigError::Invalid(key))
}

fn number<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

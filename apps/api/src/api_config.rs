use std::env;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use ecoplaza_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

/// Deployment mode the process runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    Development,
    Production,
}

impl DeploymentMode {
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for DeploymentMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(AppError::Validation(format!(
                "APP_ENV must be either 'development' or 'production', got '{other}'"
            ))),
        }
    }
}

/// Permission cache sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionCacheConfig {
    pub ttl: Duration,
    pub max_entries: Option<NonZeroUsize>,
    pub warm_on_start: bool,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub deployment_mode: DeploymentMode,
    pub permission_cache: PermissionCacheConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let database_max_connections = parse_env_or("DATABASE_MAX_CONNECTIONS", 10_u32)?.max(1);
        let database_acquire_timeout =
            Duration::from_secs(parse_env_or("DATABASE_ACQUIRE_TIMEOUT_SECONDS", 5_u64)?);

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = parse_env_or("API_PORT", 3001_u16)?;
        let cookie_secure = env_flag("SESSION_COOKIE_SECURE");

        let deployment_mode = env::var("APP_ENV")
            .map(|value| DeploymentMode::from_str(value.as_str()))
            .unwrap_or(Ok(DeploymentMode::Development))?;

        let permission_cache = PermissionCacheConfig {
            ttl: Duration::from_secs(parse_env_or(
                "RBAC_CACHE_TTL_SECONDS",
                DEFAULT_CACHE_TTL_SECONDS,
            )?),
            max_entries: parse_max_entries(env::var("RBAC_CACHE_MAX_ENTRIES").ok().as_deref())?,
            warm_on_start: env_flag("RBAC_CACHE_WARM_ON_START"),
        };

        Ok(Self {
            migrate_only,
            database_url,
            database_max_connections,
            database_acquire_timeout,
            frontend_url,
            api_host,
            api_port,
            cookie_secure,
            deployment_mode,
            permission_cache,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .unwrap_or_else(|_| "false".to_owned())
        .eq_ignore_ascii_case("true")
}

fn parse_env_or<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value_or(name, env::var(name).ok().as_deref(), default)
}

fn parse_value_or<T>(name: &str, value: Option<&str>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(default),
        Some(value) => value
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}"))),
    }
}

fn parse_max_entries(value: Option<&str>) -> Result<Option<NonZeroUsize>, AppError> {
    let max_entries = parse_value_or("RBAC_CACHE_MAX_ENTRIES", value, 0_usize)?;
    Ok(NonZeroUsize::new(max_entries))
}

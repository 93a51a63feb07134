use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fmt, io};

use url::Url;

use crate::domain::LoginRequest;
use crate::use_cases::ErrorCodeTable;

// Runtime client configuration (environment driven).

pub const DEV_PROXY_PATH: &str = "/api";
pub const DEFAULT_DEV_SERVER_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_PRODUCTION_API_URL: &str = "https://api.stay-booking.app";
pub const DEFAULT_SESSION_COOKIE: &str = "JSESSIONID";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    // Calls go through the dev server's proxy.
    Development,
    // Calls go straight to the deployed API.
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    UnknownEnvironment(String),
    InvalidUrl {
        value: String,
        source: url::ParseError,
    },
    InvalidTimeout(String),
    ErrorTableRead {
        path: PathBuf,
        source: io::Error,
    },
    ErrorTableParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownEnvironment(value) => {
                write!(f, "unknown APP_ENV {value:?}, expected development or production")
            }
            ConfigError::InvalidUrl { value, source } => {
                write!(f, "invalid api url {value:?}: {source}")
            }
            ConfigError::InvalidTimeout(value) => {
                write!(f, "invalid HTTP_TIMEOUT_MS {value:?}")
            }
            ConfigError::ErrorTableRead { path, source } => {
                write!(f, "failed to read error codes {}: {source}", path.display())
            }
            ConfigError::ErrorTableParse { path, source } => {
                write!(f, "failed to parse error codes {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidUrl { source, .. } => Some(source),
            ConfigError::ErrorTableRead { source, .. } => Some(source),
            ConfigError::ErrorTableParse { source, .. } => Some(source),
            ConfigError::UnknownEnvironment(_) | ConfigError::InvalidTimeout(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: Environment,
    pub api_base_url: Url,
    pub session_cookie_name: String,
    pub http_timeout: Duration,
    pub error_codes_path: Option<PathBuf>,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = match lookup("APP_ENV") {
            Some(value) => Environment::parse(&value)?,
            None => Environment::Development,
        };
        let api_base_url = resolve_base_url(
            environment,
            lookup("API_BASE_URL").as_deref(),
            lookup("DEV_SERVER_ORIGIN").as_deref(),
        )?;
        let session_cookie_name = lookup("SESSION_COOKIE_NAME")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());
        let http_timeout = match lookup("HTTP_TIMEOUT_MS") {
            Some(value) => value
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidTimeout(value))?,
            None => DEFAULT_HTTP_TIMEOUT,
        };
        let error_codes_path = lookup("ERROR_CODES_PATH").map(PathBuf::from);

        Ok(Self {
            environment,
            api_base_url,
            session_cookie_name,
            http_timeout,
            error_codes_path,
        })
    }
}

// Development always goes through the dev-server proxy, whatever API_BASE_URL
// says. Production uses the configured URL or the deployed default.
pub fn resolve_base_url(
    environment: Environment,
    configured: Option<&str>,
    dev_origin: Option<&str>,
) -> Result<Url, ConfigError> {
    let value = match environment {
        Environment::Development => {
            let origin = dev_origin.unwrap_or(DEFAULT_DEV_SERVER_ORIGIN);
            format!("{}{}", origin.trim_end_matches('/'), DEV_PROXY_PATH)
        }
        Environment::Production => configured
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_PRODUCTION_API_URL)
            .to_string(),
    };
    Url::parse(&value).map_err(|source| ConfigError::InvalidUrl { value, source })
}

pub fn load_error_table(path: &Path) -> Result<ErrorCodeTable, ConfigError> {
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::ErrorTableRead {
        path: path.to_path_buf(),
        source,
    })?;
    ErrorCodeTable::from_toml_overrides(&source).map_err(|source| ConfigError::ErrorTableParse {
        path: path.to_path_buf(),
        source,
    })
}

// LOG_FORMAT=json switches the binary to JSON log lines.
pub fn json_logs() -> bool {
    env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"))
}

// Optional credentials for the binary's login check.
pub fn login_credentials() -> Option<LoginRequest> {
    let email = env::var("LOGIN_EMAIL").ok()?;
    let password = env::var("LOGIN_PASSWORD").ok()?;
    Some(LoginRequest::new(email, password))
}

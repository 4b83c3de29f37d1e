use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::error::{Error, Result};

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub const DATABASE_MIN_CONNECTIONS: &str = "DATABASE_MIN_CONNECTIONS";
pub const DATABASE_ACQUIRE_TIMEOUT_SECS: &str = "DATABASE_ACQUIRE_TIMEOUT_SECS";
pub const DATABASE_IDLE_TIMEOUT_SECS: &str = "DATABASE_IDLE_TIMEOUT_SECS";
pub const DATABASE_MAX_LIFETIME_SECS: &str = "DATABASE_MAX_LIFETIME_SECS";

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 0;
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_LIFETIME: Duration = Duration::from_secs(30 * 60);

/// Connection string plus pool settings.
///
/// Every pool knob has an explicit default so behaviour does not depend on
/// whatever the driver version happens to pick. A timeout of `None` disables it.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        DatabaseConfig {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            idle_timeout: None,
            max_lifetime: Some(DEFAULT_MAX_LIFETIME),
        }
    }

    /// Reads the config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the config through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = match lookup(DATABASE_URL) {
            None => return Err(Error::MissingEnv(DATABASE_URL)),
            Some(url) if url.trim().is_empty() => return Err(Error::EmptyEnv(DATABASE_URL)),
            Some(url) => url.trim().to_string(),
        };

        let mut config = DatabaseConfig::new(url);

        if let Some(max) = parse_var::<u32, _>(&lookup, DATABASE_MAX_CONNECTIONS)? {
            config.max_connections = max;
        }
        if let Some(min) = parse_var::<u32, _>(&lookup, DATABASE_MIN_CONNECTIONS)? {
            config.min_connections = min;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, DATABASE_ACQUIRE_TIMEOUT_SECS)? {
            if secs == 0 {
                return Err(Error::InvalidEnv {
                    name: DATABASE_ACQUIRE_TIMEOUT_SECS,
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.acquire_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, DATABASE_IDLE_TIMEOUT_SECS)? {
            config.idle_timeout = non_zero_secs(secs);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, DATABASE_MAX_LIFETIME_SECS)? {
            config.max_lifetime = non_zero_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(Error::InvalidEnv {
                name: DATABASE_MAX_CONNECTIONS,
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.min_connections > self.max_connections {
            return Err(Error::InvalidEnv {
                name: DATABASE_MIN_CONNECTIONS,
                reason: format!(
                    "{} exceeds the maximum of {}",
                    self.min_connections, self.max_connections
                ),
            });
        }

        self.connect_options().map(|_| ())
    }

    /// Parses the connection string into driver options.
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        let scheme = self
            .url
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase());
        if !matches!(scheme.as_deref(), Some("postgres") | Some("postgresql")) {
            return Err(Error::InvalidConnectionString(format!(
                "expected a postgres:// or postgresql:// URL, got `{}`",
                redact_url(&self.url)
            )));
        }

        PgConnectOptions::from_str(&self.url)
            .map_err(|e| Error::InvalidConnectionString(e.to_string()))
    }

    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
    }

    /// The connection string with its password masked.
    pub fn redacted_url(&self) -> String {
        redact_url(&self.url)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.redacted_url())
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .field("max_lifetime", &self.max_lifetime)
            .finish()
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::InvalidEnv {
                name,
                reason: format!("`{}`: {}", raw, e),
            }),
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Masks the password, whether it sits in the userinfo or in a `password`
/// query parameter.
pub fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;

    let (base, query) = match url[authority_start..].find('?') {
        Some(q) => (
            &url[..authority_start + q],
            Some(&url[authority_start + q + 1..]),
        ),
        None => (url, None),
    };

    let mut redacted = redact_userinfo(base, authority_start);
    if let Some(query) = query {
        let pairs: Vec<String> = query
            .split('&')
            .map(|pair| match pair.split_once('=') {
                Some((key, _)) if key.eq_ignore_ascii_case("password") => format!("{}=***", key),
                _ => pair.to_string(),
            })
            .collect();
        redacted.push('?');
        redacted.push_str(&pairs.join("&"));
    }

    redacted
}

fn redact_userinfo(base: &str, authority_start: usize) -> String {
    let rest = &base[authority_start..];
    let authority_end = rest.find('/').unwrap_or(rest.len());

    let Some(at) = rest[..authority_end].rfind('@') else {
        return base.to_string();
    };

    let userinfo = &rest[..at];
    match userinfo.find(':') {
        Some(colon) => format!(
            "{}{}:***{}",
            &base[..authority_start],
            &userinfo[..colon],
            &rest[at..]
        ),
        None => base.to_string(),
    }
}

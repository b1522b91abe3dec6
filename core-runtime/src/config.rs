//! # Service Configuration Module
//!
//! Provides configuration management for the song catalog service.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `ServiceConfig` instance that holds every setting the HTTP service needs:
//! bind address, request timeouts, database location, logging and the
//! default page sizes of the listing endpoints. It enforces fail-fast
//! validation so a misconfigured process never starts serving.
//!
//! ## Usage
//!
//! ### From the environment
//!
//! ```ignore
//! use core_runtime::config::ServiceConfig;
//!
//! // Loads `.env` if present, then reads PORT, DATABASE_URL, LOG_LEVEL, ...
//! let config = ServiceConfig::from_env()?;
//! ```
//!
//! ### Explicit configuration
//!
//! ```
//! use core_runtime::config::ServiceConfig;
//! use std::time::Duration;
//!
//! let config = ServiceConfig::builder()
//!     .port(9000)
//!     .database_url("sqlite::memory:")
//!     .read_timeout(Duration::from_secs(5))
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.port, 9000);
//! ```
//!
//! ## Environment variables
//!
//! Malformed numeric values are ignored and the default is used instead, so
//! a typo in `READ_TIMEOUT` degrades to the default rather than aborting
//! startup. Unknown `LOG_LEVEL` values fall back to `debug`. Each ignored
//! value is kept in [`ServiceConfig::warnings`]; loading happens before a
//! subscriber exists, so call [`ServiceConfig::log_load_report`] once logging
//! is initialized.
//!
//! `LOG_FILTER` takes a full `tracing` filter directive and overrides
//! `LOG_LEVEL`.

use crate::error::{Error, Result};
use crate::logging::{LogFormat, LogLevel, LoggingConfig};
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DATABASE_URL: &str = "sqlite:songs.db";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_SONGS_PAGE_SIZE: u32 = 10;
pub const DEFAULT_VERSES_PAGE_SIZE: u32 = 3;

/// Configuration for the song catalog service.
///
/// Use [`ServiceConfigBuilder`] or [`ServiceConfig::from_env`] to construct
/// instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Interface the HTTP listener binds to
    pub host: String,

    /// TCP port the HTTP listener binds to
    pub port: u16,

    /// Time allowed for reading a request
    pub read_timeout: Duration,

    /// Time allowed for producing a response
    pub write_timeout: Duration,

    /// SQLite connection URL (`sqlite:songs.db`, `sqlite::memory:`)
    pub database_url: String,

    /// Maximum number of pooled database connections
    pub db_max_connections: u32,

    /// Minimum log level
    pub log_level: LogLevel,

    /// Log output format
    pub log_format: LogFormat,

    /// Custom `tracing` filter directive, overriding `log_level`
    pub log_filter: Option<String>,

    /// Page size used by `GET /songs` when `limit` is missing or invalid
    pub songs_page_size: u32,

    /// Page size used by the lyrics endpoint when `verse_limit` is missing or invalid
    pub verses_page_size: u32,

    /// `.env` file that was loaded, if any
    pub env_file: Option<PathBuf>,

    /// Settings that were present but malformed and replaced by defaults
    pub warnings: Vec<ConfigWarning>,
}

/// A malformed setting that was ignored in favour of its default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub value: String,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}='{}' is malformed, using default", self.key, self.value)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            write_timeout: Duration::from_secs(DEFAULT_WRITE_TIMEOUT_SECS),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            log_level: LogLevel::Debug,
            log_format: LogFormat::default(),
            log_filter: None,
            songs_page_size: DEFAULT_SONGS_PAGE_SIZE,
            verses_page_size: DEFAULT_VERSES_PAGE_SIZE,
            env_file: None,
            warnings: Vec::new(),
        }
    }
}

impl ServiceConfig {
    /// Creates a new builder for constructing a `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Loads configuration from the process environment.
    ///
    /// A `.env` file in the working directory (or any parent) is loaded
    /// first when present; variables already set in the environment win.
    pub fn from_env() -> Result<Self> {
        let env_file = dotenvy::dotenv().ok();

        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.env_file = env_file;
        Ok(config)
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// This is the testable core of [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();
        let mut settings = SettingReader::new(lookup);

        if let Some(host) = settings.text("HOST") {
            builder = builder.host(host);
        }
        if let Some(port) = settings.parse::<u16>("PORT") {
            builder = builder.port(port);
        }
        if let Some(secs) = settings.parse::<u64>("READ_TIMEOUT") {
            builder = builder.read_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = settings.parse::<u64>("WRITE_TIMEOUT") {
            builder = builder.write_timeout(Duration::from_secs(secs));
        }
        if let Some(url) = settings.text("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Some(max) = settings.parse::<u32>("DB_MAX_CONNECTIONS") {
            builder = builder.db_max_connections(max);
        }
        if let Some(level) = settings.parse::<LogLevel>("LOG_LEVEL") {
            builder = builder.log_level(level);
        }
        if let Some(format) = settings.parse::<LogFormat>("LOG_FORMAT") {
            builder = builder.log_format(format);
        }
        if let Some(filter) = settings.text("LOG_FILTER") {
            builder = builder.log_filter(filter);
        }
        if let Some(size) = settings.parse::<u32>("SONGS_PAGE_SIZE") {
            builder = builder.songs_page_size(size);
        }
        if let Some(size) = settings.parse::<u32>("VERSES_PAGE_SIZE") {
            builder = builder.verses_page_size(size);
        }

        let mut config = builder.build()?;
        config.warnings = settings.warnings;
        Ok(config)
    }

    /// Logging settings derived from this configuration.
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig::default()
            .with_level(self.log_level)
            .with_format(self.log_format)
            .with_filter(self.log_filter.clone())
    }

    /// Emits what happened while loading: the `.env` source and every
    /// malformed setting that fell back to its default.
    pub fn log_load_report(&self) {
        match &self.env_file {
            Some(path) => debug!(path = %path.display(), "Loaded .env file"),
            None => debug!("No .env file found, using process environment"),
        }

        for warning in &self.warnings {
            warn!(key = %warning.key, value = %warning.value, "Ignoring malformed setting, using default");
        }
    }

    /// Socket address the HTTP listener should bind to.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::InvalidSetting {
                key: "HOST".to_string(),
                message: format!("'{}:{}' is not a socket address: {}", self.host, self.port, e),
            })
    }

    /// Total time budget for one request (read + write).
    pub fn request_timeout(&self) -> Duration {
        self.read_timeout + self.write_timeout
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Host and database URL are not empty
    /// - Port is not zero
    /// - Timeouts are non-zero
    /// - Pool size and page sizes are non-zero
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("Host cannot be empty".to_string()));
        }

        if self.port == 0 {
            return Err(Error::Config("Port must be greater than 0".to_string()));
        }

        if self.read_timeout.is_zero() || self.write_timeout.is_zero() {
            return Err(Error::Config(
                "Read and write timeouts must be greater than 0 seconds".to_string(),
            ));
        }

        if self.database_url.trim().is_empty() {
            return Err(Error::Config("Database URL cannot be empty".to_string()));
        }

        if self.db_max_connections == 0 {
            return Err(Error::Config(
                "Database pool must allow at least one connection".to_string(),
            ));
        }

        if self.songs_page_size == 0 || self.verses_page_size == 0 {
            return Err(Error::Config(
                "Default page sizes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for constructing [`ServiceConfig`] instances.
///
/// Every setting is optional; unset values take the documented defaults.
/// [`build()`](ServiceConfigBuilder::build) validates the result.
#[derive(Debug, Default)]
pub struct ServiceConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    database_url: Option<String>,
    db_max_connections: Option<u32>,
    log_level: Option<LogLevel>,
    log_format: Option<LogFormat>,
    log_filter: Option<String>,
    songs_page_size: Option<u32>,
    verses_page_size: Option<u32>,
}

impl ServiceConfigBuilder {
    /// Sets the bind host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the bind port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Sets the write timeout.
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    /// Sets the SQLite connection URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::ServiceConfig;
    ///
    /// let config = ServiceConfig::builder()
    ///     .database_url("sqlite:/var/lib/songbook/songs.db")
    ///     .build()
    ///     .unwrap();
    /// assert!(config.database_url.ends_with("songs.db"));
    /// ```
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Sets the maximum number of pooled connections.
    pub fn db_max_connections(mut self, max: u32) -> Self {
        self.db_max_connections = Some(max);
        self
    }

    /// Sets the minimum log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Sets the log output format.
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    /// Sets a custom `tracing` filter directive.
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Sets the default page size of the song listing.
    pub fn songs_page_size(mut self, size: u32) -> Self {
        self.songs_page_size = Some(size);
        self
    }

    /// Sets the default page size of the lyrics endpoint.
    pub fn verses_page_size(mut self, size: u32) -> Self {
        self.verses_page_size = Some(size);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<ServiceConfig> {
        let defaults = ServiceConfig::default();

        let config = ServiceConfig {
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            read_timeout: self.read_timeout.unwrap_or(defaults.read_timeout),
            write_timeout: self.write_timeout.unwrap_or(defaults.write_timeout),
            database_url: self.database_url.unwrap_or(defaults.database_url),
            db_max_connections: self
                .db_max_connections
                .unwrap_or(defaults.db_max_connections),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            log_format: self.log_format.unwrap_or(defaults.log_format),
            log_filter: self.log_filter,
            songs_page_size: self.songs_page_size.unwrap_or(defaults.songs_page_size),
            verses_page_size: self.verses_page_size.unwrap_or(defaults.verses_page_size),
            env_file: None,
            warnings: Vec::new(),
        };

        config.validate()?;

        Ok(config)
    }
}

/// Reads raw settings, remembering the ones that failed to parse
struct SettingReader<F> {
    lookup: F,
    warnings: Vec<ConfigWarning>,
}

impl<F> SettingReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn new(lookup: F) -> Self {
        Self {
            lookup,
            warnings: Vec::new(),
        }
    }

    /// Trimmed value, `None` when unset or blank
    fn text(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse<T: FromStr>(&mut self, key: &str) -> Option<T> {
        let raw = self.text(key)?;
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.warnings.push(ConfigWarning {
                    key: key.to_string(),
                    value: raw,
                });
                None
            }
        }
    }
}

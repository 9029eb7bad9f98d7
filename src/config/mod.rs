//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{
    net::SocketAddr,
    num::{NonZeroU64, NonZeroUsize},
    path::PathBuf,
    str::FromStr,
};

use clap::{Args, Parser, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "feedsearch";
const ENV_PREFIX: &str = "FEEDSEARCH";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATA_PATH: &str = "data.json";
const DEFAULT_MAX_UPDATE_WAIT_SECS: u64 = 60;
const DEFAULT_OLD_FEEDS_ACCESS_SECS: u64 = 120;
const DEFAULT_PAGE_SIZE: usize = 50;

/// Command-line arguments for the feedsearch binary.
#[derive(Debug, Parser)]
#[command(
    name = "feedsearch",
    version,
    about = "Search, sort and paginate a feed list over HTTP"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "FEEDSEARCH_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the path of the JSON feed list.
    #[arg(long = "data-path", value_name = "PATH")]
    pub data_path: Option<PathBuf>,

    /// Override how long a cached search result stays fresh.
    #[arg(long = "cache-max-update-wait-seconds", value_name = "SECONDS")]
    pub cache_max_update_wait_seconds: Option<u64>,

    /// Override how long an unused cached search result is kept.
    #[arg(long = "cache-old-feeds-access-seconds", value_name = "SECONDS")]
    pub cache_old_feeds_access_seconds: Option<u64>,

    /// Override the page size used when a request omits `pageSize`.
    #[arg(long = "query-default-page-size", value_name = "COUNT")]
    pub query_default_page_size: Option<usize>,
}

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub data: DataSettings,
    pub cache: CacheSettings,
    pub query: QuerySettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct DataSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub max_update_wait_seconds: NonZeroU64,
    pub old_feeds_access_seconds: NonZeroU64,
}

#[derive(Debug, Clone)]
pub struct QuerySettings {
    pub default_page_size: NonZeroUsize,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_serve_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    data: RawDataSettings,
    cache: RawCacheSettings,
    query: RawQuerySettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(path) = overrides.data_path.as_ref() {
            self.data.path = Some(path.clone());
        }
        if let Some(seconds) = overrides.cache_max_update_wait_seconds {
            self.cache.max_update_wait_seconds = Some(seconds);
        }
        if let Some(seconds) = overrides.cache_old_feeds_access_seconds {
            self.cache.old_feeds_access_seconds = Some(seconds);
        }
        if let Some(size) = overrides.query_default_page_size {
            self.query.default_page_size = Some(size);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            data,
            cache,
            query,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            data: build_data_settings(data)?,
            cache: build_cache_settings(cache)?,
            query: build_query_settings(query)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    Ok(ServerSettings { addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_data_settings(data: RawDataSettings) -> Result<DataSettings, LoadError> {
    let path = data
        .path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
    if path.as_os_str().is_empty() {
        return Err(LoadError::invalid("data.path", "path must not be empty"));
    }

    Ok(DataSettings { path })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let max_update_wait = cache
        .max_update_wait_seconds
        .unwrap_or(DEFAULT_MAX_UPDATE_WAIT_SECS);
    let old_feeds_access = cache
        .old_feeds_access_seconds
        .unwrap_or(DEFAULT_OLD_FEEDS_ACCESS_SECS);

    Ok(CacheSettings {
        max_update_wait_seconds: non_zero_u64(max_update_wait, "cache.max_update_wait_seconds")?,
        old_feeds_access_seconds: non_zero_u64(
            old_feeds_access,
            "cache.old_feeds_access_seconds",
        )?,
    })
}

fn build_query_settings(query: RawQuerySettings) -> Result<QuerySettings, LoadError> {
    let size = query.default_page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let default_page_size = NonZeroUsize::new(size)
        .ok_or_else(|| LoadError::invalid("query.default_page_size", "must be greater than zero"))?;

    Ok(QuerySettings { default_page_size })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDataSettings {
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    max_update_wait_seconds: Option<u64>,
    old_feeds_access_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawQuerySettings {
    default_page_size: Option<usize>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_zero_u64(value: u64, key: &'static str) -> Result<NonZeroU64, LoadError> {
    NonZeroU64::new(value).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

        assert_eq!(settings.server.addr.to_string(), "127.0.0.1:3000");
        assert_eq!(settings.logging.level, LevelFilter::INFO);
        assert!(matches!(settings.logging.format, LogFormat::Compact));
        assert_eq!(settings.data.path, PathBuf::from("data.json"));
        assert_eq!(settings.cache.max_update_wait_seconds.get(), 60);
        assert_eq!(settings.cache.old_feeds_access_seconds.get(), 120);
        assert_eq!(settings.query.default_page_size.get(), 50);
    }

    #[test]
    fn cli_overrides_take_highest_precedence() {
        let mut raw = RawSettings::default();
        raw.server.port = Some(4000);
        raw.logging.level = Some("info".to_string());

        let overrides = ServeOverrides {
            server_port: Some(4321),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };

        raw.apply_serve_overrides(&overrides);
        let settings = Settings::from_raw(raw).expect("valid settings");

        assert_eq!(settings.server.addr.port(), 4321);
        assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    }

    #[test]
    fn cli_json_logging_enforces_format() {
        let mut raw = RawSettings::default();
        let overrides = ServeOverrides {
            log_json: Some(true),
            ..Default::default()
        };

        raw.apply_serve_overrides(&overrides);
        let settings = Settings::from_raw(raw).expect("valid settings");

        assert!(matches!(settings.logging.format, LogFormat::Json));
    }

    #[test]
    fn zero_cache_windows_are_rejected() {
        let mut raw = RawSettings::default();
        raw.cache.old_feeds_access_seconds = Some(0);

        match Settings::from_raw(raw) {
            Err(LoadError::Invalid { key, .. }) => {
                assert_eq!(key, "cache.old_feeds_access_seconds")
            }
            other => panic!("expected invalid cache setting, got {other:?}"),
        }
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut raw = RawSettings::default();
        raw.query.default_page_size = Some(0);

        assert!(matches!(
            Settings::from_raw(raw),
            Err(LoadError::Invalid {
                key: "query.default_page_size",
                ..
            })
        ));
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let mut raw = RawSettings::default();
        raw.logging.level = Some("loud".to_string());

        assert!(matches!(
            Settings::from_raw(raw),
            Err(LoadError::Invalid {
                key: "logging.level",
                ..
            })
        ));
    }

    #[test]
    fn parses_cli_flags() {
        let args = CliArgs::parse_from([
            "feedsearch",
            "--server-port",
            "8080",
            "--data-path",
            "fixtures/feeds.json",
            "--log-json",
            "true",
            "--cache-max-update-wait-seconds",
            "5",
        ]);

        assert_eq!(args.overrides.server_port, Some(8080));
        assert_eq!(
            args.overrides.data_path,
            Some(PathBuf::from("fixtures/feeds.json"))
        );
        assert_eq!(args.overrides.log_json, Some(true));
        assert_eq!(args.overrides.cache_max_update_wait_seconds, Some(5));
    }

    #[test]
    fn explicit_config_file_is_layered_under_cli() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp config");
        writeln!(
            file,
            "[server]\nport = 4100\n\n[data]\npath = \"feeds.json\"\n\n[query]\ndefault_page_size = 10"
        )
        .expect("write config");

        let cli = CliArgs {
            config_file: Some(file.path().to_path_buf()),
            overrides: ServeOverrides {
                server_port: Some(4200),
                ..Default::default()
            },
        };

        let settings = load(&cli).expect("settings");
        assert_eq!(settings.server.addr.port(), 4200);
        assert_eq!(settings.data.path, PathBuf::from("feeds.json"));
        assert_eq!(settings.query.default_page_size.get(), 10);
    }
}

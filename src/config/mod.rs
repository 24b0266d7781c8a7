//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::domain::posts::ApiBase;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "postboard";
const ENV_PREFIX: &str = "POSTBOARD";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_FRONTEND_PORT: u16 = 5001;
const DEFAULT_API_PORT: u16 = 5002;
pub(crate) const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5002/api";

/// Command-line arguments for the postboard binary.
#[derive(Debug, Parser)]
#[command(name = "postboard", version, about = "Blog post board and posts API")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "POSTBOARD_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the host page and the posts API side by side.
    Serve(ServeArgs),
    /// Run only the posts API.
    #[command(name = "serve-api")]
    ServeApi(ServeArgs),
    /// Run only the host page, talking to an API elsewhere.
    #[command(name = "serve-frontend")]
    ServeFrontend(ServeArgs),
}

impl Command {
    pub fn overrides(&self) -> &ServeOverrides {
        match self {
            Self::Serve(args) | Self::ServeApi(args) | Self::ServeFrontend(args) => {
                &args.overrides
            }
        }
    }
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the host page listener host.
    #[arg(long = "frontend-host", value_name = "HOST")]
    pub frontend_host: Option<String>,

    /// Override the host page listener port.
    #[arg(long = "frontend-port", value_name = "PORT")]
    pub frontend_port: Option<u16>,

    /// Override the posts API listener host.
    #[arg(long = "api-host", value_name = "HOST")]
    pub api_host: Option<String>,

    /// Override the posts API listener port.
    #[arg(long = "api-port", value_name = "PORT")]
    pub api_port: Option<u16>,

    /// Override the API base URL the host page starts with.
    #[arg(long = "api-base-url", value_name = "URL")]
    pub api_base_url: Option<String>,

    /// Refuse a second action of the same kind while one is outstanding.
    #[arg(
        long = "dedupe-actions",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub dedupe_actions: Option<bool>,

    /// Give up on API requests after this many seconds.
    #[arg(long = "request-timeout-seconds", value_name = "SECONDS")]
    pub request_timeout_seconds: Option<u64>,

    /// Start the posts API with the sample posts.
    #[arg(
        long = "seed-posts",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub seed_posts: Option<bool>,

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
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub frontend: FrontendSettings,
    pub api: ApiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub frontend_addr: SocketAddr,
    pub api_addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct FrontendSettings {
    pub api_base: ApiBase,
    pub dedupe_actions: bool,
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub seed_posts: bool,
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

    if let Some(command) = cli.command.as_ref() {
        raw.apply_overrides(command.overrides());
    }

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
    frontend: RawFrontendSettings,
    api: RawApiSettings,
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    frontend_host: Option<String>,
    frontend_port: Option<u16>,
    api_host: Option<String>,
    api_port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawFrontendSettings {
    api_base_url: Option<String>,
    dedupe_actions: Option<bool>,
    request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    seed_posts: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.frontend_host.as_ref() {
            self.server.frontend_host = Some(host.clone());
        }
        if let Some(port) = overrides.frontend_port {
            self.server.frontend_port = Some(port);
        }
        if let Some(host) = overrides.api_host.as_ref() {
            self.server.api_host = Some(host.clone());
        }
        if let Some(port) = overrides.api_port {
            self.server.api_port = Some(port);
        }
        if let Some(url) = overrides.api_base_url.as_ref() {
            self.frontend.api_base_url = Some(url.clone());
        }
        if let Some(dedupe) = overrides.dedupe_actions {
            self.frontend.dedupe_actions = Some(dedupe);
        }
        if let Some(seconds) = overrides.request_timeout_seconds {
            self.frontend.request_timeout_seconds = Some(seconds);
        }
        if let Some(seed) = overrides.seed_posts {
            self.api.seed_posts = Some(seed);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            frontend,
            api,
            logging,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            frontend: build_frontend_settings(frontend)?,
            api: ApiSettings {
                seed_posts: api.seed_posts.unwrap_or(true),
            },
            logging: build_logging_settings(logging)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let frontend_host = server
        .frontend_host
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let api_host = server.api_host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let frontend_port = server.frontend_port.unwrap_or(DEFAULT_FRONTEND_PORT);
    if frontend_port == 0 {
        return Err(LoadError::invalid(
            "server.frontend_port",
            "port must be greater than zero",
        ));
    }

    let api_port = server.api_port.unwrap_or(DEFAULT_API_PORT);
    if api_port == 0 {
        return Err(LoadError::invalid(
            "server.api_port",
            "port must be greater than zero",
        ));
    }

    let frontend_addr = parse_socket_addr(&frontend_host, frontend_port)
        .map_err(|reason| LoadError::invalid("server.frontend_addr", reason))?;
    let api_addr = parse_socket_addr(&api_host, api_port)
        .map_err(|reason| LoadError::invalid("server.api_addr", reason))?;

    Ok(ServerSettings {
        frontend_addr,
        api_addr,
    })
}

fn build_frontend_settings(frontend: RawFrontendSettings) -> Result<FrontendSettings, LoadError> {
    let raw_base = frontend
        .api_base_url
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let api_base = ApiBase::parse(&raw_base)
        .map_err(|err| LoadError::invalid("frontend.api_base_url", err.to_string()))?;

    let request_timeout = match frontend.request_timeout_seconds {
        Some(0) => {
            return Err(LoadError::invalid(
                "frontend.request_timeout_seconds",
                "must be greater than zero",
            ));
        }
        Some(seconds) => Some(Duration::from_secs(seconds)),
        None => None,
    };

    Ok(FrontendSettings {
        api_base,
        dedupe_actions: frontend.dedupe_actions.unwrap_or(false),
        request_timeout,
    })
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

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

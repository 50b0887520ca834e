use std::env;
use std::io::Write;
use std::time::Duration;

use log::LevelFilter;
use reqwest::Client;
use url::Url;

use super::ConfigError;
use super::cli::Cli;
use super::model::{Environment, ProbeRequest};

/// Overrides the SOAP endpoint selected by `-prod`.
pub const ENDPOINT_ENV: &str = "SCMD_ENDPOINT";

const LOG_TARGET: &str = "check_scmd";
const USER_AGENT: &str = concat!("check_scmd/", env!("CARGO_PKG_VERSION"));

pub struct AppConfig {
    pub request: ProbeRequest,
    pub endpoint: Url,
}

/// Read the endpoint override from `SCMD_ENDPOINT`.
pub fn endpoint_override() -> Option<String> {
    env::var(ENDPOINT_ENV).ok()
}

/// Load the application configuration from the command line and the endpoint
/// override, which replaces the endpoint of the selected environment.
pub fn load_config(cli: &Cli, endpoint_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let request = cli.probe_request();
    let endpoint = resolve_endpoint(request.environment, endpoint_override)?;

    log::info!("Using SCMD endpoint: {}", endpoint);

    Ok(AppConfig { request, endpoint })
}

/// Pick the endpoint for `environment`, unless an override is given.
/// Only absolute http(s) URLs are accepted.
pub fn resolve_endpoint(
    environment: Environment,
    endpoint_override: Option<&str>,
) -> Result<Url, ConfigError> {
    let raw = endpoint_override.unwrap_or(environment.endpoint());
    let invalid = |reason: String| ConfigError::Endpoint {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(invalid(format!("unsupported scheme {scheme}"))),
    }
}

/// Setup the HTTP client used for the SOAP call.
/// Both the connection and the whole request are bounded by `timeout`.
pub fn setup_client(timeout: Duration) -> Result<Client, ConfigError> {
    let client = Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Setup logging to stderr. Only warnings are shown by default; `verbose`
/// shows the SOAP messages exchanged with the service and the decoded chain.
/// `RUST_LOG` still applies.
pub fn setup_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn);

    if verbose {
        builder
            .filter_module(LOG_TARGET, LevelFilter::Debug)
            .format(|buf, record| writeln!(buf, ">> {}: {}", record.target(), record.args()));
    }

    builder.parse_default_env();
    let _ = builder.try_init();
}

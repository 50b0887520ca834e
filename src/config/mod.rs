use thiserror::Error;

pub mod app_config;
pub mod cli;
pub mod model;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid SCMD endpoint {url:?}: {reason}")]
    Endpoint { url: String, reason: String },

    #[error("Failed to build HTTP client")]
    Client(#[from] reqwest::Error),
}

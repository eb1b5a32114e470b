use std::time::Duration;

use clap::Parser;
use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid plex host {host:?}: {source}")]
    InvalidPlexHost {
        host: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Proxy settings. Every flag can also be given through its environment
/// variable.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "plex-rewrite",
    version,
    about = "Rewrites Plex metadata responses so clients show version and track titles"
)]
pub struct Config {
    /// The address to bind to
    #[arg(long = "addr", env = "BIND_ADDRESS", default_value = "127.0.0.1:3213")]
    pub bind_address: String,

    /// The host + port that your plex server is running on
    #[arg(long, env = "PLEX_HOST", default_value = "localhost:32401")]
    pub plex_host: String,

    /// Use https to connect to your plex server (needed if Secure Connections is set to Required)
    #[arg(long, env = "PLEX_SECURE")]
    pub secure: bool,

    /// Seconds to wait for plex before giving up on a request
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Forward requests outside /library/metadata/ untouched instead of ignoring them
    #[arg(long, env = "FORWARD_UNMATCHED")]
    pub forward_unmatched: bool,
}

impl Config {
    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    pub fn plex_url(&self) -> Result<Url, ConfigError> {
        format!("{}://{}", self.scheme(), self.plex_host)
            .parse()
            .map_err(|source| ConfigError::InvalidPlexHost {
                host: self.plex_host.clone(),
                source,
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn log_settings(&self) {
        log::info!("bind address: {}", self.bind_address);
        log::info!("plex host: {} ({})", self.plex_host, self.scheme());
        log::info!("upstream timeout: {}s", self.timeout_secs);
        log::info!("forward unmatched: {}", self.forward_unmatched);
    }
}

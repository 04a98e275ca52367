//! Blocking HTTP client for the twin's fault endpoint.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::debug;

use super::{FaultCommand, FaultSink, SendOutcome};

/// Errors raised while talking to the twin server.
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Http(#[from] reqwest::Error),
}

/// Sends fault commands to `<base>/api/trigger_fault`.
pub struct HttpClient {
    client: Client,
    endpoint: Url,
}

impl HttpClient {
    /// Builds a client for the server at `base_url`, e.g. `http://localhost:5000`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` if `base_url` does not parse, or `Http` if the
    /// client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ConsoleError> {
        let base = Url::parse(base_url).map_err(|e| ConsoleError::InvalidUrl(format!("{base_url}: {e}")))?;
        let endpoint = base
            .join("/api/trigger_fault")
            .map_err(|e| ConsoleError::InvalidUrl(format!("{base_url}: {e}")))?;
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl FaultSink for HttpClient {
    fn send(&mut self, cmd: &FaultCommand) -> Result<SendOutcome, ConsoleError> {
        debug!(endpoint = %self.endpoint, ?cmd, "posting fault command");
        let resp = self.client.post(self.endpoint.clone()).json(cmd).send()?;
        let status = resp.status();
        let body = resp.text()?;

        if status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or_else(|| "OK".to_string());
            Ok(SendOutcome::Injected { message })
        } else {
            Ok(SendOutcome::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Session as returned by the service. Numeric and hex fields are kept
/// as plain JSON-friendly types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub status: String, // "disconnected", "connecting" or "connected"
    pub address: Option<String>,
    pub native_balance: f64,
    pub fiat_estimate: f64,
    pub connected: bool,
    pub chain_id: Option<u64>,
    pub quote: Option<Value>,
}

/// Error body for failed session operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    pub detail: String,
}

#[derive(Debug)]
pub enum ClientError {
    Http(reqwest::Error),
    Api { status: u16, body: ApiError },
    Unexpected { status: u16, body: String },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "HTTP error: {}", e),
            ClientError::Api { status, body } => write!(f, "{} ({}): {}", body.error, status, body.message),
            ClientError::Unexpected { status, body } => write!(f, "Unexpected status {}: {}", status, body),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e)
    }
}

pub struct SessionClient {
    client: Client,
    base_url: String,
}

impl SessionClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        let resp = self.client.get(format!("{}/health", self.base_url)).send().await?;
        decode(resp).await
    }

    /// Current session snapshot.
    pub async fn session(&self) -> Result<SessionView, ClientError> {
        let resp = self.client.get(format!("{}/api/v1/session", self.base_url)).send().await?;
        decode(resp).await
    }

    /// Connect the wallet. Fails with `ClientError::Api` on session errors.
    pub async fn connect(&self) -> Result<SessionView, ClientError> {
        let resp = self
            .client
            .post(format!("{}/api/v1/session/connect", self.base_url))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn disconnect(&self) -> Result<SessionView, ClientError> {
        let resp = self
            .client
            .post(format!("{}/api/v1/session/disconnect", self.base_url))
            .send()
            .await?;
        decode(resp).await
    }

    /// Network descriptor the service reconciles to.
    pub async fn network(&self) -> Result<Value, ClientError> {
        let resp = self.client.get(format!("{}/api/v1/network", self.base_url)).send().await?;
        decode(resp).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return match serde_json::from_str::<ApiError>(&text) {
            Ok(body) => Err(ClientError::Api { status: status.as_u16(), body }),
            Err(_) => Err(ClientError::Unexpected { status: status.as_u16(), body: text }),
        };
    }

    serde_json::from_str::<T>(&text).map_err(|_| ClientError::Unexpected {
        status: status.as_u16(),
        body: text,
    })
}

//! Session API handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::blockchain::NetworkDescriptor;
use crate::http::server::AppState;
use crate::session::{Session, SessionError, SessionStatus};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub version: String,
    pub status: String,
    /// Whether a signer capability is installed.
    pub signer: bool,
}

/// Session value plus the in-flight indicator.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub status: SessionStatus,
    #[serde(flatten)]
    pub session: Session,
}

/// Error body returned for failed session operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error kind, e.g. `network_switch_failed`.
    pub error: String,
    /// Message to show the user.
    pub message: String,
    /// Technical cause for logs.
    pub detail: String,
}

/// A session failure rendered as an HTTP response.
pub struct ApiError(pub SessionError);

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            SessionError::CapabilityUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            SessionError::NetworkSwitchFailed { .. }
            | SessionError::AddressResolutionFailed(_)
            | SessionError::BalanceUnavailable(_) => StatusCode::BAD_GATEWAY,
            SessionError::ConnectInProgress | SessionError::ConnectAborted => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.0.kind().to_string(),
            message: self.0.user_message(),
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn respond(state: &AppState, session: Session) -> Json<SessionResponse> {
    Json(SessionResponse {
        status: if state.session.is_connecting() {
            SessionStatus::Connecting
        } else {
            session.status()
        },
        session,
    })
}

pub async fn get_health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "ok".to_string(),
        signer: state.session.has_capability(),
    })
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.session.snapshot();
    respond(&state, session)
}

pub async fn get_network(State(state): State<AppState>) -> Json<NetworkDescriptor> {
    Json(state.session.network().clone())
}

pub async fn connect(State(state): State<AppState>) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.session.connect().await.map_err(ApiError)?;
    Ok(respond(&state, session))
}

pub async fn disconnect(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.session.disconnect();
    respond(&state, session)
}

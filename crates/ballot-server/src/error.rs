use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use ballot_ledger::LedgerError;
use ballot_protocol::{ErrorResponse, ProtocolError};
use ballot_types::TypeError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A whole-number index that no proposal can have: negative, or past `u64`.
    #[error("proposal index {0} out of range")]
    IndexOutOfRange(String),

    #[error("invalid account: {0}")]
    InvalidAccount(#[from] TypeError),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The request could not be decoded.
    #[error("malformed request: {message}")]
    Malformed { status: StatusCode, message: String },

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Error kind reported in the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ledger(e) => e.kind(),
            Self::IndexOutOfRange(_) => "InvalidIndex",
            Self::InvalidAccount(_) => "InvalidAccount",
            Self::AuthFailed(_) => "AuthFailed",
            Self::Malformed { .. } => "MalformedRequest",
            Self::Protocol(_) => "Protocol",
            Self::Config(_) => "Config",
            Self::Io(_) => "Internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Ledger(LedgerError::Unauthorized { .. }) => StatusCode::FORBIDDEN,
            Self::Ledger(LedgerError::InvalidProposal(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Ledger(LedgerError::InvalidIndex { .. }) | Self::IndexOutOfRange(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Ledger(LedgerError::AlreadyVoted { .. }) => StatusCode::CONFLICT,
            Self::InvalidAccount(_) => StatusCode::BAD_REQUEST,
            Self::AuthFailed(_) => StatusCode::UNAUTHORIZED,
            Self::Malformed { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ServerError {
    fn from(rejection: PathRejection) -> Self {
        Self::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_types::{AccountId, NameError};

    #[test]
    fn ledger_errors_map_to_statuses() {
        let who = AccountId::from_raw([1; 32]);
        let cases = [
            (LedgerError::Unauthorized { caller: who.clone() }, StatusCode::FORBIDDEN),
            (LedgerError::InvalidProposal(NameError::Empty), StatusCode::UNPROCESSABLE_ENTITY),
            (LedgerError::InvalidIndex { index: 9, count: 2 }, StatusCode::NOT_FOUND),
            (LedgerError::AlreadyVoted { voter: who }, StatusCode::CONFLICT),
            (LedgerError::LockPoisoned, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status(), status);
        }
    }

    #[test]
    fn out_of_range_index_reports_invalid_index() {
        let err = ServerError::IndexOutOfRange("-1".into());
        assert_eq!(err.kind(), "InvalidIndex");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn malformed_keeps_its_status() {
        let err = ServerError::malformed("bad cursor");
        assert_eq!(err.kind(), "MalformedRequest");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use open_fund_engine::{FundGatewayError, FundableApiError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingApiKey => StatusCode::UNAUTHORIZED,
                AuthError::InvalidApiKey => StatusCode::FORBIDDEN,
                AuthError::MissingContributorId => StatusCode::UNAUTHORIZED,
            },
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No API key was provided.")]
    MissingApiKey,
    #[error("The provided API key is not valid.")]
    InvalidApiKey,
    #[error("No contributor id was provided.")]
    MissingContributorId,
}

impl From<FundGatewayError> for ServerError {
    fn from(e: FundGatewayError) -> Self {
        match e {
            // Rule violations the caller can correct.
            FundGatewayError::DuplicateTargetName(_) |
            FundGatewayError::TargetClosed(_) |
            FundGatewayError::TargetFunded(_) |
            FundGatewayError::AmountBelowInvested { .. } |
            FundGatewayError::TargetModificationNoOp => Self::InvalidRequestBody(e.to_string()),
            FundGatewayError::TargetNotFound(id) => Self::NoRecordFound(format!("Funding target {id}")),
            FundGatewayError::DatabaseError(_) => Self::BackendError(e.to_string()),
            // A settlement precondition violation is a bug, not a user error.
            FundGatewayError::Allocation(_) => Self::BackendError(e.to_string()),
            FundGatewayError::FundableError(inner) => inner.into(),
        }
    }
}

impl From<FundableApiError> for ServerError {
    fn from(e: FundableApiError) -> Self {
        Self::BackendError(e.to_string())
    }
}

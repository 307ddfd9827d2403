use http::StatusCode;
use thiserror::Error;

/// HTTP result type, T is typically a hyper::Response
/// HttpError is used to generate a synthetic error response
pub(crate) type HttpResult<T> = std::result::Result<T, HttpError>;

/// Describes things that can go wrong while servicing a request
#[derive(Debug, Error, Clone)]
pub enum HttpError {
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("Failed to get response from upstream: {0}")]
    UpstreamUnreachable(String),

    #[error("Failed to rebuild response: {0}")]
    ResponseRebuild(String),

    #[error("Site config read before load()")]
    SiteConfigUnavailable,
}

impl From<HttpError> for StatusCode {
    fn from(e: HttpError) -> StatusCode {
        match e {
            HttpError::InvalidUri(_) => StatusCode::BAD_REQUEST,
            HttpError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            HttpError::ResponseRebuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::SiteConfigUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

use hyper::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Cache config requires a max-age")]
    MissingMaxAge,
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),
    #[error("No provider registered for content type: {0}")]
    NoProvider(String),
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),
    #[error("Provider already registered for content type: {0}")]
    DuplicateProvider(String),
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Network error: {0}")]
    Network(String),
}

impl ApiError {
    /// HTTP status the request layer answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoProvider(_) => StatusCode::NOT_ACCEPTABLE,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidContentType(_) | ApiError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// errors.rs
use crate::sources::SourceError;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, missing resources, etc.) or downstream layers (DB, files).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Lookup failed: {0}")]
    Lookup(#[from] SourceError),

    #[error("Database Error: {0}")]
    DbError(String),

    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),

    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Lookup(SourceError::NotFound(_)) => 404,
            ServerError::Lookup(_) => 502,
            ServerError::DbError(_)
            | ServerError::XlsxError(_)
            | ServerError::Io(_)
            | ServerError::InternalError => 500,
        }
    }
}

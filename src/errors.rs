use astra::Response;
use std::fmt;

/// Errors originating from either the server logic
/// (routing, auth, validation) or downstream layers (DB).
#[derive(Debug)]
pub enum ServerError {
    NotFound,
    /// Malformed request (bad JSON body, missing login fields, ...).
    BadRequest(String),
    /// Required fields missing or out of range; carries the field names.
    Validation(Vec<String>),
    Unauthorized,
    DbError(String),
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::Validation(fields) => {
                write!(f, "Invalid fields: {}", fields.join(", "))
            }
            ServerError::Unauthorized => write!(f, "Unauthorized"),
            ServerError::DbError(msg) => write!(f, "Database Error: {msg}"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}

use astra::{Body, Response, ResponseBuilder};

use crate::errors::ServerError;

/// Convert a ServerError into the JSON error envelope.
/// Storage and internal errors are logged in full but surfaced
/// generically; validation and auth failures are terminal per request.
pub fn error_to_response(err: ServerError) -> Response {
    let (status, error) = match &err {
        ServerError::NotFound => (404, err.to_string()),
        ServerError::BadRequest(_) => (400, err.to_string()),
        ServerError::Validation(_) => (400, err.to_string()),
        ServerError::Unauthorized => (401, err.to_string()),
        ServerError::DbError(msg) => {
            log::error!("storage failure: {msg}");
            (500, "Internal Server Error".to_string())
        }
        ServerError::InternalError => (500, "Internal Server Error".to_string()),
    };

    let body = serde_json::json!({
        "success": false,
        "error": error,
    });

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .header("Cache-Control", "no-store")
        .body(Body::from(body.to_string()))
        .unwrap()
}

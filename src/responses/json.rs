// src/responses/json.rs
//
// Every route answers with the same envelope:
// `{ "success": bool, "data"?, "message"?, "error"? }`.

use astra::{Body, ResponseBuilder};
use serde::Serialize;

use crate::errors::{ResultResp, ServerError};

#[derive(Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Serializes the envelope and builds the response. Mutating routes set
/// `no_store` so intermediate layers never cache them.
pub fn respond<T: Serialize>(status: u16, envelope: &Envelope<T>, no_store: bool) -> ResultResp {
    let body = serde_json::to_string(envelope).map_err(|_| ServerError::InternalError)?;

    let mut builder = ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8");
    if no_store {
        builder = builder.header("Cache-Control", "no-store");
    }

    builder
        .body(Body::from(body))
        .map_err(|_| ServerError::InternalError)
}

/// 200 with data. Read-only routes; cacheable.
pub fn ok<T: Serialize>(data: T) -> ResultResp {
    respond(
        200,
        &Envelope {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        },
        false,
    )
}

/// 200 with data and message, for successful mutations.
pub fn ok_mutation<T: Serialize>(data: T, message: &str) -> ResultResp {
    respond(
        200,
        &Envelope {
            success: true,
            data: Some(data),
            message: Some(message.to_string()),
            error: None,
        },
        true,
    )
}

/// 201 with the created record.
pub fn created<T: Serialize>(data: T, message: &str) -> ResultResp {
    respond(
        201,
        &Envelope {
            success: true,
            data: Some(data),
            message: Some(message.to_string()),
            error: None,
        },
        true,
    )
}

/// 200 with a message only (deletes, logout).
pub fn message(message: &str) -> ResultResp {
    respond(
        200,
        &Envelope::<serde_json::Value> {
            success: true,
            data: None,
            message: Some(message.to_string()),
            error: None,
        },
        true,
    )
}

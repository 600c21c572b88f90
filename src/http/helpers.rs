//! Response builders shared by controllers and middleware.
//!
//! Each function consumes the response and returns the updated one.

use crate::error::Result;
use crate::http::ActionResponse;
use axum::http::{StatusCode, header};
use serde::Serialize;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Replace the body with `data` encoded as JSON and set `status`.
pub fn json<T>(response: ActionResponse, data: &T, status: StatusCode) -> Result<ActionResponse>
where
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec(data)?;
    Ok(response
        .with_header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)?
        .replace_body(body)
        .with_status(status))
}

/// Append raw text to the body and set `status`. The content type is left alone.
pub fn write(response: ActionResponse, text: &str, status: StatusCode) -> ActionResponse {
    response.append_body(text.as_bytes()).with_status(status)
}

/// Point `Location` at `url` with the given redirect status. The URL is not checked.
pub fn redirect(response: ActionResponse, url: &str, status: StatusCode) -> Result<ActionResponse> {
    Ok(response
        .with_header(header::LOCATION, url)?
        .with_status(status))
}

pub fn no_content(response: ActionResponse) -> ActionResponse {
    response.with_status(StatusCode::NO_CONTENT)
}

pub fn bad_request<T>(response: ActionResponse, data: &T) -> Result<ActionResponse>
where
    T: Serialize + ?Sized,
{
    json(response, data, StatusCode::BAD_REQUEST)
}

/// Statuses a redirect may carry without being set explicitly.
pub fn is_redirect_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301..=303 | 307 | 308)
}

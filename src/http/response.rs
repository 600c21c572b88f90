use crate::error::{ActionError, Result};
use axum::{
    body::{Body, Bytes},
    http::{
        HeaderMap, StatusCode,
        header::{self, HeaderName, HeaderValue},
    },
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Response under construction.
///
/// Helpers take it by value and hand it back, so the latest handle is always
/// the one in use. [`finalize`](Self::finalize) consumes it; nothing can
/// touch a response after that.
#[derive(Debug, Clone, Default)]
pub struct ActionResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ActionResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Set a header, replacing previous values.
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Result<Self> {
        let header_value =
            HeaderValue::from_str(value).map_err(|_| ActionError::InvalidHeader {
                header: name.to_string(),
                value: value.to_string(),
            })?;
        self.headers.insert(name, header_value);
        Ok(self)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Parse the body back as JSON.
    pub fn body_json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub(crate) fn replace_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub(crate) fn append_body(mut self, chunk: &[u8]) -> Self {
        self.body.extend_from_slice(chunk);
        self
    }

    /// Turn this into the response handed to the server.
    pub fn finalize(mut self) -> Response {
        if !self.body.is_empty() && !self.headers.contains_key(header::CONTENT_TYPE) {
            self.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            );
        }

        let mut response = Response::new(Body::from(Bytes::from(self.body)));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        self.finalize()
    }
}

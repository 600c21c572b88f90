use crate::http::params::{self, ParamSource, Params};
use axum::{
    body::Bytes,
    http::{
        Extensions, HeaderMap, Method, Request, Uri,
        header::{self, HeaderValue},
        request::Parts,
    },
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Inbound request as seen by middleware and controllers.
///
/// The body is read and parsed once, when the request enters the dispatch
/// layer. Parsing never fails: an unparseable body simply contributes no
/// named parameters while the raw bytes stay available.
#[derive(Debug)]
pub struct ActionRequest {
    id: Uuid,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    path_params: HashMap<String, String>,
    query: HashMap<String, String>,
    parsed_body: Option<Value>,
    raw_body: Bytes,
    attributes: Extensions,
}

impl ActionRequest {
    pub fn new(parts: Parts, body: Bytes) -> Self {
        let query = parts
            .uri
            .query()
            .map(parse_urlencoded)
            .unwrap_or_default();
        let parsed_body = parse_body(&parts.headers, &body);

        Self {
            id: Uuid::new_v4(),
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            path_params: HashMap::new(),
            query,
            parsed_body,
            raw_body: body,
            attributes: parts.extensions,
        }
    }

    /// Build from a request whose body has already been collected.
    pub fn from_request(request: Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts, body)
    }

    pub fn with_path_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.path_params = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// Lowercased media type of the `Content-Type` header, without parameters.
    pub fn media_type(&self) -> Option<String> {
        self.content_type().map(media_type_of)
    }

    pub fn is_json(&self) -> bool {
        self.media_type().is_some_and(|media| is_json_media_type(&media))
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    pub fn path_params(&self) -> &HashMap<String, String> {
        &self.path_params
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query
    }

    /// Body field by name, when the body was a JSON object or a form.
    pub fn body_param(&self, name: &str) -> Option<&Value> {
        self.parsed_body
            .as_ref()
            .and_then(Value::as_object)
            .and_then(|fields| fields.get(name))
    }

    pub fn parsed_body(&self) -> Option<&Value> {
        self.parsed_body.as_ref()
    }

    pub fn raw_body(&self) -> &Bytes {
        &self.raw_body
    }

    /// Single parameter lookup; absent keys yield `Value::Null`.
    pub fn param(&self, name: &str) -> Value {
        params::lookup(self, name)
            .map(|(_, value)| value)
            .unwrap_or(Value::Null)
    }

    /// Where `name` would be read from, if it is present at all.
    pub fn param_source(&self, name: &str) -> Option<ParamSource> {
        params::lookup(self, name).map(|(source, _)| source)
    }

    pub fn params<I, S>(&self, names: I) -> Params
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        params::extract(self, names)
    }

    pub fn attribute<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.attributes.get::<T>()
    }

    /// Attach a value for inner middleware and the handler to read.
    pub fn set_attribute<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.attributes.insert(value)
    }

    pub fn attributes(&self) -> &Extensions {
        &self.attributes
    }
}

pub(crate) fn media_type_of(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub(crate) fn is_json_media_type(media: &str) -> bool {
    media == "application/json" || (media.starts_with("application/") && media.ends_with("+json"))
}

fn parse_urlencoded(input: &str) -> HashMap<String, String> {
    // Later duplicates overwrite earlier ones.
    serde_urlencoded::from_str::<Vec<(String, String)>>(input)
        .unwrap_or_default()
        .into_iter()
        .collect()
}

fn parse_body(headers: &HeaderMap, body: &Bytes) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    let media = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(media_type_of)?;

    if is_json_media_type(&media) {
        serde_json::from_slice(body).ok()
    } else if media == "application/x-www-form-urlencoded" {
        let text = std::str::from_utf8(body).ok()?;
        let fields: Map<String, Value> = parse_urlencoded(text)
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        Some(Value::Object(fields))
    } else {
        None
    }
}

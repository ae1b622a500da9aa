use bytes::Bytes;
use std::collections::HashMap;

/// HTTP request as seen by the binding pipeline
///
/// The body is already buffered; the value is threaded explicitly through
/// decode, bind and dispatch instead of living in a per-request global.
#[derive(Debug, Clone)]
pub struct Request {
    method: http::Method,
    uri: http::Uri,
    headers: http::HeaderMap,
    params: HashMap<String, String>,
    body: Bytes,
}

impl Request {
    pub fn new(method: http::Method, uri: http::Uri, headers: http::HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            params: HashMap::new(),
            body,
        }
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Get the request method
    pub fn method(&self) -> &http::Method {
        &self.method
    }

    /// Get the request path
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Get a route parameter by name (e.g., /node/{node_id})
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    /// Get all route parameters
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }

    /// Get a header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the Content-Type header
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// The buffered request body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Split the request into the parts the binder needs
    pub fn into_parts(self) -> (RequestParts, Bytes) {
        let content_type = self.content_type().map(|s| s.to_string());
        (
            RequestParts {
                params: self.params,
                content_type,
            },
            self.body,
        )
    }
}

/// Request parts after body has been separated
///
/// Contains metadata needed for body decoding without the body itself.
#[derive(Debug, Clone)]
pub struct RequestParts {
    pub params: HashMap<String, String>,
    pub content_type: Option<String>,
}

use bytes::Bytes;
use http_body_util::Full;

/// HTTP response built by handlers or by the normalizer
///
/// Returning an `HttpResponse` from a handler bypasses normalization: status,
/// headers and body are emitted exactly as given.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    status: u16,
    body: String,
    headers: Vec<(String, String)>,
}

impl HttpResponse {
    pub fn new() -> Self {
        Self {
            status: 200,
            body: String::new(),
            headers: Vec::new(),
        }
    }

    /// Create a response with a string body
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            headers: vec![("Content-Type".to_string(), "text/plain; charset=utf-8".to_string())],
        }
    }

    /// Create a JSON response from a serde_json::Value
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }

    /// Set the HTTP status code
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Add a header to the response
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of the header `name` (case-insensitive)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Convert to hyper response
    ///
    /// A status or header hyper refuses degrades to a bare 500.
    pub fn into_hyper(self) -> hyper::Response<Full<Bytes>> {
        let mut builder = hyper::Response::builder().status(self.status);

        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }

        match builder.body(Full::new(Bytes::from(self.body))) {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "Handler produced an unrepresentable response");
                let mut fallback = hyper::Response::new(Full::new(Bytes::new()));
                *fallback.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            }
        }
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_ignores_case() {
        let response = HttpResponse::text("hi").header("X-Trace", "abc");

        assert_eq!(response.header_value("content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(response.header_value("x-trace"), Some("abc"));
        assert_eq!(response.header_value("missing"), None);
    }

    #[test]
    fn test_invalid_status_degrades_to_500() {
        let response = HttpResponse::text("nope").status(1000).into_hyper();
        assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_hyper_keeps_status_and_headers() {
        let response = HttpResponse::json(serde_json::json!({"ok": true}))
            .status(201)
            .into_hyper();

        assert_eq!(response.status(), http::StatusCode::CREATED);
        assert_eq!(
            response.headers().get("content-type").and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }
}

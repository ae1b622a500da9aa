use crate::http::{HttpResponse, Request};
use crate::routing::Router;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;

/// In-process client for a [`Router`]
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn request(&self, method: Method, uri: &str) -> TestRequest<'_> {
        TestRequest {
            router: &self.router,
            method,
            uri: uri.to_string(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn get(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::GET, uri)
    }

    pub fn post(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::POST, uri)
    }

    pub fn put(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::PUT, uri)
    }

    pub fn patch(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::PATCH, uri)
    }

    pub fn delete(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::DELETE, uri)
    }
}

/// A request being built by a [`TestClient`]
///
/// Builder methods panic on invalid input; this type is for tests only.
pub struct TestRequest<'a> {
    router: &'a Router,
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Bytes,
}

impl<'a> TestRequest<'a> {
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        let value = HeaderValue::from_str(value)
            .unwrap_or_else(|e| panic!("invalid header value for {}: {}", name, e));
        self.headers.insert(name, value);
        self
    }

    /// Raw body with an explicit content type
    pub fn body(self, content_type: &str, body: impl Into<Bytes>) -> Self {
        let mut request = self.header("content-type", content_type);
        request.body = body.into();
        request
    }

    /// JSON body
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Self {
        let body = serde_json::to_vec(value)
            .unwrap_or_else(|e| panic!("test body is not serializable: {}", e));
        self.body("application/json", body)
    }

    /// Form-encoded body
    pub fn form<T: Serialize + ?Sized>(self, value: &T) -> Self {
        let body = serde_urlencoded::to_string(value)
            .unwrap_or_else(|e| panic!("test form is not encodable: {}", e));
        self.body("application/x-www-form-urlencoded", body)
    }

    pub async fn send(self) -> TestResponse {
        let uri: http::Uri = self
            .uri
            .parse()
            .unwrap_or_else(|e| panic!("invalid test uri {}: {}", self.uri, e));
        let request = Request::new(self.method, uri, self.headers, self.body);
        TestResponse::from(self.router.dispatch(request).await)
    }
}

/// A response captured by a [`TestClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct TestResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    /// Parse the body as JSON, panicking if it is not
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("response body is not JSON ({}): {:?}", e, self.body))
    }
}

impl From<HttpResponse> for TestResponse {
    fn from(response: HttpResponse) -> Self {
        Self {
            status: response.status_code(),
            headers: response.headers().to_vec(),
            body: response.body().to_string(),
        }
    }
}

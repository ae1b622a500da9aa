//! Testing utilities
//!
//! [`TestClient`] drives a [`Router`](crate::Router) in-process, without a
//! socket, so route tests read like requests against a running server.
//!
//! # Example
//!
//! ```rust,ignore
//! use bindkit::testing::TestClient;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn creates_model() {
//!     let client = TestClient::new(app::router());
//!     let response = client.post("/model").json(&json!({"name": "Foo"})).send().await;
//!
//!     assert_eq!(response.status, 201);
//!     assert_eq!(response.json(), json!({"id": 1, "name": "Foo"}));
//! }
//! ```

mod client;

pub use client::{TestClient, TestRequest, TestResponse};

//! Body collection for incoming hyper requests
//!
//! The server buffers the whole body before dispatch so the rest of the
//! pipeline works on plain bytes.

use crate::error::FrameworkError;
use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;

/// Collect the full body from an Incoming stream, refusing more than `limit` bytes
pub async fn collect_body(body: Incoming, limit: usize) -> Result<Bytes, FrameworkError> {
    Limited::new(body, limit)
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|e| {
            if e.downcast_ref::<http_body_util::LengthLimitError>().is_some() {
                FrameworkError::PayloadTooLarge
            } else {
                FrameworkError::internal(format!("Failed to read request body: {}", e))
            }
        })
}

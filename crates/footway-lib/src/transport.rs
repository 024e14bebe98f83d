//! The network seam: posting bounding boxes and receiving ways

use crate::{WaysRequest, WaysResponse};
use std::future::Future;

/// Failure to obtain a well-formed response from the ways endpoint
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("server answered with HTTP {0}")]
    HttpStatus(u16),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Posts a [`WaysRequest`] and yields the decoded response.
///
/// Implementations must not retry; a failed fetch is recovered by the next
/// viewport change.
pub trait WaysTransport {
    fn fetch_ways(
        &self,
        request: &WaysRequest,
    ) -> impl Future<Output = Result<WaysResponse, TransportError>> + Send;
}

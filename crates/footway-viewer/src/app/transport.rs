//! HTTP transport for the ways endpoint

use footway_lib::{TransportError, WaysRequest, WaysResponse, WaysTransport};
use std::future::Future;
use std::time::Duration;

/// Posts requests to `<server>/ways` with reqwest
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(server_url: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| TransportError::Request(format!("http client init failed: {e}")))?;
        Ok(Self {
            client,
            url: ways_url(server_url),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn ways_url(server_url: &str) -> String {
    format!("{}/ways", server_url.trim_end_matches('/'))
}

impl WaysTransport for HttpTransport {
    fn fetch_ways(
        &self,
        request: &WaysRequest,
    ) -> impl Future<Output = Result<WaysResponse, TransportError>> + Send {
        let client = self.client.clone();
        let url = self.url.clone();
        let request = request.clone();

        async move {
            let response = client
                .post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|e| TransportError::Request(format!("{url}: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::HttpStatus(status.as_u16()));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError::Request(format!("{url}: response read failed: {e}")))?;
            Ok(serde_json::from_slice(&body)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ways_url() {
        assert_eq!(ways_url("http://localhost:8082"), "http://localhost:8082/ways");
        assert_eq!(ways_url("https://example.org/api/"), "https://example.org/api/ways");
    }

    #[test]
    fn test_new_transport() {
        let transport = HttpTransport::new("http://localhost:8082/").unwrap();
        assert_eq!(transport.url(), "http://localhost:8082/ways");
    }
}

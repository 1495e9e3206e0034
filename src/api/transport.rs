//! HTTP transport used by the request executor

use reqwest::blocking::Client;

use super::ApiError;

/// Status code and body of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a blocking `GET` request
///
/// Implementations must return `Err` only when no response was received
/// (connection refused, DNS failure, TLS errors, ...). Any response that made
/// it back, whatever its status, is returned as `Ok(RawResponse)` so the
/// executor can read the error the API put in the body.
pub trait Transport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, ApiError>;
}

/// [`Transport`] backed by a blocking reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport that bypasses any system proxy
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder().no_proxy().build()?;
        Ok(Self { client })
    }

    /// Creates a transport with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, ApiError> {
        let response = self.client.get(url).query(query).send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?;
        Ok(RawResponse::new(status, body.to_vec()))
    }
}

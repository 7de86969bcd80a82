//! Transport backed by the hyper legacy client.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use super::{box_body, BoxError, OutboundRequest, Transport, TransportResponse};

/// Pooled HTTP/1.1 + HTTP/2 client over plain TCP.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HyperTransport {
    /// Build a transport with a default connection pool.
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new())
            .build(HttpConnector::new());
        Self::from_client(client)
    }

    /// Wrap an already configured hyper client.
    pub fn from_client(client: Client<HttpConnector, Full<Bytes>>) -> Self {
        Self { client }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn round_trip(&self, request: OutboundRequest) -> Result<TransportResponse, BoxError> {
        let response = self.client.request(request).await?;
        Ok(response.map(box_body))
    }
}

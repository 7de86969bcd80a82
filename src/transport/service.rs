//! Adapter turning a `tower::Service` into a [`Transport`].
//!
//! Lets callers stack tower middleware in front of their own client, or
//! hand in a `tower::service_fn` closure as a test double.

use async_trait::async_trait;
use bytes::Bytes;
use tower::{Service, ServiceExt};

use super::{box_body, BoxError, OutboundRequest, Transport, TransportResponse};

#[derive(Debug, Clone)]
pub struct ServiceTransport<S> {
    inner: S,
}

impl<S> ServiceTransport<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[async_trait]
impl<S, B> Transport for ServiceTransport<S>
where
    S: Service<OutboundRequest, Response = http::Response<B>> + Clone + Send + Sync + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send,
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    async fn round_trip(&self, request: OutboundRequest) -> Result<TransportResponse, BoxError> {
        // A fresh clone per call so one slow `poll_ready` never stalls other workers.
        let response = self.inner.clone().oneshot(request).await.map_err(Into::into)?;
        Ok(response.map(box_body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{BodyExt, Full};
    use std::convert::Infallible;

    #[tokio::test]
    async fn service_fn_is_a_transport() {
        let transport = ServiceTransport::new(tower::service_fn(|req: OutboundRequest| async move {
            let path = req.uri().path().to_string();
            Ok::<_, Infallible>(http::Response::new(Full::new(Bytes::from(path))))
        }));

        let request = http::Request::get("http://svc/echo")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = transport.round_trip(request).await.unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from_static(b"/echo"));
    }

    #[tokio::test]
    async fn service_errors_surface_as_box_errors() {
        let transport = ServiceTransport::new(tower::service_fn(|_req: OutboundRequest| async move {
            Err::<http::Response<Full<Bytes>>, _>(std::io::Error::other("refused"))
        }));

        let request = http::Request::get("http://svc/")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let err = transport.round_trip(request).await.unwrap_err();
        assert_eq!(err.to_string(), "refused");
    }
}

//! Transport seam: the capability that performs one request/response exchange.
//!
//! # Data Flow
//! ```text
//! execution worker
//!     → Transport::round_trip (hyper client, tower service, test double)
//!     → http::Response<TransportBody> (live, connection-backed body)
//!     → post-processing buffers it and drops the live body
//! ```
//!
//! # Design Decisions
//! - Transport errors cross the seam type-erased as `BoxError`
//! - Response bodies are boxed so any `hyper::body::Body` can be returned
//! - Dropping a `TransportBody` releases its connection

pub mod hyper_client;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{combinators::UnsyncBoxBody, BodyExt, Full};

pub use hyper_client::HyperTransport;
pub use self::service::ServiceTransport;

/// Type-erased error returned by transports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A fully built request as supplied by the caller.
pub type OutboundRequest = http::Request<Full<Bytes>>;

/// A live response body still tied to the transport.
pub type TransportBody = UnsyncBoxBody<Bytes, BoxError>;

/// Response as handed back by a transport.
pub type TransportResponse = http::Response<TransportBody>;

/// Executes exactly one request and produces one response or an error.
///
/// The batch's `CancellationToken` is present in the request extensions;
/// transports may watch it, although the execution stage also abandons the
/// call once the token fires.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn round_trip(&self, request: OutboundRequest) -> Result<TransportResponse, BoxError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn round_trip(&self, request: OutboundRequest) -> Result<TransportResponse, BoxError> {
        (**self).round_trip(request).await
    }
}

/// Box any byte body into a [`TransportBody`].
pub fn box_body<B>(body: B) -> TransportBody
where
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    body.map_err(Into::into).boxed_unsync()
}

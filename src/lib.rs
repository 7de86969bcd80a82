//! Bulk HTTP client library.
//!
//! Sends a batch of independent requests concurrently through a pluggable
//! [`Transport`], under one deadline for the whole batch, and returns a
//! response or an error for every request in the caller's original order.
//!
//! ```no_run
//! # async fn demo() -> Result<(), bulk_http_client::BulkError> {
//! use std::time::Duration;
//! use bulk_http_client::{BulkClient, HyperTransport, RoundTrip};
//! use bytes::Bytes;
//! use http_body_util::Full;
//!
//! let client = BulkClient::new(HyperTransport::new(), Duration::from_secs(2));
//! let mut batch = RoundTrip::new();
//! for id in 0..3 {
//!     let request = http::Request::get(format!("http://127.0.0.1:8080/items/{id}"))
//!         .body(Full::new(Bytes::new()))
//!         .expect("valid request");
//!     batch.add_request(request);
//! }
//!
//! let (responses, errors) = client.execute(&mut batch).await?;
//! for (response, error) in responses.iter().zip(errors) {
//!     match (response, error) {
//!         (Some(response), _) => println!("{}", response.status_line()),
//!         (_, Some(error)) => println!("{error}"),
//!         _ => unreachable!(),
//!     }
//! }
//! batch.close_all_responses();
//! # Ok(())
//! # }
//! ```

// Core subsystems
pub mod batch;
pub mod client;
pub mod pipeline;
pub mod transport;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use batch::{BufferedResponse, RequestHead, RoundTrip};
pub use client::{BulkClient, BulkError};
pub use config::ClientConfig;
pub use transport::{BoxError, HyperTransport, OutboundRequest, ServiceTransport, Transport};

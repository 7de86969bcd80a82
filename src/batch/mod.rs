//! Batch subsystem.
//!
//! # Data Flow
//! ```text
//! caller
//!     → RoundTrip::add_request (ordered, unvalidated)
//!     → BulkClient::execute (dispatcher writes results by index)
//!     → responses()/errors() (index-aligned, mutually exclusive)
//!     → close_all_responses (release buffered bodies)
//! ```

pub mod response;
pub mod round_trip;

pub use response::{BufferedResponse, RequestHead};
pub use round_trip::RoundTrip;

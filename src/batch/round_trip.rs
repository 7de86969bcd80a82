//! The batch: requests plus index-aligned responses and errors.

use crate::batch::response::BufferedResponse;
use crate::client::types::BulkError;
use crate::transport::OutboundRequest;

/// An ordered set of requests dispatched together under one deadline.
///
/// After a call to [`BulkClient::execute`](crate::BulkClient::execute), every
/// index holds exactly one of a response or an error.
#[derive(Debug, Default)]
pub struct RoundTrip {
    requests: Vec<OutboundRequest>,
    responses: Vec<Option<BufferedResponse>>,
    errors: Vec<Option<BulkError>>,
}

impl RoundTrip {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request. Contents are not validated.
    pub fn add_request(&mut self, request: OutboundRequest) -> &mut Self {
        self.requests.push(request);
        self
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[OutboundRequest] {
        &self.requests
    }

    pub fn responses(&self) -> &[Option<BufferedResponse>] {
        &self.responses
    }

    pub fn errors(&self) -> &[Option<BulkError>] {
        &self.errors
    }

    /// True once every index carries exactly one of a response or an error.
    pub fn is_finalized(&self) -> bool {
        self.responses.len() == self.requests.len()
            && self.errors.len() == self.requests.len()
            && self
                .responses
                .iter()
                .zip(&self.errors)
                .all(|(response, error)| response.is_some() != error.is_some())
    }

    /// Release every buffered response. Safe to call repeatedly.
    pub fn close_all_responses(&mut self) {
        for response in self.responses.iter_mut().flatten() {
            response.close();
        }
    }

    /// Reset result slots to `len()` empty entries before a dispatch.
    pub(crate) fn reset_results(&mut self) {
        let n = self.requests.len();
        self.responses.clear();
        self.responses.resize_with(n, || None);
        self.errors.clear();
        self.errors.resize(n, None);
    }

    pub(crate) fn update_response_for_index(&mut self, response: BufferedResponse, index: usize) -> &mut Self {
        self.responses[index] = Some(response);
        self.errors[index] = None;
        self
    }

    pub(crate) fn update_error_for_index(&mut self, error: BulkError, index: usize) -> &mut Self {
        self.errors[index] = Some(error);
        self.responses[index] = None;
        self
    }

    /// Mark every untouched index as ignored; returns how many were marked.
    pub(crate) fn add_request_ignored_errors(&mut self) -> usize {
        let mut ignored = 0;
        for (response, error) in self.responses.iter().zip(self.errors.iter_mut()) {
            if response.is_none() && error.is_none() {
                *error = Some(BulkError::RequestIgnored);
                ignored += 1;
            }
        }
        ignored
    }

    /// Copy of the request at `index` for dispatch, leaving the batch intact.
    ///
    /// Extensions are not copied; the dispatcher attaches its own.
    pub(crate) fn dispatch_copy(&self, index: usize) -> OutboundRequest {
        let original = &self.requests[index];
        let mut copy = http::Request::new(original.body().clone());
        *copy.method_mut() = original.method().clone();
        *copy.uri_mut() = original.uri().clone();
        *copy.version_mut() = original.version();
        *copy.headers_mut() = original.headers().clone();
        copy
    }
}

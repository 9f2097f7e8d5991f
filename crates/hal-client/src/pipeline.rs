//! # Execution Pipeline
//!
//! Turns one HTTP call into the next navigation state:
//!
//! 1. Send the [`Request`] through the state's transport.
//! 2. Reject any non-2xx status with [`HalError::HttpRequestFailed`]. Nothing is
//!    retried here.
//! 3. Decode the body with the codec matching its content type, or use an empty
//!    resource when there is no body.
//! 4. Return a new [`Navigator`] whose `current` is that single resource.
//!
//! This is the only place the navigator suspends. The blocking adapter drives the
//! same future to completion instead of having its own code path.

use crate::error::HalError;
use crate::model::Resource;
use crate::navigator::Navigator;
use crate::transport::{HttpResponse, Payload, Transport};
use tracing::{debug, info, warn};

/// One HTTP call, verb plus optional payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Get,
    Post(Payload),
    Put(Payload),
    Patch(Payload),
    Delete,
}

impl Request {
    pub fn method(&self) -> &'static str {
        match self {
            Request::Get => "GET",
            Request::Post(_) => "POST",
            Request::Put(_) => "PUT",
            Request::Patch(_) => "PATCH",
            Request::Delete => "DELETE",
        }
    }

    /// Issues exactly one call against `uri`.
    pub async fn send(self, transport: &dyn Transport, uri: &str) -> Result<HttpResponse, HalError> {
        match self {
            Request::Get => transport.get(uri).await,
            Request::Post(payload) => transport.post(uri, payload).await,
            Request::Put(payload) => transport.put(uri, payload).await,
            Request::Patch(payload) => transport.patch(uri, payload).await,
            Request::Delete => transport.delete(uri).await,
        }
    }
}

/// Runs `request` against `uri` and wraps the decoded response in a new state
/// sharing `navigator`'s transport and codecs.
pub async fn execute(navigator: &Navigator, uri: &str, request: Request) -> Result<Navigator, HalError> {
    let method = request.method();
    debug!(method, uri, "Sending request");

    let response = request.send(navigator.transport().as_ref(), uri).await?;

    if !response.is_success() {
        warn!(method, uri, status = response.status, "Request failed");
        return Err(HalError::HttpRequestFailed {
            status: response.status,
        });
    }

    let resource = match response.body.as_deref() {
        Some(body) if !body.is_empty() => navigator
            .codecs()
            .for_content_type(response.content_type())
            .decode(body)?,
        _ => Resource::empty(),
    };

    info!(method, uri, status = response.status, "Navigated");
    Ok(navigator.with_current(vec![resource]))
}

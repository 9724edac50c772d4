//! Ticket API client.
//!
//! The board only ever talks to the backend through [`TicketApi`]. The
//! reqwest implementation lives in [`http`]; tests substitute their own.

pub mod http;

use std::future::Future;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::transition::TicketOperation;
use crate::transition::plan::GENERIC_FAILURE_MESSAGE;
use crate::types::Ticket;

pub use http::HttpTicketApi;

/// Why a backend call did not succeed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiFailure {
    /// The request never produced an HTTP response
    #[error("network error: {detail}")]
    Network { detail: String },

    /// The server answered with a non-2xx status
    #[error("server rejected request ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },

    /// A 2xx response whose body could not be decoded
    #[error("unexpected response: {detail}")]
    Decode { detail: String },
}

impl ApiFailure {
    /// Message suitable for showing to the actor
    pub fn user_message(&self) -> String {
        match self {
            ApiFailure::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiFailure::Decode {
                detail: err.to_string(),
            }
        } else {
            ApiFailure::Network {
                detail: err.to_string(),
            }
        }
    }
}

/// Error payload shape returned by the API
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

/// Pull a human-readable message out of an error response body.
///
/// Looks at `detail` first, then `message`, and returns the first one that
/// is a non-blank string. Anything else yields `None`.
pub fn extract_error_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    [parsed.detail, parsed.message]
        .into_iter()
        .flatten()
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
}

/// JSON body to send with a transition operation.
///
/// Only approve and reject carry a body. Approve omits the reason when none
/// was given.
pub fn transition_body(operation: TicketOperation, reason: Option<&str>) -> Option<Value> {
    match operation {
        TicketOperation::Approve => Some(match reason {
            Some(reason) => json!({ "reason": reason }),
            None => json!({}),
        }),
        TicketOperation::Reject => Some(json!({ "reason": reason.unwrap_or_default() })),
        TicketOperation::StartWork | TicketOperation::FinishWork | TicketOperation::OpenTicket => {
            None
        }
    }
}

/// `GET /tickets/` may return a bare array or a paginated envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TicketListResponse {
    Plain(Vec<Ticket>),
    Paginated {
        results: Vec<Ticket>,
        #[serde(default)]
        next: Option<String>,
    },
}

/// The consumed Ticket API
pub trait TicketApi: Send + Sync {
    /// Fetch the canonical ticket list
    fn list_tickets(&self) -> impl Future<Output = Result<Vec<Ticket>, ApiFailure>> + Send;

    /// Perform a transition operation on a ticket.
    ///
    /// Returns the updated ticket when the server sends one back.
    fn perform(
        &self,
        ticket_id: u64,
        operation: TicketOperation,
        reason: Option<&str>,
    ) -> impl Future<Output = Result<Option<Ticket>, ApiFailure>> + Send;
}

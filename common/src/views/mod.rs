//! Output views returned by the dashboard's list endpoints.

use serde::{Deserialize, Serialize};

use crate::params::PageToken;

mod history;
pub use history::*;

mod member;
pub use member::*;

mod status;
pub use status::*;

/// One page of a paginated list, in the order the server returned it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,

    /// The token to send when asking for the page after this one.
    pub next_token: PageToken,
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>, next_token: impl Into<PageToken>) -> Self {
        Self {
            items,
            next_token: next_token.into(),
        }
    }

    /// An empty page marks the end of the list for the query that produced
    /// it.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Outcome reported in the `status` field of most backend response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ResponseStatus {
    #[serde(rename = "MALFORMED")]
    Malformed,

    #[serde(rename = "UNEXPECTED")]
    Unexpected,

    #[serde(rename = "SUCCESS")]
    Success,

    #[serde(rename = "QUEUED")]
    Queued,

    #[serde(rename = "ACCESS_DENIED")]
    AccessDenied,
}

impl ResponseStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success | Self::Queued)
    }
}

/// Body the backend sends when it accepted a request but could not fulfil
/// it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FailureResponse {
    pub status: ResponseStatus,

    #[serde(default)]
    pub reason: Option<String>,
}

/// An error response for an API endpoint. This is used to return errors to the
/// client in a consistent format.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorResponse {
    /// An optional error code that can be used to identify the type of error
    /// that occurred.
    #[serde(default)]
    pub code: Option<String>,

    /// A human-readable message describing the error that occurred.
    #[serde(alias = "detail")]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

use std::time::Duration;

use sentinel_common::views::{ApiErrorResponse, ResponseStatus};
use thiserror::Error;

/// Everything that can go wrong while fetching a page.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("API error ({status}): {}", .body.message)]
    Api { status: u16, body: ApiErrorResponse },

    #[error("Unexpected response status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Request rejected ({status:?}): {}", .reason.as_deref().unwrap_or("no reason given"))]
    Rejected {
        status: ResponseStatus,
        reason: Option<String>,
    },

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response body is missing the `{field}` field")]
    MissingField { field: String },
}

/// The two broad failure classes. Both are handled identically today; the
/// split exists for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The backend could not be reached or did not answer in time.
    Transport,

    /// The backend answered, but not with a usable page.
    Application,
}

impl SyncError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) | Self::Timeout { .. } => FailureKind::Transport,
            Self::Api { .. }
            | Self::UnexpectedStatus { .. }
            | Self::Rejected { .. }
            | Self::Decode(_)
            | Self::MissingField { .. } => FailureKind::Application,
        }
    }

    /// Short text suitable for showing to the person who triggered the
    /// request.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { body, .. } => body.message.clone(),
            Self::Rejected {
                reason: Some(reason),
                ..
            } => reason.clone(),
            Self::Timeout { .. } => "The server took too long to respond.".into(),
            _ => self.to_string(),
        }
    }
}

use std::{fmt, io::Write};

use sentinel_common::params::PageToken;
use tracing::error;

use crate::{controller::Operation, error::SyncError};

/// What was being attempted when a request failed.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureContext {
    /// Name of the list view the controller drives.
    pub list: String,
    pub operation: Operation,
    pub filter: Option<String>,
    pub pagination_token: PageToken,
    pub limit: u64,
}

impl fmt::Display for FailureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (filter: {}, token: {}, limit: {})",
            self.list,
            self.operation,
            self.filter.as_deref().unwrap_or("none"),
            self.pagination_token,
            self.limit
        )
    }
}

/// Single destination for every failed list request.
///
/// Implementations must tell the user, record diagnostics, and must not
/// panic. They do not retry.
pub trait FailureSink: Send + Sync {
    fn on_failure(&self, context: &FailureContext, error: &SyncError);
}

type Notifier = Box<dyn Fn(&str) + Send + Sync>;

/// Logs the failure through `tracing` and shows the user a one-line notice,
/// on stderr unless another notifier is supplied.
pub struct ConsoleFailureSink {
    notify: Notifier,
}

impl ConsoleFailureSink {
    pub fn new() -> Self {
        Self::with_notifier(|message| {
            let _ = writeln!(std::io::stderr().lock(), "{message}");
        })
    }

    pub fn with_notifier(notify: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            notify: Box::new(notify),
        }
    }

    pub fn notice(error: &SyncError) -> String {
        format!(
            "[Error] Failed to communicate with backend services: {}",
            error.user_message()
        )
    }
}

impl Default for ConsoleFailureSink {
    fn default() -> Self {
        Self::new()
    }
}

impl FailureSink for ConsoleFailureSink {
    fn on_failure(&self, context: &FailureContext, error: &SyncError) {
        error!(
            list = %context.list,
            operation = %context.operation,
            filter = context.filter.as_deref().unwrap_or(""),
            pagination_token = %context.pagination_token,
            limit = context.limit,
            kind = ?error.kind(),
            error = %error,
            "list request failed"
        );

        (self.notify)(&Self::notice(error));
    }
}

#[cfg(test)]
mod test {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use super::*;

    fn context() -> FailureContext {
        FailureContext {
            list: "community-members".into(),
            operation: Operation::LoadMore,
            filter: Some("jo".into()),
            pagination_token: "abc".into(),
            limit: 300,
        }
    }

    #[test]
    fn notifies_user_once_per_failure() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();
        let sink = ConsoleFailureSink::with_notifier(move |m| {
            captured.lock().unwrap().push(m.to_string());
        });

        sink.on_failure(
            &context(),
            &SyncError::Timeout {
                after: Duration::from_secs(30),
            },
        );

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                "[Error] Failed to communicate with backend services: The server took too long to respond."
                    .to_string()
            ]
        );
    }

    #[test]
    fn context_renders_for_diagnostics() {
        assert_eq!(
            context().to_string(),
            "community-members load_more (filter: jo, token: \"abc\", limit: 300)"
        );
    }
}

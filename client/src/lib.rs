//! Client for the Sentinel admin dashboard's paginated list endpoints.
//!
//! A [`ListSyncController`] drives one list view: it owns the view's
//! [`PaginationCursor`], fetches pages from a [`PageSource`] (normally an
//! HTTP [`Endpoint`]), keeps the rendered rows in sync and routes every
//! failure to a single [`FailureSink`].

pub mod client;
pub mod config;
pub mod controller;
pub mod cursor;
pub mod error;
pub mod failure;
pub mod lists;
pub mod source;
pub mod view;

pub use client::{ApiClient, ApiClientError};
pub use config::{ClientConfig, ListLimits};
pub use controller::{ListSnapshot, ListSyncController, Operation, SyncOutcome};
pub use cursor::{ListQuery, PaginationCursor};
pub use error::{FailureKind, SyncError};
pub use failure::{ConsoleFailureSink, FailureContext, FailureSink};
pub use lists::DashboardList;
pub use source::{Endpoint, PageSource};
pub use view::ListView;

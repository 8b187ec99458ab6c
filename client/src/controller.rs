use std::{fmt, num::NonZeroU64, sync::Arc, time::Duration};

use sentinel_common::{
    params::{ListParams, PageToken},
    views::ListPage,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    cursor::{ListQuery, PaginationCursor},
    error::SyncError,
    failure::{FailureContext, FailureSink},
    source::PageSource,
    view::ListView,
};

/// Page size used by [`ListSyncController::load_all`] unless configured
/// otherwise. Assumes the backend never silently truncates a page below
/// this many rows.
pub const DEFAULT_LOAD_ALL_LIMIT: NonZeroU64 = NonZeroU64::new(10_000).unwrap();

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadInitial,
    LoadMore,
    LoadAll,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LoadInitial => "load_initial",
            Self::LoadMore => "load_more",
            Self::LoadAll => "load_all",
        })
    }
}

/// What a successful controller call did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The fetched page was rendered.
    Applied {
        /// Rows in the fetched page.
        received: usize,
        /// Rows in the list afterwards.
        total: usize,
        /// Whether "load more" is armed afterwards.
        load_more: bool,
    },

    /// "Load more" is not armed, so no request was made.
    Disarmed,

    /// The response belonged to a query that has since been replaced and
    /// was dropped without touching the list.
    Superseded,
}

/// Point-in-time copy of a controller's list state.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot<T> {
    pub items: Vec<T>,
    pub filter: Option<String>,
    pub pagination_token: PageToken,
    pub load_more_armed: bool,
}

struct SyncState<T> {
    query: ListQuery,
    items: Vec<T>,
    load_more_armed: bool,
    /// Bumped whenever a new query starts; responses carrying an older
    /// generation are discarded.
    generation: u64,
    /// Bumped whenever a reload replaces the list.
    epoch: u64,
    view: Box<dyn ListView<T>>,
}

/// A request that has been issued but not yet applied.
struct Pending {
    operation: Operation,
    generation: u64,
    /// The list a "load more" extends.
    epoch: u64,
    query: ListQuery,
    params: ListParams,
}

/// Drives one paginated list: initial load, "load more", and the
/// single-shot full dump used for exports.
///
/// The state lock is only held between awaits, never across a fetch, so
/// calls may overlap. A response is applied only if its query is still the
/// current one; anything else is dropped as [`SyncOutcome::Superseded`].
pub struct ListSyncController<S: PageSource> {
    name: String,
    source: S,
    sink: Arc<dyn FailureSink>,
    timeout: Duration,
    load_all_limit: NonZeroU64,
    state: Mutex<SyncState<S::Item>>,
}

impl<S: PageSource> ListSyncController<S> {
    pub fn new(
        name: impl Into<String>,
        source: S,
        limit: NonZeroU64,
        sink: Arc<dyn FailureSink>,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            sink,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            load_all_limit: DEFAULT_LOAD_ALL_LIMIT,
            state: Mutex::new(SyncState {
                query: ListQuery::new(limit),
                items: Vec::new(),
                load_more_armed: false,
                generation: 0,
                epoch: 0,
                view: Box::new(()),
            }),
        }
    }

    pub fn with_view(mut self, view: impl ListView<S::Item> + 'static) -> Self {
        self.state.get_mut().view = Box::new(view);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_load_all_limit(mut self, limit: NonZeroU64) -> Self {
        self.load_all_limit = limit;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Restart the list under `filter` and render its first page in place
    /// of whatever was shown before.
    #[tracing::instrument(skip(self), fields(list = %self.name))]
    pub async fn load_initial(&self, filter: Option<String>) -> Result<SyncOutcome, SyncError> {
        let pending = self.begin_query(Operation::LoadInitial, filter, None).await;
        let result = self.fetch(&pending.params).await;
        self.finish(pending, result).await
    }

    /// Fetch the page after the last one shown and append it.
    #[tracing::instrument(skip(self), fields(list = %self.name))]
    pub async fn load_more(&self) -> Result<SyncOutcome, SyncError> {
        let pending = {
            let state = self.state.lock().await;
            if !state.load_more_armed {
                debug!("load more is disarmed, skipping request");
                return Ok(SyncOutcome::Disarmed);
            }

            Pending {
                operation: Operation::LoadMore,
                generation: state.generation,
                epoch: state.epoch,
                query: state.query.clone(),
                params: state.query.params(),
            }
        };

        let result = self.fetch(&pending.params).await;
        self.finish(pending, result).await
    }

    /// Fetch the whole list under `filter` in one oversized page and render
    /// it. Never paginates further.
    #[tracing::instrument(skip(self), fields(list = %self.name))]
    pub async fn load_all(&self, filter: Option<String>) -> Result<SyncOutcome, SyncError> {
        let pending = self
            .begin_query(Operation::LoadAll, filter, Some(self.load_all_limit))
            .await;
        let result = self.fetch(&pending.params).await;
        self.finish(pending, result).await
    }

    pub async fn snapshot(&self) -> ListSnapshot<S::Item>
    where
        S::Item: Clone,
    {
        let state = self.state.lock().await;
        ListSnapshot {
            items: state.items.clone(),
            filter: state.query.filter().map(str::to_string),
            pagination_token: state.query.cursor().token().clone(),
            load_more_armed: state.load_more_armed,
        }
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.items.is_empty()
    }

    pub async fn load_more_armed(&self) -> bool {
        self.state.lock().await.load_more_armed
    }

    /// Start a new query generation. The live query is left alone until a
    /// response arrives, so a failed reload keeps the old list usable.
    async fn begin_query(
        &self,
        operation: Operation,
        filter: Option<String>,
        limit: Option<NonZeroU64>,
    ) -> Pending {
        let mut state = self.state.lock().await;
        state.generation += 1;

        let mut query = state.query.clone();
        query.set_filter(filter);

        let params = match limit {
            Some(limit) => query.params_with_limit(limit),
            None => query.params(),
        };

        Pending {
            operation,
            generation: state.generation,
            epoch: state.epoch,
            query,
            params,
        }
    }

    async fn fetch(&self, params: &ListParams) -> Result<ListPage<S::Item>, SyncError> {
        debug!(
            filter = params.filter.as_deref().unwrap_or(""),
            pagination_token = %params.pagination_token,
            limit = params.limit,
            "requesting page"
        );

        match tokio::time::timeout(self.timeout, self.source.fetch(params)).await {
            Ok(result) => result,
            Err(_) => Err(SyncError::Timeout {
                after: self.timeout,
            }),
        }
    }

    async fn finish(
        &self,
        pending: Pending,
        result: Result<ListPage<S::Item>, SyncError>,
    ) -> Result<SyncOutcome, SyncError> {
        let mut state = self.state.lock().await;

        if !is_current(&state, &pending) {
            match &result {
                Ok(page) => warn!(
                    operation = %pending.operation,
                    items = page.len(),
                    "discarding response for a superseded query"
                ),
                Err(err) => debug!(
                    operation = %pending.operation,
                    error = %err,
                    "ignoring failure of a superseded query"
                ),
            }
            return Ok(SyncOutcome::Superseded);
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                drop(state);
                self.sink.on_failure(&self.context(&pending), &err);
                return Err(err);
            }
        };

        let received = page.len();
        let exhausted = PaginationCursor::is_exhausted(&page);
        let ListPage { items, next_token } = page;

        match pending.operation {
            Operation::LoadInitial | Operation::LoadAll => {
                state.query = pending.query;
                state.epoch += 1;
                if !exhausted {
                    state.query.cursor_mut().advance(next_token);
                }
                state.load_more_armed = pending.operation == Operation::LoadInitial && !exhausted;
                state.items = items;

                let SyncState {
                    items,
                    load_more_armed,
                    view,
                    ..
                } = &mut *state;
                view.replace(items.as_slice());
                view.set_load_more(*load_more_armed);
            }
            Operation::LoadMore => {
                if exhausted {
                    state.load_more_armed = false;
                    state.view.set_load_more(false);
                } else {
                    state.query.cursor_mut().advance(next_token);
                    state.view.append(&items);
                    state.items.extend(items);
                }
            }
        }

        Ok(SyncOutcome::Applied {
            received,
            total: state.items.len(),
            load_more: state.load_more_armed,
        })
    }

    fn context(&self, pending: &Pending) -> FailureContext {
        FailureContext {
            list: self.name.clone(),
            operation: pending.operation,
            filter: pending.params.filter.clone(),
            pagination_token: pending.params.pagination_token.clone(),
            limit: pending.params.limit,
        }
    }
}

/// A reload must still be the newest query. A "load more" must also find
/// the list it was extending and the cursor where it left it; otherwise a
/// reload has replaced the list or an overlapping "load more" has already
/// applied the same page. Offset tokens repeat across queries, so the token
/// alone cannot tell the two lists apart.
fn is_current<T>(state: &SyncState<T>, pending: &Pending) -> bool {
    if state.generation != pending.generation {
        return false;
    }

    match pending.operation {
        Operation::LoadMore => {
            state.epoch == pending.epoch
                && state.query.cursor().token() == &pending.params.pagination_token
        }
        Operation::LoadInitial | Operation::LoadAll => true,
    }
}

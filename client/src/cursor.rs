use std::num::NonZeroU64;

use sentinel_common::{
    params::{ListParams, PageToken},
    views::ListPage,
};

/// Position within one paginated list: the opaque token of the next page
/// and the page size used to request it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationCursor {
    token: PageToken,
    limit: NonZeroU64,
}

impl PaginationCursor {
    pub fn new(limit: NonZeroU64) -> Self {
        Self {
            token: PageToken::start(),
            limit,
        }
    }

    pub fn token(&self) -> &PageToken {
        &self.token
    }

    pub fn limit(&self) -> NonZeroU64 {
        self.limit
    }

    /// Go back to the start of the list.
    pub fn reset(&mut self) {
        self.token = PageToken::start();
    }

    /// Move past the page that returned `next_token`. The token is opaque so
    /// there is nothing to validate.
    pub fn advance(&mut self, next_token: PageToken) {
        self.token = next_token;
    }

    /// An empty page ends the list.
    pub fn is_exhausted<T>(page: &ListPage<T>) -> bool {
        page.is_empty()
    }
}

/// A filter plus the cursor walking the results of that filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    filter: Option<String>,
    cursor: PaginationCursor,
}

impl ListQuery {
    pub fn new(limit: NonZeroU64) -> Self {
        Self {
            filter: None,
            cursor: PaginationCursor::new(limit),
        }
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Replace the filter. Any continuation belongs to the old filter, so
    /// the cursor always restarts, even if the filter is unchanged.
    pub fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter;
        self.cursor.reset();
    }

    pub fn cursor(&self) -> &PaginationCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut PaginationCursor {
        &mut self.cursor
    }

    /// Parameters for the page the cursor currently points at.
    pub fn params(&self) -> ListParams {
        self.params_with_limit(self.cursor.limit)
    }

    pub fn params_with_limit(&self, limit: NonZeroU64) -> ListParams {
        ListParams {
            filter: self.filter.clone(),
            pagination_token: self.cursor.token.clone(),
            limit: limit.get(),
        }
    }
}

//! Input parameters for the paginated list endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An opaque continuation handle returned by a list endpoint. It is echoed
/// back verbatim on the next request and never built or inspected by the
/// client, apart from the start sentinel (`0`, or an absent/null token).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PageToken(Value);

impl PageToken {
    /// The token that asks an endpoint for the first page of a list.
    pub fn start() -> Self {
        Self(Value::from(0))
    }

    pub fn is_start(&self) -> bool {
        self.0.is_null() || self.0 == Value::from(0)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl Default for PageToken {
    fn default() -> Self {
        Self::start()
    }
}

impl From<Value> for PageToken {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for PageToken {
    fn from(value: &str) -> Self {
        Self(Value::from(value))
    }
}

impl From<u64> for PageToken {
    fn from(value: u64) -> Self {
        Self(Value::from(value))
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters for requesting one page of a list. The list endpoints all
/// accept the same shape, differing only in which body field carries the
/// filter and which fixed fields (such as a subject email) ride along.
#[derive(Debug, Clone, PartialEq)]
pub struct ListParams {
    /// Narrows the list, e.g. to emails starting with this prefix. `None`
    /// lists everything.
    pub filter: Option<String>,

    /// The token from the previous page, or [`PageToken::start`].
    pub pagination_token: PageToken,

    /// The maximum number of results to return.
    pub limit: u64,
}

impl ListParams {
    /// Build the JSON request body. Fixed fields are written first so a
    /// filter or pagination field can never be shadowed by them. The filter
    /// is dropped for lists that take none (`filter_field` is `None`).
    pub fn to_body(
        &self,
        filter_field: Option<&str>,
        fixed: &Map<String, Value>,
    ) -> Map<String, Value> {
        let mut body = fixed.clone();

        if let (Some(field), Some(filter)) = (filter_field, &self.filter) {
            body.insert(field.to_string(), Value::from(filter.as_str()));
        }

        body.insert(
            "pagination_token".to_string(),
            self.pagination_token.as_value().clone(),
        );
        body.insert("limit".to_string(), Value::from(self.limit));

        body
    }
}

use std::marker::PhantomData;

use async_trait::async_trait;
use sentinel_common::{
    params::{ListParams, PageToken},
    views::ListPage,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{client::ApiClient, error::SyncError};

/// Anything that can hand out pages of a list.
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    type Item: Send + 'static;

    async fn fetch(&self, params: &ListParams) -> Result<ListPage<Self::Item>, SyncError>;
}

/// A paginated list endpoint on the dashboard backend.
///
/// Every list endpoint takes `{ <filter>?, pagination_token, limit, ... }`
/// and answers `{ <items-field>: [T], pagination_token }`; only the path,
/// the field names and the item type differ.
pub struct Endpoint<T> {
    client: ApiClient,
    path: String,
    items_field: String,
    filter_field: Option<String>,
    fixed: Map<String, Value>,
    _item: PhantomData<fn() -> T>,
}

impl<T> Endpoint<T> {
    pub fn new(client: ApiClient, path: impl Into<String>, items_field: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            items_field: items_field.into(),
            filter_field: None,
            fixed: Map::new(),
            _item: PhantomData,
        }
    }

    /// Name of the body field that carries the list filter. Without one the
    /// endpoint ignores filters.
    pub fn with_filter_field(mut self, field: impl Into<String>) -> Self {
        self.filter_field = Some(field.into());
        self
    }

    /// Send `value` under `key` with every request.
    pub fn with_fixed(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fixed.insert(key.into(), value.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn items_field(&self) -> &str {
        &self.items_field
    }

    pub fn body(&self, params: &ListParams) -> Value {
        Value::Object(params.to_body(self.filter_field.as_deref(), &self.fixed))
    }
}

impl<T: DeserializeOwned> Endpoint<T> {
    pub fn decode_page(&self, body: Value) -> Result<ListPage<T>, SyncError> {
        let mut body = match body {
            Value::Object(map) => map,
            other => {
                return Err(SyncError::Decode(serde::de::Error::custom(format!(
                    "expected a JSON object, got {other}"
                ))));
            }
        };

        let items = match body.remove(&self.items_field) {
            Some(Value::Null) | None => {
                return Err(SyncError::MissingField {
                    field: self.items_field.clone(),
                });
            }
            Some(items) => items,
        };
        let items: Vec<T> = serde_json::from_value(items)?;

        // A null token is echoed back as the start sentinel, never as null.
        let next_token = body
            .remove("pagination_token")
            .filter(|token| !token.is_null())
            .map(PageToken::from)
            .unwrap_or_default();

        Ok(ListPage { items, next_token })
    }
}

#[async_trait]
impl<T> PageSource for Endpoint<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Item = T;

    async fn fetch(&self, params: &ListParams) -> Result<ListPage<T>, SyncError> {
        let body = self.body(params);
        let response = self.client.post_json(&self.path, &body).await?;
        let page = self.decode_page(response)?;

        debug!(
            path = %self.path,
            items = page.len(),
            next_token = %page.next_token,
            "fetched page"
        );

        Ok(page)
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        email: String,
    }

    fn endpoint() -> Endpoint<Row> {
        let client = ApiClient::new("http://dash.local".into(), None, Duration::from_secs(1))
            .unwrap();
        Endpoint::new(client, "/user/paginate-users", "users").with_filter_field("email")
    }

    #[test]
    fn decodes_named_items_field() {
        let page = endpoint()
            .decode_page(json!({
                "users": [{ "email": "a@x.com" }, { "email": "b@x.com" }],
                "pagination_token": 300
            }))
            .unwrap();

        assert_eq!(
            page.items,
            vec![
                Row { email: "a@x.com".into() },
                Row { email: "b@x.com".into() }
            ]
        );
        assert_eq!(page.next_token, PageToken::from(300));
    }

    #[test]
    fn absent_token_means_start() {
        let page = endpoint().decode_page(json!({ "users": [] })).unwrap();
        assert!(page.next_token.is_start());
    }

    #[test]
    fn null_token_means_start() {
        let page = endpoint()
            .decode_page(json!({ "users": [{ "email": "a@x.com" }], "pagination_token": null }))
            .unwrap();
        assert_eq!(page.next_token, PageToken::start());

        let params = ListParams {
            filter: None,
            pagination_token: page.next_token,
            limit: 300,
        };
        assert_eq!(
            endpoint().body(&params),
            json!({ "pagination_token": 0, "limit": 300 })
        );
    }

    #[test]
    fn missing_items_field_is_an_error() {
        let err = endpoint()
            .decode_page(json!({ "statuses": [], "pagination_token": 0 }))
            .unwrap_err();
        assert!(matches!(err, SyncError::MissingField { field } if field == "users"));
    }

    #[test]
    fn malformed_items_are_decode_errors() {
        let err = endpoint()
            .decode_page(json!({ "users": [{ "name": "no email" }] }))
            .unwrap_err();
        assert!(matches!(err, SyncError::Decode(_)));

        let err = endpoint().decode_page(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, SyncError::Decode(_)));
    }

    #[test]
    fn body_carries_filter_and_fixed_fields() {
        let endpoint = endpoint().with_fixed("school", "north");
        let params = ListParams {
            filter: Some("jo".into()),
            pagination_token: "abc".into(),
            limit: 300,
        };

        assert_eq!(
            endpoint.body(&params),
            json!({ "school": "north", "email": "jo", "pagination_token": "abc", "limit": 300 })
        );
    }
}

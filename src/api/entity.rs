use serde::de::DeserializeOwned;
use serde_json::Value;

use super::client::{unwrap_data, ApiClient, ApiError};

/// Default sort order: newest records first.
const DEFAULT_SORT: &str = "-created_at";

/// Default page size for list and search calls.
const DEFAULT_LIMIT: u32 = 1000;

/// Query parameters for [`EntityApi::list`] and [`EntityApi::search`].
///
/// Ordering is server-determined by `sort`; nothing is re-sorted on this
/// side. Filters are arbitrary key/value pairs merged into the query
/// string as-is.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub sort: String,
    pub limit: u32,
    pub filters: Vec<(String, String)>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            sort: DEFAULT_SORT.to_string(),
            limit: DEFAULT_LIMIT,
            filters: Vec::new(),
        }
    }
}

impl ListParams {
    /// Flattens sort, limit, and filters into query pairs.
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("sort".to_string(), self.sort.clone()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}

/// Generic REST adapter for one logical entity type.
///
/// Every operation delegates to [`ApiClient`], unwraps the `data` field of
/// the response envelope, and deserializes into the caller's chosen type.
/// There is no client-side validation, caching, or conflict detection;
/// the backend is the source of truth.
pub struct EntityApi<'a> {
    client: &'a ApiClient,
    resource: String,
}

impl<'a> EntityApi<'a> {
    /// Creates an adapter for the entity with the given singular name.
    ///
    /// The resource path is the lower-cased name plus `s`, so `"Lead"`
    /// maps to `/leads`. This is simple English pluralization only;
    /// `"Activity"` maps to `/activitys`, matching the backend's own
    /// route table. Use [`EntityApi::with_path`] for irregular nouns.
    pub fn new(client: &'a ApiClient, name: &str) -> Self {
        Self {
            client,
            resource: resource_path(name),
        }
    }

    /// Creates an adapter with an explicitly declared resource path,
    /// e.g. `with_path(client, "/activities")`.
    pub fn with_path(client: &'a ApiClient, path: &str) -> Self {
        Self {
            client,
            resource: path.to_string(),
        }
    }

    /// The resource collection path this adapter targets.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Fetches a page of records.
    pub async fn list<T: DeserializeOwned>(&self, params: ListParams) -> Result<T, ApiError> {
        let envelope = self.client.get(&self.resource, &params.query_pairs()).await?;
        Ok(serde_json::from_value(unwrap_data(envelope))?)
    }

    /// Fetches one record by identifier.
    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> Result<T, ApiError> {
        let endpoint = format!("{}/{}", self.resource, id);
        let envelope = self.client.get(&endpoint, &[]).await?;
        Ok(serde_json::from_value(unwrap_data(envelope))?)
    }

    /// Creates a record and returns the server-assigned version of it,
    /// including generated id and timestamps.
    pub async fn create<T: DeserializeOwned>(&self, data: Value) -> Result<T, ApiError> {
        let envelope = self.client.post(&self.resource, data).await?;
        Ok(serde_json::from_value(unwrap_data(envelope))?)
    }

    /// Updates a record (partial or full) and returns the record as the
    /// server sees it afterwards. Nothing is merged locally.
    pub async fn update<T: DeserializeOwned>(&self, id: &str, data: Value) -> Result<T, ApiError> {
        let endpoint = format!("{}/{}", self.resource, id);
        let envelope = self.client.put(&endpoint, data).await?;
        Ok(serde_json::from_value(unwrap_data(envelope))?)
    }

    /// Removes a record. Returns whatever the server's envelope carried,
    /// typically an empty acknowledgment.
    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        let endpoint = format!("{}/{}", self.resource, id);
        let envelope = self.client.delete(&endpoint).await?;
        Ok(unwrap_data(envelope))
    }

    /// Like [`EntityApi::list`], with an additional `search` parameter.
    pub async fn search<T: DeserializeOwned>(
        &self,
        query: &str,
        params: ListParams,
    ) -> Result<T, ApiError> {
        let mut pairs = params.query_pairs();
        pairs.push(("search".to_string(), query.to_string()));
        let envelope = self.client.get(&self.resource, &pairs).await?;
        Ok(serde_json::from_value(unwrap_data(envelope))?)
    }
}

/// Derives the REST collection path from a singular entity name.
fn resource_path(name: &str) -> String {
    format!("/{}s", name.to_lowercase())
}

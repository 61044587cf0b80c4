//! Capability traits
//!
//! `ApiClient` is the small interface every client exposes: its config and
//! a way to execute a descriptor. Everything else is layered on top as
//! extension traits with blanket implementations, so new verbs are added
//! by writing another trait rather than patching the client.
//!
//! ```rust,ignore
//! #[async_trait]
//! pub trait Tasks: ApiClient {
//!     async fn open_tasks(&self) -> Result<Vec<JsonValue>> {
//!         self.find_all("task", &open_filter()).await
//!     }
//! }
//! impl<C: ApiClient + ?Sized> Tasks for C {}
//! ```

use crate::config::ClientConfig;
use crate::error::Result;
use crate::pagination::{self, HistoryLabel};
use crate::request::{RawRequest, ReadParams, RequestBuilder, RequestDescriptor};
use crate::transport::Response;
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;

/// The capability set every client provides
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Current configuration
    fn config(&self) -> &ClientConfig;

    /// Execute a request
    async fn execute(&self, request: RequestDescriptor) -> Result<Response>;

    /// Request builder bound to the current configuration
    fn request_builder(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(self.config())
    }

    /// Execute a request and return its JSON body
    async fn execute_json(&self, request: RequestDescriptor) -> Result<JsonValue> {
        Ok(self.execute(request).await?.into_json())
    }
}

/// Entity verbs built on `ApiClient`
#[async_trait]
pub trait EntityApi: ApiClient {
    /// Read one record by id, or list records matching a filter
    async fn get<P>(&self, entity: &str, params: P) -> Result<JsonValue>
    where
        P: Into<ReadParams> + Send,
    {
        let request = self.request_builder().read(entity, &params.into())?;
        self.execute_json(request).await
    }

    /// Alias of `get`
    async fn find<P>(&self, entity: &str, params: P) -> Result<JsonValue>
    where
        P: Into<ReadParams> + Send,
    {
        self.get(entity, params).await
    }

    /// Create a record, or update it when `id` is set
    async fn save(&self, entity: &str, params: &JsonObject) -> Result<JsonValue> {
        let request = self.request_builder().save(entity, params);
        self.execute_json(request).await
    }

    /// Alias of `save`
    async fn patch(&self, entity: &str, params: &JsonObject) -> Result<JsonValue> {
        self.save(entity, params).await
    }

    /// Alias of `save`
    async fn create(&self, entity: &str, params: &JsonObject) -> Result<JsonValue> {
        self.save(entity, params).await
    }

    /// Alias of `save`
    async fn update(&self, entity: &str, params: &JsonObject) -> Result<JsonValue> {
        self.save(entity, params).await
    }

    /// Alias of `save`
    async fn post(&self, entity: &str, params: &JsonObject) -> Result<JsonValue> {
        self.save(entity, params).await
    }

    /// Replace a whole record
    async fn replace(&self, entity: &str, params: &JsonObject) -> Result<JsonValue> {
        let request = self.request_builder().replace(entity, params);
        self.execute_json(request).await
    }

    /// Alias of `replace`
    async fn put(&self, entity: &str, params: &JsonObject) -> Result<JsonValue> {
        self.replace(entity, params).await
    }

    /// Delete a record given its id or the record itself
    async fn delete<V>(&self, entity: &str, target: V) -> Result<JsonValue>
    where
        V: Into<JsonValue> + Send,
    {
        let request = self.request_builder().delete(entity, &target.into());
        self.execute_json(request).await
    }

    /// Alias of `delete`
    async fn remove<V>(&self, entity: &str, target: V) -> Result<JsonValue>
    where
        V: Into<JsonValue> + Send,
    {
        self.delete(entity, target).await
    }

    /// Passthrough request
    async fn raw(&self, request: &RawRequest) -> Result<JsonValue> {
        let request = self.request_builder().raw(request);
        self.execute_json(request).await
    }

    /// The authenticated user
    async fn me(&self) -> Result<JsonValue> {
        self.get("me", ReadParams::None).await
    }

    /// Every record matching a filter, fetched 500 at a time
    async fn find_all(&self, entity: &str, params: &JsonObject) -> Result<Vec<JsonValue>> {
        pagination::find_all(self, entity, params).await
    }

    /// Records matching a filter, each annotated with its state at every label
    async fn find_with_history(
        &self,
        entity: &str,
        params: &JsonObject,
        labels: &[HistoryLabel],
    ) -> Result<Vec<JsonValue>> {
        pagination::find_with_history(self, entity, params, labels).await
    }
}

impl<C: ApiClient + ?Sized> EntityApi for C {}

//! The seam between this crate and a database driver.
//!
//! A driver turns a connection uri into a [DocumentClient]; the client hands out
//! [DatabaseHandle]s, which hand out [CollectionHandle]s. Filters, updates and
//! find options are passed as native expression trees (see [`crate::query`]); a
//! driver either translates them into its own query language or evaluates them
//! directly. [`crate::memory::MemoryDriver`] is the in-process implementation.

use crate::common::Document;
use crate::connection::ConnectionOptions;
use crate::errors::PersistenceResult;
use crate::query::{Filter, FindOptions, Update};
use async_trait::async_trait;
use std::sync::Arc;

/// Opens clients for a connection uri.
#[async_trait]
pub trait DocumentDriver: Send + Sync {
    /// Connects to the database cluster addressed by `uri`.
    ///
    /// Transport failures are reported as errors; the caller wraps them.
    async fn connect(&self, uri: &str, options: &ConnectionOptions) -> PersistenceResult<Arc<dyn DocumentClient>>;
}

/// A live, pooled client.
#[async_trait]
pub trait DocumentClient: Send + Sync {
    /// Returns the database named in the connection uri, if any.
    fn default_database(&self) -> Option<Arc<dyn DatabaseHandle>>;

    fn database(&self, name: &str) -> Arc<dyn DatabaseHandle>;

    /// Releases the client and its pool.
    async fn close(&self) -> PersistenceResult<()>;
}

pub trait DatabaseHandle: Send + Sync {
    fn name(&self) -> &str;

    fn collection(&self, name: &str) -> Arc<dyn CollectionHandle>;
}

/// Operations on one collection. Documents carry their storage id in `_id`.
#[async_trait]
pub trait CollectionHandle: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the documents matching `filter`, sorted, paged and projected as
    /// `options` describes.
    async fn find(&self, filter: &Filter, options: &FindOptions) -> PersistenceResult<Vec<Document>>;

    async fn count(&self, filter: &Filter) -> PersistenceResult<u64>;

    /// Inserts a document and returns it as stored. A missing `_id` is generated.
    async fn insert_one(&self, document: Document) -> PersistenceResult<Document>;

    /// Replaces the first document matching `filter` and returns the new version.
    /// With `upsert`, a missing document is inserted instead.
    async fn find_one_and_replace(
        &self,
        filter: &Filter,
        replacement: Document,
        upsert: bool,
    ) -> PersistenceResult<Option<Document>>;

    /// Applies `update` to the first document matching `filter` and returns the
    /// new version. Never inserts.
    async fn find_one_and_update(&self, filter: &Filter, update: &Update) -> PersistenceResult<Option<Document>>;

    /// Deletes the first document matching `filter` and returns it.
    async fn find_one_and_delete(&self, filter: &Filter) -> PersistenceResult<Option<Document>>;

    /// Deletes every document matching `filter` and returns how many were deleted.
    async fn delete_many(&self, filter: &Filter) -> PersistenceResult<u64>;
}

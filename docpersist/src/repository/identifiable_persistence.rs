use crate::common::{Document, DOC_ID};
use crate::connection::DocumentConnection;
use crate::data::{DataPage, FilterParams, PagingParams, ProjectionParams, SortParams, UpdateParams};
use crate::driver::CollectionHandle;
use crate::errors::{ErrorKind, PersistenceError, PersistenceResult};
use crate::query::{DefaultQueryBuilder, Filter, FindOptions, Projection, QueryBuilder, Sort, Update};
use crate::repository::record_mapper::{
    document_to_record, finish_projection, key_value, record_to_document, storage_projection,
};
use crate::repository::{Identifiable, IdentifierKey};
use rand::Rng;
use std::marker::PhantomData;
use std::sync::Arc;

/// Generic persistence for [Identifiable] records stored in one collection.
///
/// The engine is built over a [DocumentConnection] and resolves its collection
/// lazily, so it can be created before the connection is opened. Every operation
/// takes a correlation id, used only to tag log lines and errors.
///
/// Queries use the record's field names; the id field is translated to the
/// driver's `_id` on the way in and back on the way out. Generic parameter
/// objects go through the configured [QueryBuilder].
///
/// # Examples
///
/// ```rust,ignore
/// let persistence = IdentifiablePersistence::<Beacon>::new(connection.clone(), "beacons")
///     .with_max_page_size(50);
///
/// let beacon = persistence.create(Some("123"), Beacon::new("north")).await?;
/// let page = persistence
///     .get_page_by_filter(Some("123"), field("label").eq("north"), Some(PagingParams::new(None, Some(10), true)), None)
///     .await?;
/// ```
pub struct IdentifiablePersistence<T: Identifiable> {
    connection: DocumentConnection,
    collection_name: String,
    max_page_size: u64,
    query_builder: Arc<dyn QueryBuilder>,
    _phantom: PhantomData<T>,
}

impl<T: Identifiable> Clone for IdentifiablePersistence<T> {
    fn clone(&self) -> Self {
        IdentifiablePersistence {
            connection: self.connection.clone(),
            collection_name: self.collection_name.clone(),
            max_page_size: self.max_page_size,
            query_builder: self.query_builder.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T: Identifiable> IdentifiablePersistence<T> {
    /// Creates the engine; the page size limit comes from the connection options.
    pub fn new(connection: DocumentConnection, collection_name: &str) -> Self {
        let max_page_size = connection.options().max_page_size;
        IdentifiablePersistence {
            connection,
            collection_name: collection_name.to_string(),
            max_page_size,
            query_builder: Arc::new(DefaultQueryBuilder),
            _phantom: PhantomData,
        }
    }

    pub fn with_max_page_size(mut self, max_page_size: u64) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    /// Replaces the translation of generic parameters into native queries.
    pub fn with_query_builder(mut self, query_builder: Arc<dyn QueryBuilder>) -> Self {
        self.query_builder = query_builder;
        self
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn max_page_size(&self) -> u64 {
        self.max_page_size
    }

    pub fn query_builder(&self) -> &dyn QueryBuilder {
        self.query_builder.as_ref()
    }

    /// Returns the collection handle.
    ///
    /// # Errors
    ///
    /// Returns `NotOpened` before the connection is opened.
    pub fn collection(&self, correlation_id: Option<&str>) -> PersistenceResult<Arc<dyn CollectionHandle>> {
        match self.connection.get_database() {
            Some(database) => Ok(database.collection(&self.collection_name)),
            None => {
                log::error!(
                    "[{}] Connection is not opened for collection {}",
                    cid(correlation_id),
                    self.collection_name
                );
                Err(PersistenceError::new(
                    &format!("Connection is not opened for collection {}", self.collection_name),
                    ErrorKind::NotOpened,
                )
                .with_correlation_id(correlation_id))
            }
        }
    }

    // reads

    /// Returns one page of records matching `filter`.
    ///
    /// Skip defaults to 0 and take is capped at the max page size. The total is
    /// counted only when the paging asks for it.
    pub async fn get_page_by_filter(
        &self,
        correlation_id: Option<&str>,
        filter: Filter,
        paging: Option<PagingParams>,
        sort: Option<Sort>,
    ) -> PersistenceResult<DataPage<T>> {
        let collection = self.collection(correlation_id)?;
        let filter = self.storage_filter(filter);
        let paging = paging.unwrap_or_default();
        let options = self.page_options(&paging, sort);

        let documents = collection.find(&filter, &options).await?;
        let items = documents
            .into_iter()
            .map(document_to_record::<T>)
            .collect::<PersistenceResult<Vec<T>>>()?;
        log::trace!(
            "[{}] Retrieved {} from {}",
            cid(correlation_id),
            items.len(),
            self.collection_name
        );

        let total = self.page_total(collection.as_ref(), &filter, &paging).await?;
        Ok(DataPage::new(items, total))
    }

    /// Returns one page of projected documents matching `filter`.
    ///
    /// The storage `_id` never appears in the result. Asking for the record id
    /// field includes the id under that name. Documents left empty by the
    /// projection are skipped.
    pub async fn get_page_by_filter_and_projection(
        &self,
        correlation_id: Option<&str>,
        filter: Filter,
        paging: Option<PagingParams>,
        sort: Option<Sort>,
        projection: Option<Projection>,
    ) -> PersistenceResult<DataPage<Document>> {
        let collection = self.collection(correlation_id)?;
        let filter = self.storage_filter(filter);
        let paging = paging.unwrap_or_default();
        let (storage, wants_id) = storage_projection::<T>(projection.as_ref());

        let mut options = self.page_options(&paging, sort);
        if let Some(storage) = storage {
            options = options.projection(storage);
        }

        let items: Vec<Document> = collection
            .find(&filter, &options)
            .await?
            .into_iter()
            .map(|document| finish_projection::<T>(document, wants_id))
            .filter(|document| !document.is_empty())
            .collect();
        log::trace!(
            "[{}] Retrieved {} from {}",
            cid(correlation_id),
            items.len(),
            self.collection_name
        );

        let total = self.page_total(collection.as_ref(), &filter, &paging).await?;
        Ok(DataPage::new(items, total))
    }

    /// Returns every record matching `filter`, without paging.
    pub async fn get_list_by_filter(
        &self,
        correlation_id: Option<&str>,
        filter: Filter,
        sort: Option<Sort>,
    ) -> PersistenceResult<Vec<T>> {
        let collection = self.collection(correlation_id)?;
        let filter = self.storage_filter(filter);
        let mut options = FindOptions::new();
        if let Some(sort) = sort {
            options = options.sort(self.storage_sort(sort));
        }

        let items = collection
            .find(&filter, &options)
            .await?
            .into_iter()
            .map(document_to_record::<T>)
            .collect::<PersistenceResult<Vec<T>>>()?;
        log::trace!(
            "[{}] Retrieved {} from {}",
            cid(correlation_id),
            items.len(),
            self.collection_name
        );
        Ok(items)
    }

    pub async fn get_count_by_filter(&self, correlation_id: Option<&str>, filter: Filter) -> PersistenceResult<u64> {
        let collection = self.collection(correlation_id)?;
        let count = collection.count(&self.storage_filter(filter)).await?;
        log::trace!("[{}] Counted {} items in {}", cid(correlation_id), count, self.collection_name);
        Ok(count)
    }

    /// Returns the records with the given ids; unknown ids are left out.
    pub async fn get_list_by_ids(&self, correlation_id: Option<&str>, ids: &[T::Key]) -> PersistenceResult<Vec<T>> {
        let filter = Filter::by_ids(ids.iter().map(key_value::<T>));
        self.get_list_by_filter(correlation_id, filter, None).await
    }

    pub async fn get_one_by_id(&self, correlation_id: Option<&str>, id: &T::Key) -> PersistenceResult<Option<T>> {
        let collection = self.collection(correlation_id)?;
        let options = FindOptions::new().limit(1);
        let found = collection
            .find(&Filter::by_id(key_value::<T>(id)), &options)
            .await?
            .into_iter()
            .next();

        match found {
            Some(document) => {
                log::trace!("[{}] Retrieved from {} by id = {}", cid(correlation_id), self.collection_name, id);
                document_to_record(document).map(Some)
            }
            None => {
                log::trace!("[{}] Nothing found from {} with id = {}", cid(correlation_id), self.collection_name, id);
                Ok(None)
            }
        }
    }

    /// Returns the projected document with the given id, or [None] when it does
    /// not exist or the projection leaves nothing.
    pub async fn get_one_by_id_with_projection(
        &self,
        correlation_id: Option<&str>,
        id: &T::Key,
        projection: Projection,
    ) -> PersistenceResult<Option<Document>> {
        let collection = self.collection(correlation_id)?;
        let (storage, wants_id) = storage_projection::<T>(Some(&projection));
        let mut options = FindOptions::new().limit(1);
        if let Some(storage) = storage {
            options = options.projection(storage);
        }

        let found = collection
            .find(&Filter::by_id(key_value::<T>(id)), &options)
            .await?
            .into_iter()
            .next()
            .map(|document| finish_projection::<T>(document, wants_id))
            .filter(|document| !document.is_empty());

        if found.is_none() {
            log::trace!("[{}] Nothing found from {} with id = {}", cid(correlation_id), self.collection_name, id);
        }
        Ok(found)
    }

    /// Returns a uniformly chosen record matching `filter`, or [None] when nothing
    /// matches.
    pub async fn get_one_random(&self, correlation_id: Option<&str>, filter: Filter) -> PersistenceResult<Option<T>> {
        let collection = self.collection(correlation_id)?;
        let filter = self.storage_filter(filter);

        let count = collection.count(&filter).await?;
        if count == 0 {
            log::trace!("[{}] Nothing found in {} to pick from", cid(correlation_id), self.collection_name);
            return Ok(None);
        }

        let offset = rand::thread_rng().gen_range(0..count);
        let options = FindOptions::new().skip(offset).limit(1);
        let picked = collection.find(&filter, &options).await?.into_iter().next();

        log::trace!(
            "[{}] Retrieved random item {} of {} from {}",
            cid(correlation_id),
            offset,
            count,
            self.collection_name
        );
        picked.map(document_to_record::<T>).transpose()
    }

    // writes

    /// Stores a new record. A record without an id gets a generated one when its
    /// key type can generate ids.
    ///
    /// # Errors
    ///
    /// Returns `UniqueConstraintViolation` when the id is already taken.
    pub async fn create(&self, correlation_id: Option<&str>, mut item: T) -> PersistenceResult<T> {
        let collection = self.collection(correlation_id)?;
        if item.id().is_none() {
            if let Some(id) = T::Key::generate() {
                item.set_id(id);
            }
        }

        let document = record_to_document(&item)?;
        let stored = collection.insert_one(document).await?;
        let created: T = document_to_record(stored)?;
        log::debug!(
            "[{}] Created in {} with id = {}",
            cid(correlation_id),
            self.collection_name,
            display_id(created.id())
        );
        Ok(created)
    }

    /// Inserts the record or replaces the stored one with the same id. Returns
    /// the stored record, or [None] when the record has no id.
    pub async fn set(&self, correlation_id: Option<&str>, item: T) -> PersistenceResult<Option<T>> {
        self.replace(correlation_id, item, true).await
    }

    /// Replaces the stored record with the same id. Never inserts; returns [None]
    /// when the record has no id or nothing is stored under it.
    pub async fn update(&self, correlation_id: Option<&str>, item: T) -> PersistenceResult<Option<T>> {
        self.replace(correlation_id, item, false).await
    }

    /// Applies `update` to the first record matching `filter`. Never inserts;
    /// returns [None] when either is absent or nothing matches.
    pub async fn modify(
        &self,
        correlation_id: Option<&str>,
        filter: Option<Filter>,
        update: Option<Update>,
    ) -> PersistenceResult<Option<T>> {
        let (Some(filter), Some(update)) = (filter, update) else {
            return Ok(None);
        };

        let collection = self.collection(correlation_id)?;
        let filter = self.storage_filter(filter);
        let update = update.rename_field(T::ID_FIELD, DOC_ID);

        match collection.find_one_and_update(&filter, &update).await? {
            Some(document) => {
                let modified: T = document_to_record(document)?;
                log::debug!(
                    "[{}] Modified in {} with id = {}",
                    cid(correlation_id),
                    self.collection_name,
                    display_id(modified.id())
                );
                Ok(Some(modified))
            }
            None => {
                log::trace!("[{}] Nothing modified in {} by {}", cid(correlation_id), self.collection_name, filter);
                Ok(None)
            }
        }
    }

    pub async fn modify_by_id(
        &self,
        correlation_id: Option<&str>,
        id: &T::Key,
        update: Update,
    ) -> PersistenceResult<Option<T>> {
        self.modify(correlation_id, Some(Filter::by_id(key_value::<T>(id))), Some(update))
            .await
    }

    /// Applies a map of field values to the record with the given id, translated
    /// through the query builder. An empty map changes nothing and returns [None].
    pub async fn update_partially(
        &self,
        correlation_id: Option<&str>,
        id: &T::Key,
        data: &UpdateParams,
    ) -> PersistenceResult<Option<T>> {
        let update = self.query_builder.compose_update(Some(data));
        self.modify(correlation_id, Some(Filter::by_id(key_value::<T>(id))), update)
            .await
    }

    // deletes

    pub async fn delete_by_id(&self, correlation_id: Option<&str>, id: &T::Key) -> PersistenceResult<Option<T>> {
        let collection = self.collection(correlation_id)?;
        match collection.find_one_and_delete(&Filter::by_id(key_value::<T>(id))).await? {
            Some(document) => {
                log::debug!("[{}] Deleted from {} with id = {}", cid(correlation_id), self.collection_name, id);
                document_to_record(document).map(Some)
            }
            None => {
                log::trace!("[{}] Nothing deleted from {} with id = {}", cid(correlation_id), self.collection_name, id);
                Ok(None)
            }
        }
    }

    pub async fn delete_by_filter(&self, correlation_id: Option<&str>, filter: Filter) -> PersistenceResult<()> {
        let collection = self.collection(correlation_id)?;
        let count = collection.delete_many(&self.storage_filter(filter)).await?;
        log::debug!("[{}] Deleted {} items from {}", cid(correlation_id), count, self.collection_name);
        Ok(())
    }

    /// Deletes the records with the given ids; unknown ids are ignored.
    pub async fn delete_by_ids(&self, correlation_id: Option<&str>, ids: &[T::Key]) -> PersistenceResult<()> {
        let filter = Filter::by_ids(ids.iter().map(key_value::<T>));
        self.delete_by_filter(correlation_id, filter).await
    }

    /// Deletes every record in the collection.
    pub async fn clear(&self, correlation_id: Option<&str>) -> PersistenceResult<()> {
        self.delete_by_filter(correlation_id, Filter::All).await
    }

    // generic parameter variants

    pub async fn get_page_by_params(
        &self,
        correlation_id: Option<&str>,
        filter: Option<&FilterParams>,
        paging: Option<PagingParams>,
        sort: Option<&SortParams>,
    ) -> PersistenceResult<DataPage<T>> {
        let filter = self.query_builder.compose_filter(filter);
        let sort = self.query_builder.compose_sort(sort);
        self.get_page_by_filter(correlation_id, filter, paging, sort).await
    }

    pub async fn get_page_by_params_and_projection(
        &self,
        correlation_id: Option<&str>,
        filter: Option<&FilterParams>,
        paging: Option<PagingParams>,
        sort: Option<&SortParams>,
        projection: Option<&ProjectionParams>,
    ) -> PersistenceResult<DataPage<Document>> {
        let filter = self.query_builder.compose_filter(filter);
        let sort = self.query_builder.compose_sort(sort);
        let projection = self.query_builder.compose_projection(projection);
        self.get_page_by_filter_and_projection(correlation_id, filter, paging, sort, projection)
            .await
    }

    pub async fn get_list_by_params(
        &self,
        correlation_id: Option<&str>,
        filter: Option<&FilterParams>,
        sort: Option<&SortParams>,
    ) -> PersistenceResult<Vec<T>> {
        let filter = self.query_builder.compose_filter(filter);
        let sort = self.query_builder.compose_sort(sort);
        self.get_list_by_filter(correlation_id, filter, sort).await
    }

    pub async fn get_count_by_params(
        &self,
        correlation_id: Option<&str>,
        filter: Option<&FilterParams>,
    ) -> PersistenceResult<u64> {
        let filter = self.query_builder.compose_filter(filter);
        self.get_count_by_filter(correlation_id, filter).await
    }

    pub async fn get_one_random_by_params(
        &self,
        correlation_id: Option<&str>,
        filter: Option<&FilterParams>,
    ) -> PersistenceResult<Option<T>> {
        let filter = self.query_builder.compose_filter(filter);
        self.get_one_random(correlation_id, filter).await
    }

    pub async fn modify_by_params(
        &self,
        correlation_id: Option<&str>,
        filter: Option<&FilterParams>,
        update: Option<&UpdateParams>,
    ) -> PersistenceResult<Option<T>> {
        // absent filter params must not widen the update to every record
        let filter = filter.map(|params| self.query_builder.compose_filter(Some(params)));
        let update = self.query_builder.compose_update(update);
        self.modify(correlation_id, filter, update).await
    }

    pub async fn delete_by_params(
        &self,
        correlation_id: Option<&str>,
        filter: Option<&FilterParams>,
    ) -> PersistenceResult<()> {
        let filter = self.query_builder.compose_filter(filter);
        self.delete_by_filter(correlation_id, filter).await
    }

    async fn replace(&self, correlation_id: Option<&str>, item: T, upsert: bool) -> PersistenceResult<Option<T>> {
        let Some(id) = item.id() else {
            log::trace!("[{}] Record for {} has no id", cid(correlation_id), self.collection_name);
            return Ok(None);
        };

        let collection = self.collection(correlation_id)?;
        let document = record_to_document(&item)?;
        let filter = Filter::by_id(key_value::<T>(&id));

        match collection.find_one_and_replace(&filter, document, upsert).await? {
            Some(document) => {
                log::debug!(
                    "[{}] {} in {} with id = {}",
                    cid(correlation_id),
                    if upsert { "Set" } else { "Updated" },
                    self.collection_name,
                    id
                );
                document_to_record(document).map(Some)
            }
            None => {
                log::trace!("[{}] Nothing updated in {} with id = {}", cid(correlation_id), self.collection_name, id);
                Ok(None)
            }
        }
    }

    fn page_options(&self, paging: &PagingParams, sort: Option<Sort>) -> FindOptions {
        let mut options = FindOptions::new()
            .skip(paging.get_skip(0))
            .limit(paging.get_take(self.max_page_size));
        if let Some(sort) = sort {
            options = options.sort(self.storage_sort(sort));
        }
        options
    }

    async fn page_total(
        &self,
        collection: &dyn CollectionHandle,
        filter: &Filter,
        paging: &PagingParams,
    ) -> PersistenceResult<Option<u64>> {
        if paging.has_total() {
            collection.count(filter).await.map(Some)
        } else {
            Ok(None)
        }
    }

    fn storage_filter(&self, filter: Filter) -> Filter {
        filter.rename_field(T::ID_FIELD, DOC_ID)
    }

    fn storage_sort(&self, sort: Sort) -> Sort {
        sort.rename_field(T::ID_FIELD, DOC_ID)
    }
}

fn cid(correlation_id: Option<&str>) -> &str {
    correlation_id.unwrap_or_default()
}

fn display_id<K: std::fmt::Display>(id: Option<K>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

use crate::common::{Document, Value, DOC_ID};
use crate::driver::CollectionHandle;
use crate::errors::{ErrorKind, PersistenceError, PersistenceResult};
use crate::query::{Filter, FindOptions, Update};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

/// An in-memory collection of documents kept in insertion order.
///
/// Every document has a unique `_id`. Queries are answered by evaluating the
/// filter tree against each document; there are no indexes.
#[derive(Clone)]
pub struct MemoryCollection {
    inner: Arc<MemoryCollectionInner>,
}

struct MemoryCollectionInner {
    name: String,
    documents: RwLock<Vec<Document>>,
}

impl MemoryCollection {
    pub fn new(name: &str) -> Self {
        MemoryCollection {
            inner: Arc::new(MemoryCollectionInner {
                name: name.to_string(),
                documents: RwLock::new(Vec::new()),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.documents.read().is_empty()
    }
}

#[async_trait]
impl CollectionHandle for MemoryCollection {
    fn name(&self) -> &str {
        &self.inner.name
    }

    async fn find(&self, filter: &Filter, options: &FindOptions) -> PersistenceResult<Vec<Document>> {
        let matched: Vec<Document> = self
            .inner
            .documents
            .read()
            .iter()
            .filter(|document| filter.matches(document))
            .cloned()
            .collect();
        options.apply(matched)
    }

    async fn count(&self, filter: &Filter) -> PersistenceResult<u64> {
        let documents = self.inner.documents.read();
        Ok(documents.iter().filter(|document| filter.matches(document)).count() as u64)
    }

    async fn insert_one(&self, mut document: Document) -> PersistenceResult<Document> {
        ensure_id(&mut document, None);
        let mut documents = self.inner.documents.write();
        check_unique(&self.inner.name, &documents, &document)?;
        documents.push(document.clone());
        Ok(document)
    }

    async fn find_one_and_replace(
        &self,
        filter: &Filter,
        mut replacement: Document,
        upsert: bool,
    ) -> PersistenceResult<Option<Document>> {
        let mut documents = self.inner.documents.write();
        match documents.iter().position(|document| filter.matches(document)) {
            Some(index) => {
                let existing_id = storage_id(&documents[index]);
                match (storage_id(&replacement), existing_id) {
                    (Some(new_id), Some(old_id)) if new_id != old_id => {
                        log::error!("Replacement cannot change the {} of a document", DOC_ID);
                        return Err(PersistenceError::new(
                            &format!("Replacement cannot change the {} of a document", DOC_ID),
                            ErrorKind::InvalidOperation,
                        ));
                    }
                    (None, Some(old_id)) => {
                        replacement.insert(DOC_ID, old_id);
                    }
                    _ => {}
                }
                documents[index] = replacement.clone();
                Ok(Some(replacement))
            }
            None if upsert => {
                ensure_id(&mut replacement, id_from_filter(filter));
                check_unique(&self.inner.name, &documents, &replacement)?;
                documents.push(replacement.clone());
                Ok(Some(replacement))
            }
            None => Ok(None),
        }
    }

    async fn find_one_and_update(&self, filter: &Filter, update: &Update) -> PersistenceResult<Option<Document>> {
        let mut documents = self.inner.documents.write();
        let Some(index) = documents.iter().position(|document| filter.matches(document)) else {
            return Ok(None);
        };

        let mut updated = documents[index].clone();
        update.apply(&mut updated)?;
        documents[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn find_one_and_delete(&self, filter: &Filter) -> PersistenceResult<Option<Document>> {
        let mut documents = self.inner.documents.write();
        Ok(documents
            .iter()
            .position(|document| filter.matches(document))
            .map(|index| documents.remove(index)))
    }

    async fn delete_many(&self, filter: &Filter) -> PersistenceResult<u64> {
        let mut documents = self.inner.documents.write();
        let before = documents.len();
        documents.retain(|document| !filter.matches(document));
        Ok((before - documents.len()) as u64)
    }
}

fn storage_id(document: &Document) -> Option<Value> {
    document.get(DOC_ID).filter(|id| !id.is_null())
}

fn ensure_id(document: &mut Document, fallback: Option<Value>) {
    if storage_id(document).is_none() {
        let id = fallback.unwrap_or_else(|| Value::from(uuid::Uuid::new_v4().simple().to_string()));
        document.insert(DOC_ID, id);
    }
}

/// The id an upsert should use when the filter pins one down.
fn id_from_filter(filter: &Filter) -> Option<Value> {
    match filter {
        Filter::Equals { field, value } if field == DOC_ID => Some(value.clone()),
        Filter::And(filters) => filters.iter().find_map(id_from_filter),
        _ => None,
    }
}

fn check_unique(collection: &str, documents: &[Document], document: &Document) -> PersistenceResult<()> {
    let id = storage_id(document);
    if documents.iter().any(|existing| storage_id(existing) == id) {
        log::error!("Duplicate {} {:?} in collection {}", DOC_ID, id, collection);
        return Err(PersistenceError::new(
            &format!("Duplicate {} in collection {}", DOC_ID, collection),
            ErrorKind::UniqueConstraintViolation,
        ));
    }
    Ok(())
}

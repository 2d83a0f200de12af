use crate::common::{from_document, to_document, Document, Value, DOC_ID};
use crate::errors::PersistenceResult;
use crate::query::Projection;
use crate::repository::Identifiable;

/// Converts a record into the document stored by the driver. The record id moves
/// to `_id`; an unassigned id is left out so the driver can generate one.
pub(crate) fn record_to_document<T: Identifiable>(record: &T) -> PersistenceResult<Document> {
    let mut document = to_document(record)?;
    document.rename(T::ID_FIELD, DOC_ID);
    if document.get(DOC_ID).is_some_and(|id| id.is_null()) {
        document.remove(DOC_ID);
    }
    Ok(document)
}

pub(crate) fn document_to_record<T: Identifiable>(mut document: Document) -> PersistenceResult<T> {
    document.rename(DOC_ID, T::ID_FIELD);
    from_document(document)
}

/// Rewrites a caller projection into one over stored field names.
///
/// Returns the storage projection and whether the record id should appear in the
/// projected documents. `_id` itself is never requested from the caller side: an
/// include list naming nothing but `_id` keeps only the storage id, which
/// [finish_projection] then drops, so such documents come back empty.
pub(crate) fn storage_projection<T: Identifiable>(projection: Option<&Projection>) -> (Option<Projection>, bool) {
    let Some(projection) = projection.filter(|it| !it.is_empty()) else {
        return (None, true);
    };

    let wants_id = !projection.is_excluded(T::ID_FIELD)
        && (projection.included().is_empty() || projection.included().iter().any(|field| field == T::ID_FIELD));

    let mut storage = Projection::new();
    for field in projection.included() {
        if field == T::ID_FIELD {
            storage = storage.include(DOC_ID);
        } else if field != DOC_ID {
            storage = storage.include(field);
        }
    }
    if !projection.included().is_empty() && storage.included().is_empty() {
        storage = storage.include(DOC_ID);
    }
    for field in projection.excluded() {
        if field != T::ID_FIELD && field != DOC_ID {
            storage = storage.exclude(field);
        }
    }
    (Some(storage), wants_id)
}

/// Finishes a projected document: exposes the id under the record's id field when
/// requested and drops `_id` otherwise.
pub(crate) fn finish_projection<T: Identifiable>(mut document: Document, wants_id: bool) -> Document {
    if wants_id {
        document.rename(DOC_ID, T::ID_FIELD);
    } else {
        document.remove(DOC_ID);
    }
    document
}

pub(crate) fn key_value<T: Identifiable>(id: &T::Key) -> Value {
    id.clone().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Beacon {
        id: Option<String>,
        label: String,
    }

    impl Identifiable for Beacon {
        type Key = String;

        fn id(&self) -> Option<String> {
            self.id.clone()
        }

        fn set_id(&mut self, id: String) {
            self.id = Some(id);
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        key: Option<i64>,
        hits: i64,
    }

    impl Identifiable for Counter {
        type Key = i64;
        const ID_FIELD: &'static str = "key";

        fn id(&self) -> Option<i64> {
            self.key
        }

        fn set_id(&mut self, id: i64) {
            self.key = Some(id);
        }
    }

    #[test]
    fn id_moves_to_storage_field_and_back() {
        let beacon = Beacon {
            id: Some("b1".to_string()),
            label: "north".to_string(),
        };
        let document = record_to_document(&beacon).unwrap();
        assert_eq!(document.get(DOC_ID), Some(Value::from("b1")));
        assert!(!document.contains_key("id"));
        assert_eq!(document_to_record::<Beacon>(document).unwrap(), beacon);
    }

    #[test]
    fn unassigned_id_is_left_out() {
        let document = record_to_document(&Counter { key: None, hits: 3 }).unwrap();
        assert!(!document.contains_key(DOC_ID));
        assert!(!document.contains_key("key"));
    }

    #[test]
    fn projection_maps_custom_id_field() {
        let (storage, wants_id) =
            storage_projection::<Counter>(Some(&Projection::new().include("key").include("hits").exclude(DOC_ID)));
        assert!(wants_id);
        let storage = storage.unwrap();
        assert_eq!(storage.included(), &[DOC_ID.to_string(), "hits".to_string()]);
        assert!(storage.excluded().is_empty());

        let projected = finish_projection::<Counter>(doc! { "_id": 7, "hits": 3 }, wants_id);
        assert_eq!(projected, doc! { "key": 7, "hits": 3 });
    }

    #[test]
    fn projection_without_id_drops_storage_id() {
        let (storage, wants_id) = storage_projection::<Beacon>(Some(&Projection::new().include("label")));
        assert!(!wants_id);
        assert_eq!(storage.unwrap().included(), &["label".to_string()]);
        assert_eq!(finish_projection::<Beacon>(doc! { "_id": "b1", "label": "x" }, wants_id), doc! { "label": "x" });

        let (_, wants_id) = storage_projection::<Beacon>(Some(&Projection::new().exclude("id")));
        assert!(!wants_id);
        let (storage, wants_id) = storage_projection::<Beacon>(None);
        assert!(storage.is_none() && wants_id);
    }

    #[test]
    fn storage_id_alone_projects_to_nothing() {
        for projection in [
            Projection::new().include(DOC_ID),
            Projection::new().include(DOC_ID).exclude(DOC_ID),
        ] {
            let (storage, wants_id) = storage_projection::<Beacon>(Some(&projection));
            assert!(!wants_id);
            let storage = storage.unwrap();
            assert_eq!(storage.included(), &[DOC_ID.to_string()]);

            let fetched = storage.apply(&doc! { "_id": "b1", "label": "x" }).unwrap();
            assert!(finish_projection::<Beacon>(fetched, wants_id).is_empty());
        }
    }

    #[test]
    fn excluded_id_field_wins_over_included() {
        let (_, wants_id) = storage_projection::<Beacon>(Some(&Projection::new().include("id").include("label").exclude("id")));
        assert!(!wants_id);
    }
}

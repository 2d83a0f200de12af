use crate::common::{Document, SortOrder};
use crate::errors::PersistenceResult;
use crate::query::{Projection, Sort};

/// Options for controlling find operations on a collection.
///
/// `FindOptions` specifies sorting, pagination and projection for query results
/// and supports method chaining.
///
/// # Examples
///
/// ```rust,ignore
/// use docpersist::query::{FindOptions, Sort};
///
/// let options = FindOptions::new()
///     .sort(Sort::descending("age"))
///     .skip(10)
///     .limit(20);
///
/// let options = order_by("name", SortOrder::Ascending);
/// let options = skip_by(5);
/// let options = limit_to(100);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FindOptions {
    pub(crate) sort: Option<Sort>,
    pub(crate) skip: Option<u64>,
    pub(crate) limit: Option<u64>,
    pub(crate) projection: Option<Projection>,
}

/// Creates `FindOptions` with sorting by a field.
pub fn order_by(field_name: &str, sort_order: SortOrder) -> FindOptions {
    FindOptions::new().sort(Sort::by(field_name, sort_order))
}

/// Creates `FindOptions` that skips a number of results.
pub fn skip_by(skip: u64) -> FindOptions {
    FindOptions::new().skip(skip)
}

/// Creates `FindOptions` that limits the number of results.
///
/// Combined with skip for pagination: skip(10).limit(20) returns results 11-30.
pub fn limit_to(limit: u64) -> FindOptions {
    FindOptions::new().limit(limit)
}

impl FindOptions {
    pub fn new() -> FindOptions {
        FindOptions {
            sort: None,
            skip: None,
            limit: None,
            projection: None,
        }
    }

    /// Sets the number of documents to skip.
    pub fn skip(mut self, skip: u64) -> FindOptions {
        self.skip = Some(skip);
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: u64) -> FindOptions {
        self.limit = Some(limit);
        self
    }

    /// Sets the sort; an empty sort is ignored.
    pub fn sort(mut self, sort: Sort) -> FindOptions {
        self.sort = if sort.is_empty() { None } else { Some(sort) };
        self
    }

    pub fn sort_by(mut self, field_name: &str, sort_order: SortOrder) -> FindOptions {
        let sort = match self.sort.take() {
            Some(sort) => sort.then(field_name, sort_order),
            None => Sort::by(field_name, sort_order),
        };
        self.sort = Some(sort);
        self
    }

    pub fn projection(mut self, projection: Projection) -> FindOptions {
        self.projection = Some(projection);
        self
    }

    pub fn get_sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    pub fn get_skip(&self) -> Option<u64> {
        self.skip
    }

    pub fn get_limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn get_projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    /// Applies sort, skip, limit and projection to documents that already
    /// matched a filter, in that order.
    pub fn apply(&self, mut documents: Vec<Document>) -> PersistenceResult<Vec<Document>> {
        if let Some(sort) = &self.sort {
            documents.sort_by(|a, b| sort.compare(a, b));
        }

        let skip = usize::try_from(self.skip.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = self
            .limit
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        documents
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|document| match &self.projection {
                Some(projection) => projection.apply(&document),
                None => Ok(document),
            })
            .collect()
    }
}

use crate::config::ConfigParams;

/// Paging request: how many records to skip, how many to take, and whether the
/// total number of matches should be counted.
///
/// Counting needs an extra query, so it only happens when `total` is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PagingParams {
    pub skip: Option<u64>,
    pub take: Option<u64>,
    #[serde(default)]
    pub total: bool,
}

impl PagingParams {
    pub fn new(skip: Option<u64>, take: Option<u64>, total: bool) -> Self {
        PagingParams { skip, take, total }
    }

    /// Reads `skip`, `take` and `total` from a flat configuration.
    pub fn from_config(config: &ConfigParams) -> Self {
        let read = |key: &str| config.get(key).and_then(|it| it.trim().parse::<u64>().ok());
        PagingParams {
            skip: read("skip"),
            take: read("take"),
            total: config.get_as_bool_or("total", false),
        }
    }

    pub fn with_total(mut self, total: bool) -> Self {
        self.total = total;
        self
    }

    /// Returns the number of records to skip, never below `min_skip`.
    pub fn get_skip(&self, min_skip: u64) -> u64 {
        self.skip.unwrap_or(min_skip).max(min_skip)
    }

    /// Returns the number of records to take, capped at `max_take`.
    pub fn get_take(&self, max_take: u64) -> u64 {
        self.take.unwrap_or(max_take).min(max_take)
    }

    pub fn has_total(&self) -> bool {
        self.total
    }
}

/// A bounded slice of a larger result set plus an optional total count.
///
/// `total` is [None] when the caller did not ask for it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DataPage<T> {
    pub data: Vec<T>,
    pub total: Option<u64>,
}

impl<T> DataPage<T> {
    pub fn new(data: Vec<T>, total: Option<u64>) -> Self {
        DataPage { data, total }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Converts every item of the page, keeping the total.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> DataPage<U> {
        DataPage {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

impl<T> Default for DataPage<T> {
    fn default() -> Self {
        DataPage {
            data: Vec::new(),
            total: None,
        }
    }
}

use crate::common::{Document, Value, DOC_ID};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// A native filter expression.
///
/// Filters form a small tree that drivers translate into their own query language.
/// Drivers without a query language (such as the in-memory driver) evaluate the tree
/// directly with [`Filter::matches`].
///
/// # Examples
///
/// ```rust,ignore
/// use docpersist::query::{field, Filter};
///
/// let filter = field("age").gt(30).and(field("status").eq("active"));
/// let everything = Filter::All;
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Filter {
    /// Matches every document.
    #[default]
    All,
    Equals { field: String, value: Value },
    NotEquals { field: String, value: Value },
    In { field: String, values: Vec<Value> },
    Gt { field: String, value: Value },
    Gte { field: String, value: Value },
    Lt { field: String, value: Value },
    Lte { field: String, value: Value },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// Matches the document stored under `id`.
    pub fn by_id(id: impl Into<Value>) -> Filter {
        Filter::Equals {
            field: DOC_ID.to_string(),
            value: id.into(),
        }
    }

    /// Matches the documents stored under any of `ids`.
    pub fn by_ids<T: Into<Value>>(ids: impl IntoIterator<Item = T>) -> Filter {
        Filter::In {
            field: DOC_ID.to_string(),
            values: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Combines this filter with `other`; both must match. Nested conjunctions are
    /// flattened and [Filter::All] is absorbed.
    pub fn and(self, other: Filter) -> Filter {
        match (self, other) {
            (Filter::All, other) => other,
            (this, Filter::All) => this,
            (Filter::And(mut left), Filter::And(right)) => {
                left.extend(right);
                Filter::And(left)
            }
            (Filter::And(mut left), other) => {
                left.push(other);
                Filter::And(left)
            }
            (this, other) => Filter::And(vec![this, other]),
        }
    }

    /// Combines this filter with `other`; either may match.
    pub fn or(self, other: Filter) -> Filter {
        match (self, other) {
            (Filter::Or(mut left), Filter::Or(right)) => {
                left.extend(right);
                Filter::Or(left)
            }
            (Filter::Or(mut left), other) => {
                left.push(other);
                Filter::Or(left)
            }
            (this, other) => Filter::Or(vec![this, other]),
        }
    }

    pub fn not(self) -> Filter {
        Filter::Not(Box::new(self))
    }

    /// Returns the filter with every reference to `from` replaced by `to`.
    pub fn rename_field(self, from: &str, to: &str) -> Filter {
        let rename = |field: String| if field == from { to.to_string() } else { field };
        match self {
            Filter::All => Filter::All,
            Filter::Equals { field, value } => Filter::Equals { field: rename(field), value },
            Filter::NotEquals { field, value } => Filter::NotEquals { field: rename(field), value },
            Filter::In { field, values } => Filter::In { field: rename(field), values },
            Filter::Gt { field, value } => Filter::Gt { field: rename(field), value },
            Filter::Gte { field, value } => Filter::Gte { field: rename(field), value },
            Filter::Lt { field, value } => Filter::Lt { field: rename(field), value },
            Filter::Lte { field, value } => Filter::Lte { field: rename(field), value },
            Filter::And(filters) => {
                Filter::And(filters.into_iter().map(|f| f.rename_field(from, to)).collect())
            }
            Filter::Or(filters) => {
                Filter::Or(filters.into_iter().map(|f| f.rename_field(from, to)).collect())
            }
            Filter::Not(filter) => Filter::Not(Box::new(filter.rename_field(from, to))),
        }
    }

    /// Evaluates the filter against a document.
    ///
    /// A missing field reads as null. Range comparisons only match values of the
    /// same kind (numbers with numbers, strings with strings).
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Equals { field, value } => &field_value(document, field) == value,
            Filter::NotEquals { field, value } => &field_value(document, field) != value,
            Filter::In { field, values } => {
                let actual = field_value(document, field);
                values.iter().any(|value| value == &actual)
            }
            Filter::Gt { field, value } => compare(document, field, value, |o| o == Ordering::Greater),
            Filter::Gte { field, value } => compare(document, field, value, |o| o != Ordering::Less),
            Filter::Lt { field, value } => compare(document, field, value, |o| o == Ordering::Less),
            Filter::Lte { field, value } => compare(document, field, value, |o| o != Ordering::Greater),
            Filter::And(filters) => filters.iter().all(|filter| filter.matches(document)),
            Filter::Or(filters) => filters.iter().any(|filter| filter.matches(document)),
            Filter::Not(filter) => !filter.matches(document),
        }
    }
}

fn field_value(document: &Document, field: &str) -> Value {
    document.get(field).unwrap_or(Value::Null)
}

fn compare(document: &Document, field: &str, value: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    match document.get(field) {
        Some(actual) if !actual.is_null() && actual.type_rank() == value.type_rank() => {
            accept(actual.cmp(value))
        }
        _ => false,
    }
}

fn join(f: &mut Formatter<'_>, filters: &[Filter], operator: &str) -> std::fmt::Result {
    write!(f, "(")?;
    for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", operator)?;
        }
        write!(f, "{}", filter)?;
    }
    write!(f, ")")
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::All => write!(f, "AllFilter"),
            Filter::Equals { field, value } => write!(f, "({} == {})", field, value),
            Filter::NotEquals { field, value } => write!(f, "({} != {})", field, value),
            Filter::In { field, values } => write!(f, "({} in {})", field, Value::Array(values.clone())),
            Filter::Gt { field, value } => write!(f, "({} > {})", field, value),
            Filter::Gte { field, value } => write!(f, "({} >= {})", field, value),
            Filter::Lt { field, value } => write!(f, "({} < {})", field, value),
            Filter::Lte { field, value } => write!(f, "({} <= {})", field, value),
            Filter::And(filters) => join(f, filters, "&&"),
            Filter::Or(filters) => join(f, filters, "||"),
            Filter::Not(filter) => write!(f, "!{}", filter),
        }
    }
}

use crate::common::Value;
use crate::query::Filter;

/// Creates a fluent filter builder for the specified field name.
///
/// Embedded fields use the field separator: `field("address.city").eq("Paris")`.
pub fn field(field_name: &str) -> FluentFilter {
    FluentFilter {
        field_name: field_name.to_string(),
    }
}

/// Creates a filter that matches every document.
pub fn all() -> Filter {
    Filter::All
}

/// A fluent builder for constructing filters on a specific field.
///
/// Each method returns a [Filter] that can be passed to a find operation or
/// combined with other filters through [`Filter::and`], [`Filter::or`] and
/// [`Filter::not`].
pub struct FluentFilter {
    field_name: String,
}

impl FluentFilter {
    #[inline]
    pub fn eq<T: Into<Value>>(self, value: T) -> Filter {
        Filter::Equals {
            field: self.field_name,
            value: value.into(),
        }
    }

    #[inline]
    pub fn ne<T: Into<Value>>(self, value: T) -> Filter {
        Filter::NotEquals {
            field: self.field_name,
            value: value.into(),
        }
    }

    #[inline]
    pub fn gt<T: Into<Value>>(self, value: T) -> Filter {
        Filter::Gt {
            field: self.field_name,
            value: value.into(),
        }
    }

    #[inline]
    pub fn gte<T: Into<Value>>(self, value: T) -> Filter {
        Filter::Gte {
            field: self.field_name,
            value: value.into(),
        }
    }

    #[inline]
    pub fn lt<T: Into<Value>>(self, value: T) -> Filter {
        Filter::Lt {
            field: self.field_name,
            value: value.into(),
        }
    }

    #[inline]
    pub fn lte<T: Into<Value>>(self, value: T) -> Filter {
        Filter::Lte {
            field: self.field_name,
            value: value.into(),
        }
    }

    /// Matches documents where the field value is one of `values`.
    pub fn in_list<T: Into<Value>>(self, values: Vec<T>) -> Filter {
        Filter::In {
            field: self.field_name,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Matches documents where the field value is none of `values`.
    pub fn not_in_list<T: Into<Value>>(self, values: Vec<T>) -> Filter {
        self.in_list(values).not()
    }

    /// Matches documents where the field value lies within `[lower, upper]`.
    pub fn between<T: Into<Value>>(self, lower: T, upper: T) -> Filter {
        let upper_bound = Filter::Lte {
            field: self.field_name.clone(),
            value: upper.into(),
        };
        self.gte(lower).and(upper_bound)
    }
}

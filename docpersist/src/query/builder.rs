use crate::common::DOC_ID;
use crate::data::{FilterParams, ProjectionParams, SortParams, UpdateParams};
use crate::query::{Filter, Projection, Sort, Update};

/// Translates generic parameter objects into native query expressions.
///
/// Every method has a default translation; a data-access type that needs richer
/// predicates (ranges, text search, computed fields) implements this trait and
/// overrides only the methods it cares about, then hands the builder to its
/// [`IdentifiablePersistence`](crate::repository::IdentifiablePersistence).
///
/// ```rust,ignore
/// struct BeaconQueryBuilder;
///
/// impl QueryBuilder for BeaconQueryBuilder {
///     fn compose_filter(&self, params: Option<&FilterParams>) -> Filter {
///         let mut filter = default_filter(params);
///         if let Some(label) = params.and_then(|p| p.get_as_string("label_prefix")) {
///             filter = filter.and(field("label").gte(label));
///         }
///         filter
///     }
/// }
/// ```
pub trait QueryBuilder: Send + Sync {
    fn compose_filter(&self, params: Option<&FilterParams>) -> Filter {
        default_filter(params)
    }

    fn compose_sort(&self, params: Option<&SortParams>) -> Option<Sort> {
        default_sort(params)
    }

    fn compose_update(&self, params: Option<&UpdateParams>) -> Option<Update> {
        default_update(params)
    }

    fn compose_projection(&self, params: Option<&ProjectionParams>) -> Option<Projection> {
        default_projection(params)
    }
}

/// Query builder using the default translations.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultQueryBuilder;

impl QueryBuilder for DefaultQueryBuilder {}

/// AND of one equality per key, in key order; no keys match everything.
pub fn default_filter(params: Option<&FilterParams>) -> Filter {
    let Some(params) = params.filter(|it| !it.is_empty()) else {
        return Filter::All;
    };

    let filters: Vec<Filter> = params
        .iter()
        .map(|(field, value)| Filter::Equals {
            field: field.clone(),
            value: value.clone(),
        })
        .collect();
    Filter::And(filters)
}

/// One sort key per listed field, earlier fields first.
pub fn default_sort(params: Option<&SortParams>) -> Option<Sort> {
    let params = params.filter(|it| !it.is_empty())?;
    Some(
        params
            .iter()
            .fold(Sort::new(), |sort, field| sort.then(&field.name, field.order)),
    )
}

/// One set operation per key, combined.
pub fn default_update(params: Option<&UpdateParams>) -> Option<Update> {
    let params = params.filter(|it| !it.is_empty())?;
    Some(Update::Combine(
        params
            .iter()
            .map(|(field, value)| Update::Set {
                field: field.clone(),
                value: value.clone(),
            })
            .collect(),
    ))
}

/// Includes the listed fields and always excludes the storage id.
pub fn default_projection(params: Option<&ProjectionParams>) -> Option<Projection> {
    let params = params.filter(|it| !it.is_empty())?;
    Some(
        params
            .iter()
            .fold(Projection::new(), |projection, field| projection.include(field))
            .exclude(DOC_ID),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{SortOrder, Value};
    use crate::query::field;

    #[test]
    fn filter_params_become_conjunction_of_equalities() {
        let params = FilterParams::new().with("status", "active").with("age", 30);
        assert_eq!(
            DefaultQueryBuilder.compose_filter(Some(&params)),
            Filter::And(vec![field("status").eq("active"), field("age").eq(30)])
        );
    }

    #[test]
    fn absent_or_empty_filter_matches_all() {
        assert_eq!(DefaultQueryBuilder.compose_filter(None), Filter::All);
        assert_eq!(DefaultQueryBuilder.compose_filter(Some(&FilterParams::new())), Filter::All);
    }

    #[test]
    fn sort_params_keep_listed_order() {
        let params = SortParams::new().descending("age").ascending("name");
        let sort = DefaultQueryBuilder.compose_sort(Some(&params)).unwrap();
        assert_eq!(
            sort.fields(),
            &[
                ("age".to_string(), SortOrder::Descending),
                ("name".to_string(), SortOrder::Ascending)
            ]
        );
        assert!(DefaultQueryBuilder.compose_sort(None).is_none());
    }

    #[test]
    fn update_params_become_combined_sets() {
        let params = UpdateParams::new().with("name", "x").with("age", 3);
        assert_eq!(
            DefaultQueryBuilder.compose_update(Some(&params)),
            Some(Update::Combine(vec![
                Update::Set { field: "name".to_string(), value: Value::from("x") },
                Update::Set { field: "age".to_string(), value: Value::I64(3) },
            ]))
        );
        assert!(DefaultQueryBuilder.compose_update(Some(&UpdateParams::new())).is_none());
    }

    #[test]
    fn projection_always_excludes_storage_id() {
        let params = ProjectionParams::from_fields(["name", "_id"]);
        let projection = DefaultQueryBuilder.compose_projection(Some(&params)).unwrap();
        assert_eq!(projection.included(), &["name".to_string(), "_id".to_string()]);
        assert!(projection.is_excluded("_id"));
    }

    #[test]
    fn custom_builder_overrides_one_translation() {
        struct RangeBuilder;
        impl QueryBuilder for RangeBuilder {
            fn compose_filter(&self, params: Option<&FilterParams>) -> Filter {
                let min_age = params.and_then(|p| p.get("min_age")).cloned();
                match min_age {
                    Some(age) => field("age").gte(age),
                    None => Filter::All,
                }
            }
        }

        let params = FilterParams::new().with("min_age", 18);
        assert_eq!(RangeBuilder.compose_filter(Some(&params)), field("age").gte(18));
        assert!(RangeBuilder.compose_sort(None).is_none());
    }
}

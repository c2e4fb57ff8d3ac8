//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument. Filtered listings share the
//! descriptor-to-SQL translation below.

use sqlx::{Postgres, QueryBuilder};

use reachly_core::query::{FilterDescriptor, SortDirection, DEFAULT_ORDER_FIELD};

pub mod application_repo;
pub mod campaign_repo;

pub use application_repo::ApplicationRepo;
pub use campaign_repo::CampaignRepo;

/// Translate a [`FilterDescriptor`] into `WHERE` / `ORDER BY` / `LIMIT`
/// clauses on `builder`.
///
/// Field names are checked against per-collection whitelists; an unknown
/// field is reported as [`sqlx::Error::ColumnNotFound`] before any query is
/// issued. Ordering defaults to `created_at DESC` when the descriptor leaves
/// it unset.
pub(crate) fn push_descriptor(
    builder: &mut QueryBuilder<'_, Postgres>,
    descriptor: &FilterDescriptor,
    filterable: &[&str],
    orderable: &[&str],
) -> Result<(), sqlx::Error> {
    use reachly_core::query::FilterValue;

    builder.push(" WHERE TRUE");
    for predicate in &descriptor.predicates {
        if !filterable.contains(&predicate.field.as_str()) {
            return Err(sqlx::Error::ColumnNotFound(predicate.field.clone()));
        }
        builder.push(" AND ");
        builder.push(predicate.field.as_str());
        builder.push(" = ");
        match &predicate.value {
            FilterValue::Id(v) => builder.push_bind(*v),
            FilterValue::Text(v) => builder.push_bind(v.clone()),
            FilterValue::Flag(v) => builder.push_bind(*v),
        };
    }

    let (field, direction) = match &descriptor.order {
        Some(order) => (order.field.as_str(), order.direction),
        None => (DEFAULT_ORDER_FIELD, SortDirection::Desc),
    };
    if !orderable.contains(&field) {
        return Err(sqlx::Error::ColumnNotFound(field.to_string()));
    }
    builder.push(" ORDER BY ");
    builder.push(field);
    builder.push(" ");
    builder.push(direction.as_sql());

    if let Some(limit) = descriptor.limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit);
    }

    Ok(())
}

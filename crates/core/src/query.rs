//! Declarative filter descriptors shared by one-shot queries and live feeds.
//!
//! A [`FilterDescriptor`] is an ordered list of equality predicates, an
//! ordering specification, and an optional result limit. The repository
//! layer translates it into SQL against a whitelist of filterable columns;
//! the live feed re-runs the same descriptor on every change.

use serde::{Deserialize, Serialize};

use crate::campaign;
use crate::types::DbId;

/// Default number of rows returned by a filtered list.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Maximum number of rows returned by a filtered list.
pub const MAX_LIST_LIMIT: i64 = 200;

/// Default ordering field when the caller's descriptor leaves it unset.
pub const DEFAULT_ORDER_FIELD: &str = "created_at";

/// Clamp a caller-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).max(1).min(MAX_LIST_LIMIT)
}

// ---------------------------------------------------------------------------
// Descriptor types
// ---------------------------------------------------------------------------

/// A value an equality predicate compares against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Id(DbId),
    Text(String),
    Flag(bool),
}

/// A single `field = value` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: String,
    pub value: FilterValue,
}

/// Sort direction for an ordering specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// The SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Ordering specification (field plus direction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ordering {
    pub field: String,
    pub direction: SortDirection,
}

/// A declarative (predicates, ordering, limit) query description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub predicates: Vec<Predicate>,
    pub order: Option<Ordering>,
    pub limit: Option<i64>,
}

impl FilterDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an equality predicate.
    pub fn with_eq(mut self, field: impl Into<String>, value: FilterValue) -> Self {
        self.predicates.push(Predicate {
            field: field.into(),
            value,
        });
        self
    }

    /// Set the ordering, replacing any previous one.
    pub fn with_order(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order = Some(Ordering {
            field: field.into(),
            direction,
        });
        self
    }

    /// Set the result limit.
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns `true` if a predicate on `field` is already present.
    pub fn has_predicate(&self, field: &str) -> bool {
        self.predicates.iter().any(|p| p.field == field)
    }
}

// ---------------------------------------------------------------------------
// Named-input builders
// ---------------------------------------------------------------------------

/// Named filter inputs for campaign listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignQuery {
    pub brand_id: Option<DbId>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
}

impl CampaignQuery {
    /// Build the filter descriptor for these inputs.
    ///
    /// Ordering defaults to newest-first by creation time.
    pub fn descriptor(&self) -> FilterDescriptor {
        let mut descriptor = FilterDescriptor::new();
        if let Some(brand_id) = self.brand_id {
            descriptor = descriptor.with_eq("brand_id", FilterValue::Id(brand_id));
        }
        if let Some(ref status) = self.status {
            descriptor = descriptor.with_eq("status", FilterValue::Text(status.clone()));
        }
        if let Some(ref category) = self.category {
            descriptor = descriptor.with_eq("category", FilterValue::Text(category.clone()));
        }
        descriptor
            .with_order(DEFAULT_ORDER_FIELD, SortDirection::Desc)
            .with_limit(clamp_limit(self.limit))
    }

    /// Build the descriptor for the public (influencer-facing) listing.
    ///
    /// Forces `status = active` regardless of the caller's status input, so
    /// non-active campaigns are never visible to the browsing side.
    pub fn public_descriptor(&self) -> FilterDescriptor {
        let forced = CampaignQuery {
            status: Some(campaign::STATUS_ACTIVE.to_string()),
            ..self.clone()
        };
        forced.descriptor()
    }
}

/// Named filter inputs for application listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationQuery {
    pub campaign_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub status: Option<String>,
    pub limit: Option<i64>,
}

impl ApplicationQuery {
    /// Build the filter descriptor for these inputs.
    pub fn descriptor(&self) -> FilterDescriptor {
        let mut descriptor = FilterDescriptor::new();
        if let Some(campaign_id) = self.campaign_id {
            descriptor = descriptor.with_eq("campaign_id", FilterValue::Id(campaign_id));
        }
        if let Some(user_id) = self.user_id {
            descriptor = descriptor.with_eq("user_id", FilterValue::Id(user_id));
        }
        if let Some(ref status) = self.status {
            descriptor = descriptor.with_eq("status", FilterValue::Text(status.clone()));
        }
        descriptor
            .with_order(DEFAULT_ORDER_FIELD, SortDirection::Desc)
            .with_limit(clamp_limit(self.limit))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None), DEFAULT_LIST_LIMIT);
    }

    #[test]
    fn clamp_limit_respects_max() {
        assert_eq!(clamp_limit(Some(10_000)), MAX_LIST_LIMIT);
    }

    #[test]
    fn clamp_limit_floors_at_one() {
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-5)), 1);
    }

    #[test]
    fn campaign_query_builds_predicates_in_order() {
        let query = CampaignQuery {
            brand_id: Some(7),
            status: Some("draft".to_string()),
            category: None,
            limit: None,
        };
        let descriptor = query.descriptor();

        assert_eq!(descriptor.predicates.len(), 2);
        assert_eq!(descriptor.predicates[0].field, "brand_id");
        assert_eq!(descriptor.predicates[0].value, FilterValue::Id(7));
        assert_eq!(descriptor.predicates[1].field, "status");
        assert_eq!(
            descriptor.order,
            Some(Ordering {
                field: "created_at".to_string(),
                direction: SortDirection::Desc,
            })
        );
        assert_eq!(descriptor.limit, Some(DEFAULT_LIST_LIMIT));
    }

    #[test]
    fn public_descriptor_forces_active_status() {
        let query = CampaignQuery {
            status: Some("draft".to_string()),
            ..Default::default()
        };
        let descriptor = query.public_descriptor();

        let statuses: Vec<_> = descriptor
            .predicates
            .iter()
            .filter(|p| p.field == "status")
            .collect();
        assert_eq!(statuses.len(), 1);
        assert_eq!(
            statuses[0].value,
            FilterValue::Text("active".to_string())
        );
    }

    #[test]
    fn application_query_by_user_and_campaign() {
        let query = ApplicationQuery {
            campaign_id: Some(3),
            user_id: Some(11),
            status: None,
            limit: Some(5),
        };
        let descriptor = query.descriptor();
        assert!(descriptor.has_predicate("campaign_id"));
        assert!(descriptor.has_predicate("user_id"));
        assert!(!descriptor.has_predicate("status"));
        assert_eq!(descriptor.limit, Some(5));
    }

    #[test]
    fn sort_direction_sql_keywords() {
        assert_eq!(SortDirection::Asc.as_sql(), "ASC");
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
    }
}

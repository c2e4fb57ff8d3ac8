//! Client-side multi-criteria campaign filtering.
//!
//! [`CampaignFilters`] models the browse-page filter state: every group at
//! its default value is a no-op, set groups combine with logical AND. A
//! campaign whose facets cannot be evaluated (malformed budget, unknown
//! urgency) is *included* with a warning rather than silently dropped —
//! an evaluator bug must never hide data from the browsing side.

use serde::Deserialize;

use crate::campaign::is_valid_urgency;
use crate::types::DbId;

/// Location filter value meaning "no location restriction".
pub const ALL_LOCATIONS: &str = "All Locations";

/// Location filter value matched against the remote flag instead of the
/// literal location string.
pub const LOCATION_REMOTE: &str = "Remote";

/// Urgency filter value meaning "no urgency restriction".
pub const URGENCY_ALL: &str = "all";

// ---------------------------------------------------------------------------
// Facet access
// ---------------------------------------------------------------------------

/// Read access to the campaign fields the filter evaluates.
///
/// Implemented by the persistence layer's campaign row so the evaluator
/// stays free of storage concerns.
pub trait CampaignFacets {
    fn id(&self) -> DbId;
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn category(&self) -> &str;
    fn budget(&self) -> f64;
    fn location(&self) -> Option<&str>;
    fn is_remote(&self) -> bool;
    fn content_types(&self) -> &[String];
    fn min_followers(&self) -> i64;
    fn urgency(&self) -> &str;
}

/// Case-insensitive substring match over title, description, category, and
/// content types.
pub fn matches_search(term: &str, campaign: &impl CampaignFacets) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    campaign.title().to_lowercase().contains(&needle)
        || campaign.description().to_lowercase().contains(&needle)
        || campaign.category().to_lowercase().contains(&needle)
        || campaign
            .content_types()
            .iter()
            .any(|t| t.to_lowercase().contains(&needle))
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

fn default_location() -> String {
    ALL_LOCATIONS.to_string()
}

fn default_urgency() -> String {
    URGENCY_ALL.to_string()
}

fn default_budget_max() -> f64 {
    f64::INFINITY
}

fn default_followers_max() -> i64 {
    i64::MAX
}

/// Browse-page filter state. All groups AND together; a group left at its
/// default is always-pass.
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignFilters {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub budget_min: f64,
    #[serde(default = "default_budget_max")]
    pub budget_max: f64,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub content_types: Vec<String>,
    #[serde(default)]
    pub followers_min: i64,
    #[serde(default = "default_followers_max")]
    pub followers_max: i64,
    #[serde(default = "default_urgency")]
    pub urgency: String,
}

impl Default for CampaignFilters {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            budget_min: 0.0,
            budget_max: default_budget_max(),
            location: default_location(),
            content_types: Vec::new(),
            followers_min: 0,
            followers_max: default_followers_max(),
            urgency: default_urgency(),
        }
    }
}

impl CampaignFilters {
    /// Evaluate all predicate groups against one campaign.
    ///
    /// Groups are evaluated in a fixed order; the first failing group
    /// excludes the campaign, the first unevaluable group includes it with
    /// a warning (fail-open).
    pub fn matches(&self, campaign: &impl CampaignFacets) -> bool {
        let groups: [(&str, Option<bool>); 7] = [
            ("search", self.search_group(campaign)),
            ("category", self.category_group(campaign)),
            ("budget", self.budget_group(campaign)),
            ("location", self.location_group(campaign)),
            ("content_types", self.content_types_group(campaign)),
            ("followers", self.followers_group(campaign)),
            ("urgency", self.urgency_group(campaign)),
        ];

        for (name, result) in groups {
            match result {
                Some(true) => {}
                Some(false) => return false,
                None => {
                    tracing::warn!(
                        campaign_id = campaign.id(),
                        group = name,
                        "filter group could not be evaluated, including campaign"
                    );
                    return true;
                }
            }
        }
        true
    }

    /// Apply the filter to a fetched campaign list.
    pub fn apply<T: CampaignFacets>(&self, campaigns: Vec<T>) -> Vec<T> {
        campaigns.into_iter().filter(|c| self.matches(c)).collect()
    }

    // -- predicate groups ----------------------------------------------------

    fn search_group(&self, campaign: &impl CampaignFacets) -> Option<bool> {
        match self.search {
            None => Some(true),
            Some(ref term) => Some(matches_search(term, campaign)),
        }
    }

    fn category_group(&self, campaign: &impl CampaignFacets) -> Option<bool> {
        match self.category {
            None => Some(true),
            Some(ref category) if category.is_empty() => Some(true),
            Some(ref category) => Some(campaign.category().eq_ignore_ascii_case(category)),
        }
    }

    fn budget_group(&self, campaign: &impl CampaignFacets) -> Option<bool> {
        if self.budget_min <= 0.0 && self.budget_max == f64::INFINITY {
            return Some(true);
        }
        let budget = campaign.budget();
        if !budget.is_finite() || budget < 0.0 {
            return None;
        }
        Some(budget >= self.budget_min && budget <= self.budget_max)
    }

    fn location_group(&self, campaign: &impl CampaignFacets) -> Option<bool> {
        if self.location == ALL_LOCATIONS {
            return Some(true);
        }
        if self.location == LOCATION_REMOTE {
            return Some(campaign.is_remote());
        }
        Some(
            campaign
                .location()
                .map(|l| l.eq_ignore_ascii_case(&self.location))
                .unwrap_or(false),
        )
    }

    fn content_types_group(&self, campaign: &impl CampaignFacets) -> Option<bool> {
        if self.content_types.is_empty() {
            return Some(true);
        }
        Some(self.content_types.iter().any(|wanted| {
            campaign
                .content_types()
                .iter()
                .any(|have| have.eq_ignore_ascii_case(wanted))
        }))
    }

    fn followers_group(&self, campaign: &impl CampaignFacets) -> Option<bool> {
        if self.followers_min <= 0 && self.followers_max == i64::MAX {
            return Some(true);
        }
        let required = campaign.min_followers();
        if required < 0 {
            return None;
        }
        Some(required >= self.followers_min && required <= self.followers_max)
    }

    fn urgency_group(&self, campaign: &impl CampaignFacets) -> Option<bool> {
        if self.urgency == URGENCY_ALL {
            return Some(true);
        }
        if !is_valid_urgency(campaign.urgency()) {
            return None;
        }
        Some(campaign.urgency() == self.urgency)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

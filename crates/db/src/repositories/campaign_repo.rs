//! Repository for the `campaigns` table.

use sqlx::{PgPool, QueryBuilder};

use reachly_core::query::FilterDescriptor;
use reachly_core::types::DbId;

use crate::models::campaign::{Campaign, CampaignChanges, NewCampaign};
use crate::repositories::push_descriptor;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, brand_id, title, description, category, budget, deadline, status, \
     applications_count, selected_influencers, views, location, is_remote, content_types, \
     min_followers, urgency, activated_at, completed_at, created_at, updated_at";

/// Columns a filter descriptor may reference with an equality predicate.
const FILTERABLE: &[&str] = &[
    "brand_id",
    "status",
    "category",
    "urgency",
    "is_remote",
    "location",
];

/// Columns a filter descriptor may order by.
const ORDERABLE: &[&str] = &["created_at", "updated_at", "budget", "deadline"];

/// Provides CRUD and counter operations for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a new campaign, returning the created row.
    ///
    /// Creating directly as `active` stamps the activation time.
    pub async fn create(
        pool: &PgPool,
        brand_id: DbId,
        input: &NewCampaign,
    ) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns (brand_id, title, description, category, budget, deadline, \
                 status, location, is_remote, content_types, min_followers, urgency, activated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                     CASE WHEN $7 = 'active' THEN NOW() ELSE NULL END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(brand_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.budget)
            .bind(input.deadline)
            .bind(&input.status)
            .bind(&input.location)
            .bind(input.is_remote)
            .bind(&input.content_types)
            .bind(input.min_followers)
            .bind(&input.urgency)
            .fetch_one(pool)
            .await
    }

    /// Insert a campaign under a caller-supplied id.
    ///
    /// Collision is last-write-wins: an existing row with the same id is
    /// overwritten wholesale, no pre-existence check is performed.
    pub async fn create_with_id(
        pool: &PgPool,
        id: DbId,
        brand_id: DbId,
        input: &NewCampaign,
    ) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns (id, brand_id, title, description, category, budget, deadline, \
                 status, location, is_remote, content_types, min_followers, urgency, activated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                     CASE WHEN $8 = 'active' THEN NOW() ELSE NULL END)
             ON CONFLICT (id) DO UPDATE SET
                brand_id = EXCLUDED.brand_id,
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                category = EXCLUDED.category,
                budget = EXCLUDED.budget,
                deadline = EXCLUDED.deadline,
                status = EXCLUDED.status,
                location = EXCLUDED.location,
                is_remote = EXCLUDED.is_remote,
                content_types = EXCLUDED.content_types,
                min_followers = EXCLUDED.min_followers,
                urgency = EXCLUDED.urgency,
                activated_at = EXCLUDED.activated_at,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(brand_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.budget)
            .bind(input.deadline)
            .bind(&input.status)
            .bind(&input.location)
            .bind(input.is_remote)
            .bind(&input.content_types)
            .bind(input.min_followers)
            .bind(&input.urgency)
            .fetch_one(pool)
            .await
    }

    /// Find a campaign by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a campaign. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CampaignChanges,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                budget = COALESCE($5, budget),
                deadline = COALESCE($6, deadline),
                location = COALESCE($7, location),
                is_remote = COALESCE($8, is_remote),
                content_types = COALESCE($9, content_types),
                min_followers = COALESCE($10, min_followers),
                urgency = COALESCE($11, urgency),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.budget)
            .bind(input.deadline)
            .bind(&input.location)
            .bind(input.is_remote)
            .bind(&input.content_types)
            .bind(input.min_followers)
            .bind(&input.urgency)
            .fetch_optional(pool)
            .await
    }

    /// Set the campaign status, stamping lifecycle timestamps.
    ///
    /// Entering `active` stamps the activation time once; entering
    /// `completed` stamps the completion time.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET
                status = $2,
                activated_at = CASE
                    WHEN $2 = 'active' AND activated_at IS NULL THEN NOW()
                    ELSE activated_at
                END,
                completed_at = CASE WHEN $2 = 'completed' THEN NOW() ELSE completed_at END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a campaign. Returns `true` if a row was removed.
    ///
    /// Idempotent: deleting a missing id is not an error. Applications
    /// referencing the campaign are removed by the FK cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically bump the view counter. Returns `true` if the row exists.
    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE campaigns SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically bump the applications counter. Returns `true` if the row
    /// exists.
    pub async fn increment_applications(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE campaigns SET applications_count = applications_count + 1 WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Append an influencer to the selected set, suppressing duplicates.
    ///
    /// The guard runs inside the single UPDATE, so concurrent calls with the
    /// same influencer cannot double-add. Returns `true` if the influencer
    /// was appended, `false` if already present or the campaign is missing.
    pub async fn add_selected_influencer(
        pool: &PgPool,
        id: DbId,
        influencer_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE campaigns SET
                selected_influencers = array_append(selected_influencers, $2),
                updated_at = NOW()
             WHERE id = $1 AND NOT ($2 = ANY(selected_influencers))",
        )
        .bind(id)
        .bind(influencer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove an influencer from the selected set. Returns `true` if the
    /// campaign row exists.
    pub async fn remove_selected_influencer(
        pool: &PgPool,
        id: DbId,
        influencer_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE campaigns SET
                selected_influencers = array_remove(selected_influencers, $2),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(influencer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List campaigns matching a filter descriptor.
    pub async fn list_filtered(
        pool: &PgPool,
        descriptor: &FilterDescriptor,
    ) -> Result<Vec<Campaign>, sqlx::Error> {
        let mut builder = QueryBuilder::new(format!("SELECT {COLUMNS} FROM campaigns"));
        push_descriptor(&mut builder, descriptor, FILTERABLE, ORDERABLE)?;
        builder
            .build_query_as::<Campaign>()
            .fetch_all(pool)
            .await
    }
}

//! Repository for the `applications` table.

use sqlx::{PgPool, QueryBuilder};

use reachly_core::application::{STATUS_ACCEPTED, STATUS_WITHDRAWN};
use reachly_core::query::FilterDescriptor;
use reachly_core::types::DbId;

use crate::models::application::{Application, NewApplication, UpdateApplication};
use crate::repositories::push_descriptor;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, campaign_id, user_id, status, cover_letter, proposed_rate, \
     portfolio_links, attachments, estimated_delivery, notes, status_updated_at, accepted_at, \
     rejected_at, completed_at, created_at, updated_at";

/// Columns a filter descriptor may reference with an equality predicate.
const FILTERABLE: &[&str] = &["campaign_id", "user_id", "status"];

/// Columns a filter descriptor may order by.
const ORDERABLE: &[&str] = &["created_at", "updated_at", "status_updated_at"];

/// SET clause fragment shared by the single and batched status updates.
const STATUS_STAMPS: &str = "status = $2,
    notes = COALESCE($3, notes),
    status_updated_at = NOW(),
    accepted_at = CASE WHEN $2 = 'accepted' THEN NOW() ELSE accepted_at END,
    rejected_at = CASE WHEN $2 = 'rejected' THEN NOW() ELSE rejected_at END,
    completed_at = CASE WHEN $2 = 'completed' THEN NOW() ELSE completed_at END,
    updated_at = NOW()";

/// Provides CRUD and lifecycle operations for applications.
pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Insert a new application in `pending` status, returning the row.
    ///
    /// The partial unique index `uq_applications_user_campaign` rejects a
    /// second non-withdrawn application for the same (user, campaign) pair
    /// even when two submissions race past the service-level check.
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        user_id: DbId,
        input: &NewApplication,
    ) -> Result<Application, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications (campaign_id, user_id, cover_letter, proposed_rate, \
                 portfolio_links, attachments, estimated_delivery, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(campaign_id)
            .bind(user_id)
            .bind(&input.cover_letter)
            .bind(input.proposed_rate)
            .bind(&input.portfolio_links)
            .bind(&input.attachments)
            .bind(input.estimated_delivery)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find an application by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the non-withdrawn application a user has on a campaign, if any.
    pub async fn find_active_by_user_and_campaign(
        pool: &PgPool,
        user_id: DbId,
        campaign_id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications
             WHERE user_id = $1 AND campaign_id = $2 AND status <> $3"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(user_id)
            .bind(campaign_id)
            .bind(STATUS_WITHDRAWN)
            .fetch_optional(pool)
            .await
    }

    /// Apply applicant edits to a pending application.
    ///
    /// The `status = 'pending'` guard makes the pending-only rule hold even
    /// if the status changed between the service's check and this write.
    /// Returns `None` when the row is missing or no longer pending.
    pub async fn update_pending(
        pool: &PgPool,
        id: DbId,
        input: &UpdateApplication,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET
                cover_letter = COALESCE($2, cover_letter),
                proposed_rate = COALESCE($3, proposed_rate),
                portfolio_links = COALESCE($4, portfolio_links),
                attachments = COALESCE($5, attachments),
                estimated_delivery = COALESCE($6, estimated_delivery),
                notes = COALESCE($7, notes),
                updated_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(&input.cover_letter)
            .bind(input.proposed_rate)
            .bind(&input.portfolio_links)
            .bind(&input.attachments)
            .bind(input.estimated_delivery)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Set the application status, stamping the shared and status-specific
    /// timestamps. Returns `None` if no row with the given `id` exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        notes: Option<&str>,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET {STATUS_STAMPS}
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(status)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// Accept an application and link the applicant into the campaign's
    /// selected set, in one transaction.
    ///
    /// The two writes commit together, so acceptance is never visible on the
    /// application without being visible on the campaign record. The guarded
    /// `array_append` keeps the set duplicate-free under concurrent accepts.
    pub async fn accept(
        pool: &PgPool,
        id: DbId,
        notes: Option<&str>,
    ) -> Result<Option<Application>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE applications SET {STATUS_STAMPS}
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(STATUS_ACCEPTED)
            .bind(notes)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(application) = application else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            "UPDATE campaigns SET
                selected_influencers = array_append(selected_influencers, $2),
                updated_at = NOW()
             WHERE id = $1 AND NOT ($2 = ANY(selected_influencers))",
        )
        .bind(application.campaign_id)
        .bind(application.user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(application))
    }

    /// Apply field edits to several applications in one transaction.
    ///
    /// Only the allow-listed fields of [`UpdateApplication`] are touched.
    /// Authorization is the caller's responsibility. Returns the number of
    /// rows updated; ids that resolve to no row are skipped.
    pub async fn batch_update(
        pool: &PgPool,
        updates: &[(DbId, UpdateApplication)],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut updated = 0u64;

        for (id, input) in updates {
            let result = sqlx::query(
                "UPDATE applications SET
                    cover_letter = COALESCE($2, cover_letter),
                    proposed_rate = COALESCE($3, proposed_rate),
                    portfolio_links = COALESCE($4, portfolio_links),
                    attachments = COALESCE($5, attachments),
                    estimated_delivery = COALESCE($6, estimated_delivery),
                    notes = COALESCE($7, notes),
                    updated_at = NOW()
                 WHERE id = $1",
            )
            .bind(id)
            .bind(&input.cover_letter)
            .bind(input.proposed_rate)
            .bind(&input.portfolio_links)
            .bind(&input.attachments)
            .bind(input.estimated_delivery)
            .bind(&input.notes)
            .execute(&mut *tx)
            .await?;
            updated += result.rows_affected();
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Set the status of several applications in a single statement.
    ///
    /// Returns the number of rows updated. Authorization is the caller's
    /// responsibility; this method does not check ownership.
    pub async fn batch_update_status(
        pool: &PgPool,
        ids: &[DbId],
        status: &str,
        notes: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let query = format!("UPDATE applications SET {STATUS_STAMPS} WHERE id = ANY($1)");
        let result = sqlx::query(&query)
            .bind(ids.to_vec())
            .bind(status)
            .bind(notes)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Permanently delete an application. Returns `true` if a row was
    /// removed; deleting a missing id is not an error.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List applications matching a filter descriptor.
    pub async fn list_filtered(
        pool: &PgPool,
        descriptor: &FilterDescriptor,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let mut builder = QueryBuilder::new(format!("SELECT {COLUMNS} FROM applications"));
        push_descriptor(&mut builder, descriptor, FILTERABLE, ORDERABLE)?;
        builder
            .build_query_as::<Application>()
            .fetch_all(pool)
            .await
    }
}

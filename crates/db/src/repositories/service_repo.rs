//! Repository for the `services` table.

use movitur_core::types::DbId;
use sqlx::PgPool;

use crate::models::service::Service;

const COLUMNS: &str = "id, name, kind, is_active, created_at, updated_at";

/// Provides data access for bookable services.
pub struct ServiceRepo;

impl ServiceRepo {
    /// Find a service that can currently be booked.
    ///
    /// Inactive services are treated as missing.
    pub async fn find_active_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE id = $1 AND is_active");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

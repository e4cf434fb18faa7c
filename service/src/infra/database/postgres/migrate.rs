//! Schema migrations of the [`Postgres`] database.

use refinery::Runner;
use tracerr::Traced;
use tracing as log;

use crate::infra::database;

use super::{client, Error, Postgres};

impl Postgres {
    /// Applies the migrations of the provided [`Runner`] to this [`Postgres`]
    /// database, skipping the already applied ones.
    ///
    /// Migrations are applied on a dedicated pooled connection.
    ///
    /// # Errors
    ///
    /// If failed to retrieve a connection or any migration fails.
    pub async fn migrate(
        &self,
        runner: &Runner,
    ) -> Result<(), Traced<database::Error>> {
        let mut conn =
            client::pooled(&self.pool).await.map_err(tracerr::wrap!())?;

        let report = runner
            .run_async(&mut **conn)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        let applied = report.applied_migrations();
        if applied.is_empty() {
            log::debug!("database schema is up to date");
        }
        for migration in applied {
            log::info!("applied `{migration}` migration");
        }
        Ok(())
    }
}

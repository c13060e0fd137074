//! PostgreSQL implementation of the queue repository.

use crate::modules::queue_pg_assign::{assign_next_waiting_impl, complete_active_impl};
use crate::modules::queue_pg_customers::{
    delete_customer_impl, get_customer_impl, insert_customer_impl, list_customers_impl,
};
use crate::modules::queue_pg_helpers::map_sqlx_err;
use crate::modules::queue_pg_reps::{
    create_representative_impl, get_representative_impl, list_representatives_impl,
    reset_representative_impl, update_representative_impl,
};
use crate::modules::repository::{
    Assignment, AssignmentRepository, CustomerRepository, RepoResult, RepositoryError,
    RepresentativeRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;
use walkin_types::models::DatabaseConfig;
use walkin_types::{Customer, FinishOutcome, RepIdentity, Representative, RepresentativePatch};

/// PostgreSQL-backed queue repository.
pub struct PostgresQueueRepository {
    /// Database connection pool.
    pool: PgPool,
}

impl PostgresQueueRepository {
    /// Create repository with existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Connect to database and create repository.
    ///
    /// Every pooled connection carries `statement_timeout`, so a stuck query
    /// surfaces as a store failure instead of hanging the request.
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = PgConnectOptions::from_str(url)?
            .options([("statement_timeout", config.statement_timeout_ms.to_string())]);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn run_migrations(&self) -> RepoResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|err| RepositoryError::Database(err.to_string()))
    }

    /// Server clock, used by the `db-check` command.
    pub async fn server_time(&self) -> RepoResult<DateTime<Utc>> {
        let row = sqlx::query("SELECT NOW() AS now")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        row.try_get("now").map_err(map_sqlx_err)
    }
}

#[async_trait]
impl CustomerRepository for PostgresQueueRepository {
    async fn insert_customer(&self, name: &str) -> RepoResult<Customer> {
        insert_customer_impl(&self.pool, name).await
    }

    async fn list_customers(&self) -> RepoResult<Vec<Customer>> {
        list_customers_impl(&self.pool).await
    }

    async fn get_customer(&self, id: i64) -> RepoResult<Customer> {
        get_customer_impl(&self.pool, id).await
    }

    async fn delete_customer(&self, id: i64) -> RepoResult<()> {
        delete_customer_impl(&self.pool, id).await
    }
}

#[async_trait]
impl RepresentativeRepository for PostgresQueueRepository {
    async fn create_representative(
        &self,
        identity: &RepIdentity,
        name: Option<&str>,
    ) -> RepoResult<Representative> {
        create_representative_impl(&self.pool, identity, name).await
    }

    async fn get_representative(&self, identity: &RepIdentity) -> RepoResult<Representative> {
        get_representative_impl(&self.pool, identity).await
    }

    async fn list_representatives(&self) -> RepoResult<Vec<Representative>> {
        list_representatives_impl(&self.pool).await
    }

    async fn update_representative(
        &self,
        identity: &RepIdentity,
        patch: &RepresentativePatch,
    ) -> RepoResult<Representative> {
        update_representative_impl(&self.pool, identity, patch).await
    }

    async fn reset_representative(&self, identity: &RepIdentity) -> RepoResult<Representative> {
        reset_representative_impl(&self.pool, identity).await
    }
}

#[async_trait]
impl AssignmentRepository for PostgresQueueRepository {
    async fn assign_next_waiting(&self, identity: &RepIdentity) -> RepoResult<Option<Assignment>> {
        assign_next_waiting_impl(&self.pool, identity).await
    }

    async fn complete_active(
        &self,
        identity: &RepIdentity,
        finished_at: DateTime<Utc>,
    ) -> RepoResult<Option<FinishOutcome>> {
        complete_active_impl(&self.pool, identity, finished_at).await
    }
}

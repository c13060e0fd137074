//! Targeted representative updates for PostgreSQL.
//!
//! Every write is a single `UPDATE ... RETURNING` keyed by identity, so
//! concurrent updates of different fields never read-modify-write each other.

use crate::modules::queue_pg_helpers::{
    is_unique_violation, map_sqlx_err, rep_not_found, row_to_rep, REP_COLUMNS,
};
use crate::modules::repository::{RepoResult, RepositoryError};
use sqlx::postgres::PgPool;
use walkin_types::{RepIdentity, Representative, RepresentativePatch};

pub(crate) async fn create_representative_impl(
    pool: &PgPool,
    identity: &RepIdentity,
    name: Option<&str>,
) -> RepoResult<Representative> {
    let sql = format!(
        "INSERT INTO representatives (identity, name) VALUES ($1, $2) RETURNING {REP_COLUMNS}"
    );
    let row = sqlx::query(&sql)
        .bind(identity.as_str())
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::AlreadyExists(format!("Representative {identity}"))
            } else {
                map_sqlx_err(e)
            }
        })?;

    row_to_rep(&row)
}

pub(crate) async fn get_representative_impl(
    pool: &PgPool,
    identity: &RepIdentity,
) -> RepoResult<Representative> {
    let sql = format!("SELECT {REP_COLUMNS} FROM representatives WHERE identity = $1");
    let row = sqlx::query(&sql)
        .bind(identity.as_str())
        .fetch_optional(pool)
        .await
        .map_err(map_sqlx_err)?
        .ok_or_else(|| rep_not_found(identity))?;

    row_to_rep(&row)
}

pub(crate) async fn list_representatives_impl(pool: &PgPool) -> RepoResult<Vec<Representative>> {
    let sql = format!("SELECT {REP_COLUMNS} FROM representatives ORDER BY id ASC");
    let rows = sqlx::query(&sql).fetch_all(pool).await.map_err(map_sqlx_err)?;

    let mut reps = Vec::with_capacity(rows.len());
    for row in rows {
        reps.push(row_to_rep(&row)?);
    }
    Ok(reps)
}

pub(crate) async fn update_representative_impl(
    pool: &PgPool,
    identity: &RepIdentity,
    patch: &RepresentativePatch,
) -> RepoResult<Representative> {
    let sql = format!(
        r#"UPDATE representatives
           SET status = COALESCE($1, status),
               total_customers = COALESCE($2, total_customers)
           WHERE identity = $3
           RETURNING {REP_COLUMNS}"#
    );
    let row = sqlx::query(&sql)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.total_customers)
        .bind(identity.as_str())
        .fetch_optional(pool)
        .await
        .map_err(map_sqlx_err)?
        .ok_or_else(|| rep_not_found(identity))?;

    row_to_rep(&row)
}

pub(crate) async fn reset_representative_impl(
    pool: &PgPool,
    identity: &RepIdentity,
) -> RepoResult<Representative> {
    let sql = format!(
        r#"UPDATE representatives
           SET total_customers = 0,
               finished_at = NULL,
               status = 'available'
           WHERE identity = $1
           RETURNING {REP_COLUMNS}"#
    );
    let row = sqlx::query(&sql)
        .bind(identity.as_str())
        .fetch_optional(pool)
        .await
        .map_err(map_sqlx_err)?
        .ok_or_else(|| rep_not_found(identity))?;

    row_to_rep(&row)
}

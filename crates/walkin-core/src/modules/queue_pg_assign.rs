//! Multi-row queue transitions for PostgreSQL.
//!
//! Both functions lock the representative row first, so two requests from the
//! same representative serialize, and then work on customers. Waiting
//! customers are claimed with `FOR UPDATE SKIP LOCKED`: concurrent callers
//! each claim a different row instead of racing on the same oldest one.

use crate::modules::queue_pg_helpers::{
    map_sqlx_err, rep_not_found, row_to_customer, row_to_rep, CUSTOMER_COLUMNS, REP_COLUMNS,
};
use crate::modules::repository::{Assignment, RepoResult};
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, Postgres};
use sqlx::{Row, Transaction};
use walkin_types::{FinishOutcome, RepIdentity};

async fn lock_rep_id(tx: &mut Transaction<'_, Postgres>, identity: &RepIdentity) -> RepoResult<i64> {
    let row = sqlx::query("SELECT id FROM representatives WHERE identity = $1 FOR UPDATE")
        .bind(identity.as_str())
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_sqlx_err)?
        .ok_or_else(|| rep_not_found(identity))?;

    row.try_get("id").map_err(map_sqlx_err)
}

pub(crate) async fn assign_next_waiting_impl(
    pool: &PgPool,
    identity: &RepIdentity,
) -> RepoResult<Option<Assignment>> {
    let mut tx = pool.begin().await.map_err(map_sqlx_err)?;
    let rep_id = lock_rep_id(&mut tx, identity).await?;

    let claim_sql = format!(
        r#"UPDATE customers
           SET status = 'being_helped', rep_id = $1
           WHERE id = (
               SELECT id FROM customers
               WHERE status = 'waiting'
               ORDER BY created_at ASC, id ASC
               LIMIT 1
               FOR UPDATE SKIP LOCKED
           )
           RETURNING {CUSTOMER_COLUMNS}"#
    );
    let claimed = sqlx::query(&claim_sql)
        .bind(rep_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

    let Some(customer_row) = claimed else {
        tx.rollback().await.map_err(map_sqlx_err)?;
        return Ok(None);
    };
    let customer = row_to_customer(&customer_row)?;

    let rep_sql =
        format!("UPDATE representatives SET status = 'busy' WHERE id = $1 RETURNING {REP_COLUMNS}");
    let rep_row =
        sqlx::query(&rep_sql).bind(rep_id).fetch_one(&mut *tx).await.map_err(map_sqlx_err)?;
    let rep = row_to_rep(&rep_row)?;

    tx.commit().await.map_err(map_sqlx_err)?;
    Ok(Some(Assignment { customer, rep }))
}

pub(crate) async fn complete_active_impl(
    pool: &PgPool,
    identity: &RepIdentity,
    finished_at: DateTime<Utc>,
) -> RepoResult<Option<FinishOutcome>> {
    let mut tx = pool.begin().await.map_err(map_sqlx_err)?;
    let rep_id = lock_rep_id(&mut tx, identity).await?;

    let finish_sql = format!(
        r#"UPDATE customers
           SET status = 'helped', finished_at = $2
           WHERE id = (
               SELECT id FROM customers
               WHERE rep_id = $1 AND status = 'being_helped'
               ORDER BY created_at ASC, id ASC
               LIMIT 1
               FOR UPDATE
           )
           RETURNING {CUSTOMER_COLUMNS}"#
    );
    let finished = sqlx::query(&finish_sql)
        .bind(rep_id)
        .bind(finished_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

    // Nothing to finish: leave the representative untouched.
    let Some(customer_row) = finished else {
        tx.rollback().await.map_err(map_sqlx_err)?;
        return Ok(None);
    };
    let finished_customer = row_to_customer(&customer_row)?;

    let rep_sql = format!(
        r#"UPDATE representatives
           SET total_customers = total_customers + 1,
               status = 'available',
               finished_at = $2
           WHERE id = $1
           RETURNING {REP_COLUMNS}"#
    );
    let rep_row = sqlx::query(&rep_sql)
        .bind(rep_id)
        .bind(finished_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;
    let rep = row_to_rep(&rep_row)?;

    tx.commit().await.map_err(map_sqlx_err)?;
    Ok(Some(FinishOutcome { rep, finished_customer }))
}

//! Customer record operations for PostgreSQL.

use crate::modules::queue_pg_helpers::{map_sqlx_err, row_to_customer, CUSTOMER_COLUMNS};
use crate::modules::repository::{RepoResult, RepositoryError};
use sqlx::postgres::PgPool;
use walkin_types::Customer;

pub(crate) async fn insert_customer_impl(pool: &PgPool, name: &str) -> RepoResult<Customer> {
    let sql = format!(
        "INSERT INTO customers (name, status) VALUES ($1, 'waiting') RETURNING {CUSTOMER_COLUMNS}"
    );
    let row = sqlx::query(&sql).bind(name).fetch_one(pool).await.map_err(map_sqlx_err)?;
    row_to_customer(&row)
}

/// List every customer, helped ones last, each partition in arrival order.
pub(crate) async fn list_customers_impl(pool: &PgPool) -> RepoResult<Vec<Customer>> {
    let sql = format!(
        r#"SELECT {CUSTOMER_COLUMNS} FROM customers
           ORDER BY CASE WHEN status = 'helped' THEN 1 ELSE 0 END,
                    created_at ASC,
                    id ASC"#
    );
    let rows = sqlx::query(&sql).fetch_all(pool).await.map_err(map_sqlx_err)?;

    let mut customers = Vec::with_capacity(rows.len());
    for row in rows {
        customers.push(row_to_customer(&row)?);
    }
    Ok(customers)
}

pub(crate) async fn get_customer_impl(pool: &PgPool, id: i64) -> RepoResult<Customer> {
    let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1");
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(map_sqlx_err)?
        .ok_or_else(|| RepositoryError::NotFound(format!("Customer {id}")))?;

    row_to_customer(&row)
}

pub(crate) async fn delete_customer_impl(pool: &PgPool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(map_sqlx_err)?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound(format!("Customer {id}")));
    }
    Ok(())
}

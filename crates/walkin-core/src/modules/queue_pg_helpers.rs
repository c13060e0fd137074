//! Helper functions for PostgreSQL queue operations.

use crate::modules::repository::{RepoResult, RepositoryError};
use sqlx::postgres::PgRow;
use sqlx::Row;
use walkin_types::{Customer, CustomerStatus, RepIdentity, Representative, RepresentativeStatus};

pub(crate) const CUSTOMER_COLUMNS: &str = "id, name, status, rep_id, created_at, finished_at";
pub(crate) const REP_COLUMNS: &str = "id, identity, name, status, total_customers, finished_at";

/// Convert a PostgreSQL row to a Customer.
pub(crate) fn row_to_customer(row: &PgRow) -> RepoResult<Customer> {
    let status: String = row.try_get("status").map_err(map_sqlx_err)?;
    let status: CustomerStatus =
        status.parse().map_err(|err: walkin_types::StatusParseError| {
            RepositoryError::Serialization(err.to_string())
        })?;

    Ok(Customer {
        id: row.try_get("id").map_err(map_sqlx_err)?,
        name: row.try_get("name").map_err(map_sqlx_err)?,
        status,
        rep_id: row.try_get("rep_id").map_err(map_sqlx_err)?,
        created_at: row.try_get("created_at").map_err(map_sqlx_err)?,
        finished_at: row.try_get("finished_at").map_err(map_sqlx_err)?,
    })
}

/// Convert a PostgreSQL row to a Representative.
pub(crate) fn row_to_rep(row: &PgRow) -> RepoResult<Representative> {
    let status: String = row.try_get("status").map_err(map_sqlx_err)?;
    let status: RepresentativeStatus =
        status.parse().map_err(|err: walkin_types::StatusParseError| {
            RepositoryError::Serialization(err.to_string())
        })?;
    let identity: String = row.try_get("identity").map_err(map_sqlx_err)?;

    Ok(Representative {
        id: row.try_get("id").map_err(map_sqlx_err)?,
        identity: RepIdentity::new(identity),
        name: row.try_get("name").map_err(map_sqlx_err)?,
        status,
        total_customers: row.try_get("total_customers").map_err(map_sqlx_err)?,
        finished_at: row.try_get("finished_at").map_err(map_sqlx_err)?,
    })
}

/// Map sqlx error to repository error.
pub(crate) fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(err.to_string())
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(crate) fn rep_not_found(identity: &RepIdentity) -> RepositoryError {
    RepositoryError::NotFound(format!("Representative {identity}"))
}

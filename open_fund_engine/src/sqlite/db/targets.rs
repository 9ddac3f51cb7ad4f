use log::{debug, trace};
use sqlx::{sqlite::SqliteRow, FromRow, QueryBuilder, SqliteConnection};

use crate::{
    db_types::{Fundable, FundingTarget, NewFundingTarget},
    fundable_objects::TargetUpdate,
    traits::FundGatewayError,
};

/// Inserts a new funding target using the given connection. This is not atomic on its own. You
/// can embed this call inside a transaction if you need to ensure atomicity, and pass `&mut *tx`
/// as the connection argument.
///
/// The database assigns the id and the creation timestamp; the allocation bookkeeping columns
/// start at their open-record defaults.
pub async fn insert_target(
    target: NewFundingTarget,
    conn: &mut SqliteConnection,
) -> Result<FundingTarget, FundGatewayError> {
    let name = target.name.clone();
    let result = sqlx::query_as::<_, FundingTarget>(
        r#"
            INSERT INTO funding_targets (name, description, full_amount)
            VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(target.name)
    .bind(target.description)
    .bind(target.full_amount)
    .fetch_one(conn)
    .await;
    match result {
        Ok(target) => {
            debug!("📝️ Funding target '{}' inserted with id {}", target.name, target.id);
            Ok(target)
        },
        Err(e) if e.as_database_error().map(|de| de.is_unique_violation()).unwrap_or(false) => {
            Err(FundGatewayError::DuplicateTargetName(name))
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_target_by_id(
    id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<FundingTarget>, sqlx::Error> {
    let target =
        sqlx::query_as("SELECT * FROM funding_targets WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(target)
}

/// Checks whether a target with the given name already exists. If it does, the `id` of the target
/// is returned. If it does not exist, `None` is returned.
pub async fn target_id_by_name(name: &str, conn: &mut SqliteConnection) -> Result<Option<i64>, sqlx::Error> {
    let id: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM funding_targets WHERE name = $1").bind(name).fetch_optional(conn).await?;
    Ok(id.map(|(id,)| id))
}

pub async fn fetch_all_targets(conn: &mut SqliteConnection) -> Result<Vec<FundingTarget>, sqlx::Error> {
    let targets = sqlx::query_as("SELECT * FROM funding_targets ORDER BY id ASC").fetch_all(conn).await?;
    Ok(targets)
}

/// The open funding-target pool: every target that is not fully invested, oldest first.
///
/// Ascending id order is the FIFO settlement contract. The settlement loop consumes the result
/// front-to-back without reloading, so a record drawn from it always has spare capacity.
pub async fn fetch_open_pool(conn: &mut SqliteConnection) -> Result<Vec<FundingTarget>, sqlx::Error> {
    let targets =
        sqlx::query_as("SELECT * FROM funding_targets WHERE fully_invested = 0 ORDER BY id ASC")
            .fetch_all(conn)
            .await?;
    trace!("📝️ Open target pool holds {} records", targets.len());
    Ok(targets)
}

/// Writes back the allocation bookkeeping of a record mutated by a settlement pass (or closed by
/// an admin edit). Only the engine-owned columns change; name, description and full amount are
/// not touched.
pub async fn save_allocation(
    target: &FundingTarget,
    conn: &mut SqliteConnection,
) -> Result<(), FundGatewayError> {
    sqlx::query("UPDATE funding_targets SET invested_amount = $1, fully_invested = $2, closed_at = $3 WHERE id = $4")
        .bind(target.invested_amount)
        .bind(target.fully_invested)
        .bind(target.closed_at)
        .bind(target.id)
        .execute(conn)
        .await?;
    trace!("📝️ Target {} allocation saved: {} invested", target.id, target.invested_amount);
    Ok(())
}

pub(crate) async fn update_target(
    id: i64,
    update: TargetUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<FundingTarget>, FundGatewayError> {
    if update.is_empty() {
        debug!("📝️ No fields to update for target {id}. Update request skipped.");
        return Err(FundGatewayError::TargetModificationNoOp);
    }
    let mut builder = QueryBuilder::new("UPDATE funding_targets SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = update.name {
        set_clause.push("name = ");
        set_clause.push_bind_unseparated(name);
    }
    if let Some(description) = update.description {
        set_clause.push("description = ");
        set_clause.push_bind_unseparated(description);
    }
    if let Some(full_amount) = update.full_amount {
        set_clause.push("full_amount = ");
        set_clause.push_bind_unseparated(full_amount);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("📝️ Executing query: {}", builder.sql());
    let res = builder.build().fetch_optional(conn).await?.map(|row: SqliteRow| FundingTarget::from_row(&row)).transpose()?;
    trace!("📝️ Result of update_target: {res:?}");
    Ok(res)
}

/// Deletes the target row and returns it. Precondition checks (open, un-invested) are the
/// caller's responsibility and must run in the same transaction.
pub(crate) async fn delete_target(
    id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<FundingTarget>, FundGatewayError> {
    let deleted = sqlx::query_as("DELETE FROM funding_targets WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(deleted)
}

use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{Contribution, NewContribution},
    traits::FundGatewayError,
};

/// Inserts a new contribution using the given connection. Embed the call in a transaction and
/// pass `&mut *tx` when the insert is part of a settlement pass.
pub async fn insert_contribution(
    contribution: NewContribution,
    conn: &mut SqliteConnection,
) -> Result<Contribution, FundGatewayError> {
    let contribution = sqlx::query_as::<_, Contribution>(
        r#"
            INSERT INTO contributions (contributor_id, comment, full_amount)
            VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(contribution.contributor_id)
    .bind(contribution.comment)
    .bind(contribution.full_amount)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Contribution from [{}] inserted with id {}", contribution.contributor_id, contribution.id);
    Ok(contribution)
}

pub async fn fetch_all_contributions(conn: &mut SqliteConnection) -> Result<Vec<Contribution>, sqlx::Error> {
    let contributions = sqlx::query_as("SELECT * FROM contributions ORDER BY id ASC").fetch_all(conn).await?;
    Ok(contributions)
}

/// All contributions made by one contributor, in creation order.
pub async fn fetch_contributions_for_user(
    contributor_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<Contribution>, sqlx::Error> {
    let contributions = sqlx::query_as("SELECT * FROM contributions WHERE contributor_id = $1 ORDER BY id ASC")
        .bind(contributor_id)
        .fetch_all(conn)
        .await?;
    Ok(contributions)
}

/// The open contribution pool: every contribution that is not fully invested, oldest first.
///
/// Ascending id order is the FIFO settlement contract. The settlement loop consumes the result
/// front-to-back without reloading, so a record drawn from it always has spare capacity.
pub async fn fetch_open_pool(conn: &mut SqliteConnection) -> Result<Vec<Contribution>, sqlx::Error> {
    let contributions =
        sqlx::query_as("SELECT * FROM contributions WHERE fully_invested = 0 ORDER BY id ASC")
            .fetch_all(conn)
            .await?;
    trace!("📝️ Open contribution pool holds {} records", contributions.len());
    Ok(contributions)
}

/// Writes back the allocation bookkeeping of a record mutated by a settlement pass. Only the
/// engine-owned columns change.
pub async fn save_allocation(
    contribution: &Contribution,
    conn: &mut SqliteConnection,
) -> Result<(), FundGatewayError> {
    sqlx::query("UPDATE contributions SET invested_amount = $1, fully_invested = $2, closed_at = $3 WHERE id = $4")
        .bind(contribution.invested_amount)
        .bind(contribution.fully_invested)
        .bind(contribution.closed_at)
        .bind(contribution.id)
        .execute(conn)
        .await?;
    trace!("📝️ Contribution {} allocation saved: {} invested", contribution.id, contribution.invested_amount);
    Ok(())
}

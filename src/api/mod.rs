use sqlx::SqlitePool;

pub mod calendar;
pub mod directory;
pub mod member;
pub mod pto_request;
pub mod registration;

/// Routing team for a position, from the seeded positions table.
pub(crate) async fn position_team(
    pool: &SqlitePool,
    position: &str,
) -> Result<Option<String>, sqlx::Error> {
    let row = sqlx::query_as::<_, (String,)>("SELECT team FROM positions WHERE name = ?")
        .bind(position)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(team,)| team))
}

pub(crate) async fn position_exists(
    pool: &SqlitePool,
    team: &str,
    position: &str,
) -> Result<bool, sqlx::Error> {
    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM positions WHERE team = ? AND name = ?")
            .bind(team)
            .bind(position)
            .fetch_one(pool)
            .await?;
    Ok(count.0 > 0)
}

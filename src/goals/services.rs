use sqlx::SqlitePool;

use super::dto::{Goal, NewGoal, DEFAULT_GOAL};
use super::repo;

/// Stored goal, or the default snapshot when none was ever set.
pub async fn current_or_default(db: &SqlitePool) -> anyhow::Result<Goal> {
    Ok(repo::current(db).await?.unwrap_or(DEFAULT_GOAL))
}

/// Full replace: fields absent from `goal` are stored as absent.
pub async fn set_goal(db: &SqlitePool, goal: &NewGoal) -> anyhow::Result<Goal> {
    repo::replace(db, goal).await
}

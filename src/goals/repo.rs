use anyhow::Context;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::dto::{Goal, NewGoal};

/// The stored goal, if one was ever set.
pub async fn current(db: &SqlitePool) -> anyhow::Result<Option<Goal>> {
    let row = sqlx::query_as::<_, Goal>(
        r#"
        SELECT start_weight, target_weight, start_body_fat, target_body_fat,
               target_date, updated_at
          FROM goals
         ORDER BY updated_at DESC, id DESC
         LIMIT 1
        "#,
    )
    .fetch_optional(db)
    .await
    .context("load current goal")?;
    Ok(row)
}

/// Drop whatever goal exists and store `goal` in its place.
pub async fn replace(db: &SqlitePool, goal: &NewGoal) -> anyhow::Result<Goal> {
    let mut tx = db.begin().await.context("begin tx")?;

    sqlx::query("DELETE FROM goals")
        .execute(&mut *tx)
        .await
        .context("delete goals")?;

    let stored = sqlx::query_as::<_, Goal>(
        r#"
        INSERT INTO goals (start_weight, target_weight, start_body_fat,
                           target_body_fat, target_date, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING start_weight, target_weight, start_body_fat, target_body_fat,
                  target_date, updated_at
        "#,
    )
    .bind(goal.start_weight)
    .bind(goal.target_weight)
    .bind(goal.start_body_fat)
    .bind(goal.target_body_fat)
    .bind(goal.target_date)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(&mut *tx)
    .await
    .context("insert goal")?;

    tx.commit().await.context("commit tx")?;
    Ok(stored)
}

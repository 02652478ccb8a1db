use anyhow::Context;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{Entry, NewEntry};

/// All entries, oldest date first.
pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<Entry>> {
    let rows = sqlx::query_as::<_, Entry>(
        r#"
        SELECT id, date, weight, body_fat, notes, created_at
          FROM entries
         ORDER BY date ASC
        "#,
    )
    .fetch_all(db)
    .await
    .context("list entries")?;
    Ok(rows)
}

/// Insert, or replace the whole row when one already exists for `date`.
///
/// A single statement, so concurrent writers to the same date resolve to
/// whichever commits last.
pub async fn upsert(db: &SqlitePool, entry: &NewEntry) -> anyhow::Result<Entry> {
    let row = sqlx::query_as::<_, Entry>(
        r#"
        INSERT INTO entries (id, date, weight, body_fat, notes, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(date) DO UPDATE SET
            id         = excluded.id,
            weight     = excluded.weight,
            body_fat   = excluded.body_fat,
            notes      = excluded.notes,
            created_at = excluded.created_at
        RETURNING id, date, weight, body_fat, notes, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(entry.date)
    .bind(entry.weight)
    .bind(entry.body_fat)
    .bind(entry.notes.as_deref())
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await
    .with_context(|| format!("upsert entry for {}", entry.date))?;
    Ok(row)
}

#[cfg(test)]
mod repo_tests {
    use super::*;
    use crate::state::AppState;
    use time::macros::date;

    fn new_entry(date: time::Date, weight: f64, body_fat: f64, notes: Option<&str>) -> NewEntry {
        NewEntry {
            date,
            weight,
            body_fat,
            notes: notes.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn list_is_ordered_by_date_regardless_of_insertion() {
        let st = AppState::for_tests().await;
        upsert(&st.db, &new_entry(date!(2024 - 01 - 10), 78.0, 23.0, None)).await.unwrap();
        upsert(&st.db, &new_entry(date!(2024 - 01 - 01), 80.0, 25.0, None)).await.unwrap();
        upsert(&st.db, &new_entry(date!(2024 - 01 - 05), 79.0, 24.0, None)).await.unwrap();

        let dates: Vec<_> = list_all(&st.db).await.unwrap().into_iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![date!(2024 - 01 - 01), date!(2024 - 01 - 05), date!(2024 - 01 - 10)]
        );
    }

    #[tokio::test]
    async fn upsert_replaces_existing_date_entirely() {
        let st = AppState::for_tests().await;
        let first = upsert(
            &st.db,
            &new_entry(date!(2024 - 01 - 01), 80.0, 25.0, Some("first weigh-in")),
        )
        .await
        .unwrap();
        let second = upsert(&st.db, &new_entry(date!(2024 - 01 - 01), 79.4, 24.1, None))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        let all = list_all(&st.db).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].weight, 79.4);
        assert_eq!(all[0].body_fat, 24.1);
        assert_eq!(all[0].notes, None);
        assert_eq!(all[0].id, second.id);
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let st = AppState::for_tests().await;
        assert!(list_all(&st.db).await.unwrap().is_empty());
    }
}

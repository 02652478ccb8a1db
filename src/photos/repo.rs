use anyhow::Context;
use sqlx::SqlitePool;
use time::Date;

use super::dto::Photo;

pub async fn insert_photo(db: &SqlitePool, photo: &Photo) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO photos (id, entry_date, stored_name, original_name, uploaded_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(photo.id)
    .bind(photo.entry_date)
    .bind(&photo.stored_name)
    .bind(&photo.original_name)
    .bind(photo.uploaded_at)
    .execute(db)
    .await
    .context("insert photo")?;

    Ok(())
}

/// Photos for one date, in upload order.
pub async fn list_by_date(db: &SqlitePool, date: Date) -> anyhow::Result<Vec<Photo>> {
    let rows = sqlx::query_as::<_, Photo>(
        r#"
        SELECT id, entry_date, stored_name, original_name, uploaded_at
          FROM photos
         WHERE entry_date = ?
         ORDER BY uploaded_at ASC, rowid ASC
        "#,
    )
    .bind(date)
    .fetch_all(db)
    .await
    .context("list photos by date")?;

    Ok(rows)
}

#[cfg(test)]
mod repo_tests {
    use super::*;
    use crate::state::AppState;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    fn photo(date: Date, name: &str, at: time::OffsetDateTime) -> Photo {
        Photo {
            id: Uuid::new_v4(),
            entry_date: date,
            stored_name: name.into(),
            original_name: "front.jpg".into(),
            uploaded_at: at,
        }
    }

    #[tokio::test]
    async fn lists_only_requested_date_in_upload_order() {
        let st = AppState::for_tests().await;
        let d = date!(2024 - 01 - 10);
        insert_photo(&st.db, &photo(d, "b.jpg", datetime!(2024-01-10 09:00 UTC))).await.unwrap();
        insert_photo(&st.db, &photo(d, "a.jpg", datetime!(2024-01-10 08:00 UTC))).await.unwrap();
        insert_photo(
            &st.db,
            &photo(date!(2024 - 01 - 11), "c.jpg", datetime!(2024-01-11 08:00 UTC)),
        )
        .await
        .unwrap();

        let names: Vec<_> = list_by_date(&st.db, d)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.stored_name)
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
    }

    #[tokio::test]
    async fn stored_names_are_unique() {
        let st = AppState::for_tests().await;
        let d = date!(2024 - 01 - 10);
        let at = datetime!(2024-01-10 08:00 UTC);
        insert_photo(&st.db, &photo(d, "same.jpg", at)).await.unwrap();
        assert!(insert_photo(&st.db, &photo(d, "same.jpg", at)).await.is_err());
    }
}

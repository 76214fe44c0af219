use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashSet;

#[derive(Serialize, Deserialize, sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, type FROM categories ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> sqlx::Result<Category> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, type FROM categories WHERE categories.id = ?1
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

/// Replaces the category table with `categories`, keeping their ids.
pub async fn import_categories(pool: &SqlitePool, categories: Vec<Category>) -> sqlx::Result<()> {
    let existing: HashSet<i64> = get_all_categories(pool)
        .await?
        .iter()
        .map(|c| c.id)
        .collect();
    let incoming: HashSet<i64> = categories.iter().map(|c| c.id).collect();

    let mut tx = pool.begin().await?;
    for id in existing.difference(&incoming) {
        sqlx::query("DELETE FROM categories WHERE categories.id = ?1")
            .bind(*id)
            .execute(&mut *tx)
            .await?;
    }
    for category in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (id, type) VALUES (?1, ?2)
            ON CONFLICT (id) DO UPDATE SET type = excluded.type
            "#,
        )
        .bind(category.id)
        .bind(category.kind)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_in_memory, run_migrations};

    async fn pool() -> SqlitePool {
        let pool = establish_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn lists_in_id_order() {
        let pool = pool().await;
        let labels: Vec<String> = get_all_categories(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.kind)
            .collect();
        assert_eq!(
            labels,
            ["Science", "Art", "Geography", "History", "Entertainment", "Sports"]
        );
    }

    #[tokio::test]
    async fn missing_category_is_row_not_found() {
        let pool = pool().await;
        let err = get_category(&pool, 95).await.unwrap_err();
        assert!(matches!(err, sqlx::Error::RowNotFound));
    }

    #[tokio::test]
    async fn import_replaces_table() {
        let pool = pool().await;
        import_categories(
            &pool,
            vec![
                Category {
                    id: 1,
                    kind: "Physics".into(),
                },
                Category {
                    id: 9,
                    kind: "Music".into(),
                },
            ],
        )
        .await
        .unwrap();

        let categories = get_all_categories(&pool).await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].kind, "Physics");
        assert_eq!(categories[1].id, 9);
    }
}

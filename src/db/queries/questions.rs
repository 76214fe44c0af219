use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashSet;

/// A stored question. Serializes to the shape clients receive.
#[derive(Serialize, Deserialize, sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub difficulty: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Question> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: &str,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE questions.category = ?1
        ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

// LIKE folds case for ASCII only
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE questions.question LIKE '%' || ?1 || '%'
        ORDER BY id
        "#,
    )
    .bind(term)
    .fetch_all(pool)
    .await
}

pub async fn create_question(
    pool: &SqlitePool,
    question: &str,
    answer: &str,
    category: &str,
    difficulty: i64,
) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question)
    .bind(answer)
    .bind(category)
    .bind(difficulty)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Fails with `RowNotFound` when there is no question with this id.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<()> {
    get_question(pool, id).await?;

    sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Replaces the question table with `questions`, keeping their ids.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let existing: HashSet<i64> = get_all_questions(pool)
        .await?
        .iter()
        .map(|q| q.id)
        .collect();
    let incoming: HashSet<i64> = questions.iter().map(|q| q.id).collect();

    let mut tx = pool.begin().await?;
    for id in existing.difference(&incoming) {
        sqlx::query("DELETE FROM questions WHERE questions.id = ?1")
            .bind(*id)
            .execute(&mut *tx)
            .await?;
    }
    for q in questions {
        sqlx::query(
            r#"
            INSERT INTO questions (id, question, answer, category, difficulty)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (id) DO UPDATE SET
                question = excluded.question,
                answer = excluded.answer,
                category = excluded.category,
                difficulty = excluded.difficulty
            "#,
        )
        .bind(q.id)
        .bind(q.question)
        .bind(q.answer)
        .bind(q.category)
        .bind(q.difficulty)
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
    async fn create_then_fetch() {
        let pool = pool().await;
        let id = create_question(&pool, "La Giaconda is better known as what?", "Mona Lisa", "3", 3)
            .await
            .unwrap();

        let stored = get_question(&pool, id).await.unwrap();
        assert_eq!(stored.answer, "Mona Lisa");
        assert_eq!(stored.category, "3");
        assert_eq!(stored.difficulty, 3);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let pool = pool().await;
        create_question(&pool, "What is the heaviest organ?", "Liver", "1", 4)
            .await
            .unwrap();
        create_question(&pool, "Who painted Guernica?", "Picasso", "2", 3)
            .await
            .unwrap();

        let found = search_questions(&pool, "HEAVIEST").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].answer, "Liver");
        assert!(search_questions(&pool, "nothing like this")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn category_filter_is_exact() {
        let pool = pool().await;
        create_question(&pool, "a", "a", "1", 1).await.unwrap();
        create_question(&pool, "b", "b", "11", 1).await.unwrap();

        let found = get_questions_for_category(&pool, "1").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "a");
    }

    #[tokio::test]
    async fn deleting_missing_question_fails() {
        let pool = pool().await;
        let err = delete_question(&pool, 105).await.unwrap_err();
        assert!(matches!(err, sqlx::Error::RowNotFound));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let pool = pool().await;
        let id = create_question(&pool, "q", "a", "1", 1).await.unwrap();
        delete_question(&pool, id).await.unwrap();
        assert!(get_all_questions(&pool).await.unwrap().is_empty());
    }
}

use std::fs::{create_dir_all, File};
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use super::queries::categories::{get_all_categories, import_categories};
use super::queries::questions::{get_all_questions, import_questions};
use super::{Category, Question};

const CATEGORIES_FILE: &str = "categories.csv";
const QUESTIONS_FILE: &str = "questions.csv";

fn write_to(path: &Path, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record.with_context(|| format!("Malformed row in {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

/// Dumps both tables as CSV files into `dir`, creating it if needed.
pub async fn export_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !dir.exists() {
        create_dir_all(dir)?
    }
    write_to(&dir.join(CATEGORIES_FILE), categories)?;
    write_to(&dir.join(QUESTIONS_FILE), questions)?;
    tracing::info!("Exported data to {}", dir.display());
    Ok(())
}

/// Loads a previous export, replacing the current contents of both tables.
pub async fn import_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&dir.join(QUESTIONS_FILE))?;
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Importing data from {}",
        dir.display()
    );
    import_categories(pool, categories).await?;
    import_questions(pool, questions).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::questions::create_question;
    use crate::db::{establish_in_memory, run_migrations};

    async fn pool() -> SqlitePool {
        let pool = establish_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn export_then_import_into_fresh_database() {
        let source = pool().await;
        create_question(&source, "Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", "Maya Angelou", "4", 2)
            .await
            .unwrap();
        create_question(&source, "What boxer's original name is Cassius Clay?", "Muhammad Ali", "4", 1)
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let target_dir = dir.path().join("dump");
        export_data(&source, &target_dir).await.unwrap();
        assert!(target_dir.join(CATEGORIES_FILE).exists());

        let target = pool().await;
        create_question(&target, "stale", "stale", "1", 1).await.unwrap();
        import_data(&target, &target_dir).await.unwrap();

        assert_eq!(
            get_all_questions(&target).await.unwrap(),
            get_all_questions(&source).await.unwrap()
        );
        assert_eq!(get_all_categories(&target).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn import_from_missing_dir_fails() {
        let pool = pool().await;
        let dir = tempfile::tempdir().unwrap();
        assert!(import_data(&pool, &dir.path().join("absent")).await.is_err());
    }
}

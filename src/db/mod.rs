pub mod backup;
pub mod queries;

use secrecy::{ExposeSecret, SecretString};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub use queries::categories::Category;
pub use queries::questions::Question;

use sqlx::Error;

pub async fn establish_connection(url: &SecretString) -> Result<SqlitePool, Error> {
    SqlitePool::connect(url.expose_secret()).await
}

/// A private database living in a single pooled connection. Dropped with the pool.
pub async fn establish_in_memory() -> Result<SqlitePool, Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

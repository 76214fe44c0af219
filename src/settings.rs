use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://trivia.db?mode=rwc";
const DEFAULT_CONFIG_FILE: &str = "trivia.toml";

#[derive(Deserialize, Debug)]
pub struct Settings {
    #[serde(deserialize_with = "deserialize_secret")]
    pub database_url: SecretString,
    pub host: String,
    pub port: u16,
    /// Fixes the quiz random sequence, mostly useful for demos and tests.
    pub quiz_seed: Option<u64>,
}

impl Settings {
    /// Reads `.env`, then the file named by `TRIVIA_CONFIG` (default `trivia.toml`),
    /// then `TRIVIA_*` variables. Later sources win.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let path = dotenv::var("TRIVIA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_owned());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("TRIVIA").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.database_url.expose_secret(), DEFAULT_DATABASE_URL);
        assert_eq!(settings.address(), "0.0.0.0:8080");
        assert_eq!(settings.quiz_seed, None);
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "database_url = \"sqlite://quiz.db\"\nport = 5000\nquiz_seed = 7"
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.database_url.expose_secret(), "sqlite://quiz.db");
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.quiz_seed, Some(7));
    }

    #[test]
    fn secret_is_not_printed() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(!format!("{settings:?}").contains("trivia.db"));
    }
}

use anyhow::{bail, Context, Result};

const DEFAULT_SKILLS: &str = "Python,Machine Learning,SQL,Flask,NLP";

/// Connection parameters for the `resumes` database.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

// Hand-written so the password never ends up in logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Which NER backend to load at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NerBackend {
    Heuristic,
    Llm,
}

impl std::str::FromStr for NerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" => Ok(NerBackend::Heuristic),
            "llm" => Ok(NerBackend::Llm),
            other => bail!("NER_BACKEND must be 'heuristic' or 'llm', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when running without a database (dry run).
    pub database: Option<DatabaseConfig>,
    pub skill_vocabulary: Vec<String>,
    pub ner_backend: NerBackend,
    pub anthropic_api_key: Option<String>,
    pub rust_log: String,
}

impl Config {
    /// Loads configuration. Database variables are only required when
    /// `require_database` is set.
    pub fn from_env(require_database: bool) -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let database = if require_database {
            Some(DatabaseConfig {
                host: std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
                port: std::env::var("DB_PORT")
                    .unwrap_or_else(|_| "5432".to_string())
                    .parse::<u16>()
                    .context("DB_PORT must be a valid port number")?,
                database: require_env("DB_NAME")?,
                user: require_env("DB_USER")?,
                password: require_env("DB_PASSWORD")?,
            })
        } else {
            None
        };

        let skill_vocabulary = parse_vocabulary(
            &std::env::var("SKILL_VOCABULARY").unwrap_or_else(|_| DEFAULT_SKILLS.to_string()),
        );

        Ok(Config {
            database,
            skill_vocabulary,
            ner_backend: std::env::var("NER_BACKEND")
                .unwrap_or_else(|_| "heuristic".to_string())
                .parse()?,
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Splits a comma-separated vocabulary, trimming entries and dropping blanks.
pub fn parse_vocabulary(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

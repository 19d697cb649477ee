//! Record persistence — one INSERT into `resumes` per parsed document.
//!
//! `PgRecordStore` opens a fresh connection for every record and closes it
//! afterwards. Multi-valued fields are stored as `", "`-joined text; commas and
//! backslashes inside an item are backslash-escaped.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::errors::ResumeError;
use crate::models::ResumeRecord;

const INSERT_RESUME: &str = r#"
    INSERT INTO resumes (name, skills, education, organization)
    VALUES ($1, $2, $3, $4)
"#;

/// Destination for assembled records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn store(&self, record: &ResumeRecord) -> Result<(), ResumeError>;
}

pub struct PgRecordStore {
    config: DatabaseConfig,
}

impl PgRecordStore {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .database(&self.config.database)
            .username(&self.config.user)
            .password(&self.config.password)
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    /// Connects, inserts inside a transaction, commits, and closes.
    ///
    /// An early return drops the transaction (rolled back) and the connection
    /// (closed), so nothing outlives the call.
    async fn store(&self, record: &ResumeRecord) -> Result<(), ResumeError> {
        let mut conn = PgConnection::connect_with(&self.connect_options())
            .await
            .map_err(ResumeError::Connection)?;

        let mut tx = conn.begin().await.map_err(ResumeError::Write)?;
        sqlx::query(INSERT_RESUME)
            .bind(record.name.as_deref())
            .bind(encode_list(&record.skills))
            .bind(encode_list(&record.education))
            .bind(encode_list(&record.organizations))
            .execute(&mut *tx)
            .await
            .map_err(ResumeError::Write)?;
        tx.commit().await.map_err(ResumeError::Write)?;

        if let Err(e) = conn.close().await {
            // The row is already committed.
            warn!(error = %e, "Failed to close database connection cleanly");
        }

        info!(
            name = record.name.as_deref().unwrap_or("<none>"),
            skills = record.skills.len(),
            organizations = record.organizations.len(),
            "Stored resume record"
        );
        Ok(())
    }
}

/// Joins items with `", "`, escaping `\` and `,` inside items.
pub fn encode_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().replace('\\', "\\\\").replace(',', "\\,"))
        .collect::<Vec<_>>()
        .join(", ")
}

mod config;
mod entities;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod pipeline;
mod skills;
mod store;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::models::{DocumentFormat, RawDocument};
use crate::pipeline::ResumeParser;
use crate::store::{PgRecordStore, RecordStore};

/// Extract candidate name, organizations and skills from PDF/DOCX resumes
/// and store one row per resume in PostgreSQL.
#[derive(Parser, Debug)]
#[command(name = "resume-parser")]
#[command(version, about, long_about = None)]
struct Args {
    /// Resume files to process, in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Read every file as this format instead of guessing from the extension
    #[arg(short, long)]
    format: Option<DocumentFormat>,

    /// Parse and print records without writing to the database
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_env(!args.dry_run)?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", module_path!(), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume-parser v{}", env!("CARGO_PKG_VERSION"));

    // Load the NER model once for the whole run
    let model = entities::load_model(&config).context("Failed to load NER model")?;

    let store: Option<Arc<dyn RecordStore>> = match &config.database {
        Some(db) => {
            info!(host = %db.host, port = db.port, database = %db.database, "Records will be stored");
            Some(Arc::new(PgRecordStore::new(db.clone())))
        }
        None => None,
    };

    let parser = ResumeParser::new(model, &config.skill_vocabulary, store);

    let mut failed = 0usize;
    for path in &args.files {
        let doc = match args.format {
            Some(format) => RawDocument::new(path, format),
            None => match RawDocument::from_path(path) {
                Ok(doc) => doc,
                Err(e) => {
                    error!(path = %path.display(), stage = "extract", "{e}");
                    failed += 1;
                    continue;
                }
            },
        };

        match parser.process(&doc).await {
            Ok(entities) => println!("{}", serde_json::to_string_pretty(&entities)?),
            Err(e) => {
                error!(path = %path.display(), stage = e.stage(), "{e}");
                failed += 1;
            }
        }
    }

    info!(processed = args.files.len(), failed, "Finished");
    if failed > 0 {
        bail!("{failed} of {} documents failed", args.files.len());
    }
    Ok(())
}

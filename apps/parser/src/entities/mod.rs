//! Entity extraction — runs an injected NER model over resume text and sorts
//! PERSON and ORG mentions into an [`EntityMap`].
//!
//! The model is loaded once by the caller (see [`load_model`]) and shared as
//! `Arc<dyn NerModel>`; nothing here holds global state.

pub mod heuristic;
pub mod llm;
pub mod prompts;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::{Config, NerBackend};
use crate::errors::ResumeError;
use crate::llm_client::LlmClient;
use crate::models::{EntityCategory, EntityMap};

pub use heuristic::HeuristicNerModel;
pub use llm::LlmNerModel;

/// A labeled span produced by a NER model. `start` is a byte offset into the
/// text the model was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledSpan {
    pub text: String,
    pub label: String,
    pub start: usize,
}

/// A loaded NER model. Implementations are read-only after construction.
#[async_trait]
pub trait NerModel: Send + Sync {
    /// Backend name, for logs.
    fn name(&self) -> &str;

    async fn label(&self, text: &str) -> Result<Vec<LabeledSpan>, ResumeError>;
}

/// Maps a model label onto an entity category. Unknown labels are ignored.
fn category_for(label: &str) -> Option<EntityCategory> {
    match label.trim().to_ascii_uppercase().as_str() {
        "PERSON" | "PER" => Some(EntityCategory::Person),
        "ORG" | "ORGANIZATION" => Some(EntityCategory::Organization),
        _ => None,
    }
}

pub struct EntityExtractor {
    model: Arc<dyn NerModel>,
}

impl EntityExtractor {
    pub fn new(model: Arc<dyn NerModel>) -> Self {
        Self { model }
    }

    /// Collects PERSON and ORG mentions in order of appearance. Repeats are kept.
    pub async fn extract_entities(&self, text: &str) -> Result<EntityMap, ResumeError> {
        let mut entities = EntityMap::default();
        if text.trim().is_empty() {
            return Ok(entities);
        }

        let mut spans = self.model.label(text).await?;
        // Stable: spans sharing a start keep the model's order.
        spans.sort_by_key(|s| s.start);

        for span in spans {
            let Some(category) = category_for(&span.label) else {
                continue;
            };
            let value = span.text.trim();
            if !value.is_empty() {
                entities.push(category, value.to_string());
            }
        }

        debug!(
            model = self.model.name(),
            persons = entities.person.len(),
            organizations = entities.organization.len(),
            "Extracted entities"
        );
        Ok(entities)
    }
}

/// Loads the NER backend selected in configuration.
pub fn load_model(config: &Config) -> Result<Arc<dyn NerModel>, ResumeError> {
    let model: Arc<dyn NerModel> = match config.ner_backend {
        NerBackend::Heuristic => Arc::new(HeuristicNerModel::load(&config.skill_vocabulary)?),
        NerBackend::Llm => {
            let api_key = config.anthropic_api_key.clone().ok_or_else(|| {
                ResumeError::ModelUnavailable(
                    "NER_BACKEND=llm requires ANTHROPIC_API_KEY".to_string(),
                )
            })?;
            let client = LlmClient::new(api_key)
                .map_err(|e| ResumeError::ModelUnavailable(e.to_string()))?;
            Arc::new(LlmNerModel::new(client))
        }
    };
    info!("NER model loaded: {}", model.name());
    Ok(model)
}

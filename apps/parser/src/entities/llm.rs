//! LLM-backed NER via the shared [`LlmClient`].

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::prompts::{ner_system, NER_PROMPT_TEMPLATE};
use super::{LabeledSpan, NerModel};
use crate::errors::ResumeError;
use crate::llm_client::LlmClient;

/// Resume text beyond this many bytes is not sent to the model.
const MAX_INPUT_BYTES: usize = 24_000;

#[derive(Debug, Deserialize)]
struct NerResponse {
    #[serde(default)]
    entities: Vec<RawEntity>,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    text: String,
    label: String,
}

pub struct LlmNerModel {
    client: LlmClient,
}

impl LlmNerModel {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NerModel for LlmNerModel {
    fn name(&self) -> &str {
        "llm"
    }

    async fn label(&self, text: &str) -> Result<Vec<LabeledSpan>, ResumeError> {
        let input = truncate_at_char_boundary(text, MAX_INPUT_BYTES);
        if input.len() < text.len() {
            warn!(
                text_len = text.len(),
                sent = input.len(),
                "Resume text truncated for NER"
            );
        }

        let prompt = NER_PROMPT_TEMPLATE.replace("{resume_text}", input);
        let response: NerResponse = self
            .client
            .call_json(&prompt, &ner_system())
            .await
            .map_err(|e| ResumeError::ModelUnavailable(format!("LLM NER call failed: {e}")))?;

        Ok(locate_spans(input, response.entities))
    }
}

/// Anchors model output to byte offsets in `text`.
///
/// Each repeat of the same string is matched to the next occurrence after the
/// previous one. Entities that do not occur verbatim are dropped.
fn locate_spans(text: &str, entities: Vec<RawEntity>) -> Vec<LabeledSpan> {
    let mut cursors: HashMap<String, usize> = HashMap::new();
    let mut spans = Vec::with_capacity(entities.len());

    for entity in entities {
        let needle = entity.text.trim();
        if needle.is_empty() {
            continue;
        }
        let from = cursors.get(needle).copied().unwrap_or(0);
        let found = text[from..]
            .find(needle)
            .map(|i| from + i)
            .or_else(|| text.find(needle));

        match found {
            Some(start) => {
                cursors.insert(needle.to_string(), start + needle.len());
                spans.push(LabeledSpan {
                    text: needle.to_string(),
                    label: entity.label,
                    start,
                });
            }
            None => debug!(entity = needle, "Dropping entity not present in text"),
        }
    }
    spans
}

fn truncate_at_char_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

// NER prompt templates for the LLM backend.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

pub fn ner_system() -> String {
    format!(
        "{JSON_ONLY_SYSTEM} You label named entities in resume text. \
         Copy every entity exactly as it appears in the text, character for character."
    )
}

pub const NER_PROMPT_TEMPLATE: &str = r#"Label the people and organizations mentioned in the resume text below.

RESUME TEXT:
{resume_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "entities": [
    {"text": "exact text as it appears", "label": "PERSON" | "ORG"}
  ]
}

RULES:
- List entities in the order they appear; repeat an entity each time it appears.
- PERSON: names of people (the candidate, references).
- ORG: companies, universities, institutions, teams.
- Do not label skills, technologies, locations or dates.
- If there are no entities, return {"entities": []}."#;

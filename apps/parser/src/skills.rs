//! Skill matching — keyword search of resume text against a configured vocabulary.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

/// Compiled matcher for one skill vocabulary. Build once, reuse per document.
pub struct SkillMatcher {
    patterns: Vec<(String, Regex)>,
}

impl SkillMatcher {
    /// Compiles a case-insensitive `\b<skill>\b` pattern per vocabulary entry.
    /// Blank entries are skipped.
    pub fn new<S: AsRef<str>>(vocabulary: &[S]) -> Self {
        let patterns = vocabulary
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| !s.trim().is_empty())
            .filter_map(|skill| {
                let pattern = format!(r"\b{}\b", regex::escape(skill));
                match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                    Ok(re) => Some((skill.to_string(), re)),
                    Err(e) => {
                        warn!(skill, error = %e, "Skipping skill with invalid pattern");
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    /// Returns the canonical spelling of every vocabulary entry found in `text`.
    pub fn match_skills(&self, text: &str) -> BTreeSet<String> {
        let found: BTreeSet<String> = self
            .patterns
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(skill, _)| skill.clone())
            .collect();
        debug!(matched = found.len(), vocabulary = self.patterns.len(), "Matched skills");
        found
    }

    pub fn vocabulary_len(&self) -> usize {
        self.patterns.len()
    }
}

//! Offline, pattern-based NER.
//!
//! Runs of capitalized words on one line are candidate names. A run ending in
//! a company suffix (`Corp`, `Inc`, `University`, ...) is an organization; a
//! two- or three-word run with no title or section-heading words is a person.
//! Single capitalized words are never labeled: on their own they are far more
//! often skills or headings than names. Runs made up only of skill-vocabulary
//! words ("Python Flask") are not people either.
//!
//! A line holding nothing but two or three all-caps words ("JOHN SMITH") is
//! also taken as a person, since resume headers are often set in capitals.

use std::collections::HashSet;

use async_trait::async_trait;
use regex::Regex;

use super::{LabeledSpan, NerModel};
use crate::errors::ResumeError;

const WORD: &str = r"\p{Lu}\p{Ll}+(?:\p{Lu}\p{Ll}+)*(?:['-]\p{L}\p{Ll}*)*";

const CAPS_WORD: &str = r"\p{Lu}(?:['-]?\p{Lu})+";

const ORG_SUFFIXES: &[&str] = &[
    "Inc", "LLC", "LLP", "PLC", "Ltd", "Corp", "Corporation", "Company", "Co", "Group",
    "Holdings", "Partners", "Association", "Foundation", "Institute", "University", "College",
    "School", "Bank", "Labs", "Technologies", "Systems", "Solutions", "Consulting", "Agency",
];

/// Leading words that are stripped from a candidate run.
const STOP_WORDS: &[&str] = &[
    "The", "This", "That", "These", "Those", "What", "Which", "Where", "When", "Why", "How",
    "Who", "We", "You", "He", "She", "It", "They", "My", "Our", "Monday", "Tuesday",
    "Wednesday", "Thursday", "Friday", "Saturday", "Sunday", "January", "February", "March",
    "April", "May", "June", "July", "August", "September", "October", "November", "December",
    "Jan", "Feb", "Mar", "Apr", "Jun", "Jul", "Aug", "Sep", "Sept", "Oct", "Nov", "Dec",
    "Present", "Current", "Dear", "Hi", "Hello", "Thanks", "Please", "Note", "But", "And",
    "For", "With", "From", "About", "After", "Before", "During", "Until", "At", "In", "On",
    "Worked", "Led", "Built", "Managed", "Developed", "Designed", "Joined",
];

/// Words that rule a run out as a person's name.
const NON_NAME_WORDS: &[&str] = &[
    "Engineer", "Engineering", "Developer", "Manager", "Software", "Senior", "Junior", "Lead",
    "Principal", "Staff", "Analyst", "Scientist", "Intern", "Consultant", "Director", "Designer",
    "Architect", "Administrator", "Specialist", "Officer", "Assistant", "Associate", "Head",
    "Resume", "Curriculum", "Vitae", "Experience", "Education", "Skills", "Summary",
    "Projects", "Project", "Contact", "Profile", "Objective", "References", "Certifications",
    "Awards", "Publications", "Languages", "Interests", "Work", "Professional", "Technical",
    "Personal", "Data", "Machine", "Learning", "Science", "Computer", "Bachelor", "Master",
    "Doctor", "Degree", "Arts", "Street", "Avenue", "Road", "Drive", "Lane", "City", "State",
    "County", "Country", "Suite", "Building", "Floor", "Hiring", "Team", "Department",
];

pub struct HeuristicNerModel {
    run_pattern: Regex,
    caps_line_pattern: Regex,
    institution_pattern: Regex,
    org_suffixes: HashSet<&'static str>,
    stop_words: HashSet<&'static str>,
    non_name_words: HashSet<&'static str>,
    /// Lowercased words of the skill vocabulary.
    vocabulary_words: HashSet<String>,
}

impl HeuristicNerModel {
    pub fn load<S: AsRef<str>>(vocabulary: &[S]) -> Result<Self, ResumeError> {
        // The trailing `\b` keeps a run from ending inside a word.
        let run_pattern = Regex::new(&format!(
            r"\b{WORD}(?:[ \t]+{WORD}){{0,4}}\b(?:[ \t]+(?:LLC|LLP|PLC)\b)?"
        ))
        .map_err(|e| ResumeError::ModelUnavailable(format!("heuristic NER pattern: {e}")))?;

        let caps_line_pattern = Regex::new(&format!(
            r"(?m)^[ \t]*({CAPS_WORD}(?:[ \t]+{CAPS_WORD}){{1,2}})[ \t\r]*$"
        ))
        .map_err(|e| ResumeError::ModelUnavailable(format!("heuristic NER pattern: {e}")))?;

        // "Massachusetts Institute of Technology", "University of Toronto"
        let institution_pattern = Regex::new(&format!(
            r"\b(?:{WORD}[ \t]+)*(?:University|Institute|College|School|Bank)[ \t]+of(?:[ \t]+{WORD})+"
        ))
        .map_err(|e| ResumeError::ModelUnavailable(format!("heuristic NER pattern: {e}")))?;

        Ok(Self {
            run_pattern,
            caps_line_pattern,
            institution_pattern,
            org_suffixes: ORG_SUFFIXES.iter().copied().collect(),
            stop_words: STOP_WORDS.iter().copied().collect(),
            non_name_words: NON_NAME_WORDS.iter().copied().collect(),
            vocabulary_words: vocabulary
                .iter()
                .flat_map(|entry| entry.as_ref().split_whitespace())
                .map(str::to_lowercase)
                .collect(),
        })
    }

    /// Labels spans synchronously; the trait method wraps this.
    pub fn label_text(&self, text: &str) -> Vec<LabeledSpan> {
        let mut spans: Vec<LabeledSpan> = self
            .institution_pattern
            .find_iter(text)
            .map(|m| LabeledSpan {
                text: m.as_str().to_string(),
                label: "ORG".to_string(),
                start: m.start(),
            })
            .collect();

        for m in self.run_pattern.find_iter(text) {
            if let Some(span) = self.classify_run(m.as_str(), m.start()) {
                spans.push(span);
            }
        }

        for caps in self.caps_line_pattern.captures_iter(text) {
            let Some(line) = caps.get(1) else {
                continue;
            };
            if self.is_caps_name(line.as_str()) {
                spans.push(LabeledSpan {
                    text: line.as_str().to_string(),
                    label: "PERSON".to_string(),
                    start: line.start(),
                });
            }
        }

        remove_overlaps(spans)
    }

    fn is_vocabulary_run(&self, words: &[(usize, &str)]) -> bool {
        !self.vocabulary_words.is_empty()
            && words
                .iter()
                .all(|(_, w)| self.vocabulary_words.contains(&w.to_lowercase()))
    }

    fn is_caps_name(&self, line: &str) -> bool {
        let words = words_with_offsets(line);
        let excluded = words.iter().any(|(_, w)| {
            let w = title_case(w);
            self.stop_words.contains(w.as_str())
                || self.non_name_words.contains(w.as_str())
                || self.org_suffixes.contains(w.as_str())
        });
        !excluded && !self.is_vocabulary_run(&words)
    }

    fn classify_run(&self, run: &str, offset: usize) -> Option<LabeledSpan> {
        let words = words_with_offsets(run);
        let first = words
            .iter()
            .position(|(_, w)| !self.stop_words.contains(*w))?;
        let kept = &words[first..];
        let start = kept[0].0;
        let text = &run[start..];

        let last = kept[kept.len() - 1].1.trim_end_matches('.');
        let label = if kept.len() >= 2 && self.org_suffixes.contains(last) {
            "ORG"
        } else if (2..=3).contains(&kept.len())
            && kept
                .iter()
                .all(|(_, w)| !self.non_name_words.contains(*w) && !self.org_suffixes.contains(*w))
            && !self.is_vocabulary_run(kept)
        {
            "PERSON"
        } else {
            return None;
        };

        Some(LabeledSpan {
            text: text.to_string(),
            label: label.to_string(),
            start: offset + start,
        })
    }
}

#[async_trait]
impl NerModel for HeuristicNerModel {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn label(&self, text: &str) -> Result<Vec<LabeledSpan>, ResumeError> {
        Ok(self.label_text(text))
    }
}

fn words_with_offsets(s: &str) -> Vec<(usize, &str)> {
    let mut words = Vec::new();
    let mut start = None;
    for (i, c) in s.char_indices() {
        if c.is_whitespace() {
            if let Some(st) = start.take() {
                words.push((st, &s[st..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(st) = start {
        words.push((st, &s[st..]));
    }
    words
}

/// "SMITH" → "Smith", for lookups in the title-cased word lists.
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Sorts by offset and drops spans that overlap an earlier, longer one.
fn remove_overlaps(mut spans: Vec<LabeledSpan>) -> Vec<LabeledSpan> {
    spans.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.text.len().cmp(&a.text.len()))
    });

    let mut kept: Vec<LabeledSpan> = Vec::with_capacity(spans.len());
    let mut last_end = 0;
    for span in spans {
        if kept.is_empty() || span.start >= last_end {
            last_end = span.start + span.text.len();
            kept.push(span);
        }
    }
    kept
}

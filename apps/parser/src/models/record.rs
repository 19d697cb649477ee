use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Categories a NER model can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    Person,
    Organization,
}

/// Category → matched strings, in order of appearance.
///
/// `education` is never populated: no stage extracts it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMap {
    #[serde(rename = "PERSON")]
    pub person: Vec<String>,
    #[serde(rename = "ORG")]
    pub organization: Vec<String>,
    #[serde(rename = "EDUCATION")]
    pub education: Vec<String>,
    #[serde(rename = "SKILLS")]
    pub skills: Vec<String>,
}

impl EntityMap {
    pub fn push(&mut self, category: EntityCategory, value: String) {
        match category {
            EntityCategory::Person => self.person.push(value),
            EntityCategory::Organization => self.organization.push(value),
        }
    }

    /// Replaces the skill list with the matcher's result.
    pub fn set_skills(&mut self, skills: BTreeSet<String>) {
        self.skills = skills.into_iter().collect();
    }
}

/// One row of the `resumes` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub name: Option<String>,
    pub skills: BTreeSet<String>,
    pub education: Vec<String>,
    pub organizations: Vec<String>,
}

impl ResumeRecord {
    /// Builds the record from a fully populated entity map.
    ///
    /// The first PERSON mention becomes the name; a resume without one yields
    /// `name: None` rather than a failure. Organizations keep first-seen order
    /// with repeats removed.
    pub fn from_entities(entities: &EntityMap) -> Self {
        Self {
            name: entities
                .person
                .iter()
                .map(|p| p.trim())
                .find(|p| !p.is_empty())
                .map(String::from),
            skills: entities.skills.iter().cloned().collect(),
            education: dedup_in_order(&entities.education),
            organizations: dedup_in_order(&entities.organization),
        }
    }
}

fn dedup_in_order(values: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .iter()
        .filter(|v| seen.insert(v.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_record_takes_first_person_as_name() {
        let entities = EntityMap {
            person: strings(&["John Smith", "Jane Doe"]),
            ..Default::default()
        };
        let record = ResumeRecord::from_entities(&entities);
        assert_eq!(record.name.as_deref(), Some("John Smith"));
    }

    #[test]
    fn test_record_without_person_has_no_name() {
        let entities = EntityMap {
            organization: strings(&["Acme Corp"]),
            ..Default::default()
        };
        let record = ResumeRecord::from_entities(&entities);
        assert_eq!(record.name, None);
        assert_eq!(record.organizations, strings(&["Acme Corp"]));
    }

    #[test]
    fn test_record_dedups_organizations_keeping_order() {
        let entities = EntityMap {
            organization: strings(&["Globex", "Acme Corp", "Globex"]),
            ..Default::default()
        };
        let record = ResumeRecord::from_entities(&entities);
        assert_eq!(record.organizations, strings(&["Globex", "Acme Corp"]));
        assert!(record.education.is_empty());
    }

    #[test]
    fn test_entity_map_serializes_with_category_keys() {
        let mut entities = EntityMap::default();
        entities.push(EntityCategory::Person, "John Smith".to_string());
        entities.set_skills(BTreeSet::from(["SQL".to_string(), "Python".to_string()]));

        let json = serde_json::to_value(&entities).unwrap();
        assert_eq!(json["PERSON"][0], "John Smith");
        assert_eq!(json["SKILLS"], serde_json::json!(["Python", "SQL"]));
        assert_eq!(json["EDUCATION"], serde_json::json!([]));
        assert!(json.get("ORG").is_some());
    }
}

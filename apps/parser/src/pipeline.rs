//! The resume pipeline: extract → entities → skills → record → store.
//!
//! Each stage is awaited before the next begins. A failure in any stage
//! returns before the store is reached, so no partial record is written.

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::entities::{EntityExtractor, NerModel};
use crate::errors::ResumeError;
use crate::extraction;
use crate::models::{EntityMap, RawDocument, ResumeRecord};
use crate::skills::SkillMatcher;
use crate::store::RecordStore;

pub struct ResumeParser {
    entities: EntityExtractor,
    skills: SkillMatcher,
    store: Option<Arc<dyn RecordStore>>,
}

impl ResumeParser {
    /// `store: None` runs every stage except persistence.
    pub fn new<S: AsRef<str>>(
        model: Arc<dyn NerModel>,
        vocabulary: &[S],
        store: Option<Arc<dyn RecordStore>>,
    ) -> Self {
        let skills = SkillMatcher::new(vocabulary);
        info!(
            model = model.name(),
            vocabulary = skills.vocabulary_len(),
            persist = store.is_some(),
            "Resume parser ready"
        );
        Self {
            entities: EntityExtractor::new(model),
            skills,
            store,
        }
    }

    /// Runs NER and skill matching on already-extracted text.
    pub async fn parse_text(&self, text: &str) -> Result<EntityMap, ResumeError> {
        let mut entities = self.entities.extract_entities(text).await?;
        entities.set_skills(self.skills.match_skills(text));
        Ok(entities)
    }

    /// Parses one document and, when a store is configured, writes its record.
    pub async fn process(&self, doc: &RawDocument) -> Result<EntityMap, ResumeError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("resume", %run_id, path = %doc.path.display());

        async {
            info!(format = %doc.format, "Processing resume");

            let text = extraction::extract_document(doc)?;
            let entities = self.parse_text(&text).await?;
            let record = ResumeRecord::from_entities(&entities);

            if record.name.is_none() {
                warn!("No PERSON entity found; storing record without a name");
            }

            match &self.store {
                Some(store) => store.store(&record).await?,
                None => info!("Dry run: record not stored"),
            }
            Ok::<_, ResumeError>(entities)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::tests::{span, FixedModel, UnavailableModel};
    use crate::entities::HeuristicNerModel;
    use crate::errors::ExtractionError;
    use crate::models::DocumentFormat;
    use async_trait::async_trait;
    use docx_rs::{Docx, Paragraph, Run};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<ResumeRecord>>,
    }

    #[async_trait]
    impl RecordStore for MemoryStore {
        async fn store(&self, record: &ResumeRecord) -> Result<(), ResumeError> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl RecordStore for FailingStore {
        async fn store(&self, _record: &ResumeRecord) -> Result<(), ResumeError> {
            Err(ResumeError::Write(sqlx::Error::RowNotFound))
        }
    }

    const VOCAB: [&str; 3] = ["Python", "SQL", "Java"];

    fn write_docx(paragraphs: &[&str]) -> tempfile::NamedTempFile {
        let mut docx = Docx::new();
        for p in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*p)));
        }
        let file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        docx.build().pack(file.reopen().unwrap()).unwrap();
        file
    }

    fn heuristic_parser(store: Option<Arc<dyn RecordStore>>) -> ResumeParser {
        ResumeParser::new(Arc::new(HeuristicNerModel::load(&VOCAB).unwrap()), &VOCAB, store)
    }

    #[tokio::test]
    async fn test_parse_text_scenario() {
        let parser = heuristic_parser(None);
        let entities = parser
            .parse_text("John Smith worked at Acme Corp using Python and SQL.")
            .await
            .unwrap();

        assert_eq!(entities.person, vec!["John Smith"]);
        assert_eq!(entities.organization, vec!["Acme Corp"]);
        assert_eq!(entities.skills, vec!["Python", "SQL"]);
        assert!(entities.education.is_empty());
    }

    #[tokio::test]
    async fn test_process_docx_stores_one_record() {
        let store = Arc::new(MemoryStore::default());
        let parser = heuristic_parser(Some(store.clone() as Arc<dyn RecordStore>));
        let file = write_docx(&[
            "John Smith",
            "Worked at Acme Corp using Python and SQL.",
        ]);
        let doc = RawDocument::new(file.path(), DocumentFormat::Docx);

        parser.process(&doc).await.unwrap();

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("John Smith"));
        assert_eq!(records[0].organizations, vec!["Acme Corp"]);
        assert!(records[0].skills.contains("Python"));
        assert!(records[0].skills.contains("SQL"));
        assert!(!records[0].skills.contains("Java"));
    }

    #[tokio::test]
    async fn test_process_without_person_stores_nameless_record() {
        let store = Arc::new(MemoryStore::default());
        let model = FixedModel(vec![span("Acme Corp", "ORG", 0)]);
        let parser = ResumeParser::new(
            Arc::new(model),
            &VOCAB,
            Some(store.clone() as Arc<dyn RecordStore>),
        );
        let file = write_docx(&["Acme Corp, Java developer"]);
        let doc = RawDocument::new(file.path(), DocumentFormat::Docx);

        let entities = parser.process(&doc).await.unwrap();
        assert!(entities.person.is_empty());

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, None);
        assert_eq!(records[0].skills.len(), 1);
    }

    #[tokio::test]
    async fn test_extraction_failure_writes_nothing() {
        let store = Arc::new(MemoryStore::default());
        let parser = heuristic_parser(Some(store.clone() as Arc<dyn RecordStore>));
        let doc = RawDocument::new("/nonexistent/resume.pdf", DocumentFormat::Pdf);

        let err = parser.process(&doc).await.unwrap_err();
        assert!(matches!(
            err,
            ResumeError::Extraction(ExtractionError::Open { .. })
        ));
        assert_eq!(err.stage(), "extract");
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_writes_nothing() {
        let store = Arc::new(MemoryStore::default());
        let parser = ResumeParser::new(
            Arc::new(UnavailableModel),
            &VOCAB,
            Some(store.clone() as Arc<dyn RecordStore>),
        );
        let file = write_docx(&["John Smith"]);
        let doc = RawDocument::new(file.path(), DocumentFormat::Docx);

        let err = parser.process(&doc).await.unwrap_err();
        assert_eq!(err.stage(), "entities");
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_propagates_and_next_document_still_runs() {
        let parser = heuristic_parser(Some(Arc::new(FailingStore) as Arc<dyn RecordStore>));
        let file = write_docx(&["John Smith"]);
        let doc = RawDocument::new(file.path(), DocumentFormat::Docx);

        let err = parser.process(&doc).await.unwrap_err();
        assert!(matches!(err, ResumeError::Write(_)));

        // Nothing from the failed run leaks into the next one.
        let dry = heuristic_parser(None);
        assert!(dry.process(&doc).await.is_ok());
    }

    #[tokio::test]
    async fn test_dry_run_returns_entities() {
        let parser = heuristic_parser(None);
        let file = write_docx(&["Jane Doe", "Skills: java, python"]);
        let doc = RawDocument::new(file.path(), DocumentFormat::Docx);

        let entities = parser.process(&doc).await.unwrap();
        assert_eq!(entities.person, vec!["Jane Doe"]);
        assert_eq!(entities.skills, vec!["Java", "Python"]);
    }
}

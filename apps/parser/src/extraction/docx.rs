use std::path::Path;

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, Run, RunChild};
use tracing::warn;

use crate::errors::ExtractionError;

/// Extracts body paragraphs in document order, one per line.
pub fn extract_docx(path: &Path) -> Result<String, ExtractionError> {
    let bytes = super::read_file(path)?;

    let docx = docx_rs::read_docx(&bytes).map_err(|e| {
        warn!(path = %path.display(), error = %e, "Failed to read DOCX");
        ExtractionError::Docx(e.to_string())
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        match child {
            ParagraphChild::Run(run) => push_run_text(&mut text, run),
            ParagraphChild::Hyperlink(link) => {
                for child in &link.children {
                    if let ParagraphChild::Run(run) = child {
                        push_run_text(&mut text, run);
                    }
                }
            }
            _ => {}
        }
    }
    text
}

fn push_run_text(text: &mut String, run: &Run) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

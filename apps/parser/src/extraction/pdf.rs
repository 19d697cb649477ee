use std::path::Path;

use tracing::warn;

use crate::errors::ExtractionError;

/// Extracts text page by page and concatenates it.
///
/// Pages are joined with no separator, so the last word of one page may run
/// into the first word of the next. A document with no pages, or any page
/// without a text layer (e.g. a scanned image), is rejected.
pub fn extract_pdf(path: &Path) -> Result<String, ExtractionError> {
    let bytes = super::read_file(path)?;

    let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| {
        warn!(path = %path.display(), error = %e, "Failed to extract PDF text");
        ExtractionError::Pdf(e.to_string())
    })?;

    join_pages(pages)
}

fn join_pages(pages: Vec<String>) -> Result<String, ExtractionError> {
    if pages.is_empty() {
        return Err(ExtractionError::NoPages);
    }

    let mut text = String::new();
    for (idx, page) in pages.iter().enumerate() {
        if page.trim().is_empty() {
            return Err(ExtractionError::EmptyPage { page: idx + 1 });
        }
        text.push_str(page);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::io::Write;

    /// Writes a PDF with one page per entry in `pages` (Courier, one text line each).
    fn write_pdf(pages: &[&str]) -> tempfile::NamedTempFile {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        doc.save_to(&mut file).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_extract_single_text_page() {
        let file = write_pdf(&["Hello Resume"]);
        let text = extract_pdf(file.path()).unwrap();
        assert!(!text.trim().is_empty());
        assert!(text.contains("Hello"));
    }

    #[test]
    fn test_pages_concatenated_in_order() {
        let file = write_pdf(&["Alpha", "Omega"]);
        let text = extract_pdf(file.path()).unwrap();
        let alpha = text.find("Alpha").unwrap();
        let omega = text.find("Omega").unwrap();
        assert!(alpha < omega);
    }

    #[test]
    fn test_zero_page_pdf_is_error() {
        let file = write_pdf(&[]);
        assert!(extract_pdf(file.path()).is_err());
    }

    #[test]
    fn test_garbage_bytes_are_pdf_error() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"this is not a pdf at all").unwrap();
        file.flush().unwrap();
        assert!(matches!(
            extract_pdf(file.path()),
            Err(ExtractionError::Pdf(_))
        ));
    }

    #[test]
    fn test_join_pages_rejects_blank_page() {
        let pages = vec!["Page one".to_string(), "  \n".to_string()];
        assert!(matches!(
            join_pages(pages),
            Err(ExtractionError::EmptyPage { page: 2 })
        ));
    }

    #[test]
    fn test_join_pages_has_no_separator() {
        let pages = vec!["end".to_string(), "start".to_string()];
        assert_eq!(join_pages(pages).unwrap(), "endstart");
    }

    #[test]
    fn test_join_pages_empty_is_no_pages() {
        assert!(matches!(join_pages(vec![]), Err(ExtractionError::NoPages)));
    }
}

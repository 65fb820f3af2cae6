use insight_relay::application::ports::{FileLoader, FileLoaderError};
use insight_relay::domain::{ContentType, Document};
use insight_relay::infrastructure::text_processing::PdfAdapter;

use crate::fixtures::pdf_with_text;

fn pdf_document(name: &str, data: &[u8]) -> Document {
    Document::new(name.to_string(), ContentType::Pdf, data.len() as u64)
}

#[tokio::test]
async fn given_valid_pdf_bytes_when_extracting_then_returns_text() {
    let adapter = PdfAdapter::new();
    let pdf_bytes = pdf_with_text("Quarterly revenue grew steadily");
    let document = pdf_document("report.pdf", &pdf_bytes);

    let result = adapter.extract_text(&pdf_bytes, &document).await;

    let text = result.unwrap();
    assert!(text.contains("Quarterly") || text.contains("revenue"));
}

#[tokio::test]
async fn given_corrupt_bytes_when_extracting_pdf_then_returns_extraction_failed() {
    let adapter = PdfAdapter::new();
    let garbage = b"not a pdf at all";
    let document = pdf_document("corrupt.pdf", garbage);

    let result = adapter.extract_text(garbage, &document).await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}

#[tokio::test]
async fn given_pdf_without_text_when_extracting_then_returns_no_text_found() {
    let adapter = PdfAdapter::new();
    let pdf_bytes = pdf_with_text("");
    let document = pdf_document("scanned.pdf", &pdf_bytes);

    let result = adapter.extract_text(&pdf_bytes, &document).await;

    assert!(matches!(result, Err(FileLoaderError::NoTextFound(name)) if name == "scanned.pdf"));
}

#[tokio::test]
async fn given_docx_content_type_when_extracting_with_pdf_adapter_then_returns_unsupported() {
    let adapter = PdfAdapter::new();
    let data = b"some data";
    let document = Document::new("notes.docx".to_string(), ContentType::Docx, data.len() as u64);

    let result = adapter.extract_text(data, &document).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}

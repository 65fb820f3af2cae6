use std::io::{Cursor, Read};
use std::time::Duration;

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document};

use super::text_sanitizer::sanitize_extracted_text;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);
const MAIN_PART: &str = "word/document.xml";

/// Raw text of a WordprocessingML package: every `w:t` run in document order,
/// one line per paragraph.
#[derive(Default)]
pub struct DocxAdapter;

impl DocxAdapter {
    pub fn new() -> Self {
        Self
    }

    fn read_main_part(data: &[u8]) -> Result<String, FileLoaderError> {
        let mut archive = ZipArchive::new(Cursor::new(data)).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("not a DOCX package: {e}"))
        })?;

        let mut part = archive.by_name(MAIN_PART).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("missing {MAIN_PART}: {e}"))
        })?;

        let mut xml = String::new();
        part.read_to_string(&mut xml).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to read {MAIN_PART}: {e}"))
        })?;

        Ok(xml)
    }

    pub fn extract_runs(xml: &str) -> Result<String, FileLoaderError> {
        let mut reader = Reader::from_str(xml);
        let mut text = String::new();
        let mut in_text_run = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"w:t" => in_text_run = true,
                    b"w:tab" => text.push('\t'),
                    b"w:br" | b"w:cr" => text.push('\n'),
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"w:tab" => text.push('\t'),
                    b"w:br" | b"w:cr" | b"w:p" => text.push('\n'),
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"w:t" => in_text_run = false,
                    b"w:p" => text.push('\n'),
                    _ => {}
                },
                Ok(Event::Text(e)) if in_text_run => {
                    let run = e.unescape().map_err(|err| {
                        FileLoaderError::ExtractionFailed(format!("malformed text run: {err}"))
                    })?;
                    text.push_str(&run);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(FileLoaderError::ExtractionFailed(format!(
                        "malformed document XML at byte {}: {e}",
                        reader.buffer_position()
                    )));
                }
            }
        }

        Ok(text)
    }
}

#[async_trait]
impl FileLoader for DocxAdapter {
    #[tracing::instrument(
        skip(self, data),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
        )
    )]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        if document.content_type != ContentType::Docx {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let bytes = data.to_vec();
        let raw = tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || {
                Self::read_main_part(&bytes).and_then(|xml| Self::extract_runs(&xml))
            }),
        )
        .await
        .map_err(|_| FileLoaderError::ExtractionFailed("DOCX extraction timed out".to_string()))?
        .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))??;

        let text = sanitize_extracted_text(&raw);
        tracing::info!(chars = text.len(), "DOCX text extraction complete");

        if text.is_empty() {
            return Err(FileLoaderError::NoTextFound(document.filename.clone()));
        }

        Ok(text)
    }
}

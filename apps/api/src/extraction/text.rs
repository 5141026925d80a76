//! Raw text extraction from uploaded resume documents.
//!
//! PDF goes through `pdf-extract`; Word documents are read straight out of
//! the OOXML package (`word/document.xml`), one line per paragraph.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Doc,
}

impl DocumentFormat {
    pub const ALLOWED_EXTENSIONS: [&'static str; 3] = [".pdf", ".docx", ".doc"];

    /// Case-insensitive lookup by file extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            _ => None,
        }
    }
}

/// Lowercased extension with its leading dot, or "" when there is none.
pub fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum TextExtractionError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Failed to read Word document: {0}")]
    Docx(String),

    #[error("Failed to extract text from resume")]
    Empty,
}

/// Turns an uploaded document into plain text.
pub trait DocumentTextExtractor: Send + Sync {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String, TextExtractionError>;
}

pub struct DefaultTextExtractor;

impl DocumentTextExtractor for DefaultTextExtractor {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String, TextExtractionError> {
        let format = DocumentFormat::from_filename(filename)
            .ok_or_else(|| TextExtractionError::UnsupportedFormat(extension_of(filename)))?;

        let text = match format {
            DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| TextExtractionError::Pdf(e.to_string()))?,
            // Legacy binary .doc files are not zip packages and fail here.
            DocumentFormat::Docx | DocumentFormat::Doc => {
                let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
                    .map_err(|e| TextExtractionError::Docx(format!("Failed to open DOCX: {e}")))?;
                docx_text(&mut archive)?
            }
        };

        if text.trim().is_empty() {
            return Err(TextExtractionError::Empty);
        }
        Ok(text)
    }
}

fn docx_text<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> Result<String, TextExtractionError> {
    let mut document_xml = archive
        .by_name("word/document.xml")
        .map_err(|e| TextExtractionError::Docx(format!("Failed to find document.xml: {e}")))?;

    let mut xml = String::new();
    document_xml
        .read_to_string(&mut xml)
        .map_err(|e| TextExtractionError::Docx(format!("Failed to read document.xml: {e}")))?;

    paragraphs_from_xml(&xml)
}

fn paragraphs_from_xml(xml: &str) -> Result<String, TextExtractionError> {
    let mut reader = Reader::from_str(xml);

    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"t" => in_run_text = true,
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"tab" => text.push('\t'),
            Ok(Event::Text(e)) if in_run_text => {
                text.push_str(&e.decode().unwrap_or_default());
            }
            // `&amp;`, `&#38;` and friends arrive as their own events.
            Ok(Event::GeneralRef(e)) if in_run_text => {
                if let Ok(Some(c)) = e.resolve_char_ref() {
                    text.push(c);
                } else if let Some(resolved) = e.decode().ok().as_deref().and_then(predefined_entity) {
                    text.push_str(resolved);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(TextExtractionError::Docx(format!("XML parsing error: {e}")));
            }
            _ => {}
        }
    }

    Ok(text)
}

fn predefined_entity(name: &str) -> Option<&'static str> {
    match name {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) fn docx_fixture(paragraphs: &[&str]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

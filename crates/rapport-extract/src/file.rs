//! Text extraction from uploaded documents.

use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use rapport_core::{Error, Result};
use tracing::debug;

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Detect the format from a filename's extension.
    pub fn from_filename(filename: &str) -> Result<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "txt" => Ok(Self::PlainText),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "" => Err(Error::UnsupportedFile(format!(
                "{}: missing extension (expected .txt, .pdf, or .docx)",
                filename
            ))),
            other => Err(Error::UnsupportedFile(format!(
                "{}: .{} is not supported (expected .txt, .pdf, or .docx)",
                filename, other
            ))),
        }
    }
}

/// Read raw text from an uploaded document.
pub fn read_document(filename: &str, bytes: &[u8]) -> Result<String> {
    let kind = DocumentKind::from_filename(filename)?;
    debug!("Reading {:?} document {} ({} bytes)", kind, filename, bytes.len());

    match kind {
        DocumentKind::PlainText => Ok(String::from_utf8_lossy(bytes).into_owned()),
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| Error::Validation(format!("Failed to extract PDF text: {}", e))),
        DocumentKind::Docx => read_docx(bytes),
    }
}

/// Paragraph text from `word/document.xml` inside the DOCX archive.
fn read_docx(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::Validation(format!("Failed to read DOCX as ZIP: {}", e)))?;

    let mut doc_xml = String::new();
    {
        let mut entry = archive
            .by_name("word/document.xml")
            .map_err(|_| Error::Validation("Invalid DOCX: missing word/document.xml".into()))?;
        entry.read_to_string(&mut doc_xml)?;
    }

    let mut reader = Reader::from_str(&doc_xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => paragraph.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"tab" => paragraph.push(' '),
                b"br" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    if !paragraph.trim().is_empty() {
                        paragraphs.push(std::mem::take(&mut paragraph));
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::Validation(format!("DOCX XML error: {}", e)))?;
                    paragraph.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Validation(format!("DOCX XML error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}

/// Collapse whitespace runs and truncate to `max_chars` on a char boundary.
pub fn normalize_document_text(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => collapsed[..byte_idx].trim_end().to_string(),
        None => collapsed,
    }
}

//! Résumé text intake: turns uploaded bytes or pasted text into the raw and
//! normalized forms the extractor consumes.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::AppError;

/// Part of a `.docx` package holding the body text.
const DOCX_BODY_PART: &str = "word/document.xml";

/// Raw text plus its lowercased, whitespace-collapsed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSource {
    pub raw_text: String,
    pub normalized_text: String,
}

impl TextSource {
    pub fn from_raw(raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let normalized_text = normalize_text(&raw_text);
        Self {
            raw_text,
            normalized_text,
        }
    }

    /// Extracts text from an uploaded file, dispatching on its extension.
    ///
    /// PDF and DOCX parsing are CPU-bound; callers on the async runtime should
    /// run this inside `spawn_blocking`.
    pub fn from_upload(filename: &str, bytes: &[u8]) -> Result<Self, AppError> {
        let lower = filename.to_lowercase();
        let raw_text = if lower.ends_with(".pdf") {
            pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}")))?
        } else if lower.ends_with(".docx") {
            docx_text(bytes)?
        } else if lower.ends_with(".txt") {
            String::from_utf8_lossy(bytes).into_owned()
        } else {
            return Err(AppError::UnsupportedFormat(format!(
                "'{filename}' is not a supported résumé format (use .pdf, .docx or .txt)"
            )));
        };

        if raw_text.trim().is_empty() {
            return Err(AppError::UnprocessableEntity(format!(
                "No text could be extracted from '{filename}'"
            )));
        }
        Ok(Self::from_raw(raw_text))
    }
}

/// Lowercases and collapses every whitespace run to a single space.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Paragraph text of a `.docx` package, one line per non-blank paragraph.
fn docx_text(bytes: &[u8]) -> Result<String, AppError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(unreadable_docx)?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(unreadable_docx)?
        .read_to_string(&mut xml)
        .map_err(unreadable_docx)?;

    let paragraphs = docx_paragraphs(&xml).map_err(unreadable_docx)?;
    Ok(paragraphs
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

fn unreadable_docx(e: impl std::fmt::Display) -> AppError {
    AppError::UnprocessableEntity(format!("Could not read DOCX: {e}"))
}

/// Walks WordprocessingML and collects the run text of each `<w:p>`.
/// Only `<w:t>` content counts; tabs and breaks inside runs become `\t`/`\n`.
fn docx_paragraphs(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"r" => in_run = false,
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) if in_run => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paragraphs)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Minimal `.docx` package whose body is the given `<w:body>` content.
    pub fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
            .unwrap();
        zip.start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    /// One `<w:p>` with a single run per paragraph.
    pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
            .collect();
        docx_with_body(&body)
    }
}

//! DOCX reader: unzips `word/document.xml` and collects the text runs of
//! every paragraph.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::{DocumentFormat, ExtractError};

const DOCUMENT_PART: &str = "word/document.xml";

/// Joins the non-blank paragraphs with `\n`.
pub fn extract_text(data: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(data)).map_err(unreadable)?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(unreadable)?
        .read_to_string(&mut xml)
        .map_err(unreadable)?;

    let text = paragraphs(&xml)?
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    Ok(text)
}

fn unreadable(e: impl std::fmt::Display) -> ExtractError {
    ExtractError::Unreadable {
        format: DocumentFormat::Docx,
        reason: e.to_string(),
    }
}

fn paragraphs(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text_run = false;

    loop {
        match reader.read_event().map_err(unreadable)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => current = Some(String::new()),
                b"t" => in_text_run = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => push(&mut current, "\t"),
                b"br" | b"cr" => push(&mut current, "\n"),
                _ => {}
            },
            Event::Text(e) if in_text_run => {
                let text = e.unescape().map_err(unreadable)?;
                push(&mut current, &text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => paragraphs.extend(current.take()),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push(current: &mut Option<String>, text: &str) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.push_str(text);
    }
}

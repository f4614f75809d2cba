//! Text-bearing XML parts and their runs
//!
//! A part keeps its original bytes and records, for every `<w:t>` element,
//! where the opening tag and the text content sit in those bytes. Edits are
//! applied by splicing new content into the original buffer, so bytes
//! outside an edited element are never re-serialized.

use crate::archive::PartKind;
use crate::error::EngineError;
use quick_xml::escape::{partial_escape, unescape};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::ops::Range;

const PARAGRAPH: &[u8] = b"w:p";
const TEXT: &[u8] = b"w:t";
const SPACE_PRESERVE: &[u8] = b" xml:space=\"preserve\"";

/// Paragraph index given to runs that sit outside any `<w:p>`
pub const NO_PARAGRAPH: usize = usize::MAX;

/// One `<w:t>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// Index of the innermost enclosing paragraph
    pub paragraph: usize,
    text: String,
    open_tag: Range<usize>,
    content: Range<usize>,
    preserves_space: bool,
    dirty: bool,
}

impl TextRun {
    /// Decoded text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the decoded text in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the run carries no text
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether the run has been rewritten since parsing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// A text-bearing archive member
#[derive(Debug, Clone)]
pub struct XmlPart {
    name: String,
    kind: PartKind,
    xml: Vec<u8>,
    runs: Vec<TextRun>,
}

impl XmlPart {
    /// Parse a part and index its text runs
    pub fn parse(name: impl Into<String>, kind: PartKind, xml: Vec<u8>) -> Result<Self, EngineError> {
        let name = name.into();
        let runs = index_runs(&name, &xml)?;
        Ok(Self {
            name,
            kind,
            xml,
            runs,
        })
    }

    /// Archive member name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Part category
    pub fn kind(&self) -> PartKind {
        self.kind
    }

    /// Runs in document order
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Bytes as read from the archive
    pub fn original_bytes(&self) -> &[u8] {
        &self.xml
    }

    /// Replace the text of one run
    ///
    /// The run is only marked for rewriting when the text actually changes.
    pub fn set_run_text(&mut self, index: usize, text: String) {
        if let Some(run) = self.runs.get_mut(index) {
            if run.text != text {
                run.text = text;
                run.dirty = true;
            }
        }
    }

    /// Whether any run has been rewritten
    pub fn is_dirty(&self) -> bool {
        self.runs.iter().any(|r| r.dirty)
    }

    /// Concatenated text of every run
    pub fn logical_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Text of each paragraph, in document order
    pub fn paragraph_texts(&self) -> Vec<String> {
        let mut paragraphs: Vec<String> = Vec::new();
        let mut current = None;
        for run in &self.runs {
            if current != Some(run.paragraph) {
                paragraphs.push(String::new());
                current = Some(run.paragraph);
            }
            if let Some(last) = paragraphs.last_mut() {
                last.push_str(&run.text);
            }
        }
        paragraphs
    }

    /// Serialize the part
    ///
    /// Untouched runs and all markup between runs are copied verbatim from
    /// the original buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        if !self.is_dirty() {
            return self.xml.clone();
        }

        let mut out = Vec::with_capacity(self.xml.len() + 64);
        let mut cursor = 0;
        for run in self.runs.iter().filter(|r| r.dirty) {
            if !run.preserves_space && has_edge_whitespace(&run.text) {
                out.extend_from_slice(&self.xml[cursor..run.open_tag.start]);
                let tag = &self.xml[run.open_tag.clone()];
                out.extend_from_slice(&tag[..TEXT.len() + 1]);
                out.extend_from_slice(SPACE_PRESERVE);
                out.extend_from_slice(&tag[TEXT.len() + 1..]);
            } else {
                out.extend_from_slice(&self.xml[cursor..run.content.start]);
            }
            out.extend_from_slice(partial_escape(&run.text).as_bytes());
            cursor = run.content.end;
        }
        out.extend_from_slice(&self.xml[cursor..]);
        out
    }
}

fn has_edge_whitespace(text: &str) -> bool {
    text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace)
}

/// Start of the markup that ends at `end`
fn tag_start(xml: &[u8], end: usize) -> Option<usize> {
    xml.get(..end)?.iter().rposition(|&b| b == b'<')
}

fn index_runs(name: &str, xml: &[u8]) -> Result<Vec<TextRun>, EngineError> {
    let mut reader = Reader::from_reader(xml);
    let mut runs = Vec::new();
    let mut open_paragraphs: Vec<usize> = Vec::new();
    let mut next_paragraph = 0;
    let mut open_text: Option<(Range<usize>, bool)> = None;

    loop {
        let event = reader.read_event().map_err(|e| EngineError::xml(name, e))?;
        let position = reader.buffer_position() as usize;

        match event {
            Event::Start(ref e) if e.name().as_ref() == PARAGRAPH => {
                open_paragraphs.push(next_paragraph);
                next_paragraph += 1;
            }
            Event::End(ref e) if e.name().as_ref() == PARAGRAPH => {
                open_paragraphs.pop();
            }
            Event::Start(ref e) if e.name().as_ref() == TEXT => {
                let start = tag_start(xml, position)
                    .ok_or_else(|| EngineError::xml(name, "unlocatable <w:t> tag"))?;
                let preserves_space = e
                    .attributes()
                    .flatten()
                    .any(|a| a.key.as_ref() == b"xml:space" && a.value.as_ref() == b"preserve");
                open_text = Some((start..position, preserves_space));
            }
            Event::End(ref e) if e.name().as_ref() == TEXT => {
                let (open_tag, preserves_space) = open_text
                    .take()
                    .ok_or_else(|| EngineError::xml(name, "unbalanced </w:t>"))?;
                let end = tag_start(xml, position)
                    .filter(|&end| end >= open_tag.end)
                    .ok_or_else(|| EngineError::xml(name, "unlocatable </w:t> tag"))?;
                let content = open_tag.end..end;
                let raw = std::str::from_utf8(&xml[content.clone()])
                    .map_err(|e| EngineError::xml(name, e))?;
                let text = unescape(raw).map_err(|e| EngineError::xml(name, e))?.into_owned();

                runs.push(TextRun {
                    paragraph: open_paragraphs.last().copied().unwrap_or(NO_PARAGRAPH),
                    text,
                    open_tag,
                    content,
                    preserves_space,
                    dirty: false,
                });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(runs)
}

//! Word-processing package access
//!
//! Opens the zip container, loads every text-bearing member in a fixed
//! order, and writes the package back. Members that were not edited are
//! copied with their compressed bytes untouched.

use crate::error::EngineError;
use crate::part::XmlPart;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Member name of the main document body
pub const MAIN_DOCUMENT: &str = "word/document.xml";

/// Category of a text-bearing member
///
/// The derived ordering is the scan order: body, headers, footers,
/// footnotes, endnotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartKind {
    /// `word/document.xml`
    Body,
    /// `word/headerN.xml`
    Header,
    /// `word/footerN.xml`
    Footer,
    /// `word/footnotes.xml`
    Footnotes,
    /// `word/endnotes.xml`
    Endnotes,
}

impl PartKind {
    /// Classify an archive member name, returning the kind and its number
    pub fn from_member_name(name: &str) -> Option<(PartKind, u32)> {
        match name {
            MAIN_DOCUMENT => return Some((PartKind::Body, 0)),
            "word/footnotes.xml" => return Some((PartKind::Footnotes, 0)),
            "word/endnotes.xml" => return Some((PartKind::Endnotes, 0)),
            _ => {}
        }

        let stem = name.strip_prefix("word/")?.strip_suffix(".xml")?;
        if let Some(n) = stem.strip_prefix("header") {
            return part_number(n).map(|n| (PartKind::Header, n));
        }
        if let Some(n) = stem.strip_prefix("footer") {
            return part_number(n).map(|n| (PartKind::Footer, n));
        }
        None
    }
}

fn part_number(suffix: &str) -> Option<u32> {
    if suffix.is_empty() {
        return Some(0);
    }
    if !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// An opened package with its text-bearing parts loaded
pub struct DocxArchive<'a> {
    source: &'a [u8],
    parts: Vec<XmlPart>,
}

impl<'a> DocxArchive<'a> {
    /// Open a package and parse its text-bearing parts
    ///
    /// Fails with `MalformedArchive` when the bytes are not a zip package,
    /// when the main document is missing, or when a part exceeds
    /// `max_part_bytes` once decompressed.
    pub fn open(source: &'a [u8], max_part_bytes: u64) -> Result<Self, EngineError> {
        let mut zip = ZipArchive::new(Cursor::new(source))
            .map_err(|e| EngineError::MalformedArchive(format!("not a zip package: {}", e)))?;

        let mut members: Vec<(PartKind, u32, String)> = zip
            .file_names()
            .filter_map(|name| {
                PartKind::from_member_name(name).map(|(kind, n)| (kind, n, name.to_string()))
            })
            .collect();

        if !members.iter().any(|(kind, _, _)| *kind == PartKind::Body) {
            return Err(EngineError::MalformedArchive(format!(
                "missing required part {}",
                MAIN_DOCUMENT
            )));
        }
        members.sort();

        let mut parts = Vec::with_capacity(members.len());
        for (kind, _, name) in members {
            let mut file = zip.by_name(&name)?;
            if file.size() > max_part_bytes {
                return Err(EngineError::MalformedArchive(format!(
                    "{} is {} bytes, limit is {}",
                    name,
                    file.size(),
                    max_part_bytes
                )));
            }
            let mut xml = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut xml)?;
            drop(file);

            let part = XmlPart::parse(name, kind, xml)?;
            debug!("Loaded {} with {} text runs", part.name(), part.runs().len());
            parts.push(part);
        }

        Ok(Self { source, parts })
    }

    /// Text-bearing parts in scan order
    pub fn parts(&self) -> &[XmlPart] {
        &self.parts
    }

    /// Mutable access for the replacer
    pub fn parts_mut(&mut self) -> &mut [XmlPart] {
        &mut self.parts
    }

    /// The main document body
    pub fn body(&self) -> Option<&XmlPart> {
        self.parts.iter().find(|p| p.kind() == PartKind::Body)
    }

    /// Serialize the package
    ///
    /// Edited parts are re-compressed; every other member, including
    /// untouched text parts, is raw-copied so its bytes do not change.
    pub fn write(&self) -> Result<Vec<u8>, EngineError> {
        let edited: HashMap<&str, Vec<u8>> = self
            .parts
            .iter()
            .filter(|p| p.is_dirty())
            .map(|p| (p.name(), p.to_bytes()))
            .collect();

        if edited.is_empty() {
            return Ok(self.source.to_vec());
        }

        let mut zip = ZipArchive::new(Cursor::new(self.source))?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(self.source.len())));

        for index in 0..zip.len() {
            let file = zip.by_index_raw(index)?;
            let name = file.name().to_string();
            match edited.get(name.as_str()) {
                Some(bytes) => {
                    let options =
                        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
                    writer.start_file(name, options)?;
                    writer.write_all(bytes)?;
                }
                None => writer.raw_copy_file(file)?,
            }
        }

        Ok(writer.finish()?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_classification() {
        assert_eq!(PartKind::from_member_name("word/document.xml"), Some((PartKind::Body, 0)));
        assert_eq!(PartKind::from_member_name("word/header2.xml"), Some((PartKind::Header, 2)));
        assert_eq!(PartKind::from_member_name("word/footer.xml"), Some((PartKind::Footer, 0)));
        assert_eq!(PartKind::from_member_name("word/footnotes.xml"), Some((PartKind::Footnotes, 0)));
        assert_eq!(PartKind::from_member_name("word/endnotes.xml"), Some((PartKind::Endnotes, 0)));
    }

    #[test]
    fn test_non_text_members_ignored() {
        assert_eq!(PartKind::from_member_name("word/styles.xml"), None);
        assert_eq!(PartKind::from_member_name("word/_rels/header1.xml.rels"), None);
        assert_eq!(PartKind::from_member_name("word/headerx.xml"), None);
        assert_eq!(PartKind::from_member_name("word/media/header1.png"), None);
    }

    #[test]
    fn test_scan_order() {
        let mut names = vec![
            (PartKind::Endnotes, 0),
            (PartKind::Footer, 1),
            (PartKind::Header, 10),
            (PartKind::Header, 2),
            (PartKind::Body, 0),
        ];
        names.sort();
        assert_eq!(
            names,
            vec![
                (PartKind::Body, 0),
                (PartKind::Header, 2),
                (PartKind::Header, 10),
                (PartKind::Footer, 1),
                (PartKind::Endnotes, 0),
            ]
        );
    }

    #[test]
    fn test_not_a_zip_is_malformed() {
        let result = DocxArchive::open(b"plain text, not a package", 1024);
        assert!(matches!(result, Err(EngineError::MalformedArchive(_))));
    }
}

//! In-memory word-processing package builder for tests

#![allow(dead_code)]

use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Fake PNG payload stored uncompressed, like Word stores media
pub const MEDIA: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 13, 0xde, 0xad];

pub const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:styleId="Normal"/></w:styles>"#;

/// Paragraphs, each a list of run texts
pub type Paragraphs = Vec<Vec<String>>;

#[derive(Default)]
pub struct DocxBuilder {
    body: Option<Paragraphs>,
    headers: Vec<Paragraphs>,
    footers: Vec<Paragraphs>,
    footnotes: Option<Paragraphs>,
    endnotes: Option<Paragraphs>,
}

pub fn paragraphs(spec: &[&[&str]]) -> Paragraphs {
    spec.iter()
        .map(|runs| runs.iter().map(|s| s.to_string()).collect())
        .collect()
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, spec: &[&[&str]]) -> Self {
        self.body = Some(paragraphs(spec));
        self
    }

    pub fn header(mut self, spec: &[&[&str]]) -> Self {
        self.headers.push(paragraphs(spec));
        self
    }

    pub fn footer(mut self, spec: &[&[&str]]) -> Self {
        self.footers.push(paragraphs(spec));
        self
    }

    pub fn footnotes(mut self, spec: &[&[&str]]) -> Self {
        self.footnotes = Some(paragraphs(spec));
        self
    }

    pub fn endnotes(mut self, spec: &[&[&str]]) -> Self {
        self.endnotes = Some(paragraphs(spec));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = CompressionMethod::Deflated;
        let stored = CompressionMethod::Stored;

        let mut add = |name: &str, bytes: &[u8], method: CompressionMethod| {
            let options = SimpleFileOptions::default().compression_method(method);
            writer.start_file(name, options).unwrap();
            writer.write_all(bytes).unwrap();
        };

        add("[Content_Types].xml", CONTENT_TYPES.as_bytes(), deflated);
        add("_rels/.rels", ROOT_RELS.as_bytes(), deflated);
        if let Some(body) = &self.body {
            add("word/document.xml", document_xml(body).as_bytes(), deflated);
        }
        add("word/styles.xml", STYLES.as_bytes(), deflated);
        add("word/media/image1.png", MEDIA, stored);
        for (i, header) in self.headers.iter().enumerate() {
            add(&format!("word/header{}.xml", i + 1), part_xml("w:hdr", header).as_bytes(), deflated);
        }
        for (i, footer) in self.footers.iter().enumerate() {
            add(&format!("word/footer{}.xml", i + 1), part_xml("w:ftr", footer).as_bytes(), deflated);
        }
        if let Some(notes) = &self.footnotes {
            add("word/footnotes.xml", notes_xml("w:footnotes", "w:footnote", notes).as_bytes(), deflated);
        }
        if let Some(notes) = &self.endnotes {
            add("word/endnotes.xml", notes_xml("w:endnotes", "w:endnote", notes).as_bytes(), deflated);
        }

        writer.finish().unwrap().into_inner()
    }
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="png" ContentType="image/png"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Runs alternate between plain and bold so neighbours differ in formatting
pub fn paragraphs_xml(paragraphs: &Paragraphs) -> String {
    let mut xml = String::new();
    for runs in paragraphs {
        xml.push_str("<w:p><w:pPr><w:jc w:val=\"both\"/></w:pPr>");
        for (i, text) in runs.iter().enumerate() {
            xml.push_str("<w:r>");
            if i % 2 == 1 {
                xml.push_str("<w:rPr><w:b/></w:rPr>");
            }
            xml.push_str(&format!("<w:t xml:space=\"preserve\">{}</w:t></w:r>", escape(text)));
        }
        xml.push_str("</w:p>");
    }
    xml
}

pub fn document_xml(body: &Paragraphs) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{}"><w:body>{}<w:sectPr/></w:body></w:document>"#,
        NAMESPACE,
        paragraphs_xml(body)
    )
}

fn part_xml(root: &str, paragraphs: &Paragraphs) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><{root} xmlns:w="{}">{}</{root}>"#,
        NAMESPACE,
        paragraphs_xml(paragraphs),
        root = root
    )
}

fn notes_xml(root: &str, note: &str, paragraphs: &Paragraphs) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><{root} xmlns:w="{}"><{note} w:id="1">{}</{note}></{root}>"#,
        NAMESPACE,
        paragraphs_xml(paragraphs),
        root = root,
        note = note
    )
}

/// Decompressed content of one member
pub fn member(package: &[u8], name: &str) -> Vec<u8> {
    let mut zip = ZipArchive::new(Cursor::new(package)).unwrap();
    let mut file = zip.by_name(name).unwrap();
    let mut out = Vec::new();
    file.read_to_end(&mut out).unwrap();
    out
}

/// Member names in archive order
pub fn member_names(package: &[u8]) -> Vec<String> {
    let zip = ZipArchive::new(Cursor::new(package)).unwrap();
    zip.file_names().map(str::to_string).collect::<Vec<_>>()
}

/// Compressed bytes and CRC of one member, as stored
pub fn raw_member(package: &[u8], name: &str) -> (Vec<u8>, u32) {
    let mut zip = ZipArchive::new(Cursor::new(package)).unwrap();
    let index = zip.index_for_name(name).unwrap();
    let mut file = zip.by_index_raw(index).unwrap();
    let crc = file.crc32();
    let mut out = Vec::new();
    file.read_to_end(&mut out).unwrap();
    (out, crc)
}

/// The SAFE-style agreement used across tests
pub fn safe_template() -> Vec<u8> {
    DocxBuilder::new()
        .body(&[
            &["SAFE (Simple Agreement for Future Equity)"],
            &[
                "THIS CERTIFIES THAT in exchange for the payment by ",
                "[Inv",
                "estor Na",
                "me]",
                " (the \u{201c}Investor\u{201d}) of $[_____________] (the \u{201c}Purchase Amount\u{201d}) on or about ",
                "[Date of Safe]",
                ", [Company Name], a [State of Incorporation] corporation (the \u{201c}Company\u{201d}), issues to the Investor the right to certain shares.",
            ],
            &["The \u{201c}Post-Money Valuation Cap\u{201d} is ", "$[_____________]", "."],
            &["This Safe is governed by the laws of [Governing Law Jurisdiction]."],
            &["[COMPANY]"],
            &["By: ", "[name]"],
            &["Title: [title]"],
        ])
        .header(&[&["[Company Name] \u{2013} Confidential"]])
        .footer(&[&["Dated ", "[Date ", "of Safe]"]])
        .footnotes(&[&["Investor: [Investor Name]"]])
        .endnotes(&[&["No placeholders here."]])
        .build()
}

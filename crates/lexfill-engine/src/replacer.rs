//! Split-run replacement
//!
//! Each part's logical text map is built once and every token in it is
//! located against that original text. Tokens whose placeholder is filled
//! are then rewritten in a single pass, touching only the runs a token
//! covers:
//!
//! - a token inside one run is spliced in place;
//! - a token spanning runs puts the value into the first run after its
//!   untouched prefix, empties every enclosed run (the node stays), and
//!   leaves the last run holding only its untouched suffix.
//!
//! Occurrences are rewritten from the highest offset down so the offsets
//! still to be used stay valid, and text written as a value is never
//! searched again. Alongside the edits the replacer keeps the logical text
//! each part should end up with and checks the runs against it; any drift
//! aborts the export.

use crate::archive::DocxArchive;
use crate::error::EngineError;
use crate::part::XmlPart;
use crate::scanner::find_part_tokens;
use crate::text_map::{LogicalTextMap, RunSpan};
use lexfill_domain::PlaceholderRegistry;
use std::ops::Range;
use tracing::debug;

/// What a replacement pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementReport {
    /// Token occurrences rewritten, across all parts
    pub occurrences: usize,

    /// Logical text each edited part must have once written
    pub expected: Vec<(String, String)>,
}

impl ReplacementReport {
    /// Whether anything was rewritten
    pub fn is_empty(&self) -> bool {
        self.occurrences == 0
    }
}

/// Rewrite every filled placeholder in every part of `archive`
pub fn replace_all(
    archive: &mut DocxArchive<'_>,
    registry: &PlaceholderRegistry,
) -> Result<ReplacementReport, EngineError> {
    let mut report = ReplacementReport::default();

    for part in archive.parts_mut() {
        let map = LogicalTextMap::build(part);
        let hits: Vec<(Range<usize>, &str)> = find_part_tokens(&map)
            .into_iter()
            .filter_map(|token| {
                let value = registry.find_by_label(&token.label)?.value.as_deref()?;
                Some((token.range, value))
            })
            .collect();
        if hits.is_empty() {
            continue;
        }

        let mut expected = map.text().to_string();
        for (range, value) in hits.iter().rev() {
            let span = map.span(range.clone()).ok_or_else(|| {
                EngineError::consistency(part.name(), format!("no runs cover {:?}", range))
            })?;
            splice(part, span, value)?;
            expected.replace_range(range.clone(), value);
        }

        if part.logical_text() != expected {
            return Err(EngineError::consistency(
                part.name(),
                "run texts do not concatenate to the expected text",
            ));
        }

        debug!("Replaced {} occurrences in {}", hits.len(), part.name());
        report.occurrences += hits.len();
        report.expected.push((part.name().to_string(), expected));
    }

    Ok(report)
}

/// Rewrite the runs covered by `span` so their text reads `value`
fn splice(part: &mut XmlPart, span: RunSpan, value: &str) -> Result<(), EngineError> {
    let out_of_step = || EngineError::consistency(part.name(), "span offsets fall outside run text");

    let first_text = part
        .runs()
        .get(span.first.run)
        .map(|r| r.text())
        .ok_or_else(out_of_step)?;
    let prefix = first_text.get(..span.first.offset).ok_or_else(out_of_step)?;

    if span.is_single_run() {
        let suffix = first_text.get(span.last.offset..).ok_or_else(out_of_step)?;
        let text = format!("{}{}{}", prefix, value, suffix);
        part.set_run_text(span.first.run, text);
        return Ok(());
    }

    let suffix = part
        .runs()
        .get(span.last.run)
        .and_then(|r| r.text().get(span.last.offset..))
        .ok_or_else(out_of_step)?
        .to_string();
    let head = format!("{}{}", prefix, value);

    part.set_run_text(span.first.run, head);
    for run in span.first.run + 1..span.last.run {
        part.set_run_text(run, String::new());
    }
    part.set_run_text(span.last.run, suffix);
    Ok(())
}

/// Re-open written bytes and confirm every edited part reads as expected
pub fn verify_written(
    written: &[u8],
    report: &ReplacementReport,
    max_part_bytes: u64,
) -> Result<(), EngineError> {
    let reopened = DocxArchive::open(written, max_part_bytes).map_err(|e| {
        EngineError::consistency("package", format!("rewritten package does not reopen: {}", e))
    })?;

    for (name, expected) in &report.expected {
        let part = reopened
            .parts()
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| EngineError::consistency(name, "part missing from rewritten package"))?;
        if part.logical_text() != *expected {
            return Err(EngineError::consistency(name, "rewritten text differs from expected"));
        }
    }
    Ok(())
}

//! Logical text map
//!
//! Flattens a part's runs into one string and maps logical byte offsets back
//! to `(run, offset within run)`. A map is built from the part's current
//! state and must be rebuilt after any run is rewritten.

use crate::part::{TextRun, XmlPart};
use std::ops::Range;

/// Position of a logical offset inside a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOffset {
    /// Run index within the part
    pub run: usize,
    /// Byte offset within the run's text
    pub offset: usize,
}

/// Runs touched by a logical range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSpan {
    /// Where the range starts
    pub first: RunOffset,
    /// Where the range ends (exclusive offset in the last run)
    pub last: RunOffset,
}

impl RunSpan {
    /// Whether the range lies inside a single run
    pub fn is_single_run(&self) -> bool {
        self.first.run == self.last.run
    }
}

/// Flattened view of a part
#[derive(Debug, Clone)]
pub struct LogicalTextMap {
    text: String,
    starts: Vec<usize>,
    paragraphs: Vec<usize>,
}

impl LogicalTextMap {
    /// Build the map from a part's current runs
    pub fn build(part: &XmlPart) -> Self {
        Self::from_runs(part.runs())
    }

    pub(crate) fn from_runs(runs: &[TextRun]) -> Self {
        let mut text = String::with_capacity(runs.iter().map(TextRun::len).sum());
        let mut starts = Vec::with_capacity(runs.len());
        let mut paragraphs = Vec::with_capacity(runs.len());
        for run in runs {
            starts.push(text.len());
            paragraphs.push(run.paragraph);
            text.push_str(run.text());
        }
        Self {
            text,
            starts,
            paragraphs,
        }
    }

    /// The concatenated text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of runs mapped
    pub fn run_count(&self) -> usize {
        self.starts.len()
    }

    /// Logical offset where a run begins
    pub fn run_start(&self, run: usize) -> Option<usize> {
        self.starts.get(run).copied()
    }

    /// Run holding the byte at `offset`
    ///
    /// Empty runs never hold a byte, so the last run starting at or before
    /// the offset is the one that contains it.
    pub fn locate(&self, offset: usize) -> Option<RunOffset> {
        if offset >= self.text.len() {
            return None;
        }
        let run = self.starts.partition_point(|&start| start <= offset).checked_sub(1)?;
        Some(RunOffset {
            run,
            offset: offset - self.starts[run],
        })
    }

    /// Runs covered by a non-empty logical range
    pub fn span(&self, range: Range<usize>) -> Option<RunSpan> {
        if range.is_empty() {
            return None;
        }
        let first = self.locate(range.start)?;
        let last_byte = self.locate(range.end - 1)?;
        Some(RunSpan {
            first,
            last: RunOffset {
                run: last_byte.run,
                offset: last_byte.offset + 1,
            },
        })
    }

    /// Logical range of each paragraph, in document order
    ///
    /// Consecutive runs sharing a paragraph index form one range.
    pub fn paragraph_ranges(&self) -> Vec<Range<usize>> {
        let mut ranges: Vec<Range<usize>> = Vec::new();
        let mut current = None;
        for (run, (&start, &paragraph)) in self.starts.iter().zip(&self.paragraphs).enumerate() {
            let end = self.starts.get(run + 1).copied().unwrap_or(self.text.len());
            match ranges.last_mut() {
                Some(range) if current == Some(paragraph) => range.end = end,
                _ => {
                    ranges.push(start..end);
                    current = Some(paragraph);
                }
            }
        }
        ranges
    }

    /// Whether the map still describes `runs` exactly
    pub fn matches_runs(&self, runs: &[TextRun]) -> bool {
        if runs.len() != self.starts.len() {
            return false;
        }
        let mut offset = 0;
        for (run, &start) in runs.iter().zip(&self.starts) {
            if start != offset || self.text.get(offset..offset + run.len()) != Some(run.text()) {
                return false;
            }
            offset += run.len();
        }
        offset == self.text.len()
    }
}

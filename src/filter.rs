//! Diff filtering module
//!
//! This module provides the chunk filter: a single pass over a `diff --git`
//! stream that drops every file chunk whose boundary line matches an
//! exclusion pattern and writes all other lines through byte for byte.

use crate::error::{Error, Result};
use crate::patterns::{ExclusionPattern, PatternSet};
use memchr::memmem;
use std::io::{BufRead, Write};
use tracing::{debug, info, trace};

/// Prefix of a line that opens a new file chunk
pub const CHUNK_BOUNDARY: &[u8] = b"diff --git ";

const LINE_CAPACITY: usize = 256;

/// Whether the line opens a new file chunk
pub fn is_chunk_boundary(line: &[u8]) -> bool {
    line.starts_with(CHUNK_BOUNDARY)
}

/// Strip a trailing `\n` or `\r\n`
pub fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Extract the old-side path from a boundary line
///
/// Handles `diff --git a/<path> b/<path>` as well as the double-quoted form git
/// emits for unusual file names (the path is returned still escaped). When
/// both sides name the same path the split is exact even if the path itself
/// contains ` b/`; for renames the first separator wins.
pub fn extract_file_path(line: &[u8]) -> Option<&[u8]> {
    let remaining = strip_line_ending(line.strip_prefix(CHUNK_BOUNDARY)?);

    let (sides, separator): (&[u8], &[u8]) = match remaining.strip_prefix(b"\"a/") {
        Some(rest) => (rest.strip_suffix(b"\"").unwrap_or(rest), b"\" \"b/"),
        None => (remaining.strip_prefix(b"a/")?, b" b/"),
    };

    let path = split_identical_sides(sides, separator)
        .or_else(|| memmem::find(sides, separator).map(|end| &sides[..end]))?;

    (!path.is_empty()).then_some(path)
}

fn split_identical_sides<'a>(sides: &'a [u8], separator: &[u8]) -> Option<&'a [u8]> {
    let half = sides.len().checked_sub(separator.len())? / 2;
    let (old, rest) = sides.split_at(half);
    let new = rest.strip_prefix(separator)?;
    (old == new).then_some(old)
}

/// Suppression state of one filtering run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkState {
    Passing,
    Suppressing,
}

/// Counters collected during one filtering run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub lines_read: u64,
    pub lines_written: u64,
    pub bytes_written: u64,
    pub chunks_seen: u64,
    pub chunks_suppressed: u64,
}

impl FilterStats {
    /// Number of chunks that made it to the output
    pub fn chunks_kept(&self) -> u64 {
        self.chunks_seen - self.chunks_suppressed
    }
}

/// Main filter for removing excluded file chunks from Git diffs
#[derive(Debug, Clone, Default)]
pub struct ChunkFilter {
    patterns: PatternSet,
}

impl ChunkFilter {
    /// Create a filter over the given exclusion patterns
    pub fn new(patterns: PatternSet) -> Self {
        Self { patterns }
    }

    /// Create a filter over the built-in exclusion table
    pub fn with_defaults() -> Self {
        Self::new(PatternSet::defaults())
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// The pattern excluding the chunk opened by `boundary_line`, if any
    pub fn is_excluded(&self, boundary_line: &[u8]) -> Option<&ExclusionPattern> {
        self.patterns.first_match(boundary_line)
    }

    /// Filter a diff stream into `writer`
    ///
    /// Lines are read as raw bytes up to and including `\n`, so line endings
    /// and non-UTF-8 content survive unchanged. The writer is flushed before
    /// returning; any read or write failure aborts the run.
    pub fn process<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> Result<FilterStats> {
        let mut stats = FilterStats::default();
        let mut state = ChunkState::Passing;
        let mut line = Vec::with_capacity(LINE_CAPACITY);

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).map_err(Error::Read)? == 0 {
                break;
            }
            stats.lines_read += 1;

            if is_chunk_boundary(&line) {
                stats.chunks_seen += 1;
                state = self.evaluate_boundary(&line);
                if state == ChunkState::Suppressing {
                    stats.chunks_suppressed += 1;
                }
            }

            if state == ChunkState::Passing {
                writer.write_all(&line).map_err(Error::Write)?;
                stats.lines_written += 1;
                stats.bytes_written += line.len() as u64;
            }
        }

        writer.flush().map_err(Error::Write)?;

        info!(
            chunks_seen = stats.chunks_seen,
            chunks_suppressed = stats.chunks_suppressed,
            lines_written = stats.lines_written,
            "diff filtered"
        );
        Ok(stats)
    }

    fn evaluate_boundary(&self, line: &[u8]) -> ChunkState {
        let path = extract_file_path(line).map(String::from_utf8_lossy);
        match self.is_excluded(line) {
            Some(pattern) => {
                debug!(pattern = pattern.name(), path = ?path, "suppressing chunk");
                ChunkState::Suppressing
            }
            None => {
                trace!(path = ?path, "keeping chunk");
                ChunkState::Passing
            }
        }
    }
}

//! Shared helpers for offset mapping, brace matching and text similarity.

mod paths;

pub use paths::{collect_source_files, is_excluded, normalize_display_path};

use crate::constants::{DUPLICATE_LINE_SLACK, DUPLICATE_SIMILARITY, WORD_RE};
use ruff_text_size::TextSize;
use rustc_hash::FxHashSet;

/// A utility struct to convert byte offsets to line numbers.
///
/// The parser and the regex engine both report byte offsets, while findings
/// carry 1-based line numbers.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a `TextSize` (byte offset) to a 1-indexed line number.
    #[must_use]
    pub fn line_index(&self, offset: TextSize) -> usize {
        self.line_of(offset.to_usize())
    }

    /// Converts a raw byte offset to a 1-indexed line number.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Number of lines, counting a trailing empty segment after a final newline.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Finds the byte offset of the `}` closing a block whose `{` ends at
/// `after_open`. Returns `None` when the block is never closed.
#[must_use]
pub fn closing_brace(content: &str, after_open: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, byte) in content.as_bytes().iter().enumerate().skip(after_open) {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// 1-based line of the brace closing a block opened just before `after_open`.
/// An unclosed block ends on the last line of the file.
#[must_use]
pub fn block_end_line(content: &str, after_open: usize, index: &LineIndex) -> usize {
    closing_brace(content, after_open).map_or_else(|| index.line_count(), |pos| index.line_of(pos))
}

/// Body text between an opening brace ending at `after_open` and its match.
#[must_use]
pub fn block_body(content: &str, after_open: usize) -> &str {
    match closing_brace(content, after_open) {
        Some(end) => &content[after_open..end],
        None => &content[after_open.min(content.len())..],
    }
}

/// Net brace change on one physical line.
#[must_use]
pub fn brace_delta(line: &str) -> i64 {
    let opens = line.matches('{').count();
    let closes = line.matches('}').count();
    i64::try_from(opens).unwrap_or(i64::MAX) - i64::try_from(closes).unwrap_or(i64::MAX)
}

/// Width of leading whitespace in characters.
#[must_use]
pub fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Distinct word tokens of a text block.
#[must_use]
pub fn word_set(text: &str) -> FxHashSet<&str> {
    WORD_RE().find_iter(text).map(|m| m.as_str()).collect()
}

/// Jaccard overlap of two token sets; zero when both are empty.
#[must_use]
pub fn jaccard(a: &FxHashSet<&str>, b: &FxHashSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Two code blocks are similar when their non-blank line counts differ by
/// at most two and their word sets overlap by more than 70%.
#[must_use]
pub fn blocks_are_similar(first: &str, second: &str) -> bool {
    let lines = |text: &str| text.lines().filter(|l| !l.trim().is_empty()).count();
    if lines(first).abs_diff(lines(second)) > DUPLICATE_LINE_SLACK {
        return false;
    }
    jaccard(&word_set(first), &word_set(second)) > DUPLICATE_SIMILARITY
}

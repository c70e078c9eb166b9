//! Blank-line segmentation and whitespace canonicalization.
//!
//! # Overview
//!
//! A document is cut into blocks wherever two line breaks meet. Blocks keep
//! their original text for reporting and carry a canonical key with every
//! whitespace character removed, so that re-indented or re-wrapped copies of
//! a paragraph compare equal.
//!
//! The segmenter has no notion of markup or comment syntax. Blank lines are
//! the only boundary.

use std::sync::LazyLock;

use regex::Regex;

/// Two consecutive line breaks, either `\n` or `\r\n`.
static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\r?\n").expect("blank-line pattern is valid"));

/// A blank-line-delimited excerpt of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// Original text, verbatim
    pub text: &'a str,
    /// Text with all whitespace removed
    pub key: String,
}

impl<'a> Block<'a> {
    /// Create a block from its raw text.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            key: normalize(text),
        }
    }

    /// Number of newline characters in the raw text.
    #[must_use]
    pub fn lines(&self) -> usize {
        count_lines(self.text)
    }
}

/// Split content into blocks on blank-line boundaries.
///
/// Blocks are returned in document order. Pieces that are empty or consist
/// only of whitespace are dropped.
///
/// # Example
///
/// ```
/// use paradupe::scanner::segment;
///
/// let blocks = segment("first\nparagraph\n\nsecond");
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[0].text, "first\nparagraph");
/// assert_eq!(blocks[1].key, "second");
/// ```
#[must_use]
pub fn segment(content: &str) -> Vec<Block<'_>> {
    BLANK_LINE
        .split(content)
        .filter(|piece| !piece.trim().is_empty())
        .map(Block::new)
        .collect()
}

/// Strip every whitespace character, newlines included.
///
/// Used as the comparison key for whole documents.
#[must_use]
pub fn minify(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Strip whitespace from a single block.
///
/// Produces the same key as [`minify`]; kept separate so the two
/// granularities can diverge without touching callers.
#[must_use]
pub fn normalize(block: &str) -> String {
    minify(block)
}

/// Count newline characters.
#[must_use]
pub fn count_lines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

/// Minimum size a block must have before it is fingerprinted.
///
/// Short blocks (closing braces, import lines, headings) repeat everywhere
/// and would drown real findings, so they never take part in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockFilter {
    /// Required number of newline characters in the raw block
    pub min_lines: usize,
    /// The raw block must be longer than this many characters
    pub min_chars: usize,
}

impl Default for BlockFilter {
    fn default() -> Self {
        Self::new(2, 20)
    }
}

impl BlockFilter {
    /// Create a filter from configured thresholds.
    #[must_use]
    pub fn new(min_lines: usize, min_chars: usize) -> Self {
        Self {
            min_lines,
            min_chars,
        }
    }

    /// Whether a raw block is large enough to be matched.
    #[must_use]
    pub fn qualifies(&self, raw: &str) -> bool {
        count_lines(raw) >= self.min_lines && raw.chars().count() > self.min_chars
    }
}

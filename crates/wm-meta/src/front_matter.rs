//! Front matter block location.
//!
//! A front matter block is delimited by two marker lines, each consisting of
//! `---` once surrounding whitespace is trimmed:
//!
//! ```text
//! ---
//! title: About
//! template: page.html
//! ---
//! # About
//! ```
//!
//! Anything before the opening marker is discarded. A single marker line is
//! unbalanced and yields no block; the file is then treated as having no
//! front matter at all.

/// Marker line content (after trimming).
const MARKER: &[u8] = b"---";

/// Result of splitting a file into its front matter block and body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    /// Text strictly between the opening and closing marker lines.
    pub block: Option<&'a [u8]>,
    /// Text after the closing marker line, or the whole input when no block
    /// is present.
    pub body: &'a [u8],
}

/// Locate the front matter block in raw file content.
///
/// Only the first two marker lines are considered; later `---` lines belong
/// to the body (e.g. Markdown thematic breaks).
pub fn split_front_matter(data: &[u8]) -> FrontMatter<'_> {
    let mut block_start: Option<usize> = None;
    let mut offset = 0;

    for line in data.split_inclusive(|&b| b == b'\n') {
        let line_start = offset;
        offset += line.len();

        if line.trim_ascii() != MARKER {
            continue;
        }

        match block_start {
            None => block_start = Some(offset),
            Some(start) => {
                return FrontMatter {
                    block: Some(&data[start..line_start]),
                    body: &data[offset..],
                };
            }
        }
    }

    FrontMatter {
        block: None,
        body: data,
    }
}

/// Extract the front matter block, if the content has a balanced one.
pub fn extract_front_matter(data: &[u8]) -> Option<&[u8]> {
    split_front_matter(data).block
}

/// Strip the front matter block (markers included) from page text.
///
/// Returns the text unchanged when no balanced block is present.
pub fn strip_front_matter(text: &str) -> &str {
    let body = split_front_matter(text.as_bytes()).body;
    // The body always starts at a line boundary, which is a char boundary.
    &text[text.len() - body.len()..]
}

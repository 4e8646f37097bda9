//! Splits page markup into overlapping fixed-size windows
//!
//! Offsets are character offsets, never byte offsets, so a window never
//! splits a multi-byte character.

use crate::config::validate_chunking;
use crate::ConfigError;

/// A contiguous slice of a page's markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Position of this chunk in the page's chunk sequence
    pub index: usize,

    /// The slice of markup
    pub text: &'a str,

    /// Character offset of the first character (inclusive)
    pub start_offset: usize,

    /// Character offset one past the last character (exclusive)
    pub end_offset: usize,
}

impl Chunk<'_> {
    /// Length of the chunk in characters
    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }
}

/// Splits `html` into chunks of `chunk_size` characters overlapping by `overlap`
///
/// Consecutive chunks share exactly `overlap` characters, every chunk but the
/// last is exactly `chunk_size` characters long, and the last chunk ends at
/// the end of the input. Input no longer than `chunk_size` yields exactly one
/// chunk holding the whole string (including the empty string).
///
/// # Errors
///
/// `ConfigError::InvalidConfiguration` when `chunk_size <= overlap`.
///
/// # Example
///
/// ```
/// use doc_harvester::oracle::chunk_html;
///
/// let chunks = chunk_html("abcdefghij", 6, 2).unwrap();
/// let texts: Vec<&str> = chunks.iter().map(|c| c.text).collect();
/// assert_eq!(texts, vec!["abcdef", "efghij"]);
/// ```
pub fn chunk_html(html: &str, chunk_size: usize, overlap: usize) -> Result<Vec<Chunk<'_>>, ConfigError> {
    validate_chunking(chunk_size, overlap)?;

    // Byte offset of every char boundary, plus the end of the string
    let boundaries: Vec<usize> = html
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(html.len()))
        .collect();
    let total = boundaries.len() - 1;

    let slice = move |index: usize, start: usize, end: usize| Chunk {
        index,
        text: &html[boundaries[start]..boundaries[end]],
        start_offset: start,
        end_offset: end,
    };

    if total <= chunk_size {
        return Ok(vec![slice(0, 0, total)]);
    }

    let step = chunk_size - overlap;
    let mut chunks = Vec::with_capacity(total / step + 1);
    let mut start = 0;

    loop {
        let end = (start + chunk_size).min(total);
        chunks.push(slice(chunks.len(), start, end));
        if end == total {
            break;
        }
        start += step;
    }

    Ok(chunks)
}

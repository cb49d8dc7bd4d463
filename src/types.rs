//! Plain data records shared with the engine boundary.
//!
//! Field order and `#[repr(C)]` match the native `book_parse` header, so the
//! FFI adapter can pass these structs across the boundary unchanged.

use std::ops::{Add, AddAssign};

/// Book-order position of a paragraph. Dense and 0-based.
pub type ParagraphId = u32;

/// Book-wide position of a sentence, independent of paragraph membership.
/// Dense and 0-based.
pub type SentenceId = u32;

/// Byte-length and character-count of a UTF-8 span.
///
/// The two measures are not interchangeable for non-ASCII text; the engine
/// always reports both together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct StringSize {
    pub bytes: u32,
    pub symbols: u32,
}

impl From<&str> for StringSize {
    fn from(text: &str) -> Self {
        Self {
            bytes: text.len() as u32,
            symbols: text.chars().count() as u32,
        }
    }
}

impl AddAssign for StringSize {
    fn add_assign(&mut self, rhs: Self) {
        self.bytes += rhs.bytes;
        self.symbols += rhs.symbols;
    }
}

impl Add for StringSize {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

/// Whole-book totals reported by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct BookInfo {
    /// Number of paragraphs in the book.
    pub paragraphs: u32,
    /// Number of sentence slots in the book, zero-size slots included.
    pub sentences: u32,
    /// Size of the whole book.
    pub size: StringSize,
}

/// Engine snapshot for one paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct ParagraphInfo {
    /// Position of the paragraph in the book.
    pub index: ParagraphId,
    /// Global index of the first sentence in this paragraph. The paragraph
    /// occupies the contiguous range `sentence_first..sentence_first + sentences`.
    pub sentence_first: SentenceId,
    /// Number of sentence slots in the paragraph, zero-size slots included.
    pub sentences: u32,
    /// Size of the whole paragraph, zero-size slots included.
    pub size: StringSize,
}

/// Engine snapshot for one sentence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct SentenceInfo {
    /// Book-wide index of the sentence.
    pub index: SentenceId,
    /// 0-based position within the owning paragraph, as numbered by the
    /// engine's own bookkeeping.
    pub local_index: u32,
    /// Index of the owning paragraph.
    pub paragraph_index: ParagraphId,
    /// Size of the sentence.
    pub size: StringSize,
}

//! Error types for bookparse operations.

use thiserror::Error;

/// Errors surfaced while materializing the book hierarchy.
#[derive(Error, Debug)]
pub enum Error {
    /// The native handle was accessed on a book with no valid handle, either
    /// because construction never completed or because the book was already
    /// disposed.
    #[error("book handle is not initialized or already disposed")]
    UninitializedBook,

    /// The engine reported zero paragraphs for the given input.
    #[error("engine reported an empty book")]
    BookEmpty,

    /// The engine answered a paragraph query with a different index than the
    /// one requested. An engine consistency bug; fatal, never retried.
    #[error("paragraph integrity violation: requested {requested}, engine returned {reported}")]
    ParagraphIntegrity { requested: u32, reported: u32 },

    /// A required accessor was omitted when constructing a paragraph or
    /// sentence.
    #[error("required {0} accessor is missing")]
    CallbackMissing(&'static str),

    /// A sentence slot has zero byte length. The only recoverable error:
    /// the enclosing paragraph filters the slot out of its sentence sequence
    /// and it never surfaces further up.
    #[error("sentence {0} has a zero size")]
    ZeroSizeSentence(u32),

    /// The engine returned text that is not valid UTF-8.
    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;

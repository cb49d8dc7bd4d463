//! The native segmentation engine contract and the handle that scopes it.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::types::{BookInfo, ParagraphId, ParagraphInfo, SentenceId, SentenceInfo};

/// Opaque token identifying one segmented document inside an engine.
///
/// Only the engine that issued the token can interpret it; this layer treats
/// it as a value to hand back on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBook(pub u64);

/// Index-addressed query interface of the native segmentation engine.
///
/// Indices are dense and 0-based. A token stays valid until [`dispose`]; the
/// input buffer is not retained by the caller after [`create`] returns. All
/// calls are synchronous and block until the engine answers.
///
/// [`create`]: SegmentEngine::create
/// [`dispose`]: SegmentEngine::dispose
pub trait SegmentEngine {
    /// Segments `buffer` and returns a token for the result, or `None` when
    /// the engine refuses the input.
    fn create(&self, buffer: &[u8]) -> Option<RawBook>;

    /// Releases everything the engine holds for `book`.
    fn dispose(&self, book: RawBook);

    /// Whole-book totals.
    fn book_info(&self, book: RawBook) -> BookInfo;

    /// Snapshot for the paragraph at `index`.
    ///
    /// The `index` field of the returned snapshot must equal the requested
    /// `index`.
    fn paragraph_info(&self, book: RawBook, index: ParagraphId) -> ParagraphInfo;

    /// UTF-8 bytes of the paragraph at `index`.
    fn paragraph_text(&self, book: RawBook, index: ParagraphId) -> Vec<u8>;

    /// Snapshot for the sentence at global `index`.
    fn sentence_info(&self, book: RawBook, index: SentenceId) -> SentenceInfo;

    /// UTF-8 bytes of the sentence at global `index`.
    fn sentence_text(&self, book: RawBook, index: SentenceId) -> Vec<u8>;
}

/// Owns one engine token for the lifetime of a [`Book`](crate::Book).
///
/// The token lives in an `Option` so "released" is an explicit state checked
/// before every delegated call, not a sentinel value the engine might accept
/// by accident.
pub(crate) struct BookHandle {
    engine: Rc<dyn SegmentEngine>,
    raw: Cell<Option<RawBook>>,
}

impl BookHandle {
    pub(crate) fn new(engine: Rc<dyn SegmentEngine>, raw: RawBook) -> Self {
        Self {
            engine,
            raw: Cell::new(Some(raw)),
        }
    }

    /// The engine the token belongs to.
    pub(crate) fn engine(&self) -> &dyn SegmentEngine {
        self.engine.as_ref()
    }

    /// The live token, or [`Error::UninitializedBook`] once released.
    pub(crate) fn raw(&self) -> Result<RawBook> {
        self.raw.get().ok_or(Error::UninitializedBook)
    }

    /// Releases the token. Exactly one `dispose` reaches the engine no
    /// matter how many times this is called.
    pub(crate) fn release(&self) {
        if let Some(raw) = self.raw.take() {
            self.engine.dispose(raw);
        }
    }
}

impl Drop for BookHandle {
    fn drop(&mut self) {
        self.release();
    }
}

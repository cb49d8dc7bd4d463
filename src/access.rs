//! Deferred accessor capabilities binding entities to the engine.
//!
//! Paragraphs and sentences never talk to the engine directly; they hold a
//! source implementing `{fetch_info, fetch_text}` for their entity kind,
//! bound to the owning book's handle. Tests substitute canned sources.

use std::rc::Rc;

use crate::engine::BookHandle;
use crate::error::Result;
use crate::types::{ParagraphId, ParagraphInfo, SentenceId, SentenceInfo};

/// Deferred info/text access for one paragraph.
pub(crate) trait ParagraphSource {
    fn fetch_info(&self) -> Result<ParagraphInfo>;
    fn fetch_text(&self) -> Result<String>;
}

/// Deferred info/text access for sentences, addressed by global index.
pub(crate) trait SentenceSource {
    fn fetch_info(&self, index: SentenceId) -> Result<SentenceInfo>;
    fn fetch_text(&self, index: SentenceId) -> Result<String>;
}

/// Engine-backed [`ParagraphSource`] bound to `(handle, index)`.
pub(crate) struct EngineParagraphSource {
    handle: Rc<BookHandle>,
    index: ParagraphId,
}

impl EngineParagraphSource {
    pub(crate) fn new(handle: Rc<BookHandle>, index: ParagraphId) -> Self {
        Self { handle, index }
    }
}

impl ParagraphSource for EngineParagraphSource {
    fn fetch_info(&self) -> Result<ParagraphInfo> {
        let raw = self.handle.raw()?;
        Ok(self.handle.engine().paragraph_info(raw, self.index))
    }

    fn fetch_text(&self) -> Result<String> {
        let raw = self.handle.raw()?;
        let bytes = self.handle.engine().paragraph_text(raw, self.index);
        Ok(String::from_utf8(bytes)?)
    }
}

/// Engine-backed [`SentenceSource`] bound to the book handle.
pub(crate) struct EngineSentenceSource {
    handle: Rc<BookHandle>,
}

impl EngineSentenceSource {
    pub(crate) fn new(handle: Rc<BookHandle>) -> Self {
        Self { handle }
    }
}

impl SentenceSource for EngineSentenceSource {
    fn fetch_info(&self, index: SentenceId) -> Result<SentenceInfo> {
        let raw = self.handle.raw()?;
        Ok(self.handle.engine().sentence_info(raw, index))
    }

    fn fetch_text(&self, index: SentenceId) -> Result<String> {
        let raw = self.handle.raw()?;
        let bytes = self.handle.engine().sentence_text(raw, index);
        Ok(String::from_utf8(bytes)?)
    }
}

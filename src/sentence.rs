//! The smallest exposed text unit.

use std::fmt;
use std::rc::Rc;

use crate::access::SentenceSource;
use crate::error::{Error, Result};
use crate::types::{ParagraphId, SentenceId, SentenceInfo, StringSize};

/// One sentence of the book.
///
/// The info snapshot is fetched once at construction and fixed for the
/// instance's lifetime; text goes back to the engine on every call. A
/// sentence only exists when the engine reports a non-zero byte size for its
/// slot.
pub struct Sentence {
    info: SentenceInfo,
    source: Rc<dyn SentenceSource>,
}

impl Sentence {
    /// Builds the sentence at global `index` from its accessor capability.
    ///
    /// Fails with [`Error::CallbackMissing`] when the capability is absent,
    /// and with [`Error::ZeroSizeSentence`] when the engine reports a slot
    /// with no byte content; no instance is produced in either case.
    pub(crate) fn new(index: SentenceId, source: Option<Rc<dyn SentenceSource>>) -> Result<Self> {
        let source = source.ok_or(Error::CallbackMissing("sentence"))?;
        let info = source.fetch_info(index)?;
        if info.size.bytes == 0 {
            return Err(Error::ZeroSizeSentence(index));
        }
        Ok(Self { info, source })
    }

    /// Book-wide index of this sentence.
    pub fn index(&self) -> SentenceId {
        self.info.index
    }

    /// Index of the paragraph containing this sentence.
    pub fn paragraph_index(&self) -> ParagraphId {
        self.info.paragraph_index
    }

    /// 0-based position within the owning paragraph, as numbered by the
    /// engine. Not renumbered when earlier slots of the same paragraph are
    /// filtered as zero-size, so consumers may observe gaps.
    pub fn sentence_index(&self) -> u32 {
        self.info.local_index
    }

    /// Size of the sentence in bytes and symbols. Always greater than zero
    /// bytes.
    pub fn size(&self) -> StringSize {
        self.info.size
    }

    /// `true` when this is the first sentence of its paragraph.
    pub fn is_first(&self) -> bool {
        self.info.local_index == 0
    }

    /// Text of the sentence, fetched freshly from the engine on every call.
    pub fn text(&self) -> Result<String> {
        self.source.fetch_text(self.info.index)
    }
}

impl fmt::Debug for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sentence")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

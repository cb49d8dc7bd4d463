//! The top-level handle over one segmented document.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::access::{EngineParagraphSource, EngineSentenceSource};
use crate::engine::{BookHandle, SegmentEngine};
use crate::error::{Error, Result};
use crate::paragraph::Paragraph;
use crate::sentence::Sentence;
use crate::types::{BookInfo, ParagraphId, StringSize};

/// A fully segmented text document.
///
/// `Book` owns the engine token exclusively and releases it exactly once:
/// either through [`Book::dispose`], or when the book and every paragraph
/// materialized from it have been dropped. After an explicit `dispose`,
/// every engine-delegated call — including text fetches through previously
/// materialized paragraphs and sentences — fails with
/// [`Error::UninitializedBook`].
///
/// Caches are unsynchronized; the type is single-threaded by design.
pub struct Book {
    handle: Rc<BookHandle>,
    info: BookInfo,
    /// Arena keyed by paragraph index.
    cache: RefCell<Vec<Option<Rc<Paragraph>>>>,
}

impl Book {
    /// Segments `buffer` (assumed UTF-8, not validated at this layer) with
    /// `engine`.
    ///
    /// Fails with [`Error::BookEmpty`] when the engine reports zero
    /// paragraphs; the token created for the attempt is still disposed
    /// exactly once.
    pub fn from_bytes(engine: Rc<dyn SegmentEngine>, buffer: &[u8]) -> Result<Self> {
        let raw = engine.create(buffer).ok_or(Error::UninitializedBook)?;
        let handle = Rc::new(BookHandle::new(engine, raw));
        let info = handle.engine().book_info(handle.raw()?);
        if info.paragraphs == 0 {
            // Dropping `handle` here is what disposes the token.
            return Err(Error::BookEmpty);
        }
        Ok(Self {
            cache: RefCell::new(vec![None; info.paragraphs as usize]),
            handle,
            info,
        })
    }

    /// Convenience over [`Book::from_bytes`] for string input.
    pub fn from_utf8(engine: Rc<dyn SegmentEngine>, text: &str) -> Result<Self> {
        Self::from_bytes(engine, text.as_bytes())
    }

    /// Number of paragraphs in the book. Greater than zero for every
    /// successfully constructed book.
    pub fn paragraph_count(&self) -> u32 {
        self.info.paragraphs
    }

    /// Number of sentence slots in the book, zero-size slots included.
    pub fn sentence_count(&self) -> u32 {
        self.info.sentences
    }

    /// Size of the whole book in bytes and symbols.
    pub fn size(&self) -> StringSize {
        self.info.size
    }

    /// Releases the engine token. Exactly one `dispose` reaches the engine;
    /// further calls are no-ops.
    pub fn dispose(&self) {
        self.handle.release();
    }

    /// Lazy, restartable sequence of the book's paragraphs in index order.
    ///
    /// Paragraphs materialize on first touch and are cached for the book's
    /// lifetime, so repeated passes yield the same instances without going
    /// back to the engine.
    pub fn paragraphs(&self) -> Paragraphs<'_> {
        Paragraphs {
            book: self,
            index: 0,
        }
    }

    /// Every sentence of the book, in paragraph order and each paragraph's
    /// own sentence order. Flattens [`Book::paragraphs`], so the same caches
    /// and the same zero-size filtering apply.
    pub fn sentences(&self) -> BookSentences<'_> {
        BookSentences {
            book: self,
            index: 0,
            current: None,
        }
    }

    /// Materializes the paragraph at `index`, hitting the cache first.
    ///
    /// A snapshot whose index disagrees with the requested one is an engine
    /// consistency bug and fails with [`Error::ParagraphIntegrity`].
    pub(crate) fn paragraph_at(&self, index: ParagraphId) -> Result<Rc<Paragraph>> {
        if let Some(cached) = &self.cache.borrow()[index as usize] {
            return Ok(Rc::clone(cached));
        }
        let raw = self.handle.raw()?;
        let info = self.handle.engine().paragraph_info(raw, index);
        if info.index != index {
            return Err(Error::ParagraphIntegrity {
                requested: index,
                reported: info.index,
            });
        }
        let source = EngineParagraphSource::new(Rc::clone(&self.handle), index);
        let sentences = EngineSentenceSource::new(Rc::clone(&self.handle));
        let paragraph = Rc::new(Paragraph::new(
            Some(Box::new(source)),
            Some(Rc::new(sentences)),
        )?);
        self.cache.borrow_mut()[index as usize] = Some(Rc::clone(&paragraph));
        Ok(paragraph)
    }
}

impl fmt::Debug for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Book")
            .field("info", &self.info)
            .field("disposed", &self.handle.raw().is_err())
            .finish_non_exhaustive()
    }
}

/// Iterator over a book's paragraphs. See [`Book::paragraphs`].
pub struct Paragraphs<'a> {
    book: &'a Book,
    index: ParagraphId,
}

impl Iterator for Paragraphs<'_> {
    type Item = Result<Rc<Paragraph>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.book.paragraph_count() {
            return None;
        }
        let index = self.index;
        self.index += 1;
        Some(self.book.paragraph_at(index))
    }
}

/// Flattened iterator over every sentence of a book. See
/// [`Book::sentences`].
pub struct BookSentences<'a> {
    book: &'a Book,
    index: ParagraphId,
    /// Paragraph currently being drained, with the next local slot offset.
    current: Option<(Rc<Paragraph>, u32)>,
}

impl Iterator for BookSentences<'_> {
    type Item = Result<Rc<Sentence>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((paragraph, mut offset)) = self.current.take() {
                while offset < paragraph.sentence_count() {
                    let slot = offset;
                    offset += 1;
                    match paragraph.sentence_at(slot) {
                        Ok(Some(sentence)) => {
                            self.current = Some((paragraph, offset));
                            return Some(Ok(sentence));
                        }
                        Ok(None) => continue,
                        Err(err) => {
                            self.current = Some((paragraph, offset));
                            return Some(Err(err));
                        }
                    }
                }
                // Paragraph exhausted; move on to the next one.
            }
            if self.index >= self.book.paragraph_count() {
                return None;
            }
            let index = self.index;
            self.index += 1;
            match self.book.paragraph_at(index) {
                Ok(paragraph) => self.current = Some((paragraph, 0)),
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

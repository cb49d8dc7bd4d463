//! A contiguous run of sentences.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::warn;

use crate::access::{ParagraphSource, SentenceSource};
use crate::error::{Error, Result};
use crate::sentence::Sentence;
use crate::types::{ParagraphId, ParagraphInfo, StringSize};

/// One paragraph of the book.
///
/// The info snapshot is fetched once at construction and fixed thereafter;
/// text goes back to the engine on every call. Sentences materialize lazily
/// through [`Paragraph::sentences`] and are cached for the paragraph's
/// lifetime.
pub struct Paragraph {
    info: ParagraphInfo,
    source: Box<dyn ParagraphSource>,
    sentence_source: Rc<dyn SentenceSource>,
    /// Arena keyed by local slot offset. `None` means not yet materialized;
    /// zero-size slots are deliberately never recorded here, so every pass
    /// re-queries them.
    cache: RefCell<Vec<Option<Rc<Sentence>>>>,
}

impl Paragraph {
    /// Builds a paragraph from its accessor capabilities. Both must be
    /// supplied; an absent one fails with [`Error::CallbackMissing`].
    pub(crate) fn new(
        source: Option<Box<dyn ParagraphSource>>,
        sentence_source: Option<Rc<dyn SentenceSource>>,
    ) -> Result<Self> {
        let source = source.ok_or(Error::CallbackMissing("paragraph"))?;
        let sentence_source = sentence_source.ok_or(Error::CallbackMissing("sentence"))?;
        let info = source.fetch_info()?;
        let cache = RefCell::new(vec![None; info.sentences as usize]);
        Ok(Self {
            info,
            source,
            sentence_source,
            cache,
        })
    }

    /// Index of this paragraph in the book.
    pub fn index(&self) -> ParagraphId {
        self.info.index
    }

    /// Size of the whole paragraph in bytes and symbols.
    ///
    /// Always the engine's own total: sentence slots filtered as zero-size
    /// are still counted here.
    pub fn size(&self) -> StringSize {
        self.info.size
    }

    /// Number of sentence slots the paragraph occupies, including zero-size
    /// slots that [`Paragraph::sentences`] filters out.
    pub fn sentence_count(&self) -> u32 {
        self.info.sentences
    }

    /// Global index of the paragraph's first sentence slot.
    pub fn sentence_first(&self) -> u32 {
        self.info.sentence_first
    }

    /// Text of the paragraph, fetched freshly from the engine on every call.
    pub fn text(&self) -> Result<String> {
        self.source.fetch_text()
    }

    /// Lazy, restartable sequence of this paragraph's sentences in global
    /// order.
    ///
    /// Zero-size slots are logged and excluded from the sequence; the
    /// exclusion is recomputed on every pass rather than remembered.
    pub fn sentences(&self) -> Sentences<'_> {
        Sentences {
            paragraph: self,
            offset: 0,
        }
    }

    /// Materializes the sentence in local slot `offset`, hitting the cache
    /// first. `Ok(None)` marks a zero-size slot the caller must skip.
    pub(crate) fn sentence_at(&self, offset: u32) -> Result<Option<Rc<Sentence>>> {
        if let Some(cached) = &self.cache.borrow()[offset as usize] {
            return Ok(Some(Rc::clone(cached)));
        }
        let index = self.info.sentence_first + offset;
        match Sentence::new(index, Some(Rc::clone(&self.sentence_source))) {
            Ok(sentence) => {
                let sentence = Rc::new(sentence);
                self.cache.borrow_mut()[offset as usize] = Some(Rc::clone(&sentence));
                Ok(Some(sentence))
            }
            Err(Error::ZeroSizeSentence(index)) => {
                warn!(sentence = index, "sentence has a zero size, skipping");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

impl fmt::Debug for Paragraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paragraph")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Iterator over a paragraph's sentences. See [`Paragraph::sentences`].
pub struct Sentences<'a> {
    paragraph: &'a Paragraph,
    offset: u32,
}

impl Iterator for Sentences<'_> {
    type Item = Result<Rc<Sentence>>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.offset < self.paragraph.sentence_count() {
            let offset = self.offset;
            self.offset += 1;
            match self.paragraph.sentence_at(offset) {
                Ok(Some(sentence)) => return Some(Ok(sentence)),
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SentenceId, SentenceInfo};
    use proptest::prelude::*;
    use std::cell::Cell;

    const SENTENCE_1: &str = "One.";
    const SENTENCE_2: &str = "One. Two. Three-Четыре!!?";

    /// Scripted engine records for one paragraph and its sentence slots.
    struct Script {
        info: ParagraphInfo,
        text: String,
        /// Slots keyed by `global index - sentence_first`.
        slots: Vec<(SentenceInfo, String)>,
        paragraph_info_calls: Cell<u32>,
        paragraph_text_calls: Cell<u32>,
        /// `sentence_info` queries per slot.
        slot_queries: RefCell<Vec<u32>>,
    }

    impl Script {
        fn new(info: ParagraphInfo, text: &str, slots: Vec<(SentenceInfo, &str)>) -> Rc<Self> {
            let slot_queries = RefCell::new(vec![0; slots.len()]);
            Rc::new(Self {
                info,
                text: text.to_string(),
                slots: slots
                    .into_iter()
                    .map(|(info, text)| (info, text.to_string()))
                    .collect(),
                paragraph_info_calls: Cell::new(0),
                paragraph_text_calls: Cell::new(0),
                slot_queries,
            })
        }

        fn offset(&self, index: SentenceId) -> usize {
            (index - self.info.sentence_first) as usize
        }
    }

    struct ScriptedParagraph(Rc<Script>);

    impl ParagraphSource for ScriptedParagraph {
        fn fetch_info(&self) -> Result<ParagraphInfo> {
            self.0.paragraph_info_calls.set(self.0.paragraph_info_calls.get() + 1);
            Ok(self.0.info)
        }

        fn fetch_text(&self) -> Result<String> {
            self.0.paragraph_text_calls.set(self.0.paragraph_text_calls.get() + 1);
            Ok(self.0.text.clone())
        }
    }

    struct ScriptedSentences(Rc<Script>);

    impl SentenceSource for ScriptedSentences {
        fn fetch_info(&self, index: SentenceId) -> Result<SentenceInfo> {
            let offset = self.0.offset(index);
            self.0.slot_queries.borrow_mut()[offset] += 1;
            Ok(self.0.slots[offset].0)
        }

        fn fetch_text(&self, index: SentenceId) -> Result<String> {
            Ok(self.0.slots[self.0.offset(index)].1.clone())
        }
    }

    fn build(script: &Rc<Script>) -> Paragraph {
        Paragraph::new(
            Some(Box::new(ScriptedParagraph(Rc::clone(script)))),
            Some(Rc::new(ScriptedSentences(Rc::clone(script)))),
        )
        .unwrap()
    }

    fn paragraph_info(index: u32, sentence_first: u32, sentences: u32, size: StringSize) -> ParagraphInfo {
        ParagraphInfo {
            index,
            sentence_first,
            sentences,
            size,
        }
    }

    fn sentence_info(index: u32, local_index: u32, paragraph_index: u32, size: StringSize) -> SentenceInfo {
        SentenceInfo {
            index,
            local_index,
            paragraph_index,
            size,
        }
    }

    fn size(bytes: u32, symbols: u32) -> StringSize {
        StringSize { bytes, symbols }
    }

    #[test]
    fn test_missing_accessors_fail() {
        let script = Script::new(paragraph_info(0, 0, 0, size(0, 0)), "", vec![]);

        let err = Paragraph::new(None, Some(Rc::new(ScriptedSentences(Rc::clone(&script))))).unwrap_err();
        assert!(matches!(err, Error::CallbackMissing("paragraph")));

        let err = Paragraph::new(Some(Box::new(ScriptedParagraph(script))), None).unwrap_err();
        assert!(matches!(err, Error::CallbackMissing("sentence")));

        let err = Paragraph::new(None, None).unwrap_err();
        assert!(matches!(err, Error::CallbackMissing(_)));
    }

    #[test]
    fn test_single_sentence_paragraph() {
        let script = Script::new(
            paragraph_info(0, 0, 1, size(4, 4)),
            SENTENCE_1,
            vec![(sentence_info(0, 0, 0, size(4, 4)), SENTENCE_1)],
        );
        let paragraph = build(&script);

        assert_eq!(paragraph.index(), 0);
        assert_eq!(paragraph.size(), size(4, 4));
        assert_eq!(paragraph.text().unwrap(), SENTENCE_1);

        let sentences: Vec<_> = paragraph.sentences().collect::<Result<_>>().unwrap();
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].index(), 0);
        assert_eq!(sentences[0].paragraph_index(), 0);
        assert_eq!(sentences[0].sentence_index(), 0);
    }

    #[test]
    fn test_two_sentence_paragraph() {
        let script = Script::new(
            paragraph_info(0, 0, 2, size(48, 30)),
            &format!("{SENTENCE_1} {SENTENCE_2}"),
            vec![
                (sentence_info(0, 0, 0, size(4, 4)), SENTENCE_1),
                (sentence_info(1, 1, 0, size(43, 25)), SENTENCE_2),
            ],
        );
        let paragraph = build(&script);

        assert_eq!(paragraph.size(), size(48, 30));

        let sentences: Vec<_> = paragraph.sentences().collect::<Result<_>>().unwrap();
        assert_eq!(sentences.len(), 2);

        assert_eq!(sentences[0].index(), 0);
        assert_eq!(sentences[0].sentence_index(), 0);
        assert_eq!(sentences[0].size(), size(4, 4));
        assert_eq!(sentences[0].text().unwrap(), SENTENCE_1);

        assert_eq!(sentences[1].index(), 1);
        assert_eq!(sentences[1].paragraph_index(), 0);
        assert_eq!(sentences[1].sentence_index(), 1);
        assert_eq!(sentences[1].size(), size(43, 25));
        assert_eq!(sentences[1].text().unwrap(), SENTENCE_2);
    }

    #[test]
    fn test_zero_size_slot_filtered() {
        let script = Script::new(
            paragraph_info(0, 0, 3, size(48, 30)),
            &format!("{SENTENCE_1} {SENTENCE_2}"),
            vec![
                (sentence_info(0, 0, 0, size(4, 4)), SENTENCE_1),
                (sentence_info(1, 1, 0, size(0, 0)), ""),
                (sentence_info(2, 2, 0, size(43, 25)), SENTENCE_2),
            ],
        );
        let paragraph = build(&script);

        let sentences: Vec<_> = paragraph.sentences().collect::<Result<_>>().unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].index(), 0);
        assert_eq!(sentences[1].index(), 2);

        // Filtering affects only the exposed sequence, never size accounting.
        assert_eq!(paragraph.size(), size(48, 30));
        assert_eq!(paragraph.sentence_count(), 3);
    }

    #[test]
    fn test_zero_size_slot_requeried_every_pass() {
        let script = Script::new(
            paragraph_info(0, 0, 2, size(4, 4)),
            SENTENCE_1,
            vec![
                (sentence_info(0, 0, 0, size(4, 4)), SENTENCE_1),
                (sentence_info(1, 1, 0, size(0, 0)), ""),
            ],
        );
        let paragraph = build(&script);

        assert_eq!(paragraph.sentences().count(), 1);
        assert_eq!(paragraph.sentences().count(), 1);

        let queries = script.slot_queries.borrow();
        // The live slot is cached after the first pass; the zero-size slot is
        // re-queried on every pass.
        assert_eq!(queries[0], 1);
        assert_eq!(queries[1], 2);
    }

    #[test]
    fn test_cached_identity_across_passes() {
        let script = Script::new(
            paragraph_info(0, 0, 2, size(48, 30)),
            &format!("{SENTENCE_1} {SENTENCE_2}"),
            vec![
                (sentence_info(0, 0, 0, size(4, 4)), SENTENCE_1),
                (sentence_info(1, 1, 0, size(43, 25)), SENTENCE_2),
            ],
        );
        let paragraph = build(&script);

        let first: Vec<_> = paragraph.sentences().collect::<Result<_>>().unwrap();
        let second: Vec<_> = paragraph.sentences().collect::<Result<_>>().unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert!(Rc::ptr_eq(a, b));
        }
    }

    #[test]
    fn test_info_fetched_once_text_fetched_freshly() {
        let script = Script::new(
            paragraph_info(0, 0, 1, size(4, 4)),
            SENTENCE_1,
            vec![(sentence_info(0, 0, 0, size(4, 4)), SENTENCE_1)],
        );
        let paragraph = build(&script);

        let _ = paragraph.index();
        let _ = paragraph.size();
        assert_eq!(script.paragraph_info_calls.get(), 1);

        assert_eq!(paragraph.text().unwrap(), SENTENCE_1);
        assert_eq!(paragraph.text().unwrap(), SENTENCE_1);
        assert_eq!(script.paragraph_text_calls.get(), 2);
    }

    #[test]
    fn test_nonzero_sentence_first() {
        // A later paragraph whose slots start at global index 5.
        let script = Script::new(
            paragraph_info(3, 5, 2, size(48, 30)),
            &format!("{SENTENCE_1} {SENTENCE_2}"),
            vec![
                (sentence_info(5, 0, 3, size(4, 4)), SENTENCE_1),
                (sentence_info(6, 1, 3, size(43, 25)), SENTENCE_2),
            ],
        );
        let paragraph = build(&script);

        assert_eq!(paragraph.sentence_first(), 5);
        let sentences: Vec<_> = paragraph.sentences().collect::<Result<_>>().unwrap();
        assert_eq!(sentences[0].index(), 5);
        assert_eq!(sentences[0].sentence_index(), 0);
        assert_eq!(sentences[1].index(), 6);
        assert_eq!(sentences[1].paragraph_index(), 3);
    }

    proptest! {
        /// Filtering exposes exactly the non-zero slots, in order, and never
        /// touches the paragraph's own size accounting.
        #[test]
        fn prop_filtering_matches_nonzero_slots(sizes in proptest::collection::vec(0u32..50, 0..12)) {
            let total = size(sizes.iter().sum(), sizes.iter().sum());
            let slots: Vec<_> = sizes
                .iter()
                .enumerate()
                .map(|(i, &bytes)| (sentence_info(i as u32, i as u32, 0, size(bytes, bytes)), "x"))
                .collect();
            let script = Script::new(
                paragraph_info(0, 0, sizes.len() as u32, total),
                "x",
                slots,
            );
            let paragraph = build(&script);

            let yielded: Vec<_> = paragraph.sentences().collect::<Result<_>>().unwrap();
            prop_assert_eq!(yielded.len(), sizes.iter().filter(|&&b| b > 0).count());
            for sentence in &yielded {
                prop_assert!(sentence.size().bytes > 0);
            }
            let indices: Vec<_> = yielded.iter().map(|s| s.index()).collect();
            let mut sorted = indices.clone();
            sorted.sort_unstable();
            prop_assert_eq!(indices, sorted);
            prop_assert_eq!(paragraph.size(), total);
        }
    }
}

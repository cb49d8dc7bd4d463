//! [`SegmentEngine`] over a platform dynamic library.
//!
//! Binds the `book_parse` C ABI: `from_utf8`, `dispose`, `book_info`,
//! `paragraph_info`, `paragraph_text`, `sentence_info`, `sentence_text`.
//! Deciding which library file to load is the caller's concern; this module
//! only turns an already-resolved library name into an engine capability,
//! failing fast at load time when a symbol is missing.

use std::ffi::OsStr;
use std::os::raw::{c_uchar, c_uint, c_void};

use libloading::Library;

use crate::engine::{RawBook, SegmentEngine};
use crate::types::{BookInfo, ParagraphId, ParagraphInfo, SentenceId, SentenceInfo};

type FromUtf8Fn = unsafe extern "C" fn(*const c_uchar, c_uint) -> *mut c_void;
type DisposeFn = unsafe extern "C" fn(*mut c_void);
type BookInfoFn = unsafe extern "C" fn(*mut c_void) -> BookInfo;
type ParagraphInfoFn = unsafe extern "C" fn(*mut c_void, ParagraphId) -> ParagraphInfo;
type ParagraphTextFn = unsafe extern "C" fn(*mut c_void, ParagraphId, *mut c_uchar);
type SentenceInfoFn = unsafe extern "C" fn(*mut c_void, SentenceId) -> SentenceInfo;
type SentenceTextFn = unsafe extern "C" fn(*mut c_void, SentenceId, *mut c_uchar);

/// Engine capability backed by a `book_parse` dynamic library.
pub struct DynamicEngine {
    from_utf8: FromUtf8Fn,
    dispose: DisposeFn,
    book_info: BookInfoFn,
    paragraph_info: ParagraphInfoFn,
    paragraph_text: ParagraphTextFn,
    sentence_info: SentenceInfoFn,
    sentence_text: SentenceTextFn,
    /// Keeps the loaded library, and with it every symbol above, alive.
    _library: Library,
}

impl DynamicEngine {
    /// Loads `name` (e.g. `book_parse`, resolved to `.so`/`.dylib`/`.dll` by
    /// the platform loader) and resolves every required symbol up front.
    ///
    /// # Safety
    ///
    /// The library must export the `book_parse` C ABI with the exact
    /// signatures this module declares; loading an arbitrary library runs
    /// its initialization code.
    pub unsafe fn open<N: AsRef<OsStr>>(name: N) -> Result<Self, libloading::Error> {
        unsafe {
            let library = Library::new(name)?;
            Ok(Self {
                from_utf8: *library.get::<FromUtf8Fn>(b"from_utf8")?,
                dispose: *library.get::<DisposeFn>(b"dispose")?,
                book_info: *library.get::<BookInfoFn>(b"book_info")?,
                paragraph_info: *library.get::<ParagraphInfoFn>(b"paragraph_info")?,
                paragraph_text: *library.get::<ParagraphTextFn>(b"paragraph_text")?,
                sentence_info: *library.get::<SentenceInfoFn>(b"sentence_info")?,
                sentence_text: *library.get::<SentenceTextFn>(b"sentence_text")?,
                _library: library,
            })
        }
    }
}

impl SegmentEngine for DynamicEngine {
    fn create(&self, buffer: &[u8]) -> Option<RawBook> {
        let pointer = unsafe { (self.from_utf8)(buffer.as_ptr(), buffer.len() as c_uint) };
        if pointer.is_null() {
            None
        } else {
            Some(RawBook(pointer as u64))
        }
    }

    fn dispose(&self, book: RawBook) {
        unsafe { (self.dispose)(book.0 as *mut c_void) }
    }

    fn book_info(&self, book: RawBook) -> BookInfo {
        unsafe { (self.book_info)(book.0 as *mut c_void) }
    }

    fn paragraph_info(&self, book: RawBook, index: ParagraphId) -> ParagraphInfo {
        unsafe { (self.paragraph_info)(book.0 as *mut c_void, index) }
    }

    fn paragraph_text(&self, book: RawBook, index: ParagraphId) -> Vec<u8> {
        let info = self.paragraph_info(book, index);
        let mut buffer = vec![0u8; info.size.bytes as usize];
        unsafe { (self.paragraph_text)(book.0 as *mut c_void, index, buffer.as_mut_ptr()) };
        buffer
    }

    fn sentence_info(&self, book: RawBook, index: SentenceId) -> SentenceInfo {
        unsafe { (self.sentence_info)(book.0 as *mut c_void, index) }
    }

    fn sentence_text(&self, book: RawBook, index: SentenceId) -> Vec<u8> {
        let info = self.sentence_info(book, index);
        let mut buffer = vec![0u8; info.size.bytes as usize];
        unsafe { (self.sentence_text)(book.0 as *mut c_void, index, buffer.as_mut_ptr()) };
        buffer
    }
}

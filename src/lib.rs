//! # bookparse
//!
//! Lazy, cached views over text that has already been segmented by a native
//! engine.
//!
//! The engine answers flat, index-addressed queries against an opaque handle;
//! this crate mediates that interface into an order-preserving object graph:
//! a [`Book`] materializes [`Paragraph`]s on demand, each paragraph
//! materializes its [`Sentence`]s on demand, and everything materialized is
//! cached for the lifetime of its owner. Sentence slots the engine reports as
//! zero-sized are filtered out of the exposed sequences at the lowest level
//! that can detect them, so consumers never special-case empty spans.
//!
//! Segmentation itself is out of scope: any implementation of
//! [`SegmentEngine`] can be injected into [`Book`] construction. With the
//! `dynamic` feature enabled, `DynamicEngine` binds the trait to a
//! `book_parse` dynamic library.
//!
//! ## Quick Start
//!
//! ```
//! use std::rc::Rc;
//! use bookparse::{Book, SegmentEngine};
//!
//! fn print_sentences(engine: Rc<dyn SegmentEngine>, text: &str) -> bookparse::Result<()> {
//!     let book = Book::from_utf8(engine, text)?;
//!     for paragraph in book.paragraphs() {
//!         let paragraph = paragraph?;
//!         for sentence in paragraph.sentences() {
//!             println!("{}", sentence?.text()?);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! All caches are unsynchronized; callers that need concurrency must
//! serialize access externally.

mod access;
pub mod book;
pub mod engine;
pub mod error;
pub mod paragraph;
pub mod sentence;
pub mod types;

#[cfg(feature = "dynamic")]
pub mod dynamic;

pub use book::{Book, BookSentences, Paragraphs};
pub use engine::{RawBook, SegmentEngine};
pub use error::{Error, Result};
pub use paragraph::{Paragraph, Sentences};
pub use sentence::Sentence;
pub use types::{BookInfo, ParagraphId, ParagraphInfo, SentenceId, SentenceInfo, StringSize};

#[cfg(feature = "dynamic")]
pub use dynamic::DynamicEngine;

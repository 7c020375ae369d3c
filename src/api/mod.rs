//! Content API: the bible-api.com client, its payloads and errors.

pub mod client;
pub mod error;
pub mod model;
pub mod source;

pub use client::{resolve_alias, BibleClient, RetryPolicy, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use model::{Book, BookSummary, ChapterRef, Lookup, Passage, RandomVerse, Translation, Verse};
pub use source::{BlockingClient, ContentSource};

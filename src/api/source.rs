//! Synchronous content access for the UI thread.
//!
//! The UI loop is single-threaded and blocking. [`BlockingClient`] owns a
//! current-thread tokio runtime and blocks on each [`BibleClient`] call, so a
//! slow fetch stalls input the same way a blocking HTTP call would.

use tokio::runtime::{Builder, Runtime};

use super::client::BibleClient;
use super::error::ApiError;
use super::model::{Lookup, Passage, RandomVerse};

/// Where the application gets scripture from.
pub trait ContentSource {
    fn chapter(&mut self, translation: &str, book: &str, chapter: u32) -> Result<Passage, ApiError>;

    fn adjacent_chapter(
        &mut self,
        translation: &str,
        book: &str,
        chapter: u32,
        step: i32,
    ) -> Result<Passage, ApiError>;

    fn lookup(&mut self, translation: &str, query: &str) -> Result<Lookup, ApiError>;

    fn random_verse(&mut self, translation: &str) -> Result<RandomVerse, ApiError>;
}

/// A [`BibleClient`] driven to completion on a private runtime.
pub struct BlockingClient {
    runtime: Runtime,
    client: BibleClient,
}

impl BlockingClient {
    pub fn new(client: BibleClient) -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { runtime, client })
    }

    pub fn client(&self) -> &BibleClient {
        &self.client
    }
}

impl ContentSource for BlockingClient {
    fn chapter(&mut self, translation: &str, book: &str, chapter: u32) -> Result<Passage, ApiError> {
        self.runtime
            .block_on(self.client.chapter(translation, book, chapter))
    }

    fn adjacent_chapter(
        &mut self,
        translation: &str,
        book: &str,
        chapter: u32,
        step: i32,
    ) -> Result<Passage, ApiError> {
        self.runtime
            .block_on(self.client.adjacent_chapter(translation, book, chapter, step))
    }

    fn lookup(&mut self, translation: &str, query: &str) -> Result<Lookup, ApiError> {
        self.runtime.block_on(self.client.lookup(translation, query))
    }

    fn random_verse(&mut self, translation: &str) -> Result<RandomVerse, ApiError> {
        self.runtime.block_on(self.client.random_verse(translation))
    }
}

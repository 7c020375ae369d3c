//! Async HTTP client for bible-api.com.
//!
//! Every request goes through [`BibleClient::get`], which spaces requests at
//! least [`RetryPolicy::min_interval`] apart and retries HTTP 429 with
//! exponential backoff. Book catalogues are cached per translation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::error::ApiError;
use super::model::{
    Book, BookList, BookSummary, Lookup, Passage, RandomPayload, RandomVerse, Translation,
    TranslationList,
};

pub const DEFAULT_BASE_URL: &str = "https://bible-api.com";

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

/// Request pacing and 429 handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Minimum gap between two requests (upstream allows 15 per 30 s).
    pub min_interval: Duration,
    /// Attempts per request, the first included.
    pub max_attempts: u32,
    /// Wait after the first 429; doubles after each further one.
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(600),
            max_attempts: 5,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// No pacing and no backoff waits. For tests against a local server.
    pub fn immediate() -> Self {
        Self {
            min_interval: Duration::ZERO,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Wait before retry number `retry` (0-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

// ---------------------------------------------------------------------------
// ThrottleHook
// ---------------------------------------------------------------------------

/// Callback run on a request's first 429, before it starts backing off.
#[derive(Clone)]
struct ThrottleHook(Arc<dyn Fn() + Send + Sync>);

impl fmt::Debug for ThrottleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ThrottleHook")
    }
}

// ---------------------------------------------------------------------------
// BibleClient
// ---------------------------------------------------------------------------

/// Client for the scripture content API.
#[derive(Debug)]
pub struct BibleClient {
    http: reqwest::Client,
    base_url: Url,
    policy: RetryPolicy,
    on_throttle: Option<ThrottleHook>,
    last_request: Mutex<Option<Instant>>,
    books: Mutex<HashMap<String, Vec<BookSummary>>>,
}

impl BibleClient {
    pub fn new(base_url: &str, policy: RetryPolicy) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_owned()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            http,
            base_url,
            policy,
            on_throttle: None,
            last_request: Mutex::new(None),
            books: Mutex::new(HashMap::new()),
        })
    }

    /// A client for the public API with the default policy.
    pub fn public() -> Result<Self, ApiError> {
        Self::new(DEFAULT_BASE_URL, RetryPolicy::default())
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `hook` whenever a request is first rate limited, so the user learns
    /// why the screen has stalled. Later 429s of the same request are silent.
    pub fn on_throttle(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_throttle = Some(ThrottleHook(Arc::new(hook)));
        self
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    fn endpoint(&self, segments: &[&str], passage_query: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if let Some(translation) = passage_query {
            url.query_pairs_mut()
                .append_pair("translation", translation)
                .append_pair("single_chapter_book_matching", "indifferent");
        }
        url
    }

    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            tokio::time::sleep_until(previous + self.policy.min_interval).await;
        }
        *last = Some(Instant::now());
    }

    /// GET `url` and decode the JSON body.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        for attempt in 0..self.policy.max_attempts {
            self.pace().await;
            log::debug!("GET {url} (attempt {})", attempt + 1);
            let response = self.http.get(url.clone()).send().await?;

            match response.status() {
                StatusCode::TOO_MANY_REQUESTS => {
                    if attempt == 0 {
                        if let Some(hook) = &self.on_throttle {
                            (hook.0)();
                        }
                    }
                    if attempt + 1 < self.policy.max_attempts {
                        let wait = self.policy.backoff(attempt);
                        log::warn!("rate limited on {}; retrying in {wait:?}", url.path());
                        tokio::time::sleep(wait).await;
                    }
                }
                StatusCode::NOT_FOUND => return Err(ApiError::NotFound(url.path().to_owned())),
                status if status.is_success() => {
                    let body = response.bytes().await?;
                    return Ok(serde_json::from_slice(&body)?);
                }
                status => return Err(ApiError::Status(status.as_u16())),
            }
        }
        Err(ApiError::RateLimited)
    }

    // -----------------------------------------------------------------------
    // Catalogue
    // -----------------------------------------------------------------------

    pub async fn translations(&self) -> Result<Vec<Translation>, ApiError> {
        let list: TranslationList = self.get(self.endpoint(&["data"], None)).await?;
        Ok(list.translations)
    }

    /// Books of `translation` in canonical order. Cached after the first call.
    pub async fn books(&self, translation: &str) -> Result<Vec<BookSummary>, ApiError> {
        if let Some(books) = self.books.lock().await.get(translation) {
            return Ok(books.clone());
        }
        let list: BookList = self.get(self.endpoint(&["data", translation], None)).await?;
        self.books
            .lock()
            .await
            .insert(translation.to_owned(), list.books.clone());
        Ok(list.books)
    }

    pub async fn book(&self, translation: &str, book: &str) -> Result<Book, ApiError> {
        self.get(self.endpoint(&["data", translation, book], None)).await
    }

    /// Canonical id of `book`, given its id, name, or name without spaces.
    pub async fn resolve_book(&self, translation: &str, book: &str) -> Result<String, ApiError> {
        let books = self.books(translation).await?;
        resolve_alias(&books, book)
            .map(str::to_owned)
            .ok_or_else(|| ApiError::NotFound(format!("book {book} in {translation}")))
    }

    pub async fn final_chapter(&self, translation: &str, book: &str) -> Result<u32, ApiError> {
        let canonical = self.resolve_book(translation, book).await?;
        self.book(translation, &canonical)
            .await?
            .final_chapter()
            .ok_or_else(|| ApiError::NotFound(format!("chapters of {canonical}")))
    }

    // -----------------------------------------------------------------------
    // Passages
    // -----------------------------------------------------------------------

    pub async fn chapter(
        &self,
        translation: &str,
        book: &str,
        chapter: u32,
    ) -> Result<Passage, ApiError> {
        let reference = format!("{book}+{chapter}");
        self.get(self.endpoint(&[reference.as_str()], Some(translation)))
            .await
    }

    /// Free-text lookup such as `"John 3"`, `"matt6"` or `"Ps 23:1-3"`.
    pub async fn lookup(&self, translation: &str, query: &str) -> Result<Lookup, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::NotFound("empty reference".to_owned()));
        }
        self.get(self.endpoint(&[query], Some(translation))).await
    }

    pub async fn random_verse(&self, translation: &str) -> Result<RandomVerse, ApiError> {
        let payload: RandomPayload = self
            .get(self.endpoint(&["data", translation, "random"], None))
            .await?;
        Ok(payload.random_verse)
    }

    /// The chapter `step` chapters away from `book` `chapter`.
    ///
    /// When that chapter does not exist, moves into the neighbouring book:
    /// its first chapter going forward, its final chapter going back.
    pub async fn adjacent_chapter(
        &self,
        translation: &str,
        book: &str,
        chapter: u32,
        step: i32,
    ) -> Result<Passage, ApiError> {
        let books = self.books(translation).await?;
        let canonical = resolve_alias(&books, book)
            .ok_or_else(|| ApiError::NotFound(format!("book {book} in {translation}")))?
            .to_owned();

        let target = i64::from(chapter) + i64::from(step);
        if let Ok(target) = u32::try_from(target) {
            if target >= 1 {
                match self.chapter(translation, &canonical, target).await {
                    Ok(passage) if !passage.verses.is_empty() => return Ok(passage),
                    Ok(_) | Err(ApiError::NotFound(_)) => {}
                    Err(err) => return Err(err),
                }
            }
        }

        let neighbour = books
            .iter()
            .position(|b| b.id == canonical)
            .and_then(|index| index.checked_add_signed(step.signum() as isize))
            .and_then(|index| books.get(index))
            .ok_or_else(|| ApiError::NotFound(format!("no book next to {canonical}")))?;

        let next_chapter = if step > 0 {
            1
        } else {
            self.final_chapter(translation, &neighbour.id).await?
        };
        log::info!("crossing into {} {next_chapter}", neighbour.id);
        self.chapter(translation, &neighbour.id, next_chapter).await
    }
}

/// Map `name` (any case) to a canonical book id.
///
/// Accepted spellings: the id itself, the full name, and the full name with
/// spaces removed.
pub fn resolve_alias<'a>(books: &'a [BookSummary], name: &str) -> Option<&'a str> {
    let wanted = name.trim().to_lowercase();
    books
        .iter()
        .find(|book| {
            let full = book.name.to_lowercase();
            book.id.to_lowercase() == wanted || full == wanted || full.replace(' ', "") == wanted
        })
        .map(|book| book.id.as_str())
}

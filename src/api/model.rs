//! Response payloads of the content API and their display lines.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// One available translation, from `GET /data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranslationList {
    pub translations: Vec<Translation>,
}

/// One book of a translation, from `GET /data/{translation}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BookList {
    pub books: Vec<BookSummary>,
}

/// A chapter reference inside a [`Book`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRef {
    pub book_id: String,
    pub book: String,
    pub chapter: u32,
}

/// A book with its chapter list, from `GET /data/{translation}/{book}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub chapters: Vec<ChapterRef>,
}

impl Book {
    /// Highest chapter number, if the book lists any.
    pub fn final_chapter(&self) -> Option<u32> {
        self.chapters.iter().map(|c| c.chapter).max()
    }

    pub fn id(&self) -> Option<&str> {
        self.chapters.first().map(|c| c.book_id.as_str())
    }

    /// A heading with the book name, then one line per chapter.
    pub fn to_lines(&self) -> Vec<String> {
        let Some(first) = self.chapters.first() else {
            return Vec::new();
        };
        let mut lines = Vec::with_capacity(self.chapters.len() + 1);
        lines.push(format!("{}:", first.book));
        lines.extend(
            self.chapters
                .iter()
                .map(|c| format!("{} {}", c.book, c.chapter)),
        );
        lines
    }
}

// ---------------------------------------------------------------------------
// Passages
// ---------------------------------------------------------------------------

/// A single verse of a passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub book_id: String,
    pub book_name: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

impl Verse {
    /// `"{verse} {text}"`, or just the trimmed text.
    pub fn to_line(&self, include_number: bool) -> String {
        if include_number {
            format!("{} {}", self.verse, self.text.trim())
        } else {
            self.text.trim().to_owned()
        }
    }
}

/// A chapter or verse range, from the reference endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub reference: String,
    pub verses: Vec<Verse>,
    #[serde(default)]
    pub translation_id: String,
}

impl Passage {
    /// Book id and chapter of the first verse: where the reader now is.
    pub fn position(&self) -> Option<(&str, u32)> {
        self.verses
            .first()
            .map(|v| (v.book_id.as_str(), v.chapter))
    }

    /// Heading `"{book} {chapter}:"` followed by one line per verse.
    pub fn to_lines(&self, include_numbers: bool) -> Vec<String> {
        let heading = match self.verses.first() {
            Some(first) => format!("{} {}:", first.book_name, first.chapter),
            None => format!("{}:", self.reference),
        };
        std::iter::once(heading)
            .chain(self.verses.iter().map(|v| v.to_line(include_numbers)))
            .collect()
    }
}

/// The verse returned by `GET /data/{translation}/random`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomVerse {
    pub book_id: String,
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

impl RandomVerse {
    pub fn to_lines(&self, include_numbers: bool) -> Vec<String> {
        let verse = Verse {
            book_id: self.book_id.clone(),
            book_name: self.book.clone(),
            chapter: self.chapter,
            verse: self.verse,
            text: self.text.clone(),
        };
        vec![
            format!("{} {}:", self.book, self.chapter),
            verse.to_line(include_numbers),
        ]
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RandomPayload {
    pub random_verse: RandomVerse,
}

/// Result of a free-text lookup: either verses or, for a bare book name, the
/// book's chapter list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Lookup {
    Passage(Passage),
    Book(Book),
}

impl Lookup {
    pub fn to_lines(&self, include_numbers: bool) -> Vec<String> {
        match self {
            Lookup::Passage(passage) => passage.to_lines(include_numbers),
            Lookup::Book(book) => book.to_lines(),
        }
    }

    /// Book id and chapter the reader lands on.
    pub fn position(&self) -> Option<(&str, u32)> {
        match self {
            Lookup::Passage(passage) => passage.position(),
            Lookup::Book(book) => book.id().map(|id| (id, 1)),
        }
    }
}

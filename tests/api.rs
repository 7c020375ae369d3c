//! HTTP client tests against a local mock of bible-api.com.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scripture_tui::api::{ApiError, BibleClient, BlockingClient, ContentSource, Lookup, RetryPolicy};

fn client(server: &MockServer) -> BibleClient {
    BibleClient::new(&server.uri(), RetryPolicy::immediate()).unwrap()
}

fn chapter_body(book_id: &str, name: &str, chapter: u32, verses: &[&str]) -> serde_json::Value {
    json!({
        "reference": format!("{name} {chapter}"),
        "verses": verses.iter().enumerate().map(|(i, text)| json!({
            "book_id": book_id,
            "book_name": name,
            "chapter": chapter,
            "verse": i + 1,
            "text": text,
        })).collect::<Vec<_>>(),
        "text": verses.concat(),
        "translation_id": "web",
        "translation_name": "World English Bible",
    })
}

fn book_body(book_id: &str, name: &str, chapters: u32) -> serde_json::Value {
    json!({
        "translation": { "identifier": "web" },
        "chapters": (1..=chapters).map(|chapter| json!({
            "book_id": book_id,
            "book": name,
            "chapter": chapter,
            "url": format!("https://bible-api.com/data/web/{book_id}/{chapter}"),
        })).collect::<Vec<_>>(),
    })
}

async fn mount_books(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/data/web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translation": { "identifier": "web" },
            "books": [
                { "id": "RUT", "name": "Ruth" },
                { "id": "1SA", "name": "1 Samuel" },
            ],
        })))
        .mount(server)
        .await;
}

async fn mount_chapter(server: &MockServer, reference: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{reference}")))
        .and(query_param("translation", "web"))
        .and(query_param("single_chapter_book_matching", "indifferent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lists_translations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translations": [
                { "identifier": "web", "name": "World English Bible", "language": "English" },
                { "identifier": "kjv", "name": "King James Version", "language": "English" },
            ],
        })))
        .mount(&server)
        .await;

    let ids: Vec<String> = client(&server)
        .translations()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.identifier)
        .collect();
    assert_eq!(ids, vec!["web", "kjv"]);
}

#[tokio::test]
async fn resolves_aliases_with_one_catalogue_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [{ "id": "1SA", "name": "1 Samuel" }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.resolve_book("web", "1samuel").await.unwrap(), "1SA");
    assert_eq!(client.resolve_book("web", "1 SAMUEL").await.unwrap(), "1SA");
    assert!(client.resolve_book("web", "Jude").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn final_chapter_of_book() {
    let server = MockServer::start().await;
    mount_books(&server).await;
    Mock::given(method("GET"))
        .and(path("/data/web/RUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(book_body("RUT", "Ruth", 4)))
        .mount(&server)
        .await;

    assert_eq!(client(&server).final_chapter("web", "ruth").await.unwrap(), 4);
}

// ---------------------------------------------------------------------------
// Passages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetches_chapter() {
    let server = MockServer::start().await;
    mount_chapter(&server, "RUT+1", chapter_body("RUT", "Ruth", 1, &["In the days\n"])).await;

    let passage = client(&server).chapter("web", "RUT", 1).await.unwrap();
    assert_eq!(passage.to_lines(true), vec!["Ruth 1:", "1 In the days"]);
}

#[tokio::test]
async fn missing_chapter_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "not found" })))
        .mount(&server)
        .await;

    let err = client(&server).chapter("web", "RUT", 9).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "{err}");
}

#[tokio::test]
async fn server_error_is_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).random_verse("web").await.unwrap_err();
    assert!(matches!(err, ApiError::Status(500)), "{err}");
}

#[tokio::test]
async fn garbage_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client(&server).translations().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "{err}");
}

#[tokio::test]
async fn random_verse() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/web/random"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translation": { "identifier": "web" },
            "random_verse": {
                "book_id": "PSA", "book": "Psalms", "chapter": 23, "verse": 1,
                "text": "Yahweh is my shepherd.",
            },
        })))
        .mount(&server)
        .await;

    let verse = client(&server).random_verse("web").await.unwrap();
    assert_eq!((verse.book_id.as_str(), verse.chapter, verse.verse), ("PSA", 23, 1));
}

#[tokio::test]
async fn free_text_lookup() {
    let server = MockServer::start().await;
    mount_chapter(&server, "ruth1", chapter_body("RUT", "Ruth", 1, &["In the days"])).await;
    Mock::given(method("GET"))
        .and(path("/Ruth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(book_body("RUT", "Ruth", 2)))
        .mount(&server)
        .await;

    let client = client(&server);
    let passage = client.lookup("web", " ruth1 ").await.unwrap();
    assert!(matches!(passage, Lookup::Passage(_)));

    let book = client.lookup("web", "Ruth").await.unwrap();
    assert_eq!(book.to_lines(true), vec!["Ruth:", "Ruth 1", "Ruth 2"]);
}

#[tokio::test]
async fn empty_lookup_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server).lookup("web", "").await.unwrap_err();
    assert!(err.is_not_found());
}

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn retries_after_429() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "translations": [] })))
        .mount(&server)
        .await;

    assert!(client(&server).translations().await.unwrap().is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn throttle_hook_fires_once_per_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "translations": [] })))
        .mount(&server)
        .await;

    let bells = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&bells);
    let client = client(&server).on_throttle(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    client.translations().await.unwrap();
    assert_eq!(bells.load(Ordering::SeqCst), 1);

    client.translations().await.unwrap();
    assert_eq!(bells.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn gives_up_after_five_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(5)
        .mount(&server)
        .await;

    let err = client(&server).translations().await.unwrap_err();
    assert!(matches!(err, ApiError::RateLimited), "{err}");
}

#[tokio::test]
async fn requests_are_spaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "translations": [] })))
        .mount(&server)
        .await;

    let policy = RetryPolicy {
        min_interval: Duration::from_millis(200),
        ..RetryPolicy::immediate()
    };
    let client = BibleClient::new(&server.uri(), policy).unwrap();
    let start = Instant::now();
    client.translations().await.unwrap();
    client.translations().await.unwrap();
    client.translations().await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(400));
}

// ---------------------------------------------------------------------------
// Adjacent chapters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn next_chapter_in_same_book() {
    let server = MockServer::start().await;
    mount_books(&server).await;
    mount_chapter(&server, "RUT+2", chapter_body("RUT", "Ruth", 2, &["Naomi"])).await;

    let passage = client(&server).adjacent_chapter("web", "ruth", 1, 1).await.unwrap();
    assert_eq!(passage.position(), Some(("RUT", 2)));
}

#[tokio::test]
async fn next_chapter_crosses_into_next_book() {
    let server = MockServer::start().await;
    mount_books(&server).await;
    mount_chapter(&server, "1SA+1", chapter_body("1SA", "1 Samuel", 1, &["Elkanah"])).await;
    Mock::given(method("GET"))
        .and(path("/RUT+5"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let passage = client(&server).adjacent_chapter("web", "RUT", 4, 1).await.unwrap();
    assert_eq!(passage.position(), Some(("1SA", 1)));
}

#[tokio::test]
async fn previous_chapter_crosses_into_final_chapter() {
    let server = MockServer::start().await;
    mount_books(&server).await;
    Mock::given(method("GET"))
        .and(path("/data/web/RUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(book_body("RUT", "Ruth", 4)))
        .mount(&server)
        .await;
    mount_chapter(&server, "RUT+4", chapter_body("RUT", "Ruth", 4, &["Boaz"])).await;

    let passage = client(&server).adjacent_chapter("web", "1SA", 1, -1).await.unwrap();
    assert_eq!(passage.position(), Some(("RUT", 4)));
}

#[tokio::test]
async fn past_the_canon_is_not_found() {
    let server = MockServer::start().await;
    mount_books(&server).await;
    Mock::given(method("GET"))
        .and(path("/1SA+32"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.adjacent_chapter("web", "1SA", 31, 1).await.unwrap_err().is_not_found());
    assert!(client.adjacent_chapter("web", "RUT", 1, -1).await.unwrap_err().is_not_found());
}

// ---------------------------------------------------------------------------
// Blocking wrapper
// ---------------------------------------------------------------------------

#[test]
fn blocking_client_fetches() {
    let server = tokio_test::block_on(MockServer::start());
    tokio_test::block_on(mount_chapter(
        &server,
        "RUT+1",
        chapter_body("RUT", "Ruth", 1, &["In the days"]),
    ));

    let mut content = BlockingClient::new(client(&server)).unwrap();
    let passage = content.chapter("web", "RUT", 1).unwrap();
    assert_eq!(passage.reference, "Ruth 1");
}

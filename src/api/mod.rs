// API module entry
// Quote REST API: route table and dispatch

mod error;
mod handlers;
mod types;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};

use crate::http::QueryParams;
use crate::store::QuoteStore;

pub use error::ApiError;
use types::QuoteBody;

/// Base path of the quote resource
pub const BASE_PATH: &str = "/api/quotes";

/// One row of the public endpoint listing
#[derive(Debug)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: &'static str,
    pub path: &'static str,
}

/// Endpoint listing served by `GET /` and printed at startup
pub const ENDPOINTS: [Endpoint; 7] = [
    Endpoint { name: "getAllQuotes", method: "GET", path: "/api/quotes" },
    Endpoint { name: "getRandomQuote", method: "GET", path: "/api/quotes/random" },
    Endpoint { name: "getQuoteById", method: "GET", path: "/api/quotes/:id" },
    Endpoint { name: "searchQuotes", method: "GET", path: "/api/quotes/search?q=text" },
    Endpoint { name: "addQuote", method: "POST", path: "/api/quotes" },
    Endpoint { name: "updateQuote", method: "PUT", path: "/api/quotes/:id" },
    Endpoint { name: "deleteQuote", method: "DELETE", path: "/api/quotes/:id" },
];

/// A matched API route; id-carrying routes hold the raw path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    ListQuotes,
    RandomQuote,
    SearchQuotes,
    GetQuote(String),
    AddQuote,
    UpdateQuote(String),
    DeleteQuote(String),
}

/// The parts of a request the API handlers look at
#[derive(Debug, Default)]
pub struct ApiRequest {
    pub query: QueryParams,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Match method + path against the route table
///
/// HEAD is routed like GET. A trailing slash is ignored. `random` and
/// `search` win over `:id`.
pub fn match_route(method: &Method, path: &str) -> Option<Route> {
    let is_read = *method == Method::GET || *method == Method::HEAD;

    if path == "/" {
        return is_read.then_some(Route::Index);
    }

    let rest = path.strip_prefix(BASE_PATH)?;
    let rest = rest.strip_suffix('/').unwrap_or(rest);

    if rest.is_empty() {
        return if is_read {
            Some(Route::ListQuotes)
        } else if *method == Method::POST {
            Some(Route::AddQuote)
        } else {
            None
        };
    }

    let segment = rest.strip_prefix('/')?;
    if segment.is_empty() || segment.contains('/') {
        return None;
    }

    match segment {
        "random" if is_read => Some(Route::RandomQuote),
        "search" if is_read => Some(Route::SearchQuotes),
        _ if is_read => Some(Route::GetQuote(decode_segment(segment))),
        _ if *method == Method::PUT => Some(Route::UpdateQuote(decode_segment(segment))),
        _ if *method == Method::DELETE => Some(Route::DeleteQuote(decode_segment(segment))),
        _ => None,
    }
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment).map_or_else(|_| segment.to_string(), |s| s.into_owned())
}

/// Run the handler for `route`; errors become their JSON error response
pub fn dispatch(route: Route, req: &ApiRequest, store: &dyn QuoteStore) -> Response<Full<Bytes>> {
    let body = || QuoteBody::parse(req.content_type.as_deref(), &req.body);

    let result = match route {
        Route::Index => Ok(handlers::service_info()),
        Route::ListQuotes => handlers::list_quotes(&req.query, store),
        Route::RandomQuote => handlers::random_quote(store),
        Route::SearchQuotes => handlers::search_quotes(&req.query, store),
        Route::GetQuote(id) => handlers::get_quote(&id, store),
        Route::AddQuote => handlers::add_quote(body(), store),
        Route::UpdateQuote(id) => handlers::update_quote(&id, body(), store),
        Route::DeleteQuote(id) => handlers::delete_quote(&id, store),
    };

    result.unwrap_or_else(ApiError::into_response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::{Quote, QuoteId};
    use crate::store::{JsonFileStore, MemoryStore};
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use serde_json::Value;

    fn quote(id: i64, text: &str, author: &str) -> Quote {
        Quote {
            id: QuoteId::from(id),
            text: text.to_string(),
            author: author.to_string(),
            created_at: None,
            updated_at: None,
            extra: serde_json::Map::new(),
        }
    }

    fn five_quotes() -> Vec<Quote> {
        vec![
            quote(1, "Imagination is more important than knowledge", "Albert Einstein"),
            quote(2, "Stay hungry, stay foolish", "Steve Jobs"),
            quote(3, "Life is what happens", "John Lennon"),
            quote(4, "Be yourself", "Oscar Wilde"),
            quote(5, "Simplicity is the ultimate sophistication", "Leonardo da Vinci"),
        ]
    }

    fn get(query: &str) -> ApiRequest {
        ApiRequest {
            query: QueryParams::parse(query),
            ..ApiRequest::default()
        }
    }

    fn json_body(body: &str) -> ApiRequest {
        ApiRequest {
            content_type: Some("application/json".to_string()),
            body: Bytes::from(body.to_string()),
            ..ApiRequest::default()
        }
    }

    async fn call(
        route: Route,
        req: &ApiRequest,
        store: &dyn QuoteStore,
    ) -> (StatusCode, Value) {
        let response = dispatch(route, req, store);
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_match_route_table() {
        let get = Method::GET;
        assert_eq!(match_route(&get, "/"), Some(Route::Index));
        assert_eq!(match_route(&get, "/api/quotes"), Some(Route::ListQuotes));
        assert_eq!(match_route(&get, "/api/quotes/"), Some(Route::ListQuotes));
        assert_eq!(match_route(&get, "/api/quotes/random"), Some(Route::RandomQuote));
        assert_eq!(match_route(&get, "/api/quotes/search"), Some(Route::SearchQuotes));
        assert_eq!(
            match_route(&get, "/api/quotes/12"),
            Some(Route::GetQuote("12".to_string()))
        );
        assert_eq!(
            match_route(&Method::HEAD, "/api/quotes/12/"),
            Some(Route::GetQuote("12".to_string()))
        );
        assert_eq!(match_route(&Method::POST, "/api/quotes"), Some(Route::AddQuote));
        assert_eq!(
            match_route(&Method::PUT, "/api/quotes/3"),
            Some(Route::UpdateQuote("3".to_string()))
        );
        assert_eq!(
            match_route(&Method::DELETE, "/api/quotes/3"),
            Some(Route::DeleteQuote("3".to_string()))
        );
    }

    #[test]
    fn test_match_route_misses() {
        assert_eq!(match_route(&Method::POST, "/"), None);
        assert_eq!(match_route(&Method::GET, "/api/quotesx"), None);
        assert_eq!(match_route(&Method::GET, "/api/quotes/1/extra"), None);
        assert_eq!(match_route(&Method::GET, "/api/quotes//"), None);
        assert_eq!(match_route(&Method::PUT, "/api/quotes"), None);
        assert_eq!(match_route(&Method::DELETE, "/api/quotes"), None);
        assert_eq!(match_route(&Method::POST, "/api/quotes/1"), None);
        assert_eq!(match_route(&Method::PATCH, "/api/quotes/1"), None);
        assert_eq!(match_route(&Method::GET, "/api/other"), None);
    }

    #[test]
    fn test_match_route_decodes_id_segment() {
        assert_eq!(
            match_route(&Method::GET, "/api/quotes/%31"),
            Some(Route::GetQuote("1".to_string()))
        );
    }

    #[tokio::test]
    async fn test_service_info_lists_endpoints() {
        let store = MemoryStore::default();
        let (status, body) = call(Route::Index, &get(""), &store).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());
        assert_eq!(body["endpoints"]["getAllQuotes"], "GET /api/quotes");
        assert_eq!(body["endpoints"]["deleteQuote"], "DELETE /api/quotes/:id");
        assert_eq!(body["endpoints"].as_object().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_add_assigns_sequential_ids() {
        let store = MemoryStore::default();

        let (status, body) = call(
            Route::AddQuote,
            &json_body(r#"{"text":"a","author":"b"}"#),
            &store,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["quote"]["id"], 1);
        assert_eq!(body["quote"]["text"], "a");
        assert_eq!(body["quote"]["author"], "b");
        assert!(body["quote"]["createdAt"].is_string());
        assert!(body["message"].is_string());

        let (_, body) = call(
            Route::AddQuote,
            &json_body(r#"{"text":"c","author":"d"}"#),
            &store,
        )
        .await;
        assert_eq!(body["quote"]["id"], 2);
        assert_eq!(store.load_all().len(), 2);
    }

    #[tokio::test]
    async fn test_add_missing_field_is_bad_request() {
        let store = MemoryStore::default();
        let (status, body) = call(Route::AddQuote, &json_body(r#"{"text":"a"}"#), &store).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert!(store.load_all().is_empty());
    }

    #[tokio::test]
    async fn test_add_form_encoded_body() {
        let store = MemoryStore::default();
        let req = ApiRequest {
            content_type: Some("application/x-www-form-urlencoded".to_string()),
            body: Bytes::from_static(b"text=Hello+world&author=Me"),
            ..ApiRequest::default()
        };
        let (status, body) = call(Route::AddQuote, &req, &store).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["quote"]["text"], "Hello world");
    }

    #[tokio::test]
    async fn test_add_save_failure_is_server_error() {
        let store = MemoryStore::failing_writes(Vec::new());
        let (status, body) = call(
            Route::AddQuote,
            &json_body(r#"{"text":"a","author":"b"}"#),
            &store,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to save quote");
    }

    #[tokio::test]
    async fn test_list_with_limit_keeps_order() {
        let store = MemoryStore::new(five_quotes());
        let (status, body) = call(Route::ListQuotes, &get("limit=2"), &store).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["quotes"][0]["id"], 1);
        assert_eq!(body["quotes"][1]["id"], 2);
    }

    #[tokio::test]
    async fn test_list_author_filter_then_limit() {
        let store = MemoryStore::new(five_quotes());
        let (_, body) = call(Route::ListQuotes, &get("author=o&limit=2"), &store).await;
        // "o" matches Jobs, John Lennon, Oscar Wilde and Leonardo
        assert_eq!(body["count"], 2);
        assert_eq!(body["quotes"][0]["id"], 2);
        assert_eq!(body["quotes"][1]["id"], 3);

        let (_, body) = call(Route::ListQuotes, &get("limit=abc"), &store).await;
        assert_eq!(body["count"], 5);
    }

    #[tokio::test]
    async fn test_random_on_empty_collection_is_not_found() {
        let store = MemoryStore::new(five_quotes());
        for id in 1..=5 {
            let (status, _) = call(Route::DeleteQuote(id.to_string()), &get(""), &store).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = call(Route::RandomQuote, &get(""), &store).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_random_returns_a_stored_quote() {
        let store = MemoryStore::new(five_quotes());
        let (status, body) = call(Route::RandomQuote, &get(""), &store).await;
        assert_eq!(status, StatusCode::OK);
        let id = body["id"].as_u64().unwrap();
        assert!((1..=5).contains(&id));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let store = MemoryStore::new(five_quotes());
        let (status, body) = call(Route::GetQuote("4".to_string()), &get(""), &store).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["author"], "Oscar Wilde");

        let (status, _) = call(Route::GetQuote("99".to_string()), &get(""), &store).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Ids are read by their leading integer
        let (status, body) = call(Route::GetQuote("4abc".to_string()), &get(""), &store).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 4);

        let (status, body) = call(Route::GetQuote("abc".to_string()), &get(""), &store).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Quote not found");
    }

    #[tokio::test]
    async fn test_add_when_ids_are_exhausted_is_server_error() {
        let store = MemoryStore::new(vec![quote(i64::MAX, "a", "b")]);
        let (status, body) = call(
            Route::AddQuote,
            &json_body(r#"{"text":"c","author":"d"}"#),
            &store,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to assign quote id");
        assert_eq!(store.load_all().len(), 1);
    }

    #[tokio::test]
    async fn test_add_keeps_quotes_with_foreign_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.json");
        std::fs::write(
            &path,
            r#"[{"id":1,"text":"keep me","author":"A","createdAt":"2024-01-15"}]"#,
        )
        .unwrap();
        let store = JsonFileStore::new(&path);

        let (status, body) = call(
            Route::AddQuote,
            &json_body(r#"{"text":"new","author":"C"}"#),
            &store,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["quote"]["id"], 2);

        let stored = store.load_all();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].text, "keep me");
        assert_eq!(
            stored[0].created_at.as_ref().map(ToString::to_string).as_deref(),
            Some("2024-01-15")
        );
    }

    #[tokio::test]
    async fn test_search_by_author_only_term() {
        let store = MemoryStore::new(five_quotes());
        let (status, body) = call(Route::SearchQuotes, &get("q=WILDE"), &store).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], "WILDE");
        assert_eq!(body["count"], 1);
        assert_eq!(body["quotes"][0]["id"], 4);
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let store = MemoryStore::new(five_quotes());
        let (status, _) = call(Route::SearchQuotes, &get(""), &store).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = call(Route::SearchQuotes, &get("q="), &store).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_text_only() {
        let store = MemoryStore::new(five_quotes());
        let (status, body) = call(
            Route::UpdateQuote("2".to_string()),
            &json_body(r#"{"text":"Stay curious"}"#),
            &store,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quote"]["text"], "Stay curious");
        assert_eq!(body["quote"]["author"], "Steve Jobs");
        assert!(body["quote"]["updatedAt"].is_string());

        let stored = store.load_all();
        assert_eq!(stored[1].text, "Stay curious");
        assert_eq!(stored[1].author, "Steve Jobs");
        assert!(stored[1].updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_errors() {
        let store = MemoryStore::new(five_quotes());

        let (status, _) = call(Route::UpdateQuote("2".to_string()), &json_body("{}"), &store).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            Route::UpdateQuote("42".to_string()),
            &json_body(r#"{"author":"x"}"#),
            &store,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let failing = MemoryStore::failing_writes(five_quotes());
        let (status, body) = call(
            Route::UpdateQuote("1".to_string()),
            &json_body(r#"{"author":"x"}"#),
            &failing,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to update quote");
    }

    #[tokio::test]
    async fn test_delete_returns_deleted_quote() {
        let store = MemoryStore::new(five_quotes());
        let (status, body) = call(Route::DeleteQuote("3".to_string()), &get(""), &store).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quote"]["id"], 3);
        assert!(body["message"].is_string());

        let ids: Vec<Option<i64>> = store.load_all().iter().map(|q| q.id.as_i64()).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(4), Some(5)]);

        let (status, _) = call(Route::DeleteQuote("3".to_string()), &get(""), &store).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_save_failure_is_server_error() {
        let store = MemoryStore::failing_writes(five_quotes());
        let (status, _) = call(Route::DeleteQuote("1".to_string()), &get(""), &store).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.load_all().len(), 5);
    }
}

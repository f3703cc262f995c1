// Quote API handlers
// Each handler does a full load, optional modify + full save, then answers

use chrono::Utc;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::error::ApiError;
use super::types::{
    EndpointListing, QuoteBody, QuoteList, QuoteMessage, SearchResult, ServiceInfo,
};
use super::ENDPOINTS;
use crate::http::{json_response, QueryParams};
use crate::quotes::{query, Quote};
use crate::store::QuoteStore;

type ApiResult = Result<Response<Full<Bytes>>, ApiError>;

const QUOTE_NOT_FOUND: ApiError = ApiError::NotFound("Quote not found");

/// `GET /`: service metadata and endpoint listing
pub fn service_info() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &ServiceInfo {
            message: "Welcome to the quotes API!",
            endpoints: EndpointListing(&ENDPOINTS),
        },
    )
}

/// `GET /api/quotes?author=&limit=`
///
/// The author filter is applied before the limit.
#[allow(clippy::unnecessary_wraps)]
pub fn list_quotes(params: &QueryParams, store: &dyn QuoteStore) -> ApiResult {
    let mut quotes = store.load_all();

    if let Some(author) = params.get_non_empty("author") {
        quotes = query::filter_by_author(quotes, author);
    }
    if let Some(raw) = params.get("limit") {
        quotes = query::limit(quotes, raw);
    }

    Ok(json_response(
        StatusCode::OK,
        &QuoteList {
            count: quotes.len(),
            quotes: &quotes,
        },
    ))
}

/// `GET /api/quotes/random`
pub fn random_quote(store: &dyn QuoteStore) -> ApiResult {
    let quotes = store.load_all();
    let quote = query::pick_random(&quotes).ok_or(ApiError::NotFound("No quotes found"))?;
    Ok(json_response(StatusCode::OK, quote))
}

/// `GET /api/quotes/:id`
pub fn get_quote(id: &str, store: &dyn QuoteStore) -> ApiResult {
    let quotes = store.load_all();
    let quote = query::find_by_id(&quotes, id).ok_or(QUOTE_NOT_FOUND)?;
    Ok(json_response(StatusCode::OK, quote))
}

/// `GET /api/quotes/search?q=`
pub fn search_quotes(params: &QueryParams, store: &dyn QuoteStore) -> ApiResult {
    let term = params
        .get_non_empty("q")
        .ok_or(ApiError::Validation("Search query is required"))?;

    let results = query::search(store.load_all(), term);

    Ok(json_response(
        StatusCode::OK,
        &SearchResult {
            query: term,
            count: results.len(),
            quotes: &results,
        },
    ))
}

/// `POST /api/quotes`
pub fn add_quote(body: QuoteBody, store: &dyn QuoteStore) -> ApiResult {
    let new_quote = body.into_new_quote()?;

    let mut quotes = store.load_all();
    let id = query::next_id(&quotes).ok_or(ApiError::Storage("Failed to assign quote id"))?;
    let quote = Quote::create(id, new_quote, Utc::now());
    quotes.push(quote.clone());

    if !store.save_all(&quotes) {
        return Err(ApiError::Storage("Failed to save quote"));
    }

    Ok(json_response(
        StatusCode::CREATED,
        &QuoteMessage {
            message: "Quote added successfully",
            quote: &quote,
        },
    ))
}

/// `PUT /api/quotes/:id`
pub fn update_quote(id: &str, body: QuoteBody, store: &dyn QuoteStore) -> ApiResult {
    let patch = body.into_patch()?;

    let mut quotes = store.load_all();
    let index = query::position_by_id(&quotes, id).ok_or(QUOTE_NOT_FOUND)?;
    quotes[index].apply(patch, Utc::now());

    if !store.save_all(&quotes) {
        return Err(ApiError::Storage("Failed to update quote"));
    }

    Ok(json_response(
        StatusCode::OK,
        &QuoteMessage {
            message: "Quote updated successfully",
            quote: &quotes[index],
        },
    ))
}

/// `DELETE /api/quotes/:id`
pub fn delete_quote(id: &str, store: &dyn QuoteStore) -> ApiResult {
    let mut quotes = store.load_all();
    let index = query::position_by_id(&quotes, id).ok_or(QUOTE_NOT_FOUND)?;
    let deleted = quotes.remove(index);

    if !store.save_all(&quotes) {
        return Err(ApiError::Storage("Failed to delete quote"));
    }

    Ok(json_response(
        StatusCode::OK,
        &QuoteMessage {
            message: "Quote deleted successfully",
            quote: &deleted,
        },
    ))
}

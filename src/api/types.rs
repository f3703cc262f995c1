// API request/response schemas

use serde::{Deserialize, Serialize, Serializer};

use super::error::ApiError;
use super::Endpoint;
use crate::http::QueryParams;
use crate::logger;
use crate::quotes::{NewQuote, Quote, QuotePatch};

/// Body of POST and PUT requests, before validation
///
/// Both fields are optional here; `into_new_quote` and `into_patch` apply
/// the per-handler presence rules. Empty strings count as missing.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct QuoteBody {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl QuoteBody {
    /// Decode a request body according to its Content-Type
    ///
    /// JSON and URL-encoded forms are understood. Anything else, and any
    /// body that fails to decode, yields an empty `QuoteBody`.
    pub fn parse(content_type: Option<&str>, body: &[u8]) -> Self {
        if body.is_empty() {
            return Self::default();
        }

        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|m| m.trim().to_ascii_lowercase());

        match mime.as_deref() {
            Some("application/json") => serde_json::from_slice(body).unwrap_or_else(|e| {
                logger::log_warning(&format!("Ignoring malformed JSON body: {e}"));
                Self::default()
            }),
            Some("application/x-www-form-urlencoded") => {
                let params = QueryParams::parse(&String::from_utf8_lossy(body));
                Self {
                    text: params.get("text").map(ToString::to_string),
                    author: params.get("author").map(ToString::to_string),
                }
            }
            _ => Self::default(),
        }
    }

    pub fn into_new_quote(self) -> Result<NewQuote, ApiError> {
        match (non_empty(self.text), non_empty(self.author)) {
            (Some(text), Some(author)) => Ok(NewQuote { text, author }),
            _ => Err(ApiError::Validation(
                "Quote text and author are required",
            )),
        }
    }

    pub fn into_patch(self) -> Result<QuotePatch, ApiError> {
        let patch = QuotePatch {
            text: non_empty(self.text),
            author: non_empty(self.author),
        };
        if patch.text.is_none() && patch.author.is_none() {
            return Err(ApiError::Validation(
                "Text or author is required for update",
            ));
        }
        Ok(patch)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `GET /api/quotes`
#[derive(Debug, Serialize)]
pub struct QuoteList<'a> {
    pub count: usize,
    pub quotes: &'a [Quote],
}

/// `GET /api/quotes/search`
#[derive(Debug, Serialize)]
pub struct SearchResult<'a> {
    pub query: &'a str,
    pub count: usize,
    pub quotes: &'a [Quote],
}

/// Result of a mutation: what happened and the affected quote
#[derive(Debug, Serialize)]
pub struct QuoteMessage<'a> {
    pub message: &'a str,
    pub quote: &'a Quote,
}

/// `GET /`
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub endpoints: EndpointListing,
}

/// Serializes as `{"getAllQuotes": "GET /api/quotes", ...}` in table order
#[derive(Debug)]
pub struct EndpointListing(pub &'static [Endpoint]);

impl Serialize for EndpointListing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .iter()
                .map(|e| (e.name, format!("{} {}", e.method, e.path))),
        )
    }
}

//! Quote domain module
//!
//! The `Quote` record, the request schemas that create and modify it, and the
//! pure query functions that filter the collection.

mod model;
pub mod query;
mod timestamp;

pub use model::{NewQuote, Quote, QuoteId, QuotePatch};

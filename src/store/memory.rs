// In-memory store
// Same whole-collection contract as the file store, without touching disk

use std::sync::{Mutex, PoisonError};

use super::QuoteStore;
use crate::quotes::Quote;

#[derive(Default)]
pub struct MemoryStore {
    quotes: Mutex<Vec<Quote>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self {
            quotes: Mutex::new(quotes),
            fail_writes: false,
        }
    }

    /// A store whose `save_all` always fails, for exercising error paths
    #[cfg(test)]
    pub fn failing_writes(quotes: Vec<Quote>) -> Self {
        Self {
            quotes: Mutex::new(quotes),
            fail_writes: true,
        }
    }
}

impl QuoteStore for MemoryStore {
    fn load_all(&self) -> Vec<Quote> {
        self.quotes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save_all(&self, quotes: &[Quote]) -> bool {
        if self.fail_writes {
            return false;
        }
        *self.quotes.lock().unwrap_or_else(PoisonError::into_inner) = quotes.to_vec();
        true
    }

    fn describe(&self) -> String {
        "in-memory (not persisted)".to_string()
    }
}

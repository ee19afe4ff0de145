use crate::core::errors::ExchangeError;
use crate::core::types::{is_currency_token, SymbolPair};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Native symbol to pair mapping, owned by a single adapter instance.
///
/// Entries never expire: a listing does not change meaning during a session.
#[derive(Debug, Default)]
pub struct SymbolCache {
    entries: RwLock<HashMap<String, SymbolPair>>,
}

impl SymbolCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, native: &str) -> Option<SymbolPair> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(native)
            .cloned()
    }

    pub fn insert(&self, native: &str, pair: SymbolPair) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(native.to_string(), pair);
    }

    /// Merge a batch of entries (e.g. an exchange listing) and return the table size.
    pub fn extend<I: IntoIterator<Item = (String, SymbolPair)>>(&self, entries: I) -> usize {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        guard.extend(entries);
        guard.len()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validate both sides of a pair coming from a caller.
pub fn pair_from_parts(trade: &str, stake: &str) -> Result<SymbolPair, ExchangeError> {
    SymbolPair::new(trade, stake)
}

/// Validate a side parsed out of a native symbol, naming the native form on failure.
pub fn checked_side<'a>(side: &'a str, native: &str) -> Result<&'a str, ExchangeError> {
    if is_currency_token(side) {
        Ok(side)
    } else {
        Err(ExchangeError::InvalidSymbolFormat(format!(
            "Unexpected symbol format: {}",
            native
        )))
    }
}

use super::KvStore;
use crate::error::{DefectError, Result};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory key-value store for tests.
///
/// Uses `RefCell` so the trait can take `&self`; the engine is single-threaded.
#[derive(Default)]
pub struct MemKvStore {
    entries: RefCell<HashMap<String, String>>,
    simulate_write_error: RefCell<bool>,
}

impl MemKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `put` fail.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }
}

impl KvStore for MemKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(DefectError::Store("Simulated write error".to_string()));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

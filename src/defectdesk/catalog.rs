use crate::error::{DefectError, Result};
use crate::model::ReceptionRecord;
use crate::store::KvStore;
use tracing::warn;

/// Key holding the whole serialized reception list.
pub const CATALOG_KEY: &str = "receptions";

/// Persisted list of receptions.
///
/// The catalog is a cache over the directory tree: when it cannot be read it
/// is treated as empty and the scanner rebuilds it.
pub struct CatalogStore<K: KvStore> {
    kv: K,
}

impl<K: KvStore> CatalogStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn load(&self) -> Vec<ReceptionRecord> {
        match self.try_load() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Catalog unreadable, treating it as empty");
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<Vec<ReceptionRecord>> {
        let Some(raw) = self.kv.get(CATALOG_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| DefectError::CorruptCatalog(e.to_string()))
    }

    pub fn save(&self, records: &[ReceptionRecord]) -> Result<()> {
        let content = serde_json::to_string_pretty(records).map_err(DefectError::Serialization)?;
        self.kv.put(CATALOG_KEY, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemKvStore;

    #[test]
    fn test_empty_store_loads_empty() {
        let catalog = CatalogStore::new(MemKvStore::new());
        assert!(catalog.load().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let catalog = CatalogStore::new(MemKvStore::new());
        let records = vec![
            ReceptionRecord::new("1234", "05-03-2024"),
            ReceptionRecord::new("5678", "06-03-2024"),
        ];
        catalog.save(&records).unwrap();
        assert_eq!(catalog.load(), records);
    }

    #[test]
    fn test_corrupt_blob_loads_empty() {
        let kv = MemKvStore::new();
        kv.put(CATALOG_KEY, "{not json").unwrap();
        let catalog = CatalogStore::new(kv);
        assert!(catalog.load().is_empty());
    }

    #[test]
    fn test_wrong_shape_loads_empty() {
        let kv = MemKvStore::new();
        kv.put(CATALOG_KEY, r#"[{"id": 5}]"#).unwrap();
        let catalog = CatalogStore::new(kv);
        assert!(catalog.load().is_empty());
    }

    #[test]
    fn test_save_error_is_returned() {
        let kv = MemKvStore::new();
        kv.set_simulate_write_error(true);
        let catalog = CatalogStore::new(kv);
        assert!(catalog.save(&[]).is_err());
    }
}

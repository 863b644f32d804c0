use super::KvStore;
use crate::error::{DefectError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct FsKvStore {
    root: PathBuf,
}

impl FsKvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(DefectError::Io)?;
        }
        Ok(())
    }
}

impl KvStore for FsKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(DefectError::Io)?;
        Ok(Some(content))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let target = self.key_path(key);

        // Atomic write
        let tmp = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp, value).map_err(DefectError::Io)?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(DefectError::Io(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FsKvStore::new(dir.path());
        assert_eq!(store.get("receptions").unwrap(), None);
    }

    #[test]
    fn test_put_then_get() {
        let dir = TempDir::new().unwrap();
        let store = FsKvStore::new(dir.path().join("kv"));

        store.put("receptions", "[1]").unwrap();
        store.put("receptions", "[1,2]").unwrap();

        assert_eq!(store.get("receptions").unwrap().as_deref(), Some("[1,2]"));
        assert!(dir.path().join("kv").join("receptions.json").exists());
    }

    #[test]
    fn test_put_leaves_no_tmp_files() {
        let dir = TempDir::new().unwrap();
        let store = FsKvStore::new(dir.path());
        store.put("receptions", "[]").unwrap();

        for entry in fs::read_dir(dir.path()).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().into_owned();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
    }
}

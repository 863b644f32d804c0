use super::probe::StorageProbe;
use super::{ResolvedDirectory, StorageEnvironment};
use crate::error::{DefectError, Result};
use crate::model::{validate_path_segment, DefectCategory};
use once_cell::sync::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Picks the session's base root and builds directory hierarchies under it.
///
/// The base root is chosen once and memoized: every reception written during a
/// session lands in the same tree.
#[derive(Debug)]
pub struct PathResolver {
    probe: StorageProbe,
    base_root: OnceCell<PathBuf>,
}

impl PathResolver {
    pub fn new(probe: StorageProbe) -> Self {
        Self {
            probe,
            base_root: OnceCell::new(),
        }
    }

    pub fn from_environment(env: StorageEnvironment) -> Self {
        Self::new(StorageProbe::new(env))
    }

    pub fn probe(&self) -> &StorageProbe {
        &self.probe
    }

    pub fn environment(&self) -> &StorageEnvironment {
        self.probe.environment()
    }

    pub fn resolve_base_root(&self) -> Result<PathBuf> {
        self.base_root
            .get_or_try_init(|| self.choose_base_root())
            .cloned()
    }

    fn choose_base_root(&self) -> Result<PathBuf> {
        let primary = self.environment().primary();
        let primary_info = self.probe.inspect(&primary);
        if primary_info.writable {
            let tests = self.probe.write_test(std::slice::from_ref(&primary_info));
            if tests.iter().all(|t| t.success) {
                info!(root = %primary.path.display(), kind = %primary.kind, "Using primary storage root");
                return Ok(primary.path);
            }
        }

        warn!(
            root = %primary.path.display(),
            "Primary storage root is not writable, probing candidates"
        );
        let candidates = self.probe.probe_candidates();
        let results = self.probe.write_test(&candidates);
        let chosen = self.probe.choose(&candidates, &results)?;
        info!(root = %chosen.path.display(), kind = %chosen.kind, "Using probed storage root");
        Ok(chosen.path)
    }

    /// `<root>/<manufacturer>/<date>`
    pub fn resolve_reception_directory(
        &self,
        manufacturer_code: &str,
        date: &str,
    ) -> Result<ResolvedDirectory> {
        self.resolve_levels(&[manufacturer_code, date])
    }

    /// `<root>/<manufacturer>/<date>/<category>/<full article code>`
    pub fn resolve_item_directory(
        &self,
        manufacturer_code: &str,
        date: &str,
        category: DefectCategory,
        full_article_code: &str,
    ) -> Result<ResolvedDirectory> {
        let category = category.dir_name();
        self.resolve_levels(&[manufacturer_code, date, &category, full_article_code])
    }

    fn resolve_levels(&self, levels: &[&str]) -> Result<ResolvedDirectory> {
        for level in levels {
            validate_path_segment(level)?;
        }
        let root = self.resolve_base_root()?;

        match build_hierarchy(&root, levels) {
            Ok(path) => Ok(ResolvedDirectory {
                path,
                root,
                used_fallback: false,
            }),
            Err(err @ DefectError::DirectoryCreationFailed { .. }) => {
                let fallback = self.environment().fallback().path;
                if fallback == root {
                    return Err(err);
                }
                warn!(
                    error = %err,
                    fallback = %fallback.display(),
                    "Evidence directory stored under fallback root, outside the browsable location"
                );
                let path = build_hierarchy(&fallback, levels)?;
                Ok(ResolvedDirectory {
                    path,
                    root: fallback,
                    used_fallback: true,
                })
            }
            Err(err) => Err(err),
        }
    }
}

/// Creates each level in order; the root itself may need intermediate parents.
fn build_hierarchy(root: &Path, levels: &[&str]) -> Result<PathBuf> {
    ensure_root(root)?;
    let mut current = root.to_path_buf();
    for level in levels {
        current.push(level);
        ensure_level(&current)?;
    }
    debug!(path = %current.display(), "Directory hierarchy ready");
    Ok(current)
}

fn ensure_root(root: &Path) -> Result<()> {
    if root.is_dir() {
        return Ok(());
    }
    if root.exists() {
        return Err(DefectError::DirectoryCreationFailed {
            path: root.to_path_buf(),
            reason: "storage root is not a directory".to_string(),
        });
    }
    match fs::create_dir_all(root) {
        Ok(()) => Ok(()),
        Err(_) if root.is_dir() => Ok(()),
        Err(e) => Err(DefectError::DirectoryCreationFailed {
            path: root.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

fn ensure_level(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(DefectError::PathConflict(path.to_path_buf()));
    }
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        // Lost a race with another creator; the slot is what we wanted.
        Err(_) if path.is_dir() => Ok(()),
        Err(e) => Err(DefectError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn legacy_env(temp: &TempDir) -> StorageEnvironment {
        StorageEnvironment::new(temp.path().join("private"))
            .with_legacy_public(temp.path().join("public"))
            .with_scoped_storage(false)
    }

    #[test]
    fn test_resolve_item_directory_builds_four_levels() {
        let temp = TempDir::new().unwrap();
        let resolver = PathResolver::from_environment(StorageEnvironment::new(temp.path()));

        let dir = resolver
            .resolve_item_directory("1234", "05-03-2024", DefectCategory::Wear, "AA100-1")
            .unwrap();

        assert_eq!(
            dir.path,
            temp.path()
                .join("1234")
                .join("05-03-2024")
                .join("2")
                .join("AA100-1")
        );
        assert!(dir.path.is_dir());
        assert!(!dir.used_fallback);
        assert_eq!(dir.root, temp.path());
    }

    #[test]
    fn test_base_root_prefers_recommended_legacy_root() {
        let temp = TempDir::new().unwrap();
        let resolver = PathResolver::from_environment(legacy_env(&temp));
        assert_eq!(
            resolver.resolve_base_root().unwrap(),
            temp.path().join("public")
        );
    }

    #[test]
    fn test_base_root_falls_back_to_probe_ranking() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file").unwrap();
        let env = StorageEnvironment::new(temp.path().join("private"))
            .with_legacy_public(blocker.join("public"))
            .with_scoped_storage(false);
        let resolver = PathResolver::from_environment(env);

        assert_eq!(
            resolver.resolve_base_root().unwrap(),
            temp.path().join("private")
        );
    }

    #[test]
    fn test_base_root_permission_denied_when_nothing_works() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file").unwrap();
        let resolver = PathResolver::from_environment(StorageEnvironment::new(blocker.join("x")));

        assert!(matches!(
            resolver.resolve_base_root(),
            Err(DefectError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_base_root_is_stable_for_the_session() {
        let temp = TempDir::new().unwrap();
        let resolver = PathResolver::from_environment(legacy_env(&temp));
        let first = resolver.resolve_base_root().unwrap();

        fs::remove_dir_all(&first).unwrap();
        fs::write(&first, "now a file").unwrap();

        assert_eq!(resolver.resolve_base_root().unwrap(), first);
    }

    #[test]
    fn test_creation_failure_retries_under_fallback_root() {
        let temp = TempDir::new().unwrap();
        let resolver = PathResolver::from_environment(legacy_env(&temp));
        let public = resolver.resolve_base_root().unwrap();

        // The chosen root becomes unusable mid-session.
        fs::remove_dir_all(&public).unwrap();
        fs::write(&public, "now a file").unwrap();

        let dir = resolver
            .resolve_item_directory("1234", "05-03-2024", DefectCategory::Minor, "AA100-1")
            .unwrap();

        assert!(dir.used_fallback);
        assert_eq!(dir.root, temp.path().join("private"));
        assert!(dir.path.starts_with(temp.path().join("private")));
        assert!(dir.path.is_dir());
        // Session root is unchanged.
        assert_eq!(resolver.resolve_base_root().unwrap(), public);
    }

    #[test]
    fn test_leaf_occupied_by_file_is_a_conflict() {
        let temp = TempDir::new().unwrap();
        let parent = temp.path().join("1234").join("05-03-2024").join("3");
        fs::create_dir_all(&parent).unwrap();
        let leaf = parent.join("AA100-1");
        fs::write(&leaf, "keep me").unwrap();

        let resolver = PathResolver::from_environment(StorageEnvironment::new(temp.path()));
        let err = resolver
            .resolve_item_directory("1234", "05-03-2024", DefectCategory::Rejected, "AA100-1")
            .unwrap_err();

        assert!(matches!(err, DefectError::PathConflict(ref p) if p == &leaf));
        assert_eq!(fs::read_to_string(&leaf).unwrap(), "keep me");
    }

    #[test]
    fn test_rejects_segments_with_separators() {
        let temp = TempDir::new().unwrap();
        let resolver = PathResolver::from_environment(StorageEnvironment::new(temp.path()));
        assert!(matches!(
            resolver.resolve_reception_directory("12/34", "05-03-2024"),
            Err(DefectError::InvalidInput(_))
        ));
    }
}

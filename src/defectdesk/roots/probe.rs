use super::{Candidate, PathInfo, StorageEnvironment, StorageKind, WriteTestResult};
use crate::error::{DefectError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use uuid::Uuid;

const SENTINEL_LEN: usize = 64;
const SENTINEL_SEED: &[u8] = b"defectdesk storage probe ";

/// Result of a full diagnostic probe.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub candidates: Vec<PathInfo>,
    pub write_tests: Vec<WriteTestResult>,
    /// Successful candidates in preference order.
    pub ranked: Vec<PathInfo>,
}

impl ProbeReport {
    pub fn chosen(&self) -> Option<&PathInfo> {
        self.ranked.first()
    }
}

/// Checks candidate roots for real write capability.
///
/// Nothing is cached: capability can change between calls (volume detached,
/// permission revoked), so every call looks at the disk again.
#[derive(Debug, Clone)]
pub struct StorageProbe {
    env: StorageEnvironment,
}

impl StorageProbe {
    pub fn new(env: StorageEnvironment) -> Self {
        Self { env }
    }

    pub fn environment(&self) -> &StorageEnvironment {
        &self.env
    }

    pub fn probe_candidates(&self) -> Vec<PathInfo> {
        self.env
            .candidates()
            .iter()
            .map(|c| self.inspect(c))
            .collect()
    }

    /// Checks existence (creating the directory if absent) and writability of one candidate.
    pub fn inspect(&self, candidate: &Candidate) -> PathInfo {
        let path = &candidate.path;
        if !path.exists() {
            if let Err(e) = fs::create_dir_all(path) {
                debug!(path = %path.display(), error = %e, "Could not create candidate root");
            }
        }
        let exists = path.is_dir();
        let writable = exists
            && fs::metadata(path)
                .map(|m| !m.permissions().readonly())
                .unwrap_or(false);

        PathInfo {
            path: path.clone(),
            kind: candidate.kind,
            exists,
            writable,
            recommended: self.env.is_recommended(candidate.kind),
        }
    }

    /// Create-write-read-verify-delete round trip on every candidate.
    pub fn write_test(&self, candidates: &[PathInfo]) -> Vec<WriteTestResult> {
        candidates
            .iter()
            .map(|info| {
                let outcome = if info.path.is_dir() {
                    round_trip(&info.path)
                } else {
                    Err("directory does not exist".to_string())
                };
                if let Err(detail) = &outcome {
                    debug!(path = %info.path.display(), %detail, "Write test failed");
                }
                WriteTestResult {
                    path: info.path.clone(),
                    kind: info.kind,
                    success: outcome.is_ok(),
                    error_detail: outcome.err(),
                }
            })
            .collect()
    }

    /// Orders the candidates that passed the write test.
    ///
    /// A recommended public root wins; otherwise the private root; otherwise
    /// whatever public root still works.
    pub fn rank(&self, candidates: &[PathInfo], results: &[WriteTestResult]) -> Vec<PathInfo> {
        let passed = |info: &PathInfo| {
            results
                .iter()
                .any(|r| r.path == info.path && r.kind == info.kind && r.success)
        };
        let mut ranked: Vec<PathInfo> = candidates.iter().filter(|i| passed(i)).cloned().collect();
        ranked.sort_by_key(|info| match (info.kind.is_public(), info.recommended) {
            (true, true) => 0,
            (false, _) => 1,
            (true, false) => 2,
        });
        ranked
    }

    /// The best candidate, or `PermissionDenied` when none passed.
    pub fn choose(&self, candidates: &[PathInfo], results: &[WriteTestResult]) -> Result<PathInfo> {
        self.rank(candidates, results)
            .into_iter()
            .next()
            .ok_or_else(|| DefectError::PermissionDenied(failure_summary(results)))
    }

    pub fn run(&self) -> ProbeReport {
        let candidates = self.probe_candidates();
        let write_tests = self.write_test(&candidates);
        let ranked = self.rank(&candidates, &write_tests);
        ProbeReport {
            candidates,
            write_tests,
            ranked,
        }
    }
}

fn sentinel() -> [u8; SENTINEL_LEN] {
    let mut payload = [0u8; SENTINEL_LEN];
    for (i, byte) in payload.iter_mut().enumerate() {
        *byte = SENTINEL_SEED[i % SENTINEL_SEED.len()];
    }
    payload
}

fn round_trip(dir: &Path) -> std::result::Result<(), String> {
    let file = dir.join(format!(".probe-{}.tmp", Uuid::new_v4()));
    let outcome = write_read_verify(&file);

    // The test file goes away whatever happened above.
    if file.exists() {
        if let Err(e) = fs::remove_file(&file) {
            warn!(path = %file.display(), error = %e, "Could not remove probe file");
            return Err(format!("cleanup failed: {}", e));
        }
    }
    outcome
}

fn write_read_verify(file: &Path) -> std::result::Result<(), String> {
    let payload = sentinel();
    fs::write(file, payload).map_err(|e| format!("write failed: {}", e))?;
    let read_back = fs::read(file).map_err(|e| format!("read failed: {}", e))?;
    if read_back != payload {
        return Err(format!(
            "read-back mismatch: wrote {} bytes, read {}",
            payload.len(),
            read_back.len()
        ));
    }
    Ok(())
}

fn failure_summary(results: &[WriteTestResult]) -> String {
    if results.is_empty() {
        return "no candidate roots".to_string();
    }
    results
        .iter()
        .map(|r| {
            format!(
                "{} {}: {}",
                r.kind,
                r.path.display(),
                r.error_detail.as_deref().unwrap_or("ok")
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn info(path: &str, kind: StorageKind, recommended: bool) -> PathInfo {
        PathInfo {
            path: PathBuf::from(path),
            kind,
            exists: true,
            writable: true,
            recommended,
        }
    }

    fn result(path: &str, kind: StorageKind, success: bool) -> WriteTestResult {
        WriteTestResult {
            path: PathBuf::from(path),
            kind,
            success,
            error_detail: (!success).then(|| "denied".to_string()),
        }
    }

    #[test]
    fn test_write_test_succeeds_and_leaves_no_residue() {
        let temp = TempDir::new().unwrap();
        let private = temp.path().join("private");
        fs::create_dir_all(&private).unwrap();
        fs::write(private.join("keep.txt"), "x").unwrap();
        let before = listing(&private);

        let probe = StorageProbe::new(StorageEnvironment::new(&private));
        let candidates = probe.probe_candidates();
        let results = probe.write_test(&candidates);

        assert_eq!(results.len(), 1);
        assert!(results[0].success);
        assert_eq!(results[0].error_detail, None);
        assert_eq!(listing(&private), before);
    }

    #[test]
    fn test_probe_creates_missing_root() {
        let temp = TempDir::new().unwrap();
        let private = temp.path().join("a").join("b");
        let probe = StorageProbe::new(StorageEnvironment::new(&private));

        let candidates = probe.probe_candidates();
        assert!(candidates[0].exists);
        assert!(candidates[0].writable);
        assert!(candidates[0].recommended);
        assert!(private.is_dir());
    }

    #[test]
    fn test_candidate_blocked_by_file_fails() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a dir").unwrap();
        let env = StorageEnvironment::new(temp.path().join("private"))
            .with_legacy_public(blocker.join("evidence"));
        let probe = StorageProbe::new(env);

        let report = probe.run();
        let public = &report.candidates[0];
        assert_eq!(public.kind, StorageKind::LegacyPublic);
        assert!(!public.exists);
        assert!(!public.writable);
        assert!(!report.write_tests[0].success);
        assert!(report.write_tests[0].error_detail.is_some());
        assert_eq!(report.chosen().unwrap().kind, StorageKind::AppPrivate);
    }

    #[test]
    fn test_rank_prefers_private_over_unrecommended_public() {
        let probe = StorageProbe::new(StorageEnvironment::new("/p"));
        let candidates = vec![
            info("/media", StorageKind::SharedMedia, false),
            info("/p", StorageKind::AppPrivate, true),
        ];
        let results = vec![
            result("/media", StorageKind::SharedMedia, true),
            result("/p", StorageKind::AppPrivate, true),
        ];
        let ranked = probe.rank(&candidates, &results);
        assert_eq!(ranked[0].kind, StorageKind::AppPrivate);
        assert_eq!(ranked[1].kind, StorageKind::SharedMedia);
    }

    #[test]
    fn test_rank_prefers_recommended_public() {
        let probe = StorageProbe::new(StorageEnvironment::new("/p"));
        let candidates = vec![
            info("/public", StorageKind::LegacyPublic, true),
            info("/p", StorageKind::AppPrivate, false),
        ];
        let results = vec![
            result("/public", StorageKind::LegacyPublic, true),
            result("/p", StorageKind::AppPrivate, true),
        ];
        let chosen = probe.choose(&candidates, &results).unwrap();
        assert_eq!(chosen.kind, StorageKind::LegacyPublic);
    }

    #[test]
    fn test_rank_uses_public_when_private_fails() {
        let probe = StorageProbe::new(StorageEnvironment::new("/p"));
        let candidates = vec![
            info("/media", StorageKind::SharedMedia, false),
            info("/p", StorageKind::AppPrivate, true),
        ];
        let results = vec![
            result("/media", StorageKind::SharedMedia, true),
            result("/p", StorageKind::AppPrivate, false),
        ];
        let chosen = probe.choose(&candidates, &results).unwrap();
        assert_eq!(chosen.kind, StorageKind::SharedMedia);
    }

    #[test]
    fn test_choose_reports_permission_denied() {
        let probe = StorageProbe::new(StorageEnvironment::new("/p"));
        let candidates = vec![info("/p", StorageKind::AppPrivate, true)];
        let results = vec![result("/p", StorageKind::AppPrivate, false)];
        match probe.choose(&candidates, &results) {
            Err(DefectError::PermissionDenied(detail)) => assert!(detail.contains("denied")),
            other => panic!("expected PermissionDenied, got {:?}", other),
        }
    }
}

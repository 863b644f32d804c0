use crate::error::DefectError;
use crate::model::{parse_reception_date, ReceptionRecord};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub records: Vec<ReceptionRecord>,
    /// Entries that could not be read; each one is a `ScanEntrySkipped`.
    pub skipped: Vec<DefectError>,
}

/// Rebuilds receptions from `<root>/<manufacturer>/<dd-mm-yyyy>/` directories.
///
/// Read-only: nothing on disk is created, changed or removed.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordScanner;

impl RecordScanner {
    pub fn new() -> Self {
        Self
    }

    pub fn scan(&self, base_root: &Path) -> Vec<ReceptionRecord> {
        self.scan_detailed(base_root).records
    }

    pub fn scan_detailed(&self, base_root: &Path) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        if !base_root.is_dir() {
            debug!(root = %base_root.display(), "Base root missing, nothing to scan");
            return outcome;
        }

        let walker = WalkDir::new(base_root)
            .min_depth(1)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| base_root.to_path_buf());
                    skip(&mut outcome, DefectError::ScanEntrySkipped {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if entry.path_is_symlink() {
                debug!(
                    path = %entry.path().display(),
                    "Ignoring symlink, only real directories are adopted"
                );
                continue;
            }
            if entry.depth() != 2 || !entry.file_type().is_dir() {
                continue;
            }

            let Some(date) = entry.file_name().to_str() else {
                continue;
            };
            if parse_reception_date(date).is_none() {
                debug!(path = %entry.path().display(), "Ignoring non-date directory");
                continue;
            }
            let Some(manufacturer_code) = entry
                .path()
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
            else {
                continue;
            };

            let modified = entry
                .metadata()
                .map_err(|e| e.to_string())
                .and_then(|m| m.modified().map_err(|e| e.to_string()));
            match modified {
                Ok(modified) => {
                    let created_at: DateTime<Utc> = modified.into();
                    outcome.records.push(ReceptionRecord::with_created_at(
                        manufacturer_code,
                        date,
                        created_at,
                    ));
                }
                Err(reason) => skip(&mut outcome, DefectError::ScanEntrySkipped {
                    path: entry.path().to_path_buf(),
                    reason,
                }),
            }
        }

        debug!(
            root = %base_root.display(),
            found = outcome.records.len(),
            skipped = outcome.skipped.len(),
            "Scan complete"
        );
        outcome
    }
}

fn skip(outcome: &mut ScanOutcome, err: DefectError) {
    warn!(error = %err, "Scan entry skipped");
    outcome.skipped.push(err);
}

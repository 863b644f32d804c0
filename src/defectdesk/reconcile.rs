//! # Reconciliation
//!
//! Two sources describe the same receptions:
//!
//! - the **directory tree**, ground truth for *existence*;
//! - the **catalog**, ground truth for *identity continuity* (a reception keeps
//!   the id it was first given for as long as its directory exists).
//!
//! [`ReconciliationEngine::reconcile`] is a garbage-collection pass over both:
//! catalog entries with no directory are evicted, directories with no catalog
//! entry are adopted with the scanner's fresh id, and the result is written
//! back. Records are matched by [`ReceptionKey`], never by id, because the
//! scanner invents a new id every time it runs.
//!
//! The scanner is read-only, so the pass can be repeated any number of times;
//! with no disk changes in between, repeated runs return the same records.

use crate::catalog::CatalogStore;
use crate::error::{DefectError, Result};
use crate::model::{validate_date, validate_manufacturer_code, ReceptionKey, ReceptionRecord};
use crate::roots::resolver::PathResolver;
use crate::roots::ResolvedDirectory;
use crate::scanner::RecordScanner;
use crate::store::KvStore;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub base_root: PathBuf,
    pub records: Vec<ReceptionRecord>,
    pub evicted: usize,
    pub adopted: usize,
    pub skipped_entries: usize,
    /// Set when the merged list could not be written back.
    pub persist_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AddedReception {
    pub record: ReceptionRecord,
    pub directory: Option<ResolvedDirectory>,
    /// Directory problems that did not stop the reception from being recorded.
    pub warning: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Merge {
    records: Vec<ReceptionRecord>,
    evicted: usize,
    adopted: usize,
}

/// `valid = saved ∩ on_disk`, then `valid ++ (on_disk \ valid)`, all by key.
fn merge_records(saved: Vec<ReceptionRecord>, on_disk: Vec<ReceptionRecord>) -> Merge {
    let disk_keys: HashSet<ReceptionKey> = on_disk.iter().map(ReceptionRecord::key).collect();
    let saved_len = saved.len();

    let mut seen = HashSet::new();
    let mut records: Vec<ReceptionRecord> = saved
        .into_iter()
        .filter(|r| {
            let key = r.key();
            disk_keys.contains(&key) && seen.insert(key)
        })
        .collect();
    let evicted = saved_len - records.len();

    let before_adopt = records.len();
    for record in on_disk {
        if seen.insert(record.key()) {
            records.push(record);
        }
    }
    let adopted = records.len() - before_adopt;

    Merge {
        records,
        evicted,
        adopted,
    }
}

pub struct ReconciliationEngine<K: KvStore> {
    catalog: CatalogStore<K>,
    scanner: RecordScanner,
    resolver: Arc<PathResolver>,
}

impl<K: KvStore> ReconciliationEngine<K> {
    pub fn new(catalog: CatalogStore<K>, resolver: Arc<PathResolver>) -> Self {
        Self {
            catalog,
            scanner: RecordScanner::new(),
            resolver,
        }
    }

    pub fn catalog(&self) -> &CatalogStore<K> {
        &self.catalog
    }

    pub fn resolver(&self) -> &Arc<PathResolver> {
        &self.resolver
    }

    /// All known receptions, reconciled against the disk.
    pub fn get_all(&mut self) -> Result<Vec<ReceptionRecord>> {
        Ok(self.reconcile()?.records)
    }

    pub fn reconcile(&mut self) -> Result<ReconcileReport> {
        let saved = self.catalog.load();
        let base_root = self.resolver.resolve_base_root()?;
        let scan = self.scanner.scan_detailed(&base_root);
        let merge = merge_records(saved, scan.records);

        let persist_error = match self.catalog.save(&merge.records) {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "Could not persist reconciled catalog");
                Some(e.to_string())
            }
        };

        if merge.evicted > 0 || merge.adopted > 0 {
            info!(
                evicted = merge.evicted,
                adopted = merge.adopted,
                "Catalog reconciled with disk"
            );
        } else {
            debug!(count = merge.records.len(), "Catalog already consistent");
        }

        Ok(ReconcileReport {
            base_root,
            records: merge.records,
            evicted: merge.evicted,
            adopted: merge.adopted,
            skipped_entries: scan.skipped.len(),
            persist_error,
        })
    }

    /// Records a new reception and creates its directory.
    ///
    /// A duplicate key is rejected without touching anything. A directory
    /// failure is logged and reported in [`AddedReception::warning`]; the
    /// record is still added and the next reconcile decides its fate.
    pub fn add_reception(&mut self, manufacturer_code: &str, date: &str) -> Result<AddedReception> {
        validate_manufacturer_code(manufacturer_code)?;
        validate_date(date)?;

        let mut records = self.get_all()?;
        if records
            .iter()
            .any(|r| r.manufacturer_code == manufacturer_code && r.date == date)
        {
            return Err(DefectError::DuplicateReception {
                manufacturer_code: manufacturer_code.to_string(),
                date: date.to_string(),
            });
        }

        let (directory, warning) = match self
            .resolver
            .resolve_reception_directory(manufacturer_code, date)
        {
            Ok(dir) if dir.used_fallback => {
                let warning = format!(
                    "Reception directory created under fallback root {}",
                    dir.root.display()
                );
                (Some(dir), Some(warning))
            }
            Ok(dir) => (Some(dir), None),
            Err(e) => {
                warn!(error = %e, manufacturer_code, date, "Reception directory not created");
                (None, Some(format!("Reception directory not created: {}", e)))
            }
        };

        let record = ReceptionRecord::new(manufacturer_code, date);
        records.push(record.clone());
        self.catalog.save(&records)?;
        info!(manufacturer_code, date, id = %record.id, "Reception added");

        Ok(AddedReception {
            record,
            directory,
            warning,
        })
    }
}

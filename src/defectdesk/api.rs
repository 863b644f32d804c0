//! # API Facade
//!
//! A thin layer over `commands/`. Every UI goes through `DefectApi`; it
//! dispatches to a command function and hands back a `CmdResult`. No printing
//! happens here.
//!
//! `DefectApi<K: KvStore>` is generic over the catalog backend:
//! - Production: `DefectApi<FsKvStore>`
//! - Testing: `DefectApi<MemKvStore>`
//!
//! The engine and the evidence writer share one `PathResolver`, so a photo
//! written after `add_reception` lands in the same base root.

use crate::catalog::CatalogStore;
use crate::commands;
use crate::error::Result;
use crate::evidence::EvidenceWriter;
use crate::init::AppPaths;
use crate::model::{DefectCategory, DefectNote, PhotoRole};
use crate::reconcile::ReconciliationEngine;
use crate::roots::resolver::PathResolver;
use crate::roots::StorageEnvironment;
use crate::store::KvStore;
use std::path::Path;
use std::sync::Arc;

pub use commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, ItemTarget, MessageLevel};

pub struct DefectApi<K: KvStore> {
    engine: ReconciliationEngine<K>,
    evidence: EvidenceWriter,
    paths: AppPaths,
}

impl<K: KvStore> DefectApi<K> {
    pub fn new(kv: K, env: StorageEnvironment, paths: AppPaths) -> Self {
        let resolver = Arc::new(PathResolver::from_environment(env));
        Self {
            engine: ReconciliationEngine::new(CatalogStore::new(kv), Arc::clone(&resolver)),
            evidence: EvidenceWriter::new(resolver),
            paths,
        }
    }

    pub fn list_receptions(&mut self) -> Result<CmdResult> {
        commands::list::run(&mut self.engine)
    }

    pub fn add_reception(&mut self, manufacturer_code: &str, date: &str) -> Result<CmdResult> {
        commands::add::run(&mut self.engine, manufacturer_code, date)
    }

    pub fn prepare_items(
        &self,
        manufacturer_code: &str,
        date: &str,
        category: DefectCategory,
        article_code: &str,
        quantity: u32,
    ) -> Result<CmdResult> {
        commands::prepare::run(
            &self.evidence,
            manufacturer_code,
            date,
            category,
            article_code,
            quantity,
        )
    }

    pub fn attach_photo(
        &self,
        target: &ItemTarget,
        role: PhotoRole,
        source: &Path,
        move_source: bool,
    ) -> Result<CmdResult> {
        commands::photo::run(&self.evidence, target, role, source, move_source)
    }

    pub fn write_note(&self, target: &ItemTarget, note: &DefectNote) -> Result<CmdResult> {
        commands::note::run(&self.evidence, target, note)
    }

    pub fn show_note(&self, target: &ItemTarget) -> Result<CmdResult> {
        commands::note::show(self.engine.resolver(), target)
    }

    pub fn doctor(&mut self) -> Result<CmdResult> {
        commands::doctor::run(&mut self.engine)
    }

    pub fn probe(&self) -> Result<CmdResult> {
        commands::probe::run(self.engine.resolver())
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths.data_dir, action)
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemKvStore;
    use tempfile::TempDir;

    fn make_api(temp: &TempDir) -> DefectApi<MemKvStore> {
        let paths = AppPaths::sandboxed(temp.path());
        let env = paths.storage_environment(&Default::default());
        DefectApi::new(MemKvStore::new(), env, paths)
    }

    #[test]
    fn test_add_then_list() {
        let temp = TempDir::new().unwrap();
        let mut api = make_api(&temp);

        api.add_reception("1234", "05-03-2024").unwrap();
        let result = api.list_receptions().unwrap();
        assert_eq!(result.receptions.len(), 1);
        assert_eq!(result.receptions[0].manufacturer_code, "1234");
    }

    #[test]
    fn test_prepare_lands_beside_added_reception() {
        let temp = TempDir::new().unwrap();
        let mut api = make_api(&temp);

        let added = api.add_reception("1234", "05-03-2024").unwrap();
        let prepared = api
            .prepare_items("1234", "05-03-2024", DefectCategory::Minor, "AA100", 2)
            .unwrap();
        assert!(prepared.paths[0].starts_with(&added.paths[0]));
    }

    #[test]
    fn test_prepare_alone_is_adopted_by_list() {
        let temp = TempDir::new().unwrap();
        let mut api = make_api(&temp);

        api.prepare_items("7700", "01-02-2025", DefectCategory::Wear, "BB", 1)
            .unwrap();
        let result = api.list_receptions().unwrap();
        assert_eq!(result.receptions.len(), 1);
        assert_eq!(result.receptions[0].date, "01-02-2025");
    }

    #[test]
    fn test_note_round_trip_through_api() {
        let temp = TempDir::new().unwrap();
        let api = make_api(&temp);
        let target = ItemTarget::new("1234", "05-03-2024", DefectCategory::Rejected, "AA100", 1);

        api.write_note(&target, &DefectNote::new("Broken", "Damage", "Cracked"))
            .unwrap();
        let shown = api.show_note(&target).unwrap();
        assert_eq!(shown.stanzas[1].reason, "Broken");
    }

    #[test]
    fn test_config_uses_data_dir() {
        let temp = TempDir::new().unwrap();
        let api = make_api(&temp);
        api.config(ConfigAction::Set("base-dir-name".into(), "Brak".into()))
            .unwrap();
        assert!(temp.path().join("config.json").exists());
    }
}

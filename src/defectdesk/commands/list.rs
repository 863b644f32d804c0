use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::reconcile::ReconciliationEngine;
use crate::store::KvStore;

pub fn run<K: KvStore>(engine: &mut ReconciliationEngine<K>) -> Result<CmdResult> {
    let report = engine.reconcile()?;
    let mut result = CmdResult::default();

    if let Some(err) = &report.persist_error {
        result.add_message(CmdMessage::warning(format!(
            "Catalog could not be saved: {}",
            err
        )));
    }
    if report.skipped_entries > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} unreadable entr(y/ies) skipped under {}",
            report.skipped_entries,
            report.base_root.display()
        )));
    }

    Ok(result.with_receptions(report.records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::fixture;
    use std::fs;

    #[test]
    fn lists_adopted_receptions() {
        let mut fx = fixture();
        fs::create_dir_all(fx.temp.path().join("evidence/1234/05-03-2024")).unwrap();

        let result = run(&mut fx.engine).unwrap();
        assert_eq!(result.receptions.len(), 1);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn warns_when_catalog_cannot_be_saved() {
        let mut fx = fixture();
        fx.engine.catalog().kv().set_simulate_write_error(true);

        let result = run(&mut fx.engine).unwrap();
        assert_eq!(result.messages.len(), 1);
    }
}

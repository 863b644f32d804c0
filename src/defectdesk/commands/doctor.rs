use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::reconcile::ReconciliationEngine;
use crate::store::KvStore;

pub fn run<K: KvStore>(engine: &mut ReconciliationEngine<K>) -> Result<CmdResult> {
    let report = engine.reconcile()?;
    let mut result = CmdResult::default();

    result.add_message(CmdMessage::info(format!(
        "Base root: {}",
        report.base_root.display()
    )));

    if report.evicted == 0 && report.adopted == 0 && report.skipped_entries == 0 {
        result.add_message(CmdMessage::success("No inconsistencies found."));
    } else {
        result.add_message(CmdMessage::warning("Inconsistencies found and fixed:"));
        if report.evicted > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Removed {} reception(s) listed in the catalog but missing from disk.",
                report.evicted
            )));
        }
        if report.adopted > 0 {
            result.add_message(CmdMessage::success(format!(
                "  - Adopted {} reception(s) found on disk but missing from the catalog.",
                report.adopted
            )));
        }
        if report.skipped_entries > 0 {
            result.add_message(CmdMessage::warning(format!(
                "  - Skipped {} unreadable entr(y/ies).",
                report.skipped_entries
            )));
        }
    }

    if let Some(err) = report.persist_error {
        result.add_message(CmdMessage::error(format!(
            "Catalog could not be saved: {}",
            err
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
    fn clean_state_reports_nothing() {
        let mut fx = fixture();
        let result = run(&mut fx.engine).unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m.content == "No inconsistencies found."));
    }

    #[test]
    fn reports_evicted_and_adopted() {
        let mut fx = fixture();
        fx.engine.add_reception("1234", "05-03-2024").unwrap();
        fs::remove_dir_all(fx.temp.path().join("evidence/1234/05-03-2024")).unwrap();
        fs::create_dir_all(fx.temp.path().join("evidence/9999/01-01-2025")).unwrap();

        let result = run(&mut fx.engine).unwrap();
        let text: Vec<&str> = result.messages.iter().map(|m| m.content.as_str()).collect();
        assert!(text.iter().any(|t| t.contains("Removed 1")));
        assert!(text.iter().any(|t| t.contains("Adopted 1")));
        assert_eq!(result.receptions.len(), 1);

        // Second pass finds nothing left to fix.
        let again = run(&mut fx.engine).unwrap();
        assert!(again
            .messages
            .iter()
            .any(|m| m.content == "No inconsistencies found."));
    }
}

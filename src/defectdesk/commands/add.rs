use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::reconcile::ReconciliationEngine;
use crate::store::KvStore;

pub fn run<K: KvStore>(
    engine: &mut ReconciliationEngine<K>,
    manufacturer_code: &str,
    date: &str,
) -> Result<CmdResult> {
    let added = engine.add_reception(manufacturer_code, date)?;
    let mut result = CmdResult::default();

    result.add_message(CmdMessage::success(format!(
        "Reception {} / {} added",
        added.record.manufacturer_code, added.record.date
    )));
    if let Some(warning) = added.warning {
        result.add_message(CmdMessage::warning(warning));
    }

    let paths = added.directory.map(|d| d.path).into_iter().collect();
    Ok(result
        .with_receptions(vec![added.record])
        .with_paths(paths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::fixture;
    use crate::error::DefectError;

    #[test]
    fn adds_and_reports_directory() {
        let mut fx = fixture();
        let result = run(&mut fx.engine, "1234", "05-03-2024").unwrap();

        assert_eq!(result.receptions.len(), 1);
        assert_eq!(
            result.paths,
            vec![fx.temp.path().join("evidence/1234/05-03-2024")]
        );
    }

    #[test]
    fn duplicate_is_an_error() {
        let mut fx = fixture();
        run(&mut fx.engine, "1234", "05-03-2024").unwrap();
        let err = run(&mut fx.engine, "1234", "05-03-2024").unwrap_err();
        assert!(matches!(err, DefectError::DuplicateReception { .. }));
    }
}

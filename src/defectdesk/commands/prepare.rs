use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::evidence::EvidenceWriter;
use crate::model::{validate_date, validate_manufacturer_code, DefectCategory, ItemRecord};

/// Expands an article into `quantity` items and creates each item's directory.
pub fn run(
    writer: &EvidenceWriter,
    manufacturer_code: &str,
    date: &str,
    category: DefectCategory,
    article_code: &str,
    quantity: u32,
) -> Result<CmdResult> {
    validate_manufacturer_code(manufacturer_code)?;
    validate_date(date)?;
    let items = ItemRecord::expand(article_code, quantity)?;

    let mut result = CmdResult::default();
    let mut paths = Vec::with_capacity(items.len());
    for item in &items {
        let dir = writer.item_directory(manufacturer_code, date, category, item)?;
        if dir.used_fallback {
            result.add_message(CmdMessage::warning(format!(
                "{} stored under {} (not the browsable location)",
                item.full_article_code(),
                dir.root.display()
            )));
        }
        paths.push(dir.path);
    }

    result.add_message(CmdMessage::success(format!(
        "Prepared {} item(s) of {} in category {} ({})",
        items.len(),
        article_code,
        category.code(),
        category.label()
    )));
    Ok(result.with_items(items).with_paths(paths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::fixture;

    #[test]
    fn creates_one_directory_per_item() {
        let fx = fixture();
        let result = run(
            &fx.writer,
            "1234",
            "05-03-2024",
            DefectCategory::Rejected,
            "AA100",
            3,
        )
        .unwrap();

        assert_eq!(result.items.len(), 3);
        assert_eq!(result.paths.len(), 3);
        let base = fx.temp.path().join("evidence/1234/05-03-2024/3");
        assert_eq!(result.paths[0], base.join("AA100-1"));
        assert_eq!(result.paths[2], base.join("AA100-3"));
        assert!(result.paths.iter().all(|p| p.is_dir()));
    }

    #[test]
    fn rejects_quantity_out_of_range() {
        let fx = fixture();
        assert!(run(&fx.writer, "1234", "05-03-2024", DefectCategory::Minor, "AA100", 0).is_err());
        assert!(run(&fx.writer, "1234", "05-03-2024", DefectCategory::Minor, "AA100", 11).is_err());
        assert!(!fx.temp.path().join("evidence/1234").exists());
    }
}

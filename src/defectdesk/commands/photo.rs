use crate::commands::{CmdMessage, CmdResult, ItemTarget};
use crate::error::{DefectError, Result};
use crate::evidence::EvidenceWriter;
use crate::model::PhotoRole;
use std::fs;
use std::path::Path;

/// Stores a photo for one item. With `move_source` the file is moved into
/// place, otherwise its bytes are copied and the source is left alone.
pub fn run(
    writer: &EvidenceWriter,
    target: &ItemTarget,
    role: PhotoRole,
    source: &Path,
    move_source: bool,
) -> Result<CmdResult> {
    target.validate()?;
    let mut item = target.item();
    let dir = writer.item_directory(
        &target.manufacturer_code,
        &target.date,
        target.category,
        &item,
    )?;

    let path = if move_source {
        writer.place_image(&dir.path, role, &item, source)?
    } else {
        if !source.is_file() {
            return Err(DefectError::InvalidInput(format!(
                "photo source {} is not a file",
                source.display()
            )));
        }
        let bytes = fs::read(source).map_err(DefectError::Io)?;
        writer.write_image(&dir.path, role, &item, &bytes)?
    };
    item.set_photo_path(role, path.clone());

    let mut result = CmdResult::default();
    if dir.used_fallback {
        result.add_message(CmdMessage::warning(format!(
            "Stored under {} (not the browsable location)",
            dir.root.display()
        )));
    }
    result.add_message(CmdMessage::success(format!(
        "{} photo saved for {}",
        role,
        item.full_article_code()
    )));
    Ok(result.with_items(vec![item]).with_paths(vec![path]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::fixture;
    use crate::model::DefectCategory;

    fn target() -> ItemTarget {
        ItemTarget::new("1234", "05-03-2024", DefectCategory::Wear, "AA100", 2)
    }

    #[test]
    fn copies_photo_and_keeps_source() {
        let fx = fixture();
        let source = fx.temp.path().join("shot.jpg");
        fs::write(&source, b"jpeg").unwrap();

        let result = run(&fx.writer, &target(), PhotoRole::Box, &source, false).unwrap();
        let expected = fx
            .temp
            .path()
            .join("evidence/1234/05-03-2024/2/AA100-2/box-AA100-2.jpg");
        assert_eq!(result.paths, vec![expected.clone()]);
        assert_eq!(fs::read(&expected).unwrap(), b"jpeg");
        assert!(source.exists());
        assert_eq!(
            result.items[0].photo_path(PhotoRole::Box),
            Some(expected.as_path())
        );
    }

    #[test]
    fn moves_photo_when_asked() {
        let fx = fixture();
        let source = fx.temp.path().join("shot.jpg");
        fs::write(&source, b"jpeg").unwrap();

        let result = run(&fx.writer, &target(), PhotoRole::Product, &source, true).unwrap();
        assert!(!source.exists());
        assert!(result.paths[0].ends_with("product-AA100-2.jpg"));
    }

    #[test]
    fn missing_source_is_rejected() {
        let fx = fixture();
        let source = fx.temp.path().join("nope.jpg");
        assert!(run(&fx.writer, &target(), PhotoRole::Box, &source, false).is_err());
    }
}

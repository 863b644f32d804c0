use crate::commands::{CmdMessage, CmdResult, ItemTarget};
use crate::error::{DefectError, Result};
use crate::evidence::{parse_evidence_text, text_file_name, EvidenceWriter};
use crate::model::DefectNote;
use crate::roots::resolver::PathResolver;
use std::fs;
use std::path::PathBuf;

/// Writes the trilingual evidence text and marks the item completed.
pub fn run(writer: &EvidenceWriter, target: &ItemTarget, note: &DefectNote) -> Result<CmdResult> {
    target.validate()?;
    let mut item = target.item();
    let dir = writer.item_directory(
        &target.manufacturer_code,
        &target.date,
        target.category,
        &item,
    )?;
    let path = writer.write_evidence_text(&dir.path, &item, note)?;
    item.completed = true;

    let mut result = CmdResult::default();
    if dir.used_fallback {
        result.add_message(CmdMessage::warning(format!(
            "Stored under {} (not the browsable location)",
            dir.root.display()
        )));
    }
    result.add_message(CmdMessage::success(format!(
        "Evidence text written for {}",
        item.full_article_code()
    )));
    Ok(result.with_items(vec![item]).with_paths(vec![path]))
}

/// Reads an item's evidence text back. Looks under the session root first,
/// then under the fallback root. Never creates directories.
pub fn show(resolver: &PathResolver, target: &ItemTarget) -> Result<CmdResult> {
    target.validate()?;
    let item = target.item();
    let relative = PathBuf::from(&target.manufacturer_code)
        .join(&target.date)
        .join(target.category.dir_name())
        .join(item.full_article_code())
        .join(text_file_name(&item));

    let base = resolver.resolve_base_root()?;
    let fallback = resolver.environment().fallback().path;
    let path = [base, fallback]
        .iter()
        .map(|root| root.join(&relative))
        .find(|p| p.is_file())
        .ok_or_else(|| {
            DefectError::InvalidInput(format!(
                "No evidence text for {} in {}",
                item.full_article_code(),
                target.category.label()
            ))
        })?;

    let content = fs::read_to_string(&path).map_err(DefectError::Io)?;
    let stanzas = parse_evidence_text(&content)?;
    Ok(CmdResult::default()
        .with_stanzas(stanzas)
        .with_paths(vec![path]))
}

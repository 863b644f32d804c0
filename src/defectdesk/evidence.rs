//! # Evidence Files
//!
//! Every item directory holds up to three files:
//!
//! ```text
//! box-<article>-<n>.jpg
//! product-<article>-<n>.jpg
//! <article>-<n>.txt
//! ```
//!
//! The text file has three stanzas in a fixed order (Russian, Chinese, English),
//! each with the same four `Label: value` lines. All three are always written,
//! whatever language the operator uses, so anyone handling the goods can read it.

use crate::error::{DefectError, Result};
use crate::model::{DefectCategory, DefectNote, ItemRecord, PhotoRole};
use crate::roots::resolver::PathResolver;
use crate::roots::ResolvedDirectory;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Russian,
    Chinese,
    English,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Language::Russian => "ru",
            Language::Chinese => "zh",
            Language::English => "en",
        };
        f.write_str(code)
    }
}

struct StanzaLabels {
    language: Language,
    article: &'static str,
    reason: &'static str,
    template: &'static str,
    description: &'static str,
}

const STANZAS: [StanzaLabels; 3] = [
    StanzaLabels {
        language: Language::Russian,
        article: "Артикул",
        reason: "Причина",
        template: "Шаблон",
        description: "Описание",
    },
    StanzaLabels {
        language: Language::Chinese,
        article: "货号",
        reason: "原因",
        template: "模板",
        description: "描述",
    },
    StanzaLabels {
        language: Language::English,
        article: "Article",
        reason: "Reason",
        template: "Template",
        description: "Description",
    },
];

/// One language block read back from an evidence file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceStanza {
    pub language: Language,
    pub article_code: String,
    pub reason: String,
    pub template: String,
    pub description: String,
}

pub fn image_file_name(role: PhotoRole, item: &ItemRecord) -> String {
    format!("{}-{}.jpg", role.as_str(), item.full_article_code())
}

pub fn text_file_name(item: &ItemRecord) -> String {
    format!("{}.txt", item.full_article_code())
}

// Values stay on one line so every stanza is exactly four lines. Only line
// breaks are replaced; any other whitespace is kept as typed.
fn single_line(value: &str) -> String {
    value.replace("\r\n", " ").replace(&['\n', '\r'][..], " ")
}

pub fn render_evidence_text(item: &ItemRecord, note: &DefectNote) -> String {
    let article = item.full_article_code();
    let reason = single_line(&note.reason);
    let template = single_line(&note.template);
    let description = single_line(&note.description);

    let stanzas: Vec<String> = STANZAS
        .iter()
        .map(|labels| {
            format!(
                "{}: {}\n{}: {}\n{}: {}\n{}: {}",
                labels.article,
                article,
                labels.reason,
                reason,
                labels.template,
                template,
                labels.description,
                description
            )
        })
        .collect();
    format!("{}\n", stanzas.join("\n\n"))
}

pub fn parse_evidence_text(text: &str) -> Result<Vec<EvidenceStanza>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let blocks: Vec<&str> = text
        .trim_end_matches('\n')
        .split("\n\n")
        .filter(|b| !b.trim().is_empty())
        .collect();
    if blocks.len() != STANZAS.len() {
        return Err(DefectError::InvalidInput(format!(
            "evidence text has {} stanzas, expected {}",
            blocks.len(),
            STANZAS.len()
        )));
    }

    blocks
        .iter()
        .zip(STANZAS.iter())
        .map(|(block, labels)| {
            let mut values = Vec::with_capacity(4);
            let lines: Vec<&str> = block.lines().collect();
            let expected = [
                labels.article,
                labels.reason,
                labels.template,
                labels.description,
            ];
            if lines.len() != expected.len() {
                return Err(DefectError::InvalidInput(format!(
                    "{} stanza has {} lines, expected 4",
                    labels.language,
                    lines.len()
                )));
            }
            for (line, label) in lines.iter().zip(expected) {
                let value = line
                    .strip_prefix(label)
                    .and_then(|rest| rest.strip_prefix(':'))
                    .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
                    .ok_or_else(|| {
                        DefectError::InvalidInput(format!(
                            "{} stanza: expected '{}:' in '{}'",
                            labels.language, label, line
                        ))
                    })?;
                values.push(value.to_string());
            }
            let mut values = values.into_iter();
            let mut next = || values.next().unwrap_or_default();
            Ok(EvidenceStanza {
                language: labels.language,
                article_code: next(),
                reason: next(),
                template: next(),
                description: next(),
            })
        })
        .collect()
}

/// Places photos and writes the evidence text for items.
pub struct EvidenceWriter {
    resolver: Arc<PathResolver>,
}

impl EvidenceWriter {
    pub fn new(resolver: Arc<PathResolver>) -> Self {
        Self { resolver }
    }

    /// Resolves (and creates) the directory for one item.
    pub fn item_directory(
        &self,
        manufacturer_code: &str,
        date: &str,
        category: DefectCategory,
        item: &ItemRecord,
    ) -> Result<ResolvedDirectory> {
        let dir = self.resolver.resolve_item_directory(
            manufacturer_code,
            date,
            category,
            &item.full_article_code(),
        )?;
        if dir.used_fallback {
            warn!(
                item = %item.full_article_code(),
                path = %dir.path.display(),
                "Item stored under fallback root"
            );
        }
        Ok(dir)
    }

    /// Writes a photo, replacing any previous photo for the same role.
    pub fn write_image(
        &self,
        item_dir: &Path,
        role: PhotoRole,
        item: &ItemRecord,
        bytes: &[u8],
    ) -> Result<PathBuf> {
        let target = item_dir.join(image_file_name(role, item));
        clear_target(&target)?;
        fs::write(&target, bytes).map_err(DefectError::Io)?;
        info!(path = %target.display(), bytes = bytes.len(), "Photo written");
        Ok(target)
    }

    /// Moves a captured file into place, copying when a rename is not possible.
    pub fn place_image(
        &self,
        item_dir: &Path,
        role: PhotoRole,
        item: &ItemRecord,
        source: &Path,
    ) -> Result<PathBuf> {
        if !source.is_file() {
            return Err(DefectError::InvalidInput(format!(
                "photo source {} is not a file",
                source.display()
            )));
        }
        let target = item_dir.join(image_file_name(role, item));
        if target == source {
            return Ok(target);
        }
        clear_target(&target)?;

        if let Err(e) = fs::rename(source, &target) {
            debug!(error = %e, source = %source.display(), "Rename failed, copying photo instead");
            fs::copy(source, &target).map_err(DefectError::Io)?;
            if let Err(e) = fs::remove_file(source) {
                warn!(error = %e, source = %source.display(), "Could not remove photo source after copy");
            }
        }
        info!(path = %target.display(), "Photo placed");
        Ok(target)
    }

    /// Writes `<article>-<n>.txt`. The caller marks the item completed on success.
    pub fn write_evidence_text(
        &self,
        item_dir: &Path,
        item: &ItemRecord,
        note: &DefectNote,
    ) -> Result<PathBuf> {
        let target = item_dir.join(text_file_name(item));
        if target.is_dir() {
            return Err(DefectError::PathConflict(target));
        }
        let content = render_evidence_text(item, note);

        let tmp = item_dir.join(format!(".evidence-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, content.as_bytes()).map_err(DefectError::Io)?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(DefectError::Io(e));
        }
        info!(path = %target.display(), "Evidence text written");
        Ok(target)
    }
}

fn clear_target(target: &Path) -> Result<()> {
    if target.is_dir() {
        return Err(DefectError::PathConflict(target.to_path_buf()));
    }
    if target.exists() {
        fs::remove_file(target).map_err(DefectError::Io)?;
    }
    Ok(())
}

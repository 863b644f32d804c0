use crate::config::DefectConfig;
use crate::error::{DefectError, Result};
use crate::evidence::EvidenceStanza;
use crate::model::{
    validate_article_code, validate_date, validate_manufacturer_code, DefectCategory, ItemRecord,
    ReceptionRecord, MAX_QUANTITY,
};
use crate::roots::probe::ProbeReport;
use std::path::PathBuf;

pub mod add;
pub mod config;
pub mod doctor;
pub mod list;
pub mod note;
pub mod photo;
pub mod prepare;
pub mod probe;

/// Addresses one item: reception, defect category, article and index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTarget {
    pub manufacturer_code: String,
    pub date: String,
    pub category: DefectCategory,
    pub article_code: String,
    pub index: u32,
}

impl ItemTarget {
    pub fn new(
        manufacturer_code: impl Into<String>,
        date: impl Into<String>,
        category: DefectCategory,
        article_code: impl Into<String>,
        index: u32,
    ) -> Self {
        Self {
            manufacturer_code: manufacturer_code.into(),
            date: date.into(),
            category,
            article_code: article_code.into(),
            index,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_manufacturer_code(&self.manufacturer_code)?;
        validate_date(&self.date)?;
        validate_article_code(&self.article_code)?;
        if !(1..=MAX_QUANTITY).contains(&self.index) {
            return Err(DefectError::InvalidInput(format!(
                "item index must be 1-{}, got {}",
                MAX_QUANTITY, self.index
            )));
        }
        Ok(())
    }

    pub fn item(&self) -> ItemRecord {
        ItemRecord::new(self.article_code.clone(), self.index)
    }
}

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub receptions: Vec<ReceptionRecord>,
    pub items: Vec<ItemRecord>,
    pub paths: Vec<PathBuf>,
    pub probe: Option<ProbeReport>,
    pub stanzas: Vec<EvidenceStanza>,
    pub config: Option<DefectConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_receptions(mut self, receptions: Vec<ReceptionRecord>) -> Self {
        self.receptions = receptions;
        self
    }

    pub fn with_items(mut self, items: Vec<ItemRecord>) -> Self {
        self.items = items;
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_probe(mut self, probe: ProbeReport) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn with_stanzas(mut self, stanzas: Vec<EvidenceStanza>) -> Self {
        self.stanzas = stanzas;
        self
    }

    pub fn with_config(mut self, config: DefectConfig) -> Self {
        self.config = Some(config);
        self
    }
}

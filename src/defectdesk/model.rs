use crate::error::{DefectError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

/// Textual date format used for reception directories and records.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

pub const MAX_QUANTITY: u32 = 10;

/// One inspection batch: a manufacturer code and a date.
///
/// Two records with the same [`ReceptionKey`] are the same reception even when
/// their ids differ (ids are regenerated every time the scanner synthesizes one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionRecord {
    pub id: Uuid,
    pub manufacturer_code: String,
    pub date: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl ReceptionRecord {
    pub fn new(manufacturer_code: impl Into<String>, date: impl Into<String>) -> Self {
        Self::with_created_at(manufacturer_code, date, Utc::now())
    }

    pub fn with_created_at(
        manufacturer_code: impl Into<String>,
        date: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            manufacturer_code: manufacturer_code.into(),
            date: date.into(),
            created_at: millis_precision(created_at),
        }
    }

    pub fn key(&self) -> ReceptionKey {
        ReceptionKey {
            manufacturer_code: self.manufacturer_code.clone(),
            date: self.date.clone(),
        }
    }
}

/// Deduplication identity of a reception.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReceptionKey {
    pub manufacturer_code: String,
    pub date: String,
}

impl fmt::Display for ReceptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.manufacturer_code, self.date)
    }
}

// The catalog stores milliseconds; keep in-memory values at the same precision
// so freshly built and reloaded records compare equal.
fn millis_precision(t: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(t.timestamp_millis()).unwrap_or(t)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DefectCategory {
    #[default]
    Minor,
    Wear,
    Rejected,
}

impl DefectCategory {
    pub const ALL: [DefectCategory; 3] = [Self::Minor, Self::Wear, Self::Rejected];

    pub fn code(self) -> u8 {
        match self {
            DefectCategory::Minor => 1,
            DefectCategory::Wear => 2,
            DefectCategory::Rejected => 3,
        }
    }

    pub fn from_code(code: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| {
                DefectError::InvalidInput(format!("defect category must be 1-3, got {}", code))
            })
    }

    pub fn label(self) -> &'static str {
        match self {
            DefectCategory::Minor => "minor defect",
            DefectCategory::Wear => "wear/scuffs",
            DefectCategory::Rejected => "rejected/defective",
        }
    }

    pub fn dir_name(self) -> String {
        self.code().to_string()
    }
}

impl fmt::Display for DefectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotoRole {
    Box,
    Product,
}

impl PhotoRole {
    pub fn as_str(self) -> &'static str {
        match self {
            PhotoRole::Box => "box",
            PhotoRole::Product => "product",
        }
    }
}

impl fmt::Display for PhotoRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhotoRole {
    type Err = DefectError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "box" => Ok(PhotoRole::Box),
            "product" => Ok(PhotoRole::Product),
            other => Err(DefectError::InvalidInput(format!(
                "photo role must be 'box' or 'product', got '{}'",
                other
            ))),
        }
    }
}

/// One documented unit within a reception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub article_code: String,
    pub index: u32,
    pub box_photo_path: Option<PathBuf>,
    pub product_photo_path: Option<PathBuf>,
    pub completed: bool,
}

impl ItemRecord {
    pub fn new(article_code: impl Into<String>, index: u32) -> Self {
        Self {
            article_code: article_code.into(),
            index,
            box_photo_path: None,
            product_photo_path: None,
            completed: false,
        }
    }

    /// Expands one scanned article into `quantity` items indexed `1..=quantity`.
    pub fn expand(article_code: &str, quantity: u32) -> Result<Vec<ItemRecord>> {
        validate_article_code(article_code)?;
        if !(1..=MAX_QUANTITY).contains(&quantity) {
            return Err(DefectError::InvalidInput(format!(
                "quantity must be 1-{}, got {}",
                MAX_QUANTITY, quantity
            )));
        }
        Ok((1..=quantity)
            .map(|index| ItemRecord::new(article_code, index))
            .collect())
    }

    pub fn full_article_code(&self) -> String {
        format!("{}-{}", self.article_code, self.index)
    }

    pub fn photo_path(&self, role: PhotoRole) -> Option<&Path> {
        match role {
            PhotoRole::Box => self.box_photo_path.as_deref(),
            PhotoRole::Product => self.product_photo_path.as_deref(),
        }
    }

    pub fn set_photo_path(&mut self, role: PhotoRole, path: PathBuf) {
        match role {
            PhotoRole::Box => self.box_photo_path = Some(path),
            PhotoRole::Product => self.product_photo_path = Some(path),
        }
    }
}

/// Free-text defect description captured by the inspector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefectNote {
    pub reason: String,
    pub template: String,
    pub description: String,
}

impl DefectNote {
    pub fn new(
        reason: impl Into<String>,
        template: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            reason: reason.into(),
            template: template.into(),
            description: description.into(),
        }
    }
}

pub fn validate_manufacturer_code(code: &str) -> Result<()> {
    if code.len() == 4 && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(DefectError::InvalidInput(format!(
            "manufacturer code must be exactly 4 digits, got '{}'",
            code
        )))
    }
}

pub fn validate_date(date: &str) -> Result<NaiveDate> {
    parse_reception_date(date).ok_or_else(|| {
        DefectError::InvalidInput(format!("date must be dd-mm-yyyy, got '{}'", date))
    })
}

pub fn validate_article_code(code: &str) -> Result<()> {
    validate_path_segment(code)
}

/// Rejects names that would not land as exactly one directory level.
pub fn validate_path_segment(segment: &str) -> Result<()> {
    let invalid = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control());
    if invalid {
        return Err(DefectError::InvalidInput(format!(
            "'{}' cannot be used as a directory name",
            segment
        )));
    }
    Ok(())
}

/// Strict `dd-mm-yyyy` parse: exact shape, zero-padded fields, real calendar date.
pub fn parse_reception_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        2 | 5 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

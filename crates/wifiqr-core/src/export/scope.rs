//! Export scope and format selection

use crate::error::{RecordIssue, Result, WifiQrError};
use crate::model::{NetworkRecord, RecordCollection};
use std::fmt;
use std::str::FromStr;

/// Which records an export covers
#[derive(Debug, Clone)]
pub enum ExportScope<'a> {
    /// The record currently being edited
    Single(&'a NetworkRecord),
    /// A user selection, in selection order
    Selected(Vec<&'a NetworkRecord>),
    /// Every record of a collection
    All(&'a [NetworkRecord]),
}

impl<'a> ExportScope<'a> {
    /// Every record of a collection
    pub fn all(collection: &'a RecordCollection) -> Self {
        ExportScope::All(collection.records())
    }

    /// Records at the given positions of a collection
    pub fn selected(collection: &'a RecordCollection, indices: &[usize]) -> Result<Self> {
        Ok(ExportScope::Selected(collection.select(indices)?))
    }

    /// Whether this scope names one record explicitly
    pub fn is_single(&self) -> bool {
        matches!(self, ExportScope::Single(_))
    }

    /// Snapshot the records this scope covers
    pub fn resolve(&self) -> Vec<NetworkRecord> {
        match self {
            ExportScope::Single(record) => vec![(*record).clone()],
            ExportScope::Selected(records) => records.iter().map(|r| (*r).clone()).collect(),
            ExportScope::All(records) => records.to_vec(),
        }
    }
}

/// Check a resolved scope, reporting every invalid record at once
pub fn validate_records(records: &[NetworkRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(WifiQrError::Validation("No networks to export".to_string()));
    }

    let issues: Vec<RecordIssue> = records
        .iter()
        .enumerate()
        .flat_map(|(position, record)| {
            record.problems().into_iter().map(move |message| RecordIssue {
                position,
                ssid: record.ssid.clone(),
                message,
            })
        })
        .collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(WifiQrError::RecordsInvalid(issues))
    }
}

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Png,
    Pdf,
    /// Windows connect script
    Script,
    /// Apple configuration profile
    Profile,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Png,
        ExportFormat::Pdf,
        ExportFormat::Script,
        ExportFormat::Profile,
    ];

    /// Format name
    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Script => "script",
            ExportFormat::Profile => "profile",
        }
    }

    /// File extension of the artifacts
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Script => "cmd",
            ExportFormat::Profile => "mobileconfig",
        }
    }

    /// Whether one artifact is produced per record
    pub fn is_per_record(self) -> bool {
        matches!(self, ExportFormat::Png | ExportFormat::Pdf)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = WifiQrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "pdf" => Ok(ExportFormat::Pdf),
            "script" | "cmd" | "windows" | "windows-script" => Ok(ExportFormat::Script),
            "profile" | "mobileconfig" | "macos" | "macos-profile" => Ok(ExportFormat::Profile),
            other => Err(WifiQrError::Validation(format!("Unknown export format: {}", other))),
        }
    }
}

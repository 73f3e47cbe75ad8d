//! Exporter trait and manager

use super::render::{compose_page, render_qr, Container, ErrorCorrection, PageEncoder, QrRenderer};
use super::scope::{validate_records, ExportFormat, ExportScope};
use crate::error::{Result, WifiQrError};
use crate::model::NetworkRecord;
use crate::{profile, script};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Options shared by every export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Print the location above QR images
    pub include_header: bool,
    pub error_correction: ErrorCorrection,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_header: true,
            error_correction: ErrorCorrection::High,
        }
    }
}

/// Per-call context handed to an exporter
#[derive(Debug, Clone, Copy)]
pub struct ExportContext {
    pub options: ExportOptions,
    /// Batch exports use batch file names even for one record
    pub batch: bool,
}

/// One output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Everything an export produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub format: ExportFormat,
    pub artifacts: Vec<Artifact>,
}

impl ExportResult {
    pub fn file_names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.file_name.as_str()).collect()
    }
}

/// Trait for format exporters
///
/// Records handed to an exporter have already been validated.
pub trait Exporter: Send + Sync {
    /// Export records to artifacts
    fn export(&self, records: &[NetworkRecord], ctx: &ExportContext) -> Result<Vec<Artifact>>;

    /// Get the format handled
    fn format(&self) -> ExportFormat;
}

/// Windows connect script exporter
pub struct ScriptExporter;

impl Exporter for ScriptExporter {
    fn export(&self, records: &[NetworkRecord], ctx: &ExportContext) -> Result<Vec<Artifact>> {
        let script = script::generate(records)?;
        let file_name = if ctx.batch { "wifi-batch.cmd" } else { "connect-wifi.cmd" };
        Ok(vec![Artifact {
            file_name: file_name.to_string(),
            bytes: script.content.into_bytes(),
        }])
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Script
    }
}

/// Apple configuration profile exporter
pub struct ProfileExporter;

impl Exporter for ProfileExporter {
    fn export(&self, records: &[NetworkRecord], ctx: &ExportContext) -> Result<Vec<Artifact>> {
        let profile = profile::generate(records)?;
        let file_name = if ctx.batch {
            "wifi-batch.mobileconfig"
        } else {
            "wifi-profile.mobileconfig"
        };
        Ok(vec![Artifact {
            file_name: file_name.to_string(),
            bytes: profile.content.into_bytes(),
        }])
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Profile
    }
}

/// PNG or PDF exporter, one page per record
pub struct QrImageExporter {
    container: Container,
    renderer: Arc<dyn QrRenderer>,
    encoder: Arc<dyn PageEncoder>,
}

impl QrImageExporter {
    pub fn new(container: Container, renderer: Arc<dyn QrRenderer>, encoder: Arc<dyn PageEncoder>) -> Self {
        Self {
            container,
            renderer,
            encoder,
        }
    }
}

impl Exporter for QrImageExporter {
    fn export(&self, records: &[NetworkRecord], ctx: &ExportContext) -> Result<Vec<Artifact>> {
        let extension = self.format().extension();
        let mut names = UniqueNames::default();
        let mut artifacts = Vec::with_capacity(records.len());

        for record in records {
            let qr = render_qr(record, self.renderer.as_ref(), ctx.options.error_correction)?;
            let page = compose_page(record, qr, ctx.options.include_header);
            let bytes = self.encoder.encode(&page, self.container)?;

            let stem = if ctx.batch {
                sanitize_filename(&record.ssid)
            } else {
                "wifi-qr".to_string()
            };
            artifacts.push(Artifact {
                file_name: names.claim(&stem, extension),
                bytes,
            });
        }

        Ok(artifacts)
    }

    fn format(&self) -> ExportFormat {
        match self.container {
            Container::Png => ExportFormat::Png,
            Container::Pdf => ExportFormat::Pdf,
        }
    }
}

/// Manager for handling multiple export formats
pub struct ExportManager {
    exporters: HashMap<ExportFormat, Box<dyn Exporter>>,
}

impl ExportManager {
    /// Create a manager with the text exporters (script and profile)
    pub fn new() -> Self {
        let mut manager = Self {
            exporters: HashMap::new(),
        };
        manager.register(Box::new(ScriptExporter));
        manager.register(Box::new(ProfileExporter));
        manager
    }

    /// Create a manager that can also produce PNG and PDF
    pub fn with_renderer(renderer: Arc<dyn QrRenderer>, encoder: Arc<dyn PageEncoder>) -> Self {
        let mut manager = Self::new();
        manager.register(Box::new(QrImageExporter::new(
            Container::Png,
            Arc::clone(&renderer),
            Arc::clone(&encoder),
        )));
        manager.register(Box::new(QrImageExporter::new(Container::Pdf, renderer, encoder)));
        manager
    }

    /// Register a new exporter, replacing any for the same format
    pub fn register(&mut self, exporter: Box<dyn Exporter>) {
        self.exporters.insert(exporter.format(), exporter);
    }

    /// Export the records of a scope
    ///
    /// Every record is checked before anything is generated; if any fail, the
    /// error lists all of them and no artifact is returned.
    pub fn export(
        &self,
        scope: &ExportScope<'_>,
        format: ExportFormat,
        options: &ExportOptions,
    ) -> Result<ExportResult> {
        let exporter = self.exporters.get(&format).ok_or_else(|| {
            WifiQrError::Validation(format!("Export format not available: {}", format))
        })?;

        let records = scope.resolve();
        validate_records(&records)?;

        let ctx = ExportContext {
            options: *options,
            batch: !scope.is_single(),
        };
        debug!(format = %format, networks = records.len(), batch = ctx.batch, "Exporting");

        let artifacts = exporter.export(&records, &ctx)?;
        if artifacts.is_empty() {
            return Err(WifiQrError::Encoding(format!(
                "{} exporter produced no output",
                format
            )));
        }

        info!(format = %format, files = artifacts.len(), "Export generated");
        Ok(ExportResult { format, artifacts })
    }

    /// Get list of available formats
    pub fn available_formats(&self) -> Vec<ExportFormat> {
        ExportFormat::ALL
            .into_iter()
            .filter(|f| self.exporters.contains_key(f))
            .collect()
    }

    /// Check if a format is available
    pub fn has_format(&self, format: ExportFormat) -> bool {
        self.exporters.contains_key(&format)
    }
}

impl Default for ExportManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Filesystem-safe file stem from a label
pub fn sanitize_filename(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "wifi".to_string()
    } else {
        cleaned
    }
}

/// Hands out file names, suffixing `-2`, `-3`, ... on collisions
#[derive(Default)]
struct UniqueNames {
    taken: HashSet<String>,
}

impl UniqueNames {
    fn claim(&mut self, stem: &str, extension: &str) -> String {
        let mut candidate = format!("{}.{}", stem, extension);
        let mut n = 2;
        while self.taken.contains(&candidate.to_lowercase()) {
            candidate = format!("{}-{}.{}", stem, n, extension);
            n += 1;
        }
        self.taken.insert(candidate.to_lowercase());
        candidate
    }
}

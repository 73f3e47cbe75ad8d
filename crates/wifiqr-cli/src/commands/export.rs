//! Export command
//!
//! Export saved or inline networks as QR images, a connect script or a profile.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

use super::{to_index, RecordArgs};
use wifiqr_core::config::Config;
use wifiqr_core::export::{self, ErrorCorrection, ExportOptions, ExportScope};
use wifiqr_core::{NetworkRecord, RecordCollection};
use wifiqr_storage::{ArtifactWriter, CollectionStore};

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// QR code as a PNG image, one file per network
    Png,
    /// QR code as a one-page PDF, one file per network
    Pdf,
    /// Windows connect script (.cmd)
    Script,
    /// Apple configuration profile (.mobileconfig)
    Profile,
}

impl From<ExportFormat> for export::ExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Png => export::ExportFormat::Png,
            ExportFormat::Pdf => export::ExportFormat::Pdf,
            ExportFormat::Script => export::ExportFormat::Script,
            ExportFormat::Profile => export::ExportFormat::Profile,
        }
    }
}

/// Arguments for the export command
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Export format (defaults to export.default_format)
    #[arg(long, short = 'F', value_enum)]
    pub format: Option<ExportFormat>,

    /// Collection file (defaults to storage.collection_path)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Export one saved network (1-based position)
    #[arg(long, conflicts_with_all = ["select", "all", "ssid"])]
    pub index: Option<usize>,

    /// Export these saved networks, in this order (e.g. 1,3)
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["all", "ssid"])]
    pub select: Vec<usize>,

    /// Export every saved network (the default)
    #[arg(long, conflicts_with = "ssid")]
    pub all: bool,

    /// Export a network given on the command line instead of a saved one
    #[command(flatten)]
    pub record: RecordArgs,

    /// Directory to write into (defaults to export.output_dir)
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Print the location above QR codes
    #[arg(long, overrides_with = "no_header")]
    pub header: bool,

    /// Leave the location header off
    #[arg(long, overrides_with = "header")]
    pub no_header: bool,

    /// Fail instead of replacing existing files
    #[arg(long)]
    pub keep_existing: bool,
}

impl ExportArgs {
    fn include_header(&self, config: &Config) -> bool {
        if self.no_header {
            false
        } else if self.header {
            true
        } else {
            config.export.include_header
        }
    }

    fn format(&self, config: &Config) -> Result<export::ExportFormat> {
        match self.format {
            Some(format) => Ok(format.into()),
            None => config
                .export
                .default_format
                .parse::<export::ExportFormat>()
                .context("Invalid export.default_format in config"),
        }
    }
}

/// Execute the export command
pub fn execute(args: ExportArgs, config: &Config) -> Result<()> {
    use colored::Colorize;

    let format = args.format(config)?;
    let options = ExportOptions {
        include_header: args.include_header(config),
        error_correction: ErrorCorrection::High,
    };

    let inline: NetworkRecord;
    let collection: RecordCollection;
    let scope = if args.record.ssid.is_some() {
        inline = args.record.to_record()?;
        ExportScope::Single(&inline)
    } else {
        let path = args
            .file
            .clone()
            .unwrap_or_else(|| config.storage.collection_path.clone());
        collection = CollectionStore::new(&path)
            .load_or_default()
            .with_context(|| format!("Failed to load networks from {}", path.display()))?;

        if let Some(position) = args.index {
            let index = to_index(position)?;
            let record = collection
                .get(index)
                .with_context(|| format!("No network #{} ({} saved)", position, collection.len()))?;
            ExportScope::Single(record)
        } else if !args.select.is_empty() {
            let indices = args
                .select
                .iter()
                .map(|&p| to_index(p))
                .collect::<Result<Vec<_>>>()?;
            ExportScope::selected(&collection, &indices)?
        } else {
            ExportScope::all(&collection)
        }
    };

    debug!(format = %format, header = options.include_header, "Resolved export request");
    let manager = wifiqr_render::export_manager(config)?;
    let result = match manager.export(&scope, format, &options) {
        Ok(result) => result,
        Err(err) => {
            for issue in err.record_issues() {
                eprintln!("{} {}", "✗".red(), issue);
            }
            return Err(err.into());
        }
    };

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.export.output_dir.clone());
    let paths = ArtifactWriter::new(output_dir)
        .overwrite(!args.keep_existing)
        .write(&result)?;

    for path in &paths {
        println!("{} {}", "✓".green(), path.display());
    }
    println!(
        "Exported {} file(s) as {}.",
        paths.len().to_string().cyan(),
        format
    );
    Ok(())
}

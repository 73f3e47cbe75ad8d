//! Writes export artifacts into an output directory

use crate::collection_store::{commit, write_temp};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use wifiqr_core::error::{Result, WifiQrError};
use wifiqr_core::export::ExportResult;

/// Writes every artifact of an export, or none of them
///
/// All artifacts are staged as temp files first. Only when every one of them
/// was written are they renamed into place. Files being replaced are moved
/// aside until the last rename succeeds, so a failed rename puts earlier
/// targets back the way they were. Restoring is best effort; anything that
/// cannot be put back is logged.
pub struct ArtifactWriter {
    output_dir: PathBuf,
    overwrite: bool,
}

impl ArtifactWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            overwrite: true,
        }
    }

    /// Refuse to replace existing files when `false`
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write all artifacts and return their final paths, in artifact order
    pub fn write(&self, result: &ExportResult) -> Result<Vec<PathBuf>> {
        let targets: Vec<PathBuf> = result
            .artifacts
            .iter()
            .map(|a| self.output_dir.join(&a.file_name))
            .collect();

        if !self.overwrite {
            if let Some(existing) = targets.iter().find(|p| p.exists()) {
                return Err(WifiQrError::Io(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    format!("{} already exists", existing.display()),
                )));
            }
        }

        fs::create_dir_all(&self.output_dir)?;

        let mut staged = Vec::with_capacity(targets.len());
        for (artifact, target) in result.artifacts.iter().zip(&targets) {
            match write_temp(target, &artifact.bytes) {
                Ok(temp) => staged.push(temp),
                Err(e) => {
                    discard(&staged);
                    return Err(e.with_context(format!("Failed to write {}", target.display())));
                }
            }
        }
        debug!("Staged {} artifact(s) in {:?}", staged.len(), self.output_dir);

        let mut replaced = Vec::with_capacity(targets.len());
        for (i, (temp, target)) in staged.iter().zip(&targets).enumerate() {
            match replace(temp, target) {
                Ok(done) => replaced.push(done),
                Err(e) => {
                    discard(&staged[i..]);
                    roll_back(&replaced);
                    return Err(e.with_context(format!("Failed to write {}", target.display())));
                }
            }
        }
        for done in &replaced {
            if let Some(backup) = &done.backup {
                if let Err(e) = fs::remove_file(backup) {
                    warn!("Could not remove backup {:?}: {}", backup, e);
                }
            }
        }

        info!(
            format = %result.format,
            files = targets.len(),
            "Wrote export to {:?}",
            self.output_dir
        );
        Ok(targets)
    }
}

/// A target now holding new bytes, and where its old file went
struct Replaced {
    target: PathBuf,
    backup: Option<PathBuf>,
}

fn backup_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "wifiqr".to_string());
    path.with_file_name(format!(".{}.bak", name))
}

/// Move an existing target aside, then rename the temp file over it
fn replace(temp: &Path, target: &Path) -> Result<Replaced> {
    let backup = if target.exists() {
        let backup = backup_path(target);
        fs::rename(target, &backup)?;
        Some(backup)
    } else {
        None
    };

    if let Err(e) = commit(temp, target) {
        if let Some(backup) = &backup {
            restore(backup, target);
        }
        return Err(e);
    }
    Ok(Replaced {
        target: target.to_path_buf(),
        backup,
    })
}

fn restore(backup: &Path, target: &Path) {
    if let Err(e) = fs::rename(backup, target) {
        warn!("Could not restore {:?} from {:?}: {}", target, backup, e);
    }
}

fn roll_back(replaced: &[Replaced]) {
    for done in replaced.iter().rev() {
        if let Err(e) = fs::remove_file(&done.target) {
            warn!("Could not remove {:?}: {}", done.target, e);
        }
        if let Some(backup) = &done.backup {
            restore(backup, &done.target);
        }
    }
}

fn discard(temps: &[PathBuf]) {
    for temp in temps {
        match fs::remove_file(temp) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not remove temp file {:?}: {}", temp, e),
        }
    }
}

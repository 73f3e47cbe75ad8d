//! Config command
//!
//! Manage wifiqr configuration.

use anyhow::{bail, Result};
use clap::Subcommand;
use std::fs;
use std::path::Path;

use wifiqr_core::config::Config;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reset to default configuration
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration
    Validate,

    /// Print the configuration file path
    Path,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, path: &Path) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(path, json),
        ConfigCommand::Reset { force } => reset_config(path, force),
        ConfigCommand::Validate => validate_config(path),
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn show_config(path: &Path, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let config = Config::load(path)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if path.exists() {
        println!("{}", path.display().to_string().dimmed());
    } else {
        println!(
            "{}",
            format!("{} (not found, showing defaults)", path.display()).dimmed()
        );
    }
    println!();
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}

fn reset_config(path: &Path, force: bool) -> Result<()> {
    use colored::Colorize;

    if !force && path.exists() {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt("Reset configuration to defaults?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    if path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    Config::default().save(path)?;

    println!(
        "{} Configuration reset to defaults at {}.",
        "✓".green(),
        path.display()
    );

    Ok(())
}

fn validate_config(path: &Path) -> Result<()> {
    use colored::Colorize;

    if !path.exists() {
        println!(
            "{} No configuration at {}, defaults are in use.",
            "ℹ".blue(),
            path.display()
        );
        return Ok(());
    }

    match Config::load(path) {
        Ok(_) => {
            println!("{} Configuration is valid", "✓".green());
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            bail!("Invalid configuration at {}", path.display())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reset_writes_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        reset_config(&path, true).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.qr.size, 640);
    }

    #[test]
    fn test_reset_backs_up_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[qr]\nsize = 300\n").unwrap();

        reset_config(&path, true).unwrap();

        let backups: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("config.toml.backup-"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert!(fs::read_to_string(backups[0].path()).unwrap().contains("size = 300"));
        assert_eq!(Config::load(&path).unwrap().qr.size, 640);
    }

    #[test]
    fn test_validate_rejects_bad_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[qr]\nsize = 1\n").unwrap();

        assert!(validate_config(&path).is_err());
    }
}

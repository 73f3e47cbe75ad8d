//! Network command
//!
//! Manage the saved network list.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use super::{parse_security, read_image, to_index, RecordArgs};
use wifiqr_core::codec::RecordEntry;
use wifiqr_core::config::Config;
use wifiqr_core::{payload, NetworkRecord, RecordCollection};
use wifiqr_storage::CollectionStore;

/// Arguments for the network command
#[derive(Debug, Args)]
pub struct NetworkArgs {
    /// Collection file (defaults to storage.collection_path)
    #[arg(long, short = 'f', global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: NetworkCommand,
}

/// Network subcommands
#[derive(Debug, Subcommand)]
pub enum NetworkCommand {
    /// Add a network
    Add {
        #[command(flatten)]
        record: RecordArgs,

        /// Insert at this position instead of appending
        #[arg(long)]
        at: Option<usize>,
    },

    /// List saved networks
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one network
    Show {
        /// Network position (1-based)
        position: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change fields of a network
    Update {
        /// Network position (1-based)
        position: usize,

        #[command(flatten)]
        changes: UpdateArgs,
    },

    /// Remove a network
    Remove {
        /// Network position (1-based)
        position: usize,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Find networks by SSID or location
    Search {
        /// Text to look for (case-insensitive)
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Fields to change; anything not given is kept
#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub ssid: Option<String>,

    #[arg(long, short = 'p')]
    pub password: Option<String>,

    #[arg(long, short = 's')]
    pub security: Option<String>,

    #[arg(long)]
    pub hidden: Option<bool>,

    #[arg(long, short = 'l')]
    pub location: Option<String>,

    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Drop the center image
    #[arg(long, conflicts_with = "image")]
    pub no_image: bool,
}

impl UpdateArgs {
    fn apply(&self, mut record: NetworkRecord) -> Result<NetworkRecord> {
        if let Some(ssid) = &self.ssid {
            record.ssid = ssid.clone();
        }
        if let Some(password) = &self.password {
            record.password = password.clone();
        }
        if let Some(security) = &self.security {
            record.security = parse_security(security)?;
        }
        if let Some(hidden) = self.hidden {
            record.hidden = hidden;
        }
        if let Some(location) = &self.location {
            record.location = location.clone();
        }
        if let Some(path) = &self.image {
            record.center_image = Some(read_image(path)?);
        }
        if self.no_image {
            record.center_image = None;
        }
        Ok(record)
    }
}

/// Execute the network command
pub fn execute(args: NetworkArgs, config: &Config) -> Result<()> {
    let path = args
        .file
        .clone()
        .unwrap_or_else(|| config.storage.collection_path.clone());
    debug!("Using collection file {:?}", path);
    let store = CollectionStore::new(path);

    match args.command {
        NetworkCommand::Add { record, at } => add_network(&store, &record, at),
        NetworkCommand::List { json } => list_networks(&store, json),
        NetworkCommand::Show { position, json } => show_network(&store, position, json),
        NetworkCommand::Update { position, changes } => update_network(&store, position, &changes),
        NetworkCommand::Remove { position, yes } => remove_network(&store, position, yes),
        NetworkCommand::Search { query, json } => search_networks(&store, &query, json),
    }
}

fn load(store: &CollectionStore) -> Result<RecordCollection> {
    store
        .load_or_default()
        .with_context(|| format!("Failed to load networks from {}", store.path().display()))
}

fn add_network(store: &CollectionStore, args: &RecordArgs, at: Option<usize>) -> Result<()> {
    use colored::Colorize;

    let record = args.to_record()?;
    record.validate()?;

    let mut collection = load(store)?;
    if collection.find_ssid(&record.ssid).is_some() {
        eprintln!(
            "{} A network named '{}' is already saved.",
            "⚠".yellow(),
            record.ssid
        );
    }

    let position = match at {
        Some(position) => {
            let index = to_index(position)?;
            collection.insert(index, record.clone())?;
            position
        }
        None => {
            collection.push(record.clone());
            collection.len()
        }
    };
    store.save(&collection)?;

    println!(
        "{} Added '{}' as #{}.",
        "✓".green(),
        record.ssid,
        position
    );
    Ok(())
}

fn print_row(position: usize, record: &NetworkRecord) {
    use colored::Colorize;

    let mut line = format!(
        "  {:>3}. {}  {}",
        position,
        record.ssid.green(),
        record.security.label().cyan()
    );
    if record.hidden {
        line.push_str(&format!("  {}", "hidden".yellow()));
    }
    if record.center_image.is_some() {
        line.push_str(&format!("  {}", "image".blue()));
    }
    if !record.location.trim().is_empty() {
        line.push_str(&format!("  {}", format!("({})", record.location.trim()).dimmed()));
    }
    println!("{}", line);
}

fn print_json<'a>(records: impl Iterator<Item = &'a NetworkRecord>) -> Result<()> {
    let entries: Vec<RecordEntry> = records.map(RecordEntry::from_record).collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn list_networks(store: &CollectionStore, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let collection = load(store)?;

    if as_json {
        return print_json(collection.iter());
    }

    if collection.is_empty() {
        println!("No networks saved.");
        return Ok(());
    }

    println!("{}", "Networks:".bold().underline());
    println!("{}", store.path().display().to_string().dimmed());
    println!();
    for (i, record) in collection.iter().enumerate() {
        print_row(i + 1, record);
    }
    Ok(())
}

fn get(collection: &RecordCollection, position: usize) -> Result<&NetworkRecord> {
    let index = to_index(position)?;
    match collection.get(index) {
        Some(record) => Ok(record),
        None => bail!(
            "No network #{} ({} saved)",
            position,
            collection.len()
        ),
    }
}

fn show_network(store: &CollectionStore, position: usize, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let collection = load(store)?;
    let record = get(&collection, position)?;

    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&RecordEntry::from_record(record))?
        );
        return Ok(());
    }

    println!("{}", "Network Details".bold().underline());
    println!();
    println!("  SSID:     {}", record.ssid.green());
    println!("  Security: {}", record.security.label().cyan());
    if !record.security.is_open() {
        println!("  Password: {}", record.password);
    }
    println!("  Hidden:   {}", if record.hidden { "yes" } else { "no" });
    if !record.location.is_empty() {
        println!("  Location: {}", record.location);
    }
    if let Some(image) = &record.center_image {
        println!("  Image:    {} ({} bytes)", image.format, image.bytes.len());
    }

    match payload::encode(record) {
        Ok(text) => println!("  Payload:  {}", text.dimmed()),
        Err(e) => println!("  {} {}", "⚠".yellow(), e),
    }
    Ok(())
}

fn update_network(store: &CollectionStore, position: usize, changes: &UpdateArgs) -> Result<()> {
    use colored::Colorize;

    let mut collection = load(store)?;
    let current = get(&collection, position)?.clone();
    let updated = changes.apply(current)?;
    updated.validate()?;

    collection.update(to_index(position)?, updated)?;
    store.save(&collection)?;

    println!("{} Updated network #{}.", "✓".green(), position);
    Ok(())
}

fn remove_network(store: &CollectionStore, position: usize, yes: bool) -> Result<()> {
    use colored::Colorize;

    let mut collection = load(store)?;
    let ssid = get(&collection, position)?.ssid.clone();

    if !yes {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(format!("Remove network #{} '{}'?", position, ssid))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Removal cancelled.");
            return Ok(());
        }
    }

    collection.remove(to_index(position)?)?;
    store.save(&collection)?;

    println!("{} Removed '{}'.", "✓".green(), ssid);
    Ok(())
}

fn search_networks(store: &CollectionStore, query: &str, as_json: bool) -> Result<()> {
    let collection = load(store)?;
    let hits = collection.search(query);

    if as_json {
        return print_json(hits.iter().filter_map(|&i| collection.get(i)));
    }

    if hits.is_empty() {
        println!("No networks match '{}'.", query);
        return Ok(());
    }
    for i in hits {
        if let Some(record) = collection.get(i) {
            print_row(i + 1, record);
        }
    }
    Ok(())
}

//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand};

use social_hub_core::{Channel, DraftStatus, SourceKind};

/// Validate social URLs and manage the hub's persisted state.
///
/// Social Hub checks and normalizes profile and content URLs, keeps a list
/// of inspiration sources and content drafts, and stores application data
/// with corruption detection, quota checks and retries.
#[derive(Parser, Debug)]
#[command(name = "social-hub")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// SQLite database file (overrides the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Print command output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Validate and normalize a URL
    Validate {
        url: String,

        /// Platform the URL is expected to belong to (e.g. youtube, x)
        #[arg(short, long, value_name = "NAME")]
        platform: Option<String>,
    },
    /// Print the example URL for a platform key
    Placeholder { key: String },
    /// Manage inspiration sources
    Sources {
        #[command(subcommand)]
        command: SourcesCommand,
    },
    /// Manage content drafts and their publish schedule
    Drafts {
        #[command(subcommand)]
        command: DraftsCommand,
    },
    /// Inspect and edit stored data
    Store {
        #[command(subcommand)]
        command: StoreCommand,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SourcesCommand {
    /// Register a new source
    Add(SourceAddArgs),
    /// List registered sources
    List,
    /// Remove a source by id
    Remove { id: String },
}

#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct SourceAddArgs {
    /// youtube, linkedin, twitter (or x), instagram, tiktok, website, blog
    #[arg(short, long)]
    pub kind: Option<SourceKind>,

    #[arg(short, long, default_value = "")]
    pub url: String,

    /// Display name
    #[arg(short, long, default_value = "")]
    pub name: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum DraftsCommand {
    /// Create a draft
    Add(DraftAddArgs),
    /// List drafts, newest first
    List {
        /// Only scheduled drafts still ahead, soonest first
        #[arg(long)]
        upcoming: bool,
    },
    /// Schedule a draft for publishing
    Schedule {
        id: String,

        /// RFC 3339 time, e.g. 2026-11-02T09:30:00Z
        #[arg(long, value_name = "TIME")]
        at: DateTime<Utc>,
    },
    /// Set a draft's status (draft, ready, published, failed)
    Status { id: String, status: DraftStatus },
    /// Delete a draft by id
    Remove { id: String },
}

#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct DraftAddArgs {
    /// linkedin, twitter (or x), instagram, tiktok, threads, newsletter
    #[arg(short, long)]
    pub platform: Option<Channel>,

    #[arg(short, long, default_value = "")]
    pub title: String,

    #[arg(short, long, default_value = "")]
    pub content: String,

    /// Topic the draft was written from
    #[arg(long)]
    pub topic: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    /// Print the value stored under a key
    Get { key: String },
    /// Store a JSON value under a key
    Set {
        key: String,

        #[arg(value_name = "JSON")]
        value: String,

        /// Total write attempts for this call
        #[arg(long, value_name = "N")]
        attempts: Option<u32>,

        /// Base retry delay for this call, in milliseconds
        #[arg(long, value_name = "MS")]
        retry_delay_ms: Option<u64>,
    },
    /// Delete a key
    Remove { key: String },
    /// Delete every key in the namespace
    Clear,
    /// Show usage against the quota
    Info,
    /// Dump every key in the namespace as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Load keys from a JSON export file
    Import { file: PathBuf },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
}

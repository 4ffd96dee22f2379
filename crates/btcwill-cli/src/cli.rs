use std::path::PathBuf;

use btcwill_core::record::WillStatus;
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

/// CLI surface definition.
#[derive(Parser, Debug)]
#[command(
    name = "btcwill",
    about = "Encrypted Bitcoin inheritance wills, compiled into legal documents",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Optional subcommand; defaults to listing wills when absent.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print version and exit.
    Version,
    /// Check that storage and the encryption codec both round-trip.
    Health,
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
    #[command(flatten)]
    Will(WillCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum WillCommand {
    /// Create a will from a JSON record (`-` reads stdin).
    Create {
        #[arg(long)]
        title: Option<String>,
        #[arg(long, short)]
        input: Option<PathBuf>,
    },
    /// List your wills, newest first.
    List,
    /// Show a will's metadata and decrypted record.
    Show { id: Uuid },
    /// Replace sections, title or status of a will.
    Update {
        id: Uuid,
        #[arg(long, short)]
        input: Option<PathBuf>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        status: Option<WillStatus>,
    },
    /// Compile a stored will into its document sections.
    Compile {
        id: Uuid,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Compile a JSON record without storing it.
    Preview {
        #[arg(long, short)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Delete a will.
    Delete { id: Uuid },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

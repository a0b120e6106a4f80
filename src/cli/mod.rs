//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the vibrato binary.

use clap::{Parser, Subcommand, ValueEnum};

use crate::ResourceType;

/// Vibrato sync command-line interface.
#[derive(Parser, Debug)]
#[command(name = "vibrato", about = "Vibrato sync server CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Base endpoint of the sync server.
    #[arg(long, global = true, env = "VIBRATO_API_URL")]
    pub url: Option<String>,

    /// API token from an earlier login.
    #[arg(long, global = true, env = "VIBRATO_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and print the token.
    Login {
        /// Account identifier (usually an email address).
        identifier: String,

        /// Account password.
        #[arg(long, env = "VIBRATO_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Check that the sync server answers.
    Ping,

    /// List every item of a resource type.
    List {
        /// The type of resource to list.
        entity: Entity,
    },

    /// Get a single item by sync hash.
    Get {
        /// The type of resource to get.
        entity: Entity,

        /// The item's sync hash.
        sync_hash: String,
    },

    /// Create an item from a JSON object.
    Create {
        /// The type of resource to create.
        entity: Entity,

        /// JSON object with the item's fields.
        data: String,
    },

    /// Update an item from a JSON object.
    Update {
        /// The type of resource to update.
        entity: Entity,

        /// The item's sync hash.
        sync_hash: String,

        /// JSON object with the fields to change.
        data: String,

        /// Replace the whole item (PUT) instead of patching it.
        #[arg(long)]
        replace: bool,
    },

    /// Delete an item.
    Delete {
        /// The type of resource to delete.
        entity: Entity,

        /// The item's sync hash.
        sync_hash: String,
    },
}

/// Resource types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A note.
    #[value(alias = "notes")]
    Note,
    /// A notebook.
    #[value(alias = "notebooks")]
    Notebook,
    /// A tag.
    #[value(alias = "tags")]
    Tag,
}

impl From<Entity> for ResourceType {
    fn from(entity: Entity) -> Self {
        match entity {
            Entity::Note => ResourceType::Notes,
            Entity::Notebook => ResourceType::Notebooks,
            Entity::Tag => ResourceType::Tags,
        }
    }
}

//! Command-line interface definitions.

pub mod commands;

use crate::config::CliOverrides;
use crate::error::Result;
use crate::filter::{DemandFilter, SortKey, TextMatch, parse_choice};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "demands", version, about = "Track client demands across a team")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// `.demands` directory to use instead of searching upward from the CWD
    #[arg(long, global = true, env = "DEMANDS_DIR", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Storage backend: memory, csv, json or sqlite
    #[arg(long, global = true, value_name = "BACKEND")]
    pub backend: Option<String>,

    /// Data file (json, sqlite) or directory (csv)
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Output JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print data; suppress confirmations and logs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also write JSON logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            dir: self.dir.clone(),
            backend: self.backend.clone(),
            data: self.data.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the `.demands` directory and an empty store
    Init,

    /// List demands, optionally filtered and sorted
    List(ListArgs),

    /// Show one demand
    Show {
        id: i64,
    },

    /// Create a demand
    Create(CreateArgs),

    /// Edit a demand; omitted fields keep their current value
    Edit(EditArgs),

    /// Delete a demand
    Delete {
        id: i64,
    },

    /// Manage clients
    Client {
        #[command(subcommand)]
        command: NameCommands,
    },

    /// Manage team members
    Member {
        #[command(subcommand)]
        command: NameCommands,
    },

    /// Export demands as CSV or JSON
    Export(ExportArgs),
}

/// Subcommands shared by `client` and `member`.
#[derive(Subcommand, Debug)]
pub enum NameCommands {
    /// Register a name
    Add { name: String },
    /// List registered names
    List,
}

/// Filter flags shared by `list` and `export`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Status label (`All` or `Todos` match everything)
    #[arg(long)]
    pub status: Option<String>,

    /// Priority label
    #[arg(long)]
    pub priority: Option<String>,

    /// Team member name
    #[arg(long)]
    pub member: Option<String>,

    /// Client name
    #[arg(long)]
    pub client: Option<String>,

    /// Case-insensitive text to find in descriptions
    #[arg(long)]
    pub search: Option<String>,

    /// Match --member and --client exactly instead of by substring
    #[arg(long)]
    pub exact: bool,

    /// Ordering: insertion, priority or newest
    #[arg(long, default_value = "insertion")]
    pub sort: String,
}

impl FilterArgs {
    /// Build the filter predicates.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown status or priority label.
    pub fn to_filter(&self) -> Result<DemandFilter> {
        let text = |value: Option<&String>, exact: bool| {
            value.map_or(TextMatch::Any, |v| TextMatch::parse(v, exact))
        };

        Ok(DemandFilter {
            status: self.status.as_deref().map(parse_choice).transpose()?.flatten(),
            priority: self
                .priority
                .as_deref()
                .map(parse_choice)
                .transpose()?
                .flatten(),
            team_member: text(self.member.as_ref(), self.exact),
            client: text(self.client.as_ref(), self.exact),
            description: text(self.search.as_ref(), false),
        })
    }

    /// # Errors
    ///
    /// Returns a validation error for an unknown sort key.
    pub fn sort_key(&self) -> Result<SortKey> {
        self.sort.parse()
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Responsible team member
    #[arg(long)]
    pub member: String,

    #[arg(long)]
    pub client: String,

    #[arg(long, short = 'd')]
    pub description: String,

    /// Low, Medium or High (default Medium)
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    /// Not Started, In Progress or Completed (default Not Started)
    #[arg(long, short = 's')]
    pub status: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    pub id: i64,

    #[arg(long)]
    pub member: Option<String>,

    #[arg(long)]
    pub client: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    #[arg(long, short = 's')]
    pub status: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// csv or json
    #[arg(long, short = 'f', default_value = "csv")]
    pub format: String,

    /// Write to this file (atomically) instead of stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

//! Command-line surface of the `starter` binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "starter", version, about = "Browse the todo backend and manage the local session")]
pub struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the API base URL.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and list todos.
    Todos {
        /// Only todos owned by this user.
        #[arg(long)]
        user: Option<u64>,
        /// Maximum number of items to show.
        #[arg(long)]
        limit: Option<usize>,
        /// Show the cached list without fetching.
        #[arg(long)]
        offline: bool,
    },
    /// Show one todo.
    Todo { id: u64 },
    /// List users.
    Users,
    /// Show one user.
    User { id: u64 },
    /// Flip the completed flag of a cached todo (local only).
    Toggle { id: u64 },
    /// Add a todo to the cached list (local only).
    Add {
        title: String,
        #[arg(long, default_value_t = 1)]
        user: u64,
    },
    /// Remove a todo from the cached list (local only).
    Remove { id: u64 },
    /// Sign in and persist the session.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and clear the persisted session.
    Logout,
    /// Show the persisted session without contacting the backend.
    Whoami,
    /// Show or set the theme preference (light, dark, system).
    Theme { value: Option<String> },
}

impl Cli {
    /// Default log directive for the chosen verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

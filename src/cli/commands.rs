//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Startdeliver API command-line client
#[derive(Parser, Debug)]
#[command(name = "startdeliver")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API key (overrides config file and STARTDELIVER_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// API host URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// API version
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    /// Use the app API dialect
    #[arg(long, global = true)]
    pub app_dialect: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Dump every request and response
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a record by id, or list records matching a query
    Get {
        /// Entity name, e.g. `customer`
        entity: String,

        /// Record id
        id: Option<String>,

        /// Query JSON, e.g. '{"status": "active", "limit": 10}'
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Read every record matching a query, 500 at a time
    FindAll {
        /// Entity name
        entity: String,

        /// Query JSON
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Read records with their state at each history label
    History {
        /// Entity name
        entity: String,

        /// History label (date token or `now`), repeatable
        #[arg(long = "at", required = true)]
        labels: Vec<String>,

        /// Query JSON
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Create a record, or update it when the data has an id
    Save {
        /// Entity name
        entity: String,

        /// Record JSON
        #[arg(short, long)]
        data: String,
    },

    /// Replace a whole record
    Replace {
        /// Entity name
        entity: String,

        /// Record JSON, including its id
        #[arg(short, long)]
        data: String,
    },

    /// Delete a record
    Delete {
        /// Entity name
        entity: String,

        /// Record id
        id: String,
    },

    /// Send an arbitrary request
    Raw {
        /// HTTP method
        method: String,

        /// Endpoint relative to the API base, e.g. `service/report`
        endpoint: String,

        /// JSON body
        #[arg(short, long)]
        data: Option<String>,

        /// Extra header as `Name: value`, repeatable
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },

    /// Show the authenticated user
    Me,

    /// Log in with email and password and print the session
    Login {
        /// Account email
        username: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Ask for a long-lived session
        #[arg(long)]
        remember: bool,

        /// Use cookie auth instead of an API key
        #[arg(long)]
        set_cookie: bool,
    },

    /// Download a file
    Download {
        /// File id
        file_id: String,

        /// Target file or directory (defaults to the file's name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// First byte to fetch
        #[arg(long)]
        byte_start: Option<u64>,

        /// Last byte to fetch
        #[arg(long)]
        byte_end: Option<u64>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}

//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Manage GitHub gists by driving the gh CLI
#[derive(Parser, Debug)]
#[command(name = "gisty")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: ~/.config/gisty/gisty.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Drop " (file: .., line: ..)" from error messages
    #[arg(long, global = true)]
    pub no_annotate: bool,

    /// Print machine readable JSON where supported
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a gist from files ("-" reads stdin)
    Create {
        /// Files to upload
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        files: Vec<PathBuf>,
        /// Gist description
        #[arg(long)]
        desc: Option<String>,
        /// Make the gist public
        #[arg(short, long)]
        public: bool,
        /// Filename for content read from stdin
        #[arg(short, long)]
        filename: Option<String>,
    },

    /// List your gists
    List {
        /// Maximum number of gists (default from config)
        #[arg(short = 'L', long)]
        limit: Option<u32>,
        /// Only public gists
        #[arg(long)]
        public: bool,
        /// Only secret gists (wins over --public)
        #[arg(long)]
        secret: bool,
    },

    /// Show a gist and its files
    Read {
        /// Gist ID or URL
        gist: String,
    },

    /// Print one file of a gist
    Cat {
        /// Gist ID or URL
        gist: String,
        /// File name inside the gist
        file: String,
    },

    /// Delete a gist
    Delete {
        /// Gist ID or URL
        gist: String,
    },

    /// Clone a gist repository
    Clone {
        /// Gist ID or URL
        gist: String,
        /// Target directory
        #[arg(value_hint = ValueHint::DirPath)]
        directory: Option<PathBuf>,
        /// Flags passed to git clone (after --)
        #[arg(last = true)]
        git_flags: Vec<String>,
    },

    /// Sync a cloned gist repository
    Sync {
        /// Local repository (default: cwd)
        #[arg(value_hint = ValueHint::DirPath)]
        repo: Option<PathBuf>,
        /// Branch to sync
        #[arg(short, long)]
        branch: Option<String>,
        /// Remote repository to sync instead of the local one
        #[arg(long)]
        destination: Option<String>,
        /// Source repository
        #[arg(short, long)]
        source: Option<String>,
        /// Hard reset instead of fast-forward
        #[arg(long)]
        force: bool,
    },

    /// Show comments of a gist
    Comments {
        /// Gist ID
        gist_id: String,
    },

    /// Show the star count of a gist
    Stars {
        /// Gist ID
        gist_id: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Write a template config file
    Init {
        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
    /// Show config file location
    Path,
}

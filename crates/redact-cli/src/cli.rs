use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "redact")]
#[command(about = "Redact personal data from documents", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Redact a document and save the result
    File {
        /// Document to redact (.pdf, .docx, .txt, .png, .jpg, .jpeg)
        path: PathBuf,

        /// Category to redact (repeatable; default: all)
        #[arg(long = "category", short = 'c')]
        categories: Vec<String>,

        /// Category to leave in place (repeatable)
        #[arg(long)]
        exclude: Vec<String>,

        /// Directory to save the redacted file in
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Redaction endpoint URL (default from config)
        #[arg(long)]
        endpoint: Option<String>,

        /// Send the original file name instead of a placeholder
        #[arg(long)]
        preserve_filename: bool,
    },

    /// List redaction categories
    Categories {
        /// Print as a JSON array of ids
        #[arg(long)]
        json: bool,
    },

    /// Locate findings in OCR output and print the boxes as JSON
    Regions {
        /// JSON array of `{ corners, text }` lines
        path: PathBuf,

        /// Category to locate (repeatable; default: all)
        #[arg(long = "category", short = 'c')]
        categories: Vec<String>,

        /// Category to skip (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// Show recent redaction jobs
    History {
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show what a dashboard path resolves to with the stored session
    Route {
        /// e.g. /admin/users
        path: String,
    },

    /// Admin dashboard
    #[command(subcommand)]
    Admin(AdminCommands),

    /// Run the reference redaction service
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Open the interactive terminal UI
    Ui {
        /// Document to preselect
        path: Option<PathBuf>,
    },

    /// Show the active configuration
    Config {
        /// Only print the config file location
        #[arg(long)]
        path: bool,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Sign in and store the session
    Login {
        #[arg(long, short, default_value = "admin")]
        username: String,

        #[arg(long, env = "REDACT_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the stored session
    Status,

    /// Manage users
    #[command(subcommand)]
    Users(UserCommands),

    /// Show the activity log, newest first
    Logs {
        /// info, warn or error
        #[arg(long)]
        level: Option<String>,
    },

    /// Print an argon2 hash for `server.admin_password_hash`
    HashPassword {
        /// Read from stdin when omitted
        password: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List users
    List,

    /// Block a user
    Block { id: u64 },

    /// Unblock a user
    Unblock { id: u64 },

    /// Delete a user
    Delete {
        id: u64,

        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

use std::path::PathBuf;

use clap::Subcommand;

use crate::types::Role;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Initialize the data directory (create the database and upload folder)
    Init {
        /// Data directory for the database and uploaded files
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Username for an initial admin account
        #[arg(long)]
        username: Option<String>,

        /// Password for the initial admin account
        #[arg(long)]
        password: Option<String>,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Manage accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Show portal status information
    Info {
        /// Data directory for the database and uploaded files
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Add an account directly to the database
    Add {
        /// Data directory for the database and uploaded files
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Username for the new account
        #[arg(long)]
        username: Option<String>,

        /// Password for the new account
        #[arg(long)]
        password: Option<String>,

        /// Role of the new account (Student or Admin)
        #[arg(long)]
        role: Option<Role>,

        /// Skip interactive prompts (requires --username, --password and --role)
        #[arg(long)]
        non_interactive: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Log in to a portal server
    Login {
        /// Server URL (e.g., http://localhost:8080)
        #[arg(long)]
        server: Option<String>,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        password: Option<String>,

        /// Role to log in as (Student or Admin)
        #[arg(long)]
        role: Option<Role>,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Log out and remove stored credentials
    Logout,
}

#[derive(Subcommand)]
pub enum DocsCommands {
    /// List available documents
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload a file (admins only)
    Upload {
        /// File to upload
        file: PathBuf,

        /// Title shown in the document list
        #[arg(long)]
        title: Option<String>,

        /// Skip interactive prompts (requires --title)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Download a document
    Download {
        /// Document ID (omit to pick from a list)
        id: Option<i64>,

        /// Output path (defaults to the uploaded file name)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Delete a document (admins only)
    Delete {
        /// Document ID (omit to pick from a list)
        id: Option<i64>,

        /// Skip interactive prompts (requires the ID)
        #[arg(long)]
        non_interactive: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

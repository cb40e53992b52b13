use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use docportal::cli::{
    AdminCommands, AuthCommands, DocsCommands, UserCommands, run_admin_init, run_auth_login,
    run_auth_logout, run_docs_delete, run_docs_download, run_docs_list, run_docs_upload,
    run_info, run_register, run_user_add,
};
use docportal::config::ServerConfig;
use docportal::documents::UPLOADS_DIR;
use docportal::server::{AppState, create_router};
use docportal::store::{SqliteStore, Store};
use docportal::types::Role;

#[derive(Parser)]
#[command(name = "docportal")]
#[command(about = "A document portal for students and admins", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database and uploaded files
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Largest accepted upload, in megabytes
        #[arg(long, default_value = "100")]
        max_upload_mb: usize,
    },

    /// Administrative commands (operate on the data directory directly)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Log in to or out of a portal server
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Create an account on a portal server
    Register {
        /// Server URL (e.g., http://localhost:8080)
        #[arg(long)]
        server: Option<String>,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        password: Option<String>,

        /// Role of the new account (Student or Admin)
        #[arg(long)]
        role: Option<Role>,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Browse and manage documents
    Docs {
        #[command(subcommand)]
        command: DocsCommands,
    },
}

async fn run_serve(config: ServerConfig) -> anyhow::Result<()> {
    fs::create_dir_all(config.uploads_dir())?;

    let store = SqliteStore::new(config.db_path())?;
    if let Err(e) = store.initialize() {
        bail!(
            "Failed to initialize database at {}: {e}",
            config.db_path().display()
        );
    }

    info!("Data directory: {}", config.data_dir.display());
    info!(
        "Uploads stored under {}",
        config.data_dir.join(UPLOADS_DIR).display()
    );

    let state = Arc::new(
        AppState::new(Arc::new(store), config.data_dir.clone())
            .with_max_upload_bytes(config.max_upload_bytes),
    );

    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// The HTTP client commands use reqwest's blocking client, which must not run
/// inside a runtime, so only the async commands get one.
fn block_on<F: std::future::Future>(future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("docportal=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            data_dir,
            max_upload_mb,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: PathBuf::from(data_dir),
                max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
            };
            block_on(run_serve(config))??;
        }
        Commands::Admin { command } => match command {
            AdminCommands::Init {
                data_dir,
                username,
                password,
                non_interactive,
            } => run_admin_init(data_dir, username, password, non_interactive)?,
            AdminCommands::User { command } => match command {
                UserCommands::Add {
                    data_dir,
                    username,
                    password,
                    role,
                    non_interactive,
                } => run_user_add(data_dir, username, password, role, non_interactive)?,
            },
            AdminCommands::Info { data_dir, json } => block_on(run_info(data_dir, json))??,
        },
        Commands::Auth { command } => match command {
            AuthCommands::Login {
                server,
                username,
                password,
                role,
                non_interactive,
            } => run_auth_login(server, username, password, role, non_interactive)?,
            AuthCommands::Logout => run_auth_logout()?,
        },
        Commands::Register {
            server,
            username,
            password,
            role,
            non_interactive,
        } => run_register(server, username, password, role, non_interactive)?,
        Commands::Docs { command } => match command {
            DocsCommands::List { json } => run_docs_list(json)?,
            DocsCommands::Upload {
                file,
                title,
                non_interactive,
            } => run_docs_upload(file, title, non_interactive)?,
            DocsCommands::Download { id, output } => run_docs_download(id, output)?,
            DocsCommands::Delete {
                id,
                non_interactive,
                yes,
            } => run_docs_delete(id, non_interactive, yes)?,
        },
    }

    Ok(())
}

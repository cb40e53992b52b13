mod auth;
mod commands;
pub mod credentials;
mod docs;
pub mod http_client;
mod info;
mod init;
pub mod pickers;
mod user;

pub use auth::{run_auth_login, run_auth_logout, run_register};
pub use commands::{AdminCommands, AuthCommands, DocsCommands, UserCommands};
pub use docs::{run_docs_delete, run_docs_download, run_docs_list, run_docs_upload};
pub use info::run_info;
pub use init::run_admin_init;
pub use user::run_user_add;

use crate::config::DB_FILE_NAME;
use crate::store::SqliteStore;

/// Initialize store from data directory, checking it exists
pub fn init_store(data_dir: &str) -> anyhow::Result<SqliteStore> {
    let data_path: std::path::PathBuf = data_dir.into();
    let db_path = data_path.join(DB_FILE_NAME);

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'docportal admin init' first.",
            db_path.display()
        );
    }

    SqliteStore::new(&db_path).map_err(Into::into)
}

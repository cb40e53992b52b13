use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::accounts::AccountDirectory;
use crate::config::DB_FILE_NAME;
use crate::documents::UPLOADS_DIR;
use crate::store::{SqliteStore, Store};
use crate::types::Role;

use super::pickers::{get_or_prompt_password, get_or_prompt_text};

/// Creates the data directory and schema. Safe to run again on an existing
/// directory; an admin account is only created when one is requested.
pub fn run_admin_init(
    data_dir: String,
    username: Option<String>,
    password: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let data_path: PathBuf = data_dir.into();
    fs::create_dir_all(data_path.join(UPLOADS_DIR))?;

    let db_path = data_path.join(DB_FILE_NAME);
    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    println!();
    println!("Initialized portal data at {}", data_path.display());

    let store: Arc<dyn Store> = Arc::new(store);
    let has_admin = store.list_users()?.iter().any(|u| u.role == Role::Admin);

    let wants_admin = if username.is_some() {
        true
    } else if non_interactive || has_admin {
        false
    } else {
        inquire::Confirm::new("Would you like to create an admin account?")
            .with_default(true)
            .prompt()?
    };

    if wants_admin {
        let Some(username) = get_or_prompt_text(username, "Username", "username", non_interactive)?
        else {
            println!("Cancelled.");
            return Ok(());
        };
        let Some(password) = get_or_prompt_password(password, true, non_interactive)? else {
            println!("Cancelled.");
            return Ok(());
        };

        let user = AccountDirectory::new(store).register(&username, &password, Role::Admin)?;
        println!("Created Admin account \"{}\"", user.username);
    }

    println!();

    Ok(())
}

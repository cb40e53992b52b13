use std::sync::Arc;

use crate::accounts::AccountDirectory;
use crate::error::Error;
use crate::types::Role;

use super::init_store;
use super::pickers::{get_or_pick_role, get_or_prompt_password, get_or_prompt_text};

pub fn run_user_add(
    data_dir: String,
    username: Option<String>,
    password: Option<String>,
    role: Option<Role>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;
    let accounts = AccountDirectory::new(Arc::new(store));

    let Some(username) = get_or_prompt_text(username, "Username", "username", non_interactive)?
    else {
        println!("Cancelled.");
        return Ok(());
    };
    let Some(password) = get_or_prompt_password(password, true, non_interactive)? else {
        println!("Cancelled.");
        return Ok(());
    };
    let Some(role) = get_or_pick_role(role, non_interactive)? else {
        println!("Cancelled.");
        return Ok(());
    };

    match accounts.register(&username, &password, role) {
        Ok(user) => {
            println!();
            println!("Created {} account \"{}\"", user.role, user.username);
            println!();
            Ok(())
        }
        Err(Error::DuplicateUsername(name)) => anyhow::bail!("Username '{name}' already exists"),
        Err(e) => Err(e.into()),
    }
}

use serde::{Deserialize, Serialize};

use crate::types::{Role, User};

use super::credentials::{Credentials, delete_credentials, load_credentials, save_credentials};
use super::http_client::ApiClient;
use super::pickers::{get_or_pick_role, get_or_prompt_password, get_or_prompt_text};

#[derive(Serialize)]
struct CredentialsBody<'a> {
    username: &'a str,
    password: &'a str,
    role: Role,
}

#[derive(Deserialize)]
struct LoginBody {
    token: String,
    user: User,
}

fn normalize_server_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');

    // Strip trailing API paths to avoid duplication when constructing request URLs
    let url = url
        .trim_end_matches("/api/v1")
        .trim_end_matches("/api")
        .trim_end_matches('/');

    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }

    if url.starts_with("localhost") || url.starts_with("127.0.0.1") {
        format!("http://{url}")
    } else {
        format!("https://{url}")
    }
}

struct Prompted {
    server_url: String,
    username: String,
    password: String,
    role: Role,
}

fn prompt_credentials(
    server: Option<String>,
    username: Option<String>,
    password: Option<String>,
    role: Option<Role>,
    confirm_password: bool,
    non_interactive: bool,
) -> anyhow::Result<Option<Prompted>> {
    let Some(server) = get_or_prompt_text(server, "Server URL", "server", non_interactive)? else {
        return Ok(None);
    };
    let Some(username) = get_or_prompt_text(username, "Username", "username", non_interactive)?
    else {
        return Ok(None);
    };
    let Some(password) = get_or_prompt_password(password, confirm_password, non_interactive)? else {
        return Ok(None);
    };
    let Some(role) = get_or_pick_role(role, non_interactive)? else {
        return Ok(None);
    };

    Ok(Some(Prompted {
        server_url: normalize_server_url(&server),
        username,
        password,
        role,
    }))
}

pub fn run_register(
    server: Option<String>,
    username: Option<String>,
    password: Option<String>,
    role: Option<Role>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let Some(p) = prompt_credentials(server, username, password, role, true, non_interactive)?
    else {
        println!("Cancelled.");
        return Ok(());
    };

    let client = ApiClient::anonymous(&p.server_url)?;
    let user: User = client.post(
        "/register",
        &CredentialsBody {
            username: &p.username,
            password: &p.password,
            role: p.role,
        },
    )?;

    println!();
    println!("Registered {} account '{}'", user.role, user.username);
    println!("Log in with: docportal auth login --server {}", p.server_url);
    println!();

    Ok(())
}

pub fn run_auth_login(
    server: Option<String>,
    username: Option<String>,
    password: Option<String>,
    role: Option<Role>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let Some(p) = prompt_credentials(server, username, password, role, false, non_interactive)?
    else {
        println!("Cancelled.");
        return Ok(());
    };

    let client = ApiClient::anonymous(&p.server_url)?;
    let login: LoginBody = client.post(
        "/login",
        &CredentialsBody {
            username: &p.username,
            password: &p.password,
            role: p.role,
        },
    )?;

    let creds = Credentials {
        server_url: p.server_url.clone(),
        token: login.token,
        username: login.user.username,
        role: login.user.role,
    };
    save_credentials(&creds)?;

    println!();
    println!(
        "Logged in to {} as {} ({})",
        p.server_url, creds.username, creds.role
    );
    println!();

    Ok(())
}

pub fn run_auth_logout() -> anyhow::Result<()> {
    // Local credentials are removed even if the server rejects the logout.
    if let Ok(creds) = load_credentials() {
        let client = ApiClient::new(&creds)?;
        if let Err(e) = client.post_empty("/logout") {
            tracing::debug!("Server logout failed: {e}");
        }
    }

    if delete_credentials()? {
        println!();
        println!("Logged out successfully.");
        println!();
    } else {
        println!();
        println!("No credentials found.");
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_server_url() {
        assert_eq!(
            normalize_server_url("localhost:8080"),
            "http://localhost:8080"
        );
        assert_eq!(
            normalize_server_url("http://127.0.0.1:8080/api/v1/"),
            "http://127.0.0.1:8080"
        );
        assert_eq!(
            normalize_server_url("docs.example.edu"),
            "https://docs.example.edu"
        );
        assert_eq!(
            normalize_server_url(" https://docs.example.edu/ "),
            "https://docs.example.edu"
        );
    }
}

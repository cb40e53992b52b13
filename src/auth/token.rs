use rand::Rng;

use crate::error::{Error, Result};

const TOKEN_PREFIX: &str = "docportal";
const SECRET_LENGTH: usize = 32;
const SECRET_BYTES: usize = 16;

/// Generates a new session token with the format: docportal_<secret>
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::thread_rng().fill(&mut bytes);
    format!("{TOKEN_PREFIX}_{}", hex::encode(bytes))
}

/// Checks a token string has the expected shape and returns its secret part.
pub fn parse_token(token: &str) -> Result<&str> {
    let secret = token
        .strip_prefix(TOKEN_PREFIX)
        .and_then(|rest| rest.strip_prefix('_'))
        .ok_or(Error::Unauthorized)?;

    if secret.len() != SECRET_LENGTH || !secret.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::Unauthorized);
    }

    Ok(secret)
}

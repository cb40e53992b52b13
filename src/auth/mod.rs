mod middleware;
mod password;
mod token;

pub use middleware::{AuthError, RequireSession};
pub use password::PasswordHasher;
pub use token::{generate_token, parse_token};

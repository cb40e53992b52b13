mod models;
mod role;

pub use models::{Document, NewDocument, User};
pub use role::Role;

mod accounts;
mod documents;
pub mod dto;
pub mod response;
mod router;

pub use router::{AppState, DEFAULT_MAX_UPLOAD_BYTES, create_router};

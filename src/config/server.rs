use std::net::SocketAddr;
use std::path::PathBuf;

use crate::documents::UPLOADS_DIR;
use crate::server::DEFAULT_MAX_UPLOAD_BYTES;

pub const DB_FILE_NAME: &str = "portal.db";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    #[must_use]
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join(UPLOADS_DIR)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = ServerConfig::default();
        assert_eq!(config.db_path(), PathBuf::from("./data/portal.db"));
        assert_eq!(config.uploads_dir(), PathBuf::from("./data/uploaded_files"));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..ServerConfig::default()
        };
        assert_eq!(config.socket_addr().unwrap().port(), 3000);

        let bad = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(bad.socket_addr().is_err());
    }
}

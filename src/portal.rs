use std::path::Path;
use std::sync::Arc;

use tokio::fs::File;
use tokio::io::BufReader;
use tracing::info;

use crate::accounts::AccountDirectory;
use crate::documents::DocumentRepository;
use crate::error::{Error, Result};
use crate::session::{Operation, Session, SessionRegistry};
use crate::store::Store;
use crate::types::{Document, Role, User};

/// A freshly authenticated session and the token that carries it.
#[derive(Debug, Clone)]
pub struct Login {
    pub token: String,
    pub user: User,
    pub session: Session,
}

/// The operations offered to the presentation layer, each gated on the
/// caller's [`Session`].
pub struct Portal {
    accounts: AccountDirectory,
    documents: DocumentRepository,
    sessions: SessionRegistry,
}

impl Portal {
    pub fn new(store: Arc<dyn Store>, data_dir: &Path) -> Self {
        Self {
            accounts: AccountDirectory::new(store.clone()),
            documents: DocumentRepository::new(store, data_dir),
            sessions: SessionRegistry::new(),
        }
    }

    /// Resolves a bearer token to its session; unknown tokens are anonymous.
    #[must_use]
    pub fn session(&self, token: &str) -> Session {
        self.sessions.get(token)
    }

    pub fn register(
        &self,
        session: &Session,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<User> {
        session.require(Operation::Register)?;
        self.accounts.register(username, password, role)
    }

    /// Authenticates and opens a new session. Any mismatch is reported as
    /// `AuthenticationFailed` without saying which field was wrong.
    pub fn login(
        &self,
        session: &Session,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Login> {
        session.require(Operation::Authenticate)?;

        let user = self
            .accounts
            .authenticate(username, password, role)?
            .ok_or(Error::AuthenticationFailed)?;

        let session = Session::for_user(&user);
        let token = self.sessions.open(session.clone());
        info!(
            "{} '{}' logged in ({} active sessions)",
            user.role,
            user.username,
            self.sessions.len()
        );

        Ok(Login {
            token,
            user,
            session,
        })
    }

    /// Closes the session behind `token` and resets `session` to anonymous.
    pub fn logout(&self, session: &mut Session, token: &str) -> Result<()> {
        session.require(Operation::Logout)?;

        self.sessions.close(token);
        if let Some(username) = session.username() {
            info!(
                "'{username}' logged out ({} active sessions)",
                self.sessions.len()
            );
        }
        session.logout();
        Ok(())
    }

    pub fn list_documents(&self, session: &Session) -> Result<Vec<Document>> {
        session.require(Operation::ListDocuments)?;
        self.documents.list()
    }

    pub async fn open_document(
        &self,
        session: &Session,
        id: i64,
    ) -> Result<(Document, BufReader<File>, i64)> {
        session.require(Operation::DownloadDocument)?;
        self.documents.open(id).await
    }

    /// Uploads on behalf of the logged-in admin, who is recorded as the
    /// uploader.
    pub async fn upload_document(
        &self,
        session: &Session,
        data: &[u8],
        file_name: &str,
        title: &str,
    ) -> Result<Document> {
        session.require(Operation::UploadDocument)?;
        let uploaded_by = session.username().ok_or(Error::Unauthorized)?;
        self.documents
            .upload(data, file_name, title, uploaded_by)
            .await
    }

    pub async fn delete_document(&self, session: &Session, id: i64) -> Result<Option<Document>> {
        session.require(Operation::DeleteDocument)?;
        self.documents.delete(id).await
    }
}

//! Session state and the role gate.
//!
//! A [`Session`] is the explicit record of who is interacting with the
//! portal. Every [`Portal`](crate::portal::Portal) call takes one and asks
//! it whether the requested [`Operation`] is reachable before doing any
//! work.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::auth::generate_token;
use crate::error::{Error, Result};
use crate::types::{Role, User};

/// Operations exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Authenticate,
    Logout,
    ListDocuments,
    DownloadDocument,
    UploadDocument,
    DeleteDocument,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Student {
        username: String,
    },
    Admin {
        username: String,
    },
}

impl Session {
    /// The session entered after `user` authenticated successfully.
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        let username = user.username.clone();
        match user.role {
            Role::Student => Session::Student { username },
            Role::Admin => Session::Admin { username },
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Session::Anonymous)
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Student { username } | Session::Admin { username } => Some(username),
        }
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        match self {
            Session::Anonymous => None,
            Session::Student { .. } => Some(Role::Student),
            Session::Admin { .. } => Some(Role::Admin),
        }
    }

    /// Returns to the anonymous state, dropping username and role.
    pub fn logout(&mut self) {
        *self = Session::Anonymous;
    }

    #[must_use]
    pub fn permits(&self, op: Operation) -> bool {
        use Operation::*;

        match self {
            Session::Anonymous => matches!(op, Register | Authenticate),
            Session::Student { .. } => matches!(op, ListDocuments | DownloadDocument | Logout),
            Session::Admin { .. } => matches!(
                op,
                ListDocuments | DownloadDocument | UploadDocument | DeleteDocument | Logout
            ),
        }
    }

    /// Like [`permits`](Self::permits), but as an error: `Unauthorized` when
    /// nobody is logged in, `Forbidden` when the role is insufficient.
    pub fn require(&self, op: Operation) -> Result<()> {
        if self.permits(op) {
            Ok(())
        } else if self.is_authenticated() {
            Err(Error::Forbidden)
        } else {
            Err(Error::Unauthorized)
        }
    }
}

/// Live sessions keyed by bearer token. Entries never expire; they last
/// until logout or process exit.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Stores an authenticated session and returns its new token.
    pub fn open(&self, session: Session) -> String {
        let mut sessions = self.sessions();
        loop {
            let token = generate_token();
            if !sessions.contains_key(&token) {
                sessions.insert(token.clone(), session);
                return token;
            }
        }
    }

    /// Looks up the session for a token. Unknown tokens are anonymous.
    #[must_use]
    pub fn get(&self, token: &str) -> Session {
        self.sessions().get(token).cloned().unwrap_or_default()
    }

    /// Forgets a token, returning the session it carried.
    pub fn close(&self, token: &str) -> Option<Session> {
        self.sessions().remove(token)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! # Session State
//!
//! Who is signed in. The stored copy lives in the session store
//! (`shelf_db::SessionRepository`); this is the in-memory view the commands
//! consult on every request.
//!
//! ```text
//! ┌──────────────┐   sign_in(name)    ┌──────────────┐
//! │  Signed out  │ ─────────────────► │  Signed in   │
//! │  owner: None │ ◄───────────────── │  owner: name │
//! └──────────────┘     sign_out()     └──────────────┘
//!        ▲                                   ▲
//!        └──────── restore at startup ───────┘
//!                  (stored userName)
//! ```

use shelf_core::{CoreError, CoreResult};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct SessionState {
    owner: RwLock<Option<String>>,
}

impl SessionState {
    pub fn new() -> Self {
        SessionState::default()
    }

    /// The signed-in user name, if any.
    pub async fn current(&self) -> Option<String> {
        self.owner.read().await.clone()
    }

    pub async fn is_signed_in(&self) -> bool {
        self.owner.read().await.is_some()
    }

    /// The owner for cart and catalog commands.
    ///
    /// ## Errors
    /// `CoreError::NotSignedIn` when nobody is signed in.
    pub async fn require_owner(&self) -> CoreResult<String> {
        self.current().await.ok_or(CoreError::NotSignedIn)
    }

    pub async fn sign_in(&self, name: impl Into<String>) {
        *self.owner.write().await = Some(name.into());
    }

    pub async fn sign_out(&self) -> Option<String> {
        self.owner.write().await.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let session = SessionState::new();
        assert!(!session.is_signed_in().await);
        assert!(matches!(session.require_owner().await, Err(CoreError::NotSignedIn)));

        session.sign_in("alice").await;
        assert_eq!(session.require_owner().await.unwrap(), "alice");

        assert_eq!(session.sign_out().await.as_deref(), Some("alice"));
        assert_eq!(session.current().await, None);
    }
}

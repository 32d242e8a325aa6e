//! # Session Commands
//!
//! Sign-in by user name. The name is the cart owner and is remembered in
//! the session store under `userName` so the next start signs in again.

use serde::Serialize;
use shelf_core::validation::validate_user_name;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{DbState, SessionState};

/// Who is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub signed_in: bool,
    pub user_name: Option<String>,
}

impl SessionView {
    fn from_owner(owner: Option<String>) -> Self {
        SessionView {
            signed_in: owner.is_some(),
            user_name: owner,
        }
    }
}

/// Restores the session from the stored user name, if there is one.
pub async fn restore_session(
    db: &DbState,
    session: &SessionState,
) -> Result<SessionView, ApiError> {
    debug!("restore_session command");

    let stored = db.inner().sessions().stored_user_name().await?;
    match &stored {
        // A name stored by an older build may no longer pass validation.
        Some(name) if validate_user_name(name).is_ok() => {
            session.sign_in(name.clone()).await;
            info!(user = %name, "Session restored");
        }
        Some(name) => debug!(user = %name, "Ignoring invalid stored user name"),
        None => {}
    }

    Ok(SessionView::from_owner(session.current().await))
}

/// Signs in as `name` (4–16 characters).
pub async fn sign_in(
    db: &DbState,
    session: &SessionState,
    name: String,
) -> Result<SessionView, ApiError> {
    debug!(user = %name, "sign_in command");

    validate_user_name(&name)?;
    db.inner().sessions().store_user_name(&name).await?;
    session.sign_in(name.clone()).await;

    info!(user = %name, "Signed in");
    Ok(SessionView::from_owner(Some(name)))
}

/// Signs out and forgets the stored user name. The cart is kept.
pub async fn sign_out(db: &DbState, session: &SessionState) -> Result<SessionView, ApiError> {
    debug!("sign_out command");

    db.inner().sessions().forget_user_name().await?;
    if let Some(name) = session.sign_out().await {
        info!(user = %name, "Signed out");
    }
    Ok(SessionView::from_owner(None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::fixture;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_sign_in_persists_name() {
        let fx = fixture().await;

        let view = sign_in(&fx.db, &fx.session, "alice".into()).await.unwrap();
        assert!(view.signed_in);
        assert_eq!(
            fx.db.inner().sessions().stored_user_name().await.unwrap().as_deref(),
            Some("alice")
        );

        // A fresh session (next start) restores from the store.
        let next = SessionState::new();
        let view = restore_session(&fx.db, &next).await.unwrap();
        assert_eq!(view.user_name.as_deref(), Some("alice"));
        assert_eq!(next.current().await.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_sign_in_rejects_bad_lengths() {
        let fx = fixture().await;

        for name in ["", "abc", "abcdefghijklmnopq"] {
            let err = sign_in(&fx.db, &fx.session, name.into()).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError, "name {name:?}");
        }
        assert!(!fx.session.is_signed_in().await);

        assert!(sign_in(&fx.db, &fx.session, "abcd".into()).await.is_ok());
        assert!(sign_in(&fx.db, &fx.session, "abcdefghijklmnop".into()).await.is_ok());
    }

    #[tokio::test]
    async fn test_sign_out_forgets_name() {
        let fx = fixture().await;
        sign_in(&fx.db, &fx.session, "alice".into()).await.unwrap();

        let view = sign_out(&fx.db, &fx.session).await.unwrap();
        assert!(!view.signed_in);
        assert!(!fx.session.is_signed_in().await);

        let next = SessionState::new();
        let view = restore_session(&fx.db, &next).await.unwrap();
        assert_eq!(view, SessionView { signed_in: false, user_name: None });
    }

    #[tokio::test]
    async fn test_restore_ignores_invalid_stored_name() {
        let fx = fixture().await;
        fx.db.inner().sessions().store_user_name("ab").await.unwrap();

        let view = restore_session(&fx.db, &fx.session).await.unwrap();
        assert!(!view.signed_in);
    }
}

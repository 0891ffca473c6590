//! Signed-in state for the admin tools.
//!
//! Lifecycle: anonymous -> authenticating -> authenticated -> anonymous.
//! Persistence is whatever [`SessionStore`] the session is built with.

mod store;

pub use store::{FileStore, MemoryStore, SessionStore, StoredSession};

use crate::api::AuthApi;
use crate::error::{Error, Result};
use crate::models::{AuthPayload, AuthTokens, User};
use crate::validation::Registration;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated { user: User, tokens: AuthTokens },
}

pub struct Session<S> {
    store: S,
    state: SessionState,
    last_error: Option<String>,
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: SessionState::Anonymous,
            last_error: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Pick up a session saved by an earlier run. Unreadable data is discarded.
    pub fn restore<A: AuthApi + ?Sized>(&mut self, api: &A) -> Option<&User> {
        match self.store.load() {
            Ok(Some(saved)) => {
                api.set_access_token(Some(saved.tokens.access_token.clone()));
                self.state = SessionState::Authenticated {
                    user: saved.user,
                    tokens: saved.tokens,
                };
            }
            Ok(None) => self.state = SessionState::Anonymous,
            Err(e) => {
                warn!("Failed to restore session: {}", e);
                if let Err(e) = self.store.clear() {
                    warn!("Failed to clear session storage: {}", e);
                }
                self.state = SessionState::Anonymous;
            }
        }
        self.user()
    }

    pub async fn login<A: AuthApi + ?Sized>(
        &mut self,
        api: &A,
        email: &str,
        password: &str,
    ) -> Result<&User> {
        self.begin_auth();
        let outcome = api.login(email, password).await;
        self.finish_auth(api, outcome, "Login failed")
    }

    pub async fn register<A: AuthApi + ?Sized>(&mut self, api: &A, form: &Registration) -> Result<&User> {
        self.begin_auth();
        let outcome = api.register(form).await;
        self.finish_auth(api, outcome, "Registration failed")
    }

    /// Always ends anonymous, even when the server call fails
    pub async fn logout<A: AuthApi + ?Sized>(&mut self, api: &A) {
        if let Err(e) = api.logout().await {
            warn!("Logout error: {}", e);
        }
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear session storage: {}", e);
        }
        api.set_access_token(None);
        self.state = SessionState::Anonymous;
        info!("Signed out");
    }

    pub async fn change_password<A: AuthApi + ?Sized>(
        &mut self,
        api: &A,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        if !self.is_authenticated() {
            return Err(Error::Unauthenticated);
        }
        self.last_error = None;
        api.change_password(old_password, new_password)
            .await
            .map_err(|e| {
                self.last_error = Some(failure_message(&e, "Failed to change password"));
                e
            })
    }

    fn begin_auth(&mut self) {
        self.last_error = None;
        self.state = SessionState::Authenticating;
    }

    fn finish_auth<A: AuthApi + ?Sized>(
        &mut self,
        api: &A,
        outcome: Result<AuthPayload>,
        fallback: &str,
    ) -> Result<&User> {
        let payload = match outcome {
            Ok(payload) => payload,
            Err(e) => {
                self.state = SessionState::Anonymous;
                self.last_error = Some(failure_message(&e, fallback));
                return Err(e);
            }
        };

        let (tokens, user) = payload.into_parts();
        let saved = StoredSession {
            tokens: tokens.clone(),
            user: user.clone(),
        };
        if let Err(e) = self.store.save(&saved) {
            warn!("Signed in but could not persist session: {}", e);
        }

        api.set_access_token(Some(tokens.access_token.clone()));
        info!("Signed in as {}", user.display_name());
        self.state = SessionState::Authenticated { user, tokens };

        self.user().ok_or(Error::Unauthenticated)
    }
}

/// Server and validation messages are shown as-is; transport failures get a generic message
fn failure_message(error: &Error, fallback: &str) -> String {
    match error {
        Error::Status { .. } | Error::Rejected(_) | Error::Validation(_) => error.user_message(),
        _ => fallback.to_string(),
    }
}

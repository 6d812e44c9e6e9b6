//! Authentication session state.
//!
//! One `Session` is created at startup and shared by reference with every
//! component that needs the access token. State changes are published over a
//! broadcast channel so consumers (e.g. the cart synchronizer) can react to
//! logout without holding callbacks.

use crate::domain::User;
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

/// Capacity of the session event channel. Events are tiny and consumers
/// react immediately; a lagging receiver only misses intermediate states.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Session lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A user authenticated and the token is valid.
    LoggedIn,
    /// The session was revoked: explicit logout or a 403 from the API.
    LoggedOut,
}

/// Holds the access token and the authenticated user.
///
/// The token itself is opaque; obtaining and validating it is the backend's
/// job. Locks are std `RwLock`s since they are never held across awaits.
pub struct Session {
    token: RwLock<Option<String>>,
    user: RwLock<Option<User>>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    /// Creates an unauthenticated session.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            token: RwLock::new(None),
            user: RwLock::new(None),
            events,
        }
    }

    /// Creates a session pre-seeded with a stored token (not yet validated).
    pub fn with_token(token: String) -> Self {
        let session = Self::new();
        *session.token.write().unwrap() = Some(token);
        session
    }

    /// Subscribes to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Returns the current access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }

    /// Stores a freshly issued access token without announcing login;
    /// the session counts as authenticated once the user is known.
    pub fn set_access_token(&self, token: String) {
        *self.token.write().unwrap() = Some(token);
    }

    /// Marks the session as authenticated for the given user.
    pub fn authenticate(&self, user: User) {
        debug!(user_id = user.id, "session authenticated");
        *self.user.write().unwrap() = Some(user);
        let _ = self.events.send(SessionEvent::LoggedIn);
    }

    /// Returns the authenticated user, if any.
    pub fn user(&self) -> Option<User> {
        self.user.read().unwrap().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.read().unwrap().is_some()
    }

    /// Clears token and user. Emits `LoggedOut` if there was a token to
    /// revoke, so a 403 on an already-anonymous session stays silent.
    pub fn revoke(&self) {
        let had_token = self.token.write().unwrap().take().is_some();
        *self.user.write().unwrap() = None;

        if had_token {
            debug!("session revoked");
            let _ = self.events.send(SessionEvent::LoggedOut);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

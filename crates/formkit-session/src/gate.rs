use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::callback::{CallbackError, parse_callback};
use crate::clock::{Clock, SystemClock};

/// An established session. Token and expiry live together so a reader
/// observes both or neither, never a half-updated pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Where the gate stands in the authentication lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    /// Login is underway at the external identity provider. `return_to`
    /// remembers the protected route that triggered it.
    Authenticating { return_to: Option<String> },
    Authenticated(Session),
    /// The token outlived its expiry. Routes treat this exactly like
    /// `Anonymous`; the stale session is kept for diagnostics and logout.
    Expired(Session),
}

/// Decides whether a route may render, holds the bearer token, and parses
/// the identity provider's redirect callback. Constructed once at app start
/// and passed by reference to the router; there is no ambient global.
#[derive(Debug)]
pub struct SessionGate<C = SystemClock> {
    state: SessionState,
    clock: C,
}

impl SessionGate<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for SessionGate<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SessionGate<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            state: SessionState::Anonymous,
            clock,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Explicit login request. The actual redirect to the identity provider
    /// is the caller's job; the gate records that one is underway and where
    /// to come back to.
    pub fn begin_login(&mut self, return_to: Option<String>) {
        if matches!(self.state, SessionState::Authenticated(_)) {
            warn!("login requested while already authenticated; ignoring");
            return;
        }
        debug!(?return_to, "login started");
        self.state = SessionState::Authenticating { return_to };
    }

    /// Establish a session from the provider's redirect URL.
    ///
    /// On success returns the protected route the login started from, so
    /// the router can resume navigation. On a malformed callback no partial
    /// session is created: an in-progress login collapses back to
    /// `Anonymous`, any other state is left as it was.
    pub fn handle_callback(&mut self, url: &str) -> Result<Option<String>, CallbackError> {
        match parse_callback(url) {
            Ok(params) => {
                let return_to = match &mut self.state {
                    SessionState::Authenticating { return_to } => return_to.take(),
                    _ => None,
                };
                let expires_at = self.clock.now() + Duration::seconds(params.expires_in);
                debug!(%expires_at, "session established");
                self.state = SessionState::Authenticated(Session {
                    token: params.access_token,
                    expires_at,
                });
                Ok(return_to)
            }
            Err(error) => {
                warn!(%error, "authentication callback rejected");
                if matches!(self.state, SessionState::Authenticating { .. }) {
                    self.state = SessionState::Anonymous;
                }
                Err(error)
            }
        }
    }

    /// Pure query used synchronously by route guards: true only with an
    /// unexpired session. Performs no transition and no I/O.
    pub fn is_authenticated(&self) -> bool {
        match &self.state {
            SessionState::Authenticated(session) => self.clock.now() < session.expires_at,
            _ => false,
        }
    }

    /// Route-guard entry point: may a protected route render right now?
    ///
    /// This is where an overdue session actually moves to `Expired`; from
    /// then on the gate answers like `Anonymous` until the next login.
    pub fn check_route(&mut self) -> bool {
        if let SessionState::Authenticated(session) = &self.state {
            if self.clock.now() < session.expires_at {
                return true;
            }
            debug!("session expired");
            if let SessionState::Authenticated(session) =
                std::mem::replace(&mut self.state, SessionState::Anonymous)
            {
                self.state = SessionState::Expired(session);
            }
        }
        false
    }

    /// Discard the session immediately, from any state.
    pub fn logout(&mut self) {
        debug!("logout");
        self.state = SessionState::Anonymous;
    }

    /// The bearer token, while one is held (live or expired).
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated(session) | SessionState::Expired(session) => {
                Some(&session.token)
            }
            _ => None,
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            SessionState::Authenticated(session) | SessionState::Expired(session) => {
                Some(session.expires_at)
            }
            _ => None,
        }
    }
}

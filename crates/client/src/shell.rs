//! Application shell: drives the TMDB login handshake and owns the user store.

use metamoviex_core::types::{LoginPhase, User};
use tracing::{debug, info, warn};
use url::Url;

use crate::ClientError;
use crate::bridge::BridgeApi;
use crate::store::UserStore;

/// TMDB page where the user approves a request token.
pub const AUTHORIZE_BASE: &str = "https://www.themoviedb.org/authenticate";

/// Query parameters TMDB appends when redirecting back to `/auth/callback`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub request_token: Option<String>,
    pub approved: bool,
    pub denied: bool,
}

impl CallbackParams {
    /// Parse a raw query string (without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "request_token" if !value.is_empty() => {
                    params.request_token = Some(value.into_owned())
                }
                "approved" => params.approved = value == "true",
                "denied" => params.denied = value == "true",
                _ => {}
            }
        }
        params
    }
}

/// Where the shell navigates after handling a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    Home,
    Login,
}

pub struct AppShell<B: BridgeApi> {
    bridge: B,
    store: UserStore,
    phase: LoginPhase,
    public_url: Url,
}

impl<B: BridgeApi> AppShell<B> {
    pub fn new(bridge: B, store: UserStore, public_url: Url) -> Self {
        Self {
            bridge,
            store,
            phase: LoginPhase::Anonymous,
            public_url,
        }
    }

    pub fn phase(&self) -> LoginPhase {
        self.phase
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    fn transition(&mut self, next: LoginPhase) {
        if self.phase.can_transition_to(next) {
            debug!(from = %self.phase, to = %next, "login phase");
            self.phase = next;
        } else {
            warn!(from = %self.phase, to = %next, "ignoring illegal login transition");
        }
    }

    /// Drop the local user and return to `Anonymous`.
    fn reset_local(&mut self) {
        self.store.logout();
        if self.phase != LoginPhase::Anonymous {
            self.transition(LoginPhase::Anonymous);
        }
    }

    fn deny(&mut self) -> Landing {
        self.store.logout();
        self.transition(LoginPhase::Denied);
        self.transition(LoginPhase::Anonymous);
        Landing::Login
    }

    /// Obtain a request token and return the TMDB approval URL to navigate to.
    pub async fn begin_login(&mut self) -> Result<Url, ClientError> {
        let reply = self.bridge.request_token().await?;
        let token = match reply.request_token {
            Some(token) if reply.success => token,
            _ => {
                return Err(ClientError::Bridge {
                    status: 200,
                    message: "no request token issued".to_string(),
                });
            }
        };
        self.transition(LoginPhase::TokenRequested);

        let callback = self.public_url.join("/auth/callback")?;
        let mut url = Url::parse(AUTHORIZE_BASE)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(&token);
        url.query_pairs_mut()
            .append_pair("redirect_to", callback.as_str());
        Ok(url)
    }

    /// Finish the handshake after TMDB redirects back.
    ///
    /// A denial, a missing token or any bridge failure lands on the login
    /// page with the store empty. A callback arriving while someone is
    /// logged in starts from a clean `Anonymous` state.
    pub async fn handle_callback(&mut self, params: &CallbackParams) -> Landing {
        if self.phase.is_authenticated() {
            debug!("callback while authenticated, dropping previous user");
            self.reset_local();
        }

        let token = match params.request_token.as_deref() {
            Some(token) if params.approved && !params.denied => token,
            _ => {
                info!("login was not approved");
                return self.deny();
            }
        };

        match self.bridge.create_session(token).await {
            Ok(created) if created.success => {}
            Ok(_) => {
                warn!("session was not created");
                return self.deny();
            }
            Err(e) => {
                warn!(error = %e, "create-session failed");
                return self.deny();
            }
        }
        self.transition(LoginPhase::SessionCreated);

        match self.bridge.login_user().await {
            Ok(user) => {
                info!(user_id = user.id, "logged in");
                self.store.set_user(Some(user));
                self.transition(LoginPhase::Authenticated);
                Landing::Home
            }
            Err(e) => {
                warn!(error = %e, "login-user failed after session creation");
                self.deny()
            }
        }
    }

    /// Re-derive the user from an existing session cookie on startup.
    ///
    /// A 401 from the bridge just means nobody is logged in.
    pub async fn restore(&mut self) -> Result<Option<User>, ClientError> {
        match self.bridge.login_user().await {
            Ok(user) => {
                self.store.set_user(Some(user.clone()));
                self.transition(LoginPhase::Authenticated);
                Ok(Some(user))
            }
            Err(ClientError::Bridge { status: 401, .. }) => {
                self.reset_local();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Delete the session and clear the store.
    ///
    /// The local user is cleared even when the bridge call fails; the error
    /// is still returned.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let result = self.bridge.delete_session().await;
        self.reset_local();
        match result {
            Ok(reply) if !reply.success => {
                warn!(message = ?reply.status_message, "session delete was refused");
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

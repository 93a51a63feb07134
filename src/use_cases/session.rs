use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::domain::{
    AuthApi, ExpiryHook, LoginRequest, NormalizedError, SessionInvalidator, SessionMarker,
    SessionState, SignupRequest,
};

// Writes `authenticated = false` when the transport reports an expired session.
struct StateInvalidator {
    state: Arc<watch::Sender<SessionState>>,
}

impl SessionInvalidator for StateInvalidator {
    fn invalidate(&self) {
        self.state.send_modify(|state| state.authenticated = false);
        tracing::info!("session invalidated");
    }
}

// Process-wide authentication state machine. It is the only writer of
// `SessionState`; readers subscribe through `subscribe()`.
pub struct AuthSessionController<A, M> {
    api: A,
    marker: M,
    state: Arc<watch::Sender<SessionState>>,
    hook: ExpiryHook,
    invalidator: Arc<dyn SessionInvalidator>,
}

impl<A, M> AuthSessionController<A, M>
where
    A: AuthApi,
    M: SessionMarker,
{
    // Builds the controller without touching the hook or the network.
    pub fn new(api: A, marker: M, hook: ExpiryHook) -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        let state = Arc::new(tx);
        let invalidator: Arc<dyn SessionInvalidator> = Arc::new(StateInvalidator {
            state: Arc::clone(&state),
        });
        Self {
            api,
            marker,
            state,
            hook,
            invalidator,
        }
    }

    // Installs the expiry handler and runs the initial session probe.
    pub async fn mount(api: A, marker: M, hook: ExpiryHook) -> Self {
        let controller = Self::new(api, marker, hook);
        controller.hook.install(Arc::clone(&controller.invalidator));
        controller.check_auth().await;
        controller
    }

    // Idempotent. Leaves the slot alone if another controller took it over.
    pub fn unmount(&self) {
        if self.hook.remove(&self.invalidator) {
            tracing::debug!("session controller unmounted");
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn invalidator(&self) -> Arc<dyn SessionInvalidator> {
        Arc::clone(&self.invalidator)
    }

    // Status probe; failures only ever mean "not authenticated".
    #[tracing::instrument(name = "check_auth", skip_all)]
    pub async fn check_auth(&self) -> bool {
        let authenticated = match self.api.me().await {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(code = %err.code, status = err.status, "session probe failed");
                false
            }
        };
        self.state.send_modify(|state| {
            state.authenticated = authenticated;
            state.loading = false;
        });
        authenticated
    }

    // Re-validates the session whenever the host UI regains focus.
    pub async fn on_focus(&self) -> bool {
        self.check_auth().await
    }

    #[tracing::instrument(name = "login", skip_all, fields(email = %req.email))]
    pub async fn login(&self, req: &LoginRequest) -> Result<(), NormalizedError> {
        match self.api.login(req).await {
            Ok(()) => {
                self.set_authenticated(true);
                tracing::info!("login succeeded");
                Ok(())
            }
            Err(err) => {
                self.set_authenticated(false);
                tracing::warn!(code = %err.code, status = err.status, "login failed");
                Err(err)
            }
        }
    }

    // Local state is cleared whether or not the backend call succeeds.
    #[tracing::instrument(name = "logout", skip_all)]
    pub async fn logout(&self) -> Result<(), NormalizedError> {
        let result = self.api.logout().await;
        self.set_authenticated(false);
        self.marker.clear();
        match &result {
            Ok(()) => tracing::info!("logout succeeded"),
            Err(err) => {
                tracing::warn!(code = %err.code, status = err.status, "logout call failed")
            }
        }
        result
    }

    #[tracing::instrument(name = "signup", skip_all, fields(email = %req.email))]
    pub async fn signup(&self, req: &SignupRequest) -> Result<(), NormalizedError> {
        self.api.signup(req).await.inspect_err(|err| {
            tracing::warn!(code = %err.code, status = err.status, "signup failed");
        })
    }

    fn set_authenticated(&self, authenticated: bool) {
        self.state
            .send_modify(|state| state.authenticated = authenticated);
    }
}

impl<A, M> AuthSessionController<A, M>
where
    A: AuthApi + 'static,
    M: SessionMarker + 'static,
{
    // One probe per focus event. Probes are not coalesced: overlapping ones
    // race and whichever finishes last decides the state.
    pub fn watch_focus(self: Arc<Self>, mut focus_rx: mpsc::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while focus_rx.recv().await.is_some() {
                let controller = Arc::clone(&self);
                tokio::spawn(async move {
                    controller.on_focus().await;
                });
            }
        })
    }
}

impl<A, M> Drop for AuthSessionController<A, M> {
    fn drop(&mut self) {
        self.hook.remove(&self.invalidator);
    }
}

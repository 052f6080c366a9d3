/// Two-thirds round arithmetic.
pub mod round;
/// Operator password gate and signed session cookies.
pub mod session;

use std::sync::Arc;

use crate::dao::guess_store::GuessStore;

pub use self::session::{SessionContext, SessionGate};

/// Shared handle passed to every handler.
pub type SharedState = Arc<AppState>;

/// Central application state: the store handle and the session gate.
///
/// Both are fixed at startup; nothing per-client lives here.
pub struct AppState {
    store: Arc<dyn GuessStore>,
    gate: SessionGate,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(store: Arc<dyn GuessStore>, gate: SessionGate) -> SharedState {
        Arc::new(Self { store, gate })
    }

    /// Handle to the guess and cipher store.
    pub fn store(&self) -> Arc<dyn GuessStore> {
        Arc::clone(&self.store)
    }

    /// Password gate shared by every privileged route.
    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }
}

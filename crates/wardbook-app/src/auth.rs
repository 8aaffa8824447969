// SPDX-License-Identifier: Apache-2.0

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use wardbook_model::Session;
use wardbook_service::SessionEvent;

use crate::AppState;

/// What the guard sees: whether the bootstrap has finished, and who (if
/// anyone) is signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub loading: bool,
    pub session: Option<Session>,
}

/// Process-wide session state. Initialised by the bootstrap, mutated only by
/// sign-in, sign-up, sign-out, and reconciliation; everything else reads
/// snapshots through here.
#[derive(Debug)]
pub struct AuthState {
    inner: RwLock<AuthSnapshot>,
}

impl AuthState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(AuthSnapshot {
                loading: true,
                session: None,
            }),
        }
    }

    pub async fn snapshot(&self) -> AuthSnapshot {
        self.inner.read().await.clone()
    }

    pub async fn set_session(&self, session: Option<Session>) {
        self.inner.write().await.session = session;
    }

    pub async fn finish_loading(&self) {
        self.inner.write().await.loading = false;
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Bootstrap, local phase: adopt whatever the session file holds so the
/// first render is optimistic. Must run before the guard's first decision;
/// the process stays `loading` until [`reconcile_session`] completes.
pub async fn load_local_session(state: &AppState) {
    if let Some(session) = state.session_file.load() {
        debug!(account_id = %session.account_id, "adopting persisted session");
        state.auth.set_session(Some(session)).await;
    }
}

/// Bootstrap, remote phase: ask the service for its live session. A local
/// session the service no longer recognizes is stale — cleared silently,
/// never surfaced as an error. Only after this resolves does the guard stop
/// answering `Loading`.
pub async fn reconcile_session(state: &AppState) {
    match state.service.current_session().await {
        Ok(None) => {
            let snapshot = state.auth.snapshot().await;
            if snapshot.session.is_some() {
                debug!("no live service session; clearing stale local session");
                state.session_file.clear();
                state.auth.set_session(None).await;
            }
        }
        Ok(Some(_)) => {}
        Err(err) => {
            // Not a "no session" report; keep the optimistic session rather
            // than signing the operator out on a transport failure.
            warn!(error = %err, "session reconciliation failed");
        }
    }
    state.auth.finish_loading().await;
}

/// Owns the session-event listener task; aborting it on drop guarantees no
/// handler fires after teardown.
#[derive(Debug)]
pub struct ListenerGuard {
    handle: JoinHandle<()>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Standing subscription to service session events. A `SignedOut` push
/// clears both the session file and the in-memory session.
pub fn spawn_session_listener(state: &AppState) -> ListenerGuard {
    let mut events = state.service.subscribe();
    let state = state.clone();
    let handle = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::SignedOut) => {
                    state.session_file.clear();
                    state.auth.set_session(None).await;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "session event listener lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
    ListenerGuard { handle }
}

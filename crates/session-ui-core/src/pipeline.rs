use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::SessionUiConfig;
use crate::presentation::Presentation;
use crate::session::{self, Role, UserSession, resolve_session};
use crate::store::{KeyValueStore, StoreChange};
use crate::view::{RenderReport, SlotHost, render};

/// Host navigation used after logout.
pub trait Navigator {
    fn navigate(&self, path: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub session: UserSession,
    pub presentation: Presentation,
}

/// Resolve → present → reconcile, re-run on every trigger.
///
/// The last resolved session is cached only for inspection; slots are
/// written exclusively from a fresh resolution inside [`Self::refresh`].
pub struct SessionUiState<S, H> {
    store: S,
    host: H,
    config: SessionUiConfig,
    session: UserSession,
}

impl<S, H> SessionUiState<S, H>
where
    S: KeyValueStore,
    H: SlotHost,
{
    pub fn new(store: S, host: H, config: SessionUiConfig) -> Self {
        Self {
            store,
            host,
            config,
            session: UserSession::anonymous(),
        }
    }

    pub fn refresh(&mut self) -> RenderReport {
        self.session = resolve_session(&self.store, &self.config.storage_keys);
        render(&self.session, &mut self.host, self.config.moderator_badge)
    }

    /// Re-runs the pipeline when the change touches an identity key. Returns
    /// whether it did.
    pub fn handle_store_change(&mut self, change: &StoreChange) -> bool {
        if !change.touches_identity(&self.config.storage_keys) {
            return false;
        }
        let key = change.key.as_deref().unwrap_or("*");
        debug!(key, "identity changed in another view");
        self.refresh();
        true
    }

    pub fn logout<N>(&mut self, navigator: &N)
    where
        N: Navigator + ?Sized,
    {
        session::logout(&self.store, &self.config.storage_keys);
        self.refresh();
        info!(login_path = %self.config.login_path, "logged out");
        navigator.navigate(&self.config.login_path);
    }

    pub fn login_succeeded(
        &mut self,
        identity: &str,
        display_name: Option<&str>,
        role: Option<Role>,
    ) {
        if session::record_login(
            &self.store,
            &self.config.storage_keys,
            identity,
            display_name,
            role,
        ) {
            info!("login recorded");
        } else {
            warn!("ignoring login callback without an identity");
        }
        self.refresh();
    }

    #[must_use]
    pub fn session(&self) -> &UserSession {
        &self.session
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session: self.session.clone(),
            presentation: Presentation::from_session(&self.session, self.config.moderator_badge),
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub fn config(&self) -> &SessionUiConfig {
        &self.config
    }
}

/// Subscribes a shared pipeline to its store's change notifications.
///
/// The listener holds a weak reference, so dropping the state ends the
/// subscription's effect.
pub fn subscribe_to_changes<S, H>(state: &Rc<RefCell<SessionUiState<S, H>>>)
where
    S: KeyValueStore + 'static,
    H: SlotHost + 'static,
{
    let weak = Rc::downgrade(state);
    let listener = Rc::new(move |change: &StoreChange| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let Ok(mut ui) = shared.try_borrow_mut() else {
            warn!("session ui busy, dropping store change notification");
            return;
        };
        ui.handle_store_change(change);
    });
    state.borrow().store().subscribe(listener);
}

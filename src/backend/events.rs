//! Auth state change notifications
//!
//! The backend client owns an [`AuthEvents`] hub. Interested parties register a
//! listener with [`AuthEvents::subscribe`] and get back a [`Subscription`];
//! dropping it (or calling [`Subscription::unsubscribe`]) detaches the listener.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use crate::models::Session;

/// Kind of auth state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthChangeEvent {
    /// A session was restored from local storage at startup
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

impl fmt::Display for AuthChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InitialSession => "INITIAL_SESSION",
            Self::SignedIn => "SIGNED_IN",
            Self::SignedOut => "SIGNED_OUT",
            Self::TokenRefreshed => "TOKEN_REFRESHED",
            Self::UserUpdated => "USER_UPDATED",
        };
        write!(f, "{}", name)
    }
}

type Listener = Arc<dyn Fn(AuthChangeEvent, Option<&Session>) + Send + Sync>;
type ListenerMap = RwLock<BTreeMap<u64, Listener>>;

fn read_listeners(map: &ListenerMap) -> RwLockReadGuard<'_, BTreeMap<u64, Listener>> {
    map.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_listeners(map: &ListenerMap) -> RwLockWriteGuard<'_, BTreeMap<u64, Listener>> {
    map.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Registry of auth change listeners
#[derive(Default)]
pub struct AuthEvents {
    listeners: Arc<ListenerMap>,
    next_id: AtomicU64,
}

impl AuthEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it stays attached until the returned
    /// subscription is released
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(AuthChangeEvent, Option<&Session>) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        write_listeners(&self.listeners).insert(id, Arc::new(listener));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Notify every listener, in registration order
    pub fn emit(&self, event: AuthChangeEvent, session: Option<&Session>) {
        // Snapshot first so listeners may subscribe or unsubscribe re-entrantly
        let listeners: Vec<Listener> = read_listeners(&self.listeners).values().cloned().collect();

        tracing::debug!(%event, listeners = listeners.len(), "auth state change");

        for listener in listeners {
            listener(event, session);
        }
    }

    /// Number of attached listeners
    pub fn listener_count(&self) -> usize {
        read_listeners(&self.listeners).len()
    }
}

impl fmt::Debug for AuthEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle for a registered listener
#[must_use = "dropping a Subscription detaches the listener immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerMap>,
}

impl Subscription {
    /// Detach the listener
    pub fn unsubscribe(self) {
        // Drop does the work
    }

    fn detach(&self) {
        if let Some(listeners) = self.listeners.upgrade() {
            write_listeners(&listeners).remove(&self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// The current session plus the hub that announces changes to it
///
/// Every backend implementation embeds one of these so that session changes
/// and their notifications always happen together.
#[derive(Debug, Default)]
pub struct SessionSlot {
    current: RwLock<Option<Session>>,
    events: AuthEvents,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &AuthEvents {
        &self.events
    }

    /// Clone of the current session, if any
    pub fn get(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Store a session and announce it
    pub fn establish(&self, session: Session, event: AuthChangeEvent) {
        {
            let mut current = self
                .current
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *current = Some(session.clone());
        }
        self.events.emit(event, Some(&session));
    }

    /// Drop the session and announce the sign-out
    pub fn clear(&self) {
        {
            let mut current = self
                .current
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *current = None;
        }
        self.events.emit(AuthChangeEvent::SignedOut, None);
    }
}

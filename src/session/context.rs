//! Application session context
//!
//! [`AppContext`] is handed to every operation that needs to know who is
//! signed in. It starts out unauthenticated and follows the backend's auth
//! events for as long as it lives.

use std::sync::{Arc, RwLock};

use crate::backend::{AuthChangeEvent, Backend, Subscription};
use crate::error::{FinwiseError, FinwiseResult};
use crate::models::{Money, Profile, Session, User, DEFAULT_SAVINGS_GOAL};
use crate::storage::SessionStore;

/// Bucket receipt images are uploaded to unless configured otherwise
pub const DEFAULT_BILLS_BUCKET: &str = "bills";

type SharedUser = Arc<RwLock<Option<User>>>;

pub struct AppContext {
    backend: Arc<dyn Backend>,
    user: SharedUser,
    store: Option<SessionStore>,
    default_goal: Money,
    bills_bucket: String,
    subscription: Subscription,
}

impl AppContext {
    /// Context without session persistence
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self::build(backend, None)
    }

    /// Context that persists the session to `store` on every auth change
    pub fn with_session_store(backend: Arc<dyn Backend>, store: SessionStore) -> Self {
        Self::build(backend, Some(store))
    }

    fn build(backend: Arc<dyn Backend>, store: Option<SessionStore>) -> Self {
        let user: SharedUser = Arc::new(RwLock::new(None));

        let listener_user = Arc::clone(&user);
        let listener_store = store.clone();
        let subscription = backend.auth_events().subscribe(move |event, session| {
            {
                let mut current = listener_user
                    .write()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                *current = match event {
                    AuthChangeEvent::SignedOut => None,
                    _ => session.map(|s| s.user.clone()),
                };
            }

            if let Some(store) = &listener_store {
                persist(store, event, session);
            }
        });

        Self {
            backend,
            user,
            store,
            default_goal: DEFAULT_SAVINGS_GOAL,
            bills_bucket: DEFAULT_BILLS_BUCKET.to_string(),
            subscription,
        }
    }

    /// Goal written into profiles created at sign-up
    pub fn with_default_goal(mut self, goal: Money) -> Self {
        self.default_goal = goal;
        self
    }

    pub fn with_bills_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bills_bucket = bucket.into();
        self
    }

    /// Restore a persisted session, refreshing it if it is about to expire
    ///
    /// A session the provider refuses to refresh is dropped; the context then
    /// simply stays signed out.
    pub fn initialize(&self) -> FinwiseResult<Option<User>> {
        let Some(store) = &self.store else {
            return Ok(self.user());
        };

        if let Some(session) = store.load()? {
            tracing::debug!(user_id = %session.user.id, "restoring stored session");
            self.backend.restore_session(session);

            match self.ensure_fresh_session() {
                Ok(_) => {}
                Err(err) if err.is_auth() => {
                    tracing::info!(error = %err, "stored session could not be refreshed");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(self.user())
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn bills_bucket(&self) -> &str {
        &self.bills_bucket
    }

    pub fn default_goal(&self) -> Money {
        self.default_goal
    }

    /// The signed-in user, if any
    pub fn user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The signed-in user, or [`FinwiseError::NotAuthenticated`]
    pub fn require_user(&self) -> FinwiseResult<User> {
        self.user().ok_or(FinwiseError::NotAuthenticated)
    }

    pub fn is_signed_in(&self) -> bool {
        self.user().is_some()
    }

    /// Sign in with email and password
    ///
    /// Provider rejections come back as [`FinwiseError::Auth`] carrying the
    /// provider's message.
    pub fn sign_in(&self, email: &str, password: &str) -> FinwiseResult<Session> {
        let session = self.backend.sign_in_with_password(email, password)?;
        tracing::info!(user_id = %session.user.id, "signed in");
        Ok(session)
    }

    /// Create an account and its profile
    ///
    /// Returns the new session, or `None` when the provider wants the email
    /// confirmed first. If the profile insert fails the account still exists;
    /// that surfaces as [`FinwiseError::ProfileCreationFailed`].
    pub fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> FinwiseResult<Option<Session>> {
        let outcome = self.backend.sign_up(email, password, username)?;
        let user = outcome
            .user
            .ok_or_else(|| FinwiseError::Auth("User creation failed".into()))?;

        let profile = Profile::new(user.id, username, self.default_goal);
        if let Err(err) = self.backend.insert_profile(&profile) {
            tracing::error!(user_id = %user.id, error = %err, "account created without profile");
            return Err(FinwiseError::ProfileCreationFailed {
                user_id: user.id,
                reason: err.to_string(),
            });
        }

        tracing::info!(user_id = %user.id, "signed up");
        Ok(outcome.session)
    }

    pub fn sign_out(&self) -> FinwiseResult<()> {
        let result = self.backend.sign_out();
        tracing::info!("signed out");
        result
    }

    /// Refresh the access token if it expires within the refresh margin
    pub fn ensure_fresh_session(&self) -> FinwiseResult<Option<Session>> {
        match self.backend.session() {
            Some(session) if session.needs_refresh() => {
                tracing::debug!(expires_at = session.expires_at, "refreshing session");
                self.backend.refresh_session().map(Some)
            }
            other => Ok(other),
        }
    }

    /// Pick up sign-in state changes made by another process
    ///
    /// A removed session file signs this context out; a replaced one is
    /// adopted.
    pub fn sync_session(&self) -> FinwiseResult<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };

        let stored = store.load()?;
        let current = self.backend.session();

        match (stored, current) {
            (None, Some(_)) => {
                tracing::debug!("session removed elsewhere");
                self.backend.forget_session();
            }
            (Some(stored), current) if current.as_ref() != Some(&stored) => {
                tracing::debug!(user_id = %stored.user.id, "session replaced elsewhere");
                self.backend.restore_session(stored);
            }
            _ => {}
        }
        Ok(())
    }

    /// Stop following auth events
    pub fn teardown(self) {
        let Self { subscription, .. } = self;
        subscription.unsubscribe();
    }
}

fn persist(store: &SessionStore, event: AuthChangeEvent, session: Option<&Session>) {
    let result = match (event, session) {
        (AuthChangeEvent::SignedOut, _) => store.clear(),
        // Already came from the store
        (AuthChangeEvent::InitialSession, _) => Ok(()),
        (_, Some(session)) => store.save(session),
        (_, None) => Ok(()),
    };

    if let Err(err) = result {
        tracing::warn!(%event, error = %err, "failed to persist session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use tempfile::TempDir;

    fn context() -> (Arc<MemoryBackend>, AppContext) {
        let backend = Arc::new(MemoryBackend::new());
        let ctx = AppContext::new(backend.clone());
        (backend, ctx)
    }

    #[test]
    fn test_starts_unauthenticated() {
        let (_, ctx) = context();
        assert!(ctx.user().is_none());
        assert!(matches!(
            ctx.require_user().unwrap_err(),
            FinwiseError::NotAuthenticated
        ));
    }

    #[test]
    fn test_user_follows_auth_events() {
        let (backend, ctx) = context();

        ctx.sign_up("asha@example.com", "secret123", "asha").unwrap();
        let user = ctx.user().unwrap();
        assert_eq!(user.display_name(), "asha");

        ctx.sign_out().unwrap();
        assert!(ctx.user().is_none());

        ctx.sign_in("asha@example.com", "secret123").unwrap();
        assert_eq!(ctx.user().unwrap().id, user.id);

        // Changes made directly on the backend are seen too
        backend.forget_session();
        assert!(ctx.user().is_none());
    }

    #[test]
    fn test_sign_up_creates_profile_with_default_goal() {
        let (backend, ctx) = context();
        ctx.sign_up("asha@example.com", "secret123", "asha").unwrap();

        let user = ctx.require_user().unwrap();
        let profile = backend.profile(user.id).unwrap();
        assert_eq!(profile.username, "asha");
        assert_eq!(profile.savings_goal, Money::from_units(5000));
    }

    #[test]
    fn test_custom_default_goal() {
        let backend = Arc::new(MemoryBackend::new());
        let ctx = AppContext::new(backend.clone()).with_default_goal(Money::from_units(750));
        ctx.sign_up("asha@example.com", "secret123", "asha").unwrap();

        let user = ctx.require_user().unwrap();
        assert_eq!(
            backend.profile(user.id).unwrap().savings_goal,
            Money::from_units(750)
        );
    }

    #[test]
    fn test_profile_failure_is_distinct() {
        let (backend, ctx) = context();
        backend.fail_profile_insert(true);

        let err = ctx
            .sign_up("asha@example.com", "secret123", "asha")
            .unwrap_err();
        assert!(matches!(err, FinwiseError::ProfileCreationFailed { .. }));
        assert_eq!(backend.account_count(), 1);
        assert_eq!(backend.profile_count(), 0);
    }

    #[test]
    fn test_sign_in_error_passes_through() {
        let (_, ctx) = context();
        let err = ctx.sign_in("nobody@example.com", "whatever").unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert!(ctx.user().is_none());
    }

    #[test]
    fn test_teardown_releases_listener() {
        let (backend, ctx) = context();
        assert_eq!(backend.auth_events().listener_count(), 1);
        ctx.teardown();
        assert_eq!(backend.auth_events().listener_count(), 0);
    }

    #[test]
    fn test_ensure_fresh_session_refreshes_near_expiry() {
        let (backend, ctx) = context();
        backend.set_token_ttl(30);
        let session = ctx
            .sign_up("asha@example.com", "secret123", "asha")
            .unwrap()
            .unwrap();

        let fresh = ctx.ensure_fresh_session().unwrap().unwrap();
        assert_ne!(fresh.access_token, session.access_token);
        assert_eq!(fresh.user.id, session.user.id);
    }

    #[test]
    fn test_session_persisted_and_restored() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::new(temp_dir.path().join("session.json"));
        let backend = Arc::new(MemoryBackend::new());

        let ctx = AppContext::with_session_store(backend.clone(), store.clone());
        ctx.sign_up("asha@example.com", "secret123", "asha").unwrap();
        let user = ctx.require_user().unwrap();
        assert!(store.load().unwrap().is_some());
        ctx.teardown();

        // A second run starts with no client-side session
        backend.session_slot().clear();
        assert!(backend.session().is_none());
        assert!(store.load().unwrap().is_some());

        let ctx = AppContext::with_session_store(backend.clone(), store.clone());
        let restored = ctx.initialize().unwrap().unwrap();
        assert_eq!(restored.id, user.id);

        ctx.sign_out().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_sync_session_picks_up_external_sign_out() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::new(temp_dir.path().join("session.json"));
        let backend = Arc::new(MemoryBackend::new());
        let ctx = AppContext::with_session_store(backend.clone(), store.clone());

        ctx.sign_up("asha@example.com", "secret123", "asha").unwrap();
        assert!(ctx.is_signed_in());

        store.clear().unwrap();
        ctx.sync_session().unwrap();
        assert!(!ctx.is_signed_in());
        assert!(backend.session().is_none());
    }
}

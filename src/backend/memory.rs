//! In-process backend
//!
//! Behaves like the hosted backend as far as FinWise can observe: accounts,
//! row-level ownership of profiles and expenses, blob storage and auth events.
//! Failure switches let tests drive the partial-completion paths.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::events::{AuthChangeEvent, SessionSlot};
use super::supabase::public_object_url;
use super::{Backend, SignUpOutcome};
use crate::error::{FinwiseError, FinwiseResult};
use crate::models::{
    Expense, ExpenseId, Money, NewExpense, Profile, Session, User, UserId, UserMetadata,
};

/// Base URL used for public object URLs
pub const MEMORY_BASE_URL: &str = "http://localhost:54321";

const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

/// A stored blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Default)]
struct Failures {
    profile_insert: bool,
    expense_insert: bool,
    reads: bool,
    goal_update: bool,
    /// Successful uploads left before uploads start failing
    uploads_before_failure: Option<usize>,
}

#[derive(Debug)]
struct MemoryState {
    /// Keyed by lowercase email
    accounts: HashMap<String, Account>,
    refresh_tokens: HashMap<String, UserId>,
    profiles: HashMap<UserId, Profile>,
    expenses: Vec<Expense>,
    /// Keyed by "{bucket}/{path}"
    objects: BTreeMap<String, StoredObject>,
    require_confirmation: bool,
    token_ttl_secs: i64,
    failures: Failures,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            accounts: HashMap::new(),
            refresh_tokens: HashMap::new(),
            profiles: HashMap::new(),
            expenses: Vec::new(),
            objects: BTreeMap::new(),
            require_confirmation: false,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            failures: Failures::default(),
        }
    }
}

impl MemoryState {
    fn issue_session(&mut self, user: User) -> Session {
        let refresh_token = random_token("refresh");
        self.refresh_tokens.insert(refresh_token.clone(), user.id);

        Session {
            access_token: random_token("access"),
            refresh_token,
            expires_at: Utc::now().timestamp() + self.token_ttl_secs,
            user,
        }
    }
}

fn random_token(kind: &str) -> String {
    format!("mem-{}-{:016x}", kind, rand::random::<u64>())
}

fn rls_violation(table: &str) -> FinwiseError {
    FinwiseError::Backend {
        status: 403,
        message: format!("new row violates row-level security policy for table \"{}\"", table),
    }
}

fn injected(operation: &str) -> FinwiseError {
    FinwiseError::Backend {
        status: 500,
        message: format!("injected failure: {}", operation),
    }
}

/// In-memory backend for tests and offline experiments
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    slot: SessionSlot,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The signed-in user, or an error when there is no session
    fn session_user(&self) -> FinwiseResult<UserId> {
        self.slot
            .get()
            .map(|session| session.user.id)
            .ok_or(FinwiseError::NotAuthenticated)
    }

    // Configuration

    /// Make sign-up return no session, as with email confirmation enabled
    pub fn require_email_confirmation(&self, required: bool) {
        self.state().require_confirmation = required;
    }

    /// Lifetime of issued access tokens
    pub fn set_token_ttl(&self, secs: i64) {
        self.state().token_ttl_secs = secs;
    }

    // Failure injection

    pub fn fail_profile_insert(&self, fail: bool) {
        self.state().failures.profile_insert = fail;
    }

    pub fn fail_expense_insert(&self, fail: bool) {
        self.state().failures.expense_insert = fail;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state().failures.reads = fail;
    }

    pub fn fail_goal_update(&self, fail: bool) {
        self.state().failures.goal_update = fail;
    }

    /// Let `n` uploads succeed, then fail every later one
    pub fn fail_uploads_after(&self, n: usize) {
        self.state().failures.uploads_before_failure = Some(n);
    }

    // Inspection

    pub fn account_count(&self) -> usize {
        self.state().accounts.len()
    }

    pub fn profile_count(&self) -> usize {
        self.state().profiles.len()
    }

    pub fn profile(&self, user_id: UserId) -> Option<Profile> {
        self.state().profiles.get(&user_id).cloned()
    }

    /// Every stored expense, regardless of owner, in insertion order
    pub fn expenses(&self) -> Vec<Expense> {
        self.state().expenses.clone()
    }

    /// Stored object keys ("{bucket}/{path}"), sorted
    pub fn object_keys(&self) -> Vec<String> {
        self.state().objects.keys().cloned().collect()
    }

    pub fn object(&self, bucket: &str, path: &str) -> Option<StoredObject> {
        self.state()
            .objects
            .get(&format!("{}/{}", bucket, path))
            .cloned()
    }

    /// Insert an expense directly, bypassing auth (test fixtures)
    pub fn seed_expense(&self, expense: Expense) {
        self.state().expenses.push(expense);
    }

    /// Expire the current session's access token without touching the refresh token
    pub fn expire_current_session(&self) {
        if let Some(mut session) = self.slot.get() {
            session.expires_at = Utc::now().timestamp() - 1;
            self.slot.establish(session, AuthChangeEvent::UserUpdated);
        }
    }
}

impl Backend for MemoryBackend {
    fn session_slot(&self) -> &SessionSlot {
        &self.slot
    }

    fn sign_up(&self, email: &str, password: &str, username: &str) -> FinwiseResult<SignUpOutcome> {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(FinwiseError::Auth(
                "Unable to validate email address: invalid format".into(),
            ));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(FinwiseError::Auth(format!(
                "Password should be at least {} characters.",
                MIN_PASSWORD_LEN
            )));
        }

        let (user, session) = {
            let mut state = self.state();
            if state.accounts.contains_key(&email) {
                return Err(FinwiseError::Auth("User already registered".into()));
            }

            let user = User {
                id: UserId::new(),
                email: email.clone(),
                user_metadata: UserMetadata {
                    username: Some(username.to_string()),
                },
            };
            state.accounts.insert(
                email,
                Account {
                    user: user.clone(),
                    password: password.to_string(),
                },
            );

            let session = if state.require_confirmation {
                None
            } else {
                Some(state.issue_session(user.clone()))
            };
            (user, session)
        };

        if let Some(session) = &session {
            self.slot.establish(session.clone(), AuthChangeEvent::SignedIn);
        }

        Ok(SignUpOutcome {
            user: Some(user),
            session,
        })
    }

    fn sign_in_with_password(&self, email: &str, password: &str) -> FinwiseResult<Session> {
        let session = {
            let mut state = self.state();
            let user = state
                .accounts
                .get(&email.trim().to_lowercase())
                .filter(|account| account.password == password)
                .map(|account| account.user.clone())
                .ok_or_else(|| FinwiseError::Auth("Invalid login credentials".into()))?;
            state.issue_session(user)
        };

        self.slot.establish(session.clone(), AuthChangeEvent::SignedIn);
        Ok(session)
    }

    fn refresh_session(&self) -> FinwiseResult<Session> {
        let current = self.slot.get().ok_or(FinwiseError::NotAuthenticated)?;

        let refreshed = {
            let mut state = self.state();
            match state.refresh_tokens.remove(&current.refresh_token) {
                Some(_) => Some(state.issue_session(current.user.clone())),
                None => None,
            }
        };

        match refreshed {
            Some(session) => {
                self.slot
                    .establish(session.clone(), AuthChangeEvent::TokenRefreshed);
                Ok(session)
            }
            None => {
                self.slot.clear();
                Err(FinwiseError::Auth("Invalid Refresh Token: Refresh Token Not Found".into()))
            }
        }
    }

    fn sign_out(&self) -> FinwiseResult<()> {
        if let Some(session) = self.slot.get() {
            self.state().refresh_tokens.remove(&session.refresh_token);
        }
        self.slot.clear();
        Ok(())
    }

    fn insert_profile(&self, profile: &Profile) -> FinwiseResult<()> {
        let caller = self.session_user()?;
        let mut state = self.state();

        if state.failures.profile_insert {
            return Err(injected("insert profile"));
        }
        if profile.id != caller {
            return Err(rls_violation("profiles"));
        }
        if state.profiles.contains_key(&profile.id) {
            return Err(FinwiseError::Backend {
                status: 409,
                message: "duplicate key value violates unique constraint \"profiles_pkey\"".into(),
            });
        }

        state.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    fn fetch_profile(&self, user_id: UserId) -> FinwiseResult<Profile> {
        let caller = self.session_user()?;
        let state = self.state();

        if state.failures.reads {
            return Err(injected("fetch profile"));
        }

        // Other users' rows are invisible, same as a missing row
        state
            .profiles
            .get(&user_id)
            .filter(|profile| profile.id == caller)
            .cloned()
            .ok_or_else(|| FinwiseError::profile_not_found(user_id.to_string()))
    }

    fn update_savings_goal(&self, user_id: UserId, goal: Money) -> FinwiseResult<()> {
        let caller = self.session_user()?;
        let mut state = self.state();

        if state.failures.goal_update {
            return Err(injected("update savings goal"));
        }

        // An update that matches no visible rows succeeds with no effect
        if user_id == caller {
            if let Some(profile) = state.profiles.get_mut(&user_id) {
                profile.savings_goal = goal;
            }
        }
        Ok(())
    }

    fn list_expenses(&self, user_id: UserId) -> FinwiseResult<Vec<Expense>> {
        let caller = self.session_user()?;
        let state = self.state();

        if state.failures.reads {
            return Err(injected("list expenses"));
        }
        if user_id != caller {
            return Ok(Vec::new());
        }

        let mut expenses: Vec<Expense> = state
            .expenses
            .iter()
            .filter(|expense| expense.user_id == user_id)
            .cloned()
            .collect();
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(expenses)
    }

    fn insert_expense(&self, expense: &NewExpense) -> FinwiseResult<Expense> {
        let caller = self.session_user()?;
        let mut state = self.state();

        if state.failures.expense_insert {
            return Err(injected("insert expense"));
        }
        if expense.user_id != caller {
            return Err(rls_violation("expenses"));
        }

        let stored = Expense {
            id: ExpenseId::new(),
            user_id: expense.user_id,
            amount: expense.amount,
            category: expense.category,
            description: expense.description.clone(),
            bill_images: expense.bill_images.clone(),
            created_at: expense.created_at,
        };
        state.expenses.push(stored.clone());
        Ok(stored)
    }

    fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> FinwiseResult<String> {
        self.session_user()?;
        let mut state = self.state();

        match state.failures.uploads_before_failure {
            Some(0) => return Err(injected("upload object")),
            Some(n) => state.failures.uploads_before_failure = Some(n - 1),
            None => {}
        }

        let key = format!("{}/{}", bucket, path);
        if state.objects.contains_key(&key) {
            return Err(FinwiseError::Backend {
                status: 409,
                message: "The resource already exists".into(),
            });
        }

        state.objects.insert(
            key,
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(path.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_object_url(MEMORY_BASE_URL, bucket, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn signed_up(backend: &MemoryBackend) -> Session {
        backend
            .sign_up("asha@example.com", "secret123", "asha")
            .unwrap()
            .session
            .unwrap()
    }

    #[test]
    fn test_sign_up_then_sign_in() {
        let backend = MemoryBackend::new();
        let first = signed_up(&backend);
        backend.sign_out().unwrap();
        assert!(backend.session().is_none());

        let second = backend
            .sign_in_with_password("ASHA@example.com", "secret123")
            .unwrap();
        assert_eq!(first.user.id, second.user.id);
        assert_ne!(first.access_token, second.access_token);
    }

    #[test]
    fn test_auth_errors() {
        let backend = MemoryBackend::new();
        signed_up(&backend);

        let err = backend.sign_up("asha@example.com", "secret123", "x").unwrap_err();
        assert_eq!(err.to_string(), "User already registered");

        let err = backend
            .sign_in_with_password("asha@example.com", "wrong")
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");

        let err = backend.sign_up("b@example.com", "123", "b").unwrap_err();
        assert!(err.is_auth());
    }

    #[test]
    fn test_confirmation_required_gives_no_session() {
        let backend = MemoryBackend::new();
        backend.require_email_confirmation(true);

        let outcome = backend.sign_up("a@example.com", "secret123", "a").unwrap();
        assert!(outcome.user.is_some());
        assert!(outcome.session.is_none());
        assert!(backend.session().is_none());
    }

    #[test]
    fn test_refresh_rotates_token() {
        let backend = MemoryBackend::new();
        let first = signed_up(&backend);

        let refreshed = backend.refresh_session().unwrap();
        assert_ne!(refreshed.refresh_token, first.refresh_token);

        // The old refresh token is spent
        backend.restore_session(first);
        assert!(backend.refresh_session().unwrap_err().is_auth());
        assert!(backend.session().is_none());
    }

    #[test]
    fn test_rows_are_owner_scoped() {
        let backend = MemoryBackend::new();
        let session = signed_up(&backend);
        let stranger = UserId::new();

        let err = backend
            .insert_profile(&Profile::new(stranger, "x", Money::from_units(1)))
            .unwrap_err();
        assert!(matches!(err, FinwiseError::Backend { status: 403, .. }));

        backend.seed_expense(Expense {
            id: ExpenseId::new(),
            user_id: stranger,
            amount: Money::from_units(10),
            category: Category::Food,
            description: String::new(),
            bill_images: Vec::new(),
            created_at: Utc::now(),
        });
        assert!(backend.list_expenses(session.user.id).unwrap().is_empty());
        assert!(backend.list_expenses(stranger).unwrap().is_empty());
    }

    #[test]
    fn test_data_calls_need_session() {
        let backend = MemoryBackend::new();
        let err = backend.list_expenses(UserId::new()).unwrap_err();
        assert!(matches!(err, FinwiseError::NotAuthenticated));
    }

    #[test]
    fn test_upload_failure_injection() {
        let backend = MemoryBackend::new();
        let session = signed_up(&backend);
        backend.fail_uploads_after(1);

        let first = format!("{}/a.png", session.user.id);
        let second = format!("{}/b.png", session.user.id);
        assert_eq!(
            backend.upload_object("bills", &first, b"a", "image/png").unwrap(),
            first
        );
        assert!(backend.upload_object("bills", &second, b"b", "image/png").is_err());
        assert_eq!(backend.object_keys(), vec![format!("bills/{}", first)]);
        assert_eq!(
            backend.object("bills", &first).unwrap().content_type,
            "image/png"
        );
    }

    #[test]
    fn test_public_url() {
        let backend = MemoryBackend::new();
        assert_eq!(
            backend.public_url("bills", "u/1.png"),
            "http://localhost:54321/storage/v1/object/public/bills/u/1.png"
        );
    }
}

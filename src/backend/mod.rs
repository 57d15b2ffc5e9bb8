//! Backend service access
//!
//! Everything FinWise stores lives in a hosted backend that provides auth,
//! row storage (profiles, expenses) and blob storage (receipt images). The
//! [`Backend`] trait is the seam: [`SupabaseBackend`] talks HTTP, and
//! [`MemoryBackend`] keeps everything in process for tests.
//!
//! A backend is stateful the way an auth SDK client is: it holds the current
//! session and announces changes to it through its [`AuthEvents`] hub.

pub mod events;
pub mod memory;
pub mod supabase;

pub use events::{AuthChangeEvent, AuthEvents, SessionSlot, Subscription};
pub use memory::MemoryBackend;
pub use supabase::SupabaseBackend;

use crate::error::FinwiseResult;
use crate::models::{Expense, Money, NewExpense, Profile, Session, User, UserId};

/// What the auth provider handed back from a sign-up
///
/// `session` is `None` when the provider requires email confirmation before
/// the first sign-in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignUpOutcome {
    pub user: Option<User>,
    pub session: Option<Session>,
}

pub trait Backend: Send + Sync {
    /// Session storage shared with the event hub
    fn session_slot(&self) -> &SessionSlot;

    fn auth_events(&self) -> &AuthEvents {
        self.session_slot().events()
    }

    /// The current session, if signed in
    fn session(&self) -> Option<Session> {
        self.session_slot().get()
    }

    /// Adopt a session persisted by an earlier run
    fn restore_session(&self, session: Session) {
        self.session_slot()
            .establish(session, AuthChangeEvent::InitialSession);
    }

    /// Drop the local session without contacting the provider
    fn forget_session(&self) {
        self.session_slot().clear();
    }

    // Auth

    fn sign_up(&self, email: &str, password: &str, username: &str) -> FinwiseResult<SignUpOutcome>;

    fn sign_in_with_password(&self, email: &str, password: &str) -> FinwiseResult<Session>;

    /// Exchange the refresh token for a new session
    fn refresh_session(&self) -> FinwiseResult<Session>;

    /// Revoke the session at the provider and clear it locally
    fn sign_out(&self) -> FinwiseResult<()>;

    // Profiles

    fn insert_profile(&self, profile: &Profile) -> FinwiseResult<()>;

    fn fetch_profile(&self, user_id: UserId) -> FinwiseResult<Profile>;

    fn update_savings_goal(&self, user_id: UserId, goal: Money) -> FinwiseResult<()>;

    // Expenses

    /// All of a user's expenses, newest first
    fn list_expenses(&self, user_id: UserId) -> FinwiseResult<Vec<Expense>>;

    fn insert_expense(&self, expense: &NewExpense) -> FinwiseResult<Expense>;

    // Blob storage

    /// Upload bytes and return the stored object path
    fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> FinwiseResult<String>;

    /// Public URL for a stored object
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

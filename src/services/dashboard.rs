//! Dashboard state
//!
//! Holds the signed-in user's expenses and profile as last fetched. Fetch
//! failures are logged and leave the previous values in place, so a flaky
//! connection shows stale numbers rather than an error screen.

use crate::models::{Expense, Money, Profile};
use crate::session::AppContext;

use super::summary::{category_breakdown, BudgetSummary, CategoryTotal};

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    expenses: Vec<Expense>,
    profile: Option<Profile>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch expenses and profile for the signed-in user
    ///
    /// Does nothing when signed out. The two reads are independent; either
    /// can fail without affecting the other.
    pub fn load(&mut self, ctx: &AppContext) {
        let Some(user) = ctx.user() else {
            tracing::debug!("dashboard load skipped, not signed in");
            return;
        };
        let backend = ctx.backend();

        match backend.list_expenses(user.id) {
            Ok(expenses) => {
                tracing::debug!(count = expenses.len(), "expenses loaded");
                self.expenses = expenses;
            }
            Err(err) => tracing::error!(error = %err, "Error fetching expenses"),
        }

        match backend.fetch_profile(user.id) {
            Ok(profile) => self.profile = Some(profile),
            Err(err) => tracing::error!(error = %err, "Error fetching profile"),
        }
    }

    /// Expenses, newest first
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn recent(&self, limit: usize) -> &[Expense] {
        &self.expenses[..self.expenses.len().min(limit)]
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn summary(&self) -> BudgetSummary {
        BudgetSummary::compute(&self.expenses, self.profile.as_ref())
    }

    pub fn breakdown(&self) -> Vec<CategoryTotal> {
        category_breakdown(&self.expenses)
    }

    /// Apply a goal change that the backend has already accepted
    pub fn set_goal_locally(&mut self, goal: Money) {
        if let Some(profile) = self.profile.as_mut() {
            profile.savings_goal = goal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Backend, MemoryBackend};
    use crate::models::{Category, NewExpense};
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    fn signed_in() -> (Arc<MemoryBackend>, AppContext) {
        let backend = Arc::new(MemoryBackend::new());
        let ctx = AppContext::new(backend.clone());
        ctx.sign_up("asha@example.com", "secret123", "asha").unwrap();
        (backend, ctx)
    }

    fn add(backend: &MemoryBackend, ctx: &AppContext, units: i64, minutes_ago: i64) {
        let user = ctx.require_user().unwrap();
        backend
            .insert_expense(&NewExpense {
                user_id: user.id,
                amount: Money::from_units(units),
                category: Category::Food,
                description: format!("{} units", units),
                bill_images: Vec::new(),
                created_at: Utc::now() - Duration::minutes(minutes_ago),
            })
            .unwrap();
    }

    #[test]
    fn test_load_newest_first() {
        let (backend, ctx) = signed_in();
        add(&backend, &ctx, 100, 30);
        add(&backend, &ctx, 200, 10);
        add(&backend, &ctx, 300, 20);

        let mut dashboard = Dashboard::new();
        dashboard.load(&ctx);

        let amounts: Vec<i64> = dashboard.expenses().iter().map(|e| e.amount.units()).collect();
        assert_eq!(amounts, vec![200, 300, 100]);
        assert_eq!(dashboard.recent(2).len(), 2);
        assert_eq!(dashboard.summary().total, Money::from_units(600));
        assert_eq!(dashboard.summary().remaining, Money::from_units(4400));
    }

    #[test]
    fn test_load_signed_out_is_noop() {
        let backend = Arc::new(MemoryBackend::new());
        let ctx = AppContext::new(backend);

        let mut dashboard = Dashboard::new();
        dashboard.load(&ctx);
        assert!(dashboard.expenses().is_empty());
        assert!(dashboard.profile().is_none());
    }

    #[test]
    fn test_failed_reload_keeps_previous_state() {
        let (backend, ctx) = signed_in();
        add(&backend, &ctx, 100, 0);

        let mut dashboard = Dashboard::new();
        dashboard.load(&ctx);
        assert_eq!(dashboard.expenses().len(), 1);

        add(&backend, &ctx, 50, 0);
        backend.fail_reads(true);
        dashboard.load(&ctx);

        assert_eq!(dashboard.expenses().len(), 1);
        assert!(dashboard.profile().is_some());
    }

    #[test]
    fn test_set_goal_locally() {
        let (_, ctx) = signed_in();
        let mut dashboard = Dashboard::new();
        dashboard.load(&ctx);

        dashboard.set_goal_locally(Money::from_units(8000));
        assert_eq!(dashboard.summary().goal, Some(Money::from_units(8000)));
    }
}

//! Expense service
//!
//! Reads and creates expenses for the signed-in user. Unlike the dashboard,
//! these calls return errors to the caller.

use crate::error::{FinwiseError, FinwiseResult};
use crate::models::Expense;
use crate::session::AppContext;

use super::expense_form::{ExpenseCreation, ExpenseDraft};

/// Service for expense queries and creation
pub struct ExpenseService<'a> {
    ctx: &'a AppContext,
}

impl<'a> ExpenseService<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    /// All of the user's expenses, newest first
    pub fn list(&self) -> FinwiseResult<Vec<Expense>> {
        let user = self.ctx.require_user()?;
        self.ctx.backend().list_expenses(user.id)
    }

    /// Find an expense by full id, short id ("exp-1a2b3c4d") or id prefix
    pub fn find(&self, query: &str) -> FinwiseResult<Expense> {
        let needle = query.trim();
        let needle = needle.strip_prefix("exp-").unwrap_or(needle).to_lowercase();
        if needle.is_empty() {
            return Err(FinwiseError::Validation("Expense id is empty".into()));
        }

        let mut matches: Vec<Expense> = self
            .list()?
            .into_iter()
            .filter(|e| e.id.to_string().starts_with(&needle))
            .collect();

        match matches.len() {
            0 => Err(FinwiseError::expense_not_found(query)),
            1 => Ok(matches.remove(0)),
            n => Err(FinwiseError::Validation(format!(
                "'{}' matches {} expenses; use a longer id",
                query, n
            ))),
        }
    }

    /// Public URLs for an expense's receipt images
    pub fn image_urls(&self, expense: &Expense) -> Vec<String> {
        let bucket = self.ctx.bills_bucket();
        expense
            .bill_images
            .iter()
            .map(|path| self.ctx.backend().public_url(bucket, path))
            .collect()
    }

    /// Upload the draft's images and insert the expense
    pub fn create(&self, draft: ExpenseDraft) -> FinwiseResult<Expense> {
        ExpenseCreation::new(self.ctx, draft).run()
    }
}

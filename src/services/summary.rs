//! Budget summary
//!
//! Pure aggregation over a user's expenses and profile. Nothing here is
//! cached; callers recompute whenever the inputs change.

use std::collections::HashMap;

use crate::models::{Category, Expense, Money, Profile};

/// Whether spending has gone past the goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    WithinBudget,
    Exceeded,
}

impl BudgetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::WithinBudget => "Within budget",
            Self::Exceeded => "Budget exceeded",
        }
    }
}

/// Totals against the savings goal
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    /// `None` when the profile has not been loaded
    pub goal: Option<Money>,
    pub total: Money,
    /// Goal minus total; zero without a profile
    pub remaining: Money,
    /// Total as a percentage of the goal, unclamped
    ///
    /// A zero goal gives NaN (nothing spent) or infinity.
    pub progress_percent: f64,
}

impl BudgetSummary {
    pub fn compute(expenses: &[Expense], profile: Option<&Profile>) -> Self {
        let total: Money = expenses.iter().map(|e| e.amount).sum();
        let goal = profile.map(|p| p.savings_goal);

        let (remaining, progress_percent) = match goal {
            Some(goal) => (
                goal - total,
                total.cents() as f64 / goal.cents() as f64 * 100.0,
            ),
            None => (Money::zero(), 0.0),
        };

        Self {
            goal,
            total,
            remaining,
            progress_percent,
        }
    }

    /// Progress for a bar: capped at 100, NaN drawn as empty
    pub fn bar_percent(&self) -> f64 {
        if self.progress_percent.is_nan() {
            0.0
        } else {
            self.progress_percent.min(100.0)
        }
    }

    pub fn status(&self) -> BudgetStatus {
        if self.progress_percent > 100.0 {
            BudgetStatus::Exceeded
        } else {
            BudgetStatus::WithinBudget
        }
    }

    pub fn is_exceeded(&self) -> bool {
        self.status() == BudgetStatus::Exceeded
    }
}

/// Spending in one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Money,
    pub count: usize,
}

/// Per-category totals, largest first
pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<Category, (Money, usize)> = HashMap::new();
    for expense in expenses {
        let entry = totals.entry(expense.category).or_insert((Money::zero(), 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category,
            total,
            count,
        })
        .collect();

    // Ties fall back to the fixed category order so output is stable
    breakdown.sort_by(|a, b| {
        b.total.cmp(&a.total).then_with(|| {
            let pos = |c: Category| Category::ALL.iter().position(|x| *x == c);
            pos(a.category).cmp(&pos(b.category))
        })
    });
    breakdown
}

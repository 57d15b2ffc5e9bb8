//! Savings goal CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::error::{FinwiseError, FinwiseResult};
use crate::models::Money;
use crate::services::Dashboard;
use crate::session::AppContext;

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Show the monthly savings goal
    Show,
    /// Set the monthly savings goal
    Set {
        /// New goal amount (e.g., "8000")
        amount: String,
    },
}

/// Handle a goal command
pub fn handle_goal_command(
    ctx: &AppContext,
    settings: &Settings,
    cmd: GoalCommands,
) -> FinwiseResult<()> {
    let user = ctx.require_user()?;

    match cmd {
        GoalCommands::Show => {
            let mut dashboard = Dashboard::new();
            dashboard.load(ctx);
            let profile = dashboard
                .profile()
                .ok_or_else(|| FinwiseError::profile_not_found(user.id.to_string()))?;
            println!("Monthly goal: {}", settings.format_money(profile.savings_goal));
        }

        GoalCommands::Set { amount } => {
            let goal = Money::parse(&amount).map_err(|e| {
                FinwiseError::Validation(format!(
                    "Invalid amount: '{}'. Use a format like '8000' or '8000.50'. Error: {}",
                    amount, e
                ))
            })?;
            if goal.is_negative() {
                return Err(FinwiseError::Validation("Goal cannot be negative".into()));
            }

            ctx.backend().update_savings_goal(user.id, goal)?;
            tracing::info!(user_id = %user.id, goal = %goal, "savings goal updated");
            println!("Monthly goal set to {}", settings.format_money(goal));
        }
    }

    Ok(())
}

//! Budget summary CLI command

use crate::config::Settings;
use crate::display::{format_breakdown, format_expense_list, format_summary};
use crate::error::FinwiseResult;
use crate::services::Dashboard;
use crate::session::AppContext;

/// Expenses shown under the summary
const RECENT_LIMIT: usize = 5;

/// Print the dashboard: goal, totals, progress and recent expenses
pub fn handle_summary_command(ctx: &AppContext, settings: &Settings) -> FinwiseResult<()> {
    let user = ctx.require_user()?;

    let mut dashboard = Dashboard::new();
    dashboard.load(ctx);

    let name = dashboard
        .profile()
        .map(|p| p.username.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| user.display_name());
    println!("Hi, {}", name);
    println!();

    print!("{}", format_summary(&dashboard.summary(), settings));
    print!("{}", format_breakdown(&dashboard.breakdown(), settings));

    println!();
    println!("Recent expenses:");
    print!("{}", format_expense_list(dashboard.recent(RECENT_LIMIT), settings));

    Ok(())
}

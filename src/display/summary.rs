//! Budget summary and profile display formatting

use crate::config::Settings;
use crate::models::{Profile, User};
use crate::services::{BudgetSummary, CategoryTotal};

const BAR_WIDTH: usize = 30;

/// Text progress bar for a percentage (already clamped by the caller)
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Goal, spent, remaining and progress
pub fn format_summary(summary: &BudgetSummary, settings: &Settings) -> String {
    let mut output = String::new();

    match summary.goal {
        Some(goal) => output.push_str(&format!("Monthly goal: {}\n", settings.format_money(goal))),
        None => output.push_str("Monthly goal: (profile not loaded)\n"),
    }
    output.push_str(&format!("Total spent:  {}\n", settings.format_money(summary.total)));
    output.push_str(&format!(
        "Remaining:    {}\n",
        settings.format_money(summary.remaining)
    ));

    let percent = if summary.progress_percent.is_finite() {
        format!("{:.1}%", summary.progress_percent)
    } else {
        "n/a".to_string()
    };
    output.push_str(&format!(
        "Progress:     {} {}\n",
        progress_bar(summary.bar_percent(), BAR_WIDTH),
        percent
    ));
    output.push_str(&format!("Status:       {}\n", summary.status().label()));

    output
}

/// Spending per category
pub fn format_breakdown(breakdown: &[CategoryTotal], settings: &Settings) -> String {
    if breakdown.is_empty() {
        return String::new();
    }

    let mut output = String::from("\nBy category:\n");
    for entry in breakdown {
        output.push_str(&format!(
            "  {} {:14} {:>14} ({})\n",
            entry.category.icon(),
            entry.category.label(),
            settings.format_money(entry.total),
            entry.count
        ));
    }
    output
}

/// Who is signed in
pub fn format_account(user: &User, profile: Option<&Profile>, settings: &Settings) -> String {
    let mut output = String::new();
    output.push_str(&format!("User:     {}\n", user.display_name()));
    output.push_str(&format!("Email:    {}\n", user.email));
    output.push_str(&format!("ID:       {}\n", user.id));
    if let Some(profile) = profile {
        output.push_str(&format!(
            "Goal:     {}\n",
            settings.format_money(profile.savings_goal)
        ));
    }
    output
}

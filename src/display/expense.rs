//! Expense display formatting

use crate::config::Settings;
use crate::models::Expense;

/// One expense as a list row
pub fn format_expense_row(expense: &Expense, settings: &Settings) -> String {
    let images = if expense.has_images() {
        format!(" [{}]", expense.bill_images.len())
    } else {
        String::new()
    };

    format!(
        "{} {} {:10} {:24} {:>14}{}",
        expense.id.short(),
        expense.created_at.format(&settings.date_format),
        expense.category.label(),
        truncate(expense.title(), 24),
        settings.format_money(expense.amount),
        images
    )
}

/// A list of expenses, newest first as given
pub fn format_expense_list(expenses: &[Expense], settings: &Settings) -> String {
    if expenses.is_empty() {
        return "No expenses yet.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:10} {:10} {:24} {:>14}\n",
        "ID", "Date", "Category", "Description", "Amount"
    ));
    output.push_str(&"-".repeat(74));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format_expense_row(expense, settings));
        output.push('\n');
    }

    output
}

/// Full details of one expense, including receipt URLs
pub fn format_expense_details(expense: &Expense, image_urls: &[String], settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:     {}\n", expense.id));
    output.push_str(&format!(
        "Date:        {}\n",
        expense.created_at.format(&settings.date_format)
    ));
    output.push_str(&format!("Amount:      {}\n", settings.format_money(expense.amount)));
    output.push_str(&format!(
        "Category:    {} {}\n",
        expense.category.icon(),
        expense.category.label()
    ));

    if !expense.description.trim().is_empty() {
        output.push_str(&format!("Description: {}\n", expense.description));
    }

    if !image_urls.is_empty() {
        output.push_str(&format!("\nReceipts ({}):\n", image_urls.len()));
        for (i, url) in image_urls.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, url));
        }
    }

    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ExpenseId, Money, UserId};
    use chrono::{TimeZone, Utc};

    fn expense(description: &str, images: usize) -> Expense {
        Expense {
            id: ExpenseId::new(),
            user_id: UserId::new(),
            amount: Money::from_cents(125_050),
            category: Category::Food,
            description: description.into(),
            bill_images: (0..images).map(|i| format!("u/{}.png", i)).collect(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_format_expense_row() {
        let row = format_expense_row(&expense("Groceries", 2), &Settings::default());
        assert!(row.contains("2025-03-09"));
        assert!(row.contains("Groceries"));
        assert!(row.contains("₹1,250.50"));
        assert!(row.ends_with("[2]"));
    }

    #[test]
    fn test_row_falls_back_to_category() {
        let row = format_expense_row(&expense("", 0), &Settings::default());
        assert!(row.contains("food"));
    }

    #[test]
    fn test_format_empty_list() {
        assert!(format_expense_list(&[], &Settings::default()).contains("No expenses"));
    }

    #[test]
    fn test_format_details() {
        let urls = vec!["https://x/1.png".to_string()];
        let details = format_expense_details(&expense("Dinner", 1), &urls, &Settings::default());
        assert!(details.contains("Description: Dinner"));
        assert!(details.contains("Receipts (1)"));
        assert!(details.contains("1. https://x/1.png"));
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("चाय और समोसा और पकोड़े", 8).chars().count(), 8);
        assert_eq!(truncate("short", 8), "short");
    }
}

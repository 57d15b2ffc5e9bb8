//! Expense model
//!
//! A single spending record. Rows come back from the `expenses` table; new
//! rows are built as [`NewExpense`] and inserted once, never edited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::category::Category;
use super::ids::{ExpenseId, UserId};
use super::money::Money;

/// Maximum number of receipt images attached to one expense
pub const MAX_BILL_IMAGES: usize = 5;

/// A stored expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier (generated by the backend)
    pub id: ExpenseId,

    /// Owner of the record
    pub user_id: UserId,

    /// Amount spent (positive)
    pub amount: Money,

    /// Spending category
    pub category: Category,

    /// Optional free-text description (empty when absent)
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Storage paths of receipt images, in upload order
    #[serde(default, deserialize_with = "null_as_default")]
    pub bill_images: Vec<String>,

    /// When the expense was recorded
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Text shown in lists: the description, or the category if there is none
    pub fn title(&self) -> &str {
        if self.description.trim().is_empty() {
            self.category.as_str()
        } else {
            &self.description
        }
    }

    /// Check if this expense has receipt images
    pub fn has_images(&self) -> bool {
        !self.bill_images.is_empty()
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.created_at.format("%Y-%m-%d"),
            self.title(),
            self.amount
        )
    }
}

/// Insert payload for the `expenses` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    pub user_id: UserId,
    pub amount: Money,
    pub category: Category,
    pub description: String,
    pub bill_images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl NewExpense {
    /// Validate the payload before it is sent
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }

        if self.bill_images.len() > MAX_BILL_IMAGES {
            return Err(ExpenseValidationError::TooManyImages(self.bill_images.len()));
        }

        Ok(())
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NonPositiveAmount(Money),
    TooManyImages(usize),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            Self::TooManyImages(count) => write!(
                f,
                "An expense can have at most {} images (got {})",
                MAX_BILL_IMAGES, count
            ),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// PostgREST sends `null` for empty optional columns
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(description: serde_json::Value, images: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": "6a1f1c1e-2d7b-4f63-9a3c-1b2a3c4d5e6f",
            "user_id": "550e8400-e29b-41d4-a716-446655440000",
            "amount": 249.5,
            "category": "food",
            "description": description,
            "bill_images": images,
            "created_at": "2025-03-14T09:26:53.589+00:00"
        })
    }

    #[test]
    fn test_deserialize_row() {
        let row = sample_row(
            serde_json::json!("Lunch"),
            serde_json::json!(["u/1.png", "u/2.jpg"]),
        );
        let expense: Expense = serde_json::from_value(row).unwrap();
        assert_eq!(expense.amount, Money::from_cents(24_950));
        assert_eq!(expense.category, Category::Food);
        assert_eq!(expense.bill_images, vec!["u/1.png", "u/2.jpg"]);
        assert_eq!(expense.title(), "Lunch");
    }

    #[test]
    fn test_deserialize_nulls() {
        let row = sample_row(serde_json::Value::Null, serde_json::Value::Null);
        let expense: Expense = serde_json::from_value(row).unwrap();
        assert!(expense.description.is_empty());
        assert!(!expense.has_images());
        assert_eq!(expense.title(), "food");
    }

    #[test]
    fn test_rows_with_foreign_categories_still_load() {
        let mut shouting = sample_row(serde_json::Value::Null, serde_json::Value::Null);
        shouting["category"] = serde_json::json!("Transport");
        let mut unknown = sample_row(serde_json::Value::Null, serde_json::Value::Null);
        unknown["category"] = serde_json::json!("rent");

        let rows = serde_json::json!([shouting, unknown]);
        let expenses: Vec<Expense> = serde_json::from_value(rows).unwrap();
        assert_eq!(expenses[0].category, Category::Transport);
        assert_eq!(expenses[1].category, Category::Others);
    }

    #[test]
    fn test_new_expense_validation() {
        let mut payload = NewExpense {
            user_id: UserId::new(),
            amount: Money::from_units(10),
            category: Category::Shopping,
            description: String::new(),
            bill_images: Vec::new(),
            created_at: Utc::now(),
        };
        assert!(payload.validate().is_ok());

        payload.bill_images = (0..6).map(|i| format!("u/{}.png", i)).collect();
        assert_eq!(
            payload.validate(),
            Err(ExpenseValidationError::TooManyImages(6))
        );

        payload.bill_images.clear();
        payload.amount = Money::zero();
        assert!(matches!(
            payload.validate(),
            Err(ExpenseValidationError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_insert_payload_shape() {
        let payload = NewExpense {
            user_id: UserId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            amount: Money::from_cents(1050),
            category: Category::Transport,
            description: "Taxi".into(),
            bill_images: vec!["u/a.png".into()],
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["amount"], serde_json::json!(10.5));
        assert_eq!(value["category"], "transport");
        assert_eq!(value["user_id"], "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(value["bill_images"][0], "u/a.png");
    }
}

//! Expense categories
//!
//! The backend stores the category as a lowercase string; the client only ever
//! offers this fixed set. Rows written by other clients are read leniently:
//! case is ignored and unknown values count as `Others`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spending category of an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Utilities,
    Entertainment,
    Shopping,
    Others,
}

impl Category {
    /// All categories in form order
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Utilities,
        Category::Entertainment,
        Category::Shopping,
        Category::Others,
    ];

    /// The value stored in the `category` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Utilities => "utilities",
            Self::Entertainment => "entertainment",
            Self::Shopping => "shopping",
            Self::Others => "others",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Others => "Others",
        }
    }

    /// Single-glyph icon for list rows
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Food => "☕",
            Self::Transport => "🚗",
            Self::Utilities => "🏠",
            Self::Entertainment => "🎮",
            Self::Shopping => "🛍",
            Self::Others => "…",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| {
                let valid: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
                format!(
                    "Unknown category '{}'. Valid categories: {}",
                    s,
                    valid.join(", ")
                )
            })
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|_| {
            tracing::warn!(category = %raw, "unknown expense category, shown as others");
            Category::Others
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("Food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!(" transport ".parse::<Category>().unwrap(), Category::Transport);
        assert!("rent".parse::<Category>().unwrap_err().contains("Valid categories"));
    }

    #[test]
    fn test_wire_format_is_lowercase() {
        let json = serde_json::to_string(&Category::Entertainment).unwrap();
        assert_eq!(json, "\"entertainment\"");
        let parsed: Category = serde_json::from_str("\"others\"").unwrap();
        assert_eq!(parsed, Category::Others);
    }

    #[test]
    fn test_lenient_wire_decoding() {
        let parsed: Category = serde_json::from_str("\"Food\"").unwrap();
        assert_eq!(parsed, Category::Food);
        let parsed: Category = serde_json::from_str("\"groceries\"").unwrap();
        assert_eq!(parsed, Category::Others);
        assert!(serde_json::from_str::<Category>("3").is_err());
    }

    #[test]
    fn test_as_str_round_trips_for_all() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }
}

//! Expense model
//!
//! A single spending record in the expense book.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::ids::ExpenseId;
use super::money::Money;

/// A spending record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// What the money was spent on
    pub name: String,

    /// Spending category (e.g. "Food", "Transport")
    pub category: String,

    /// Amount spent
    pub cost: Money,

    /// Day of the expense
    pub date: NaiveDate,

    /// Tags
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Expense {
    /// Create a new expense
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        cost: Money,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            name: name.into(),
            category: category.into(),
            cost,
            date,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.name.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyName);
        }
        if self.category.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyCategory);
        }
        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.cost, self.date)
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyName,
    EmptyCategory,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Expense name cannot be empty"),
            Self::EmptyCategory => write!(f, "Expense category cannot be empty"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn lunch() -> Expense {
        Expense::new(
            "Lunch",
            "Food",
            Money::from_cents(650),
            NaiveDate::from_ymd_opt(2018, 10, 1).unwrap(),
        )
    }

    #[test]
    fn test_display() {
        assert_eq!(lunch().to_string(), "Lunch ($6.50, 2018-10-01)");
    }

    #[test]
    fn test_validation() {
        assert!(lunch().validate().is_ok());

        let mut expense = lunch();
        expense.category = String::new();
        assert_eq!(expense.validate(), Err(ExpenseValidationError::EmptyCategory));
    }

    #[test]
    fn test_serde_keeps_date_and_cost() {
        let expense = lunch().with_tags(["work"]);
        let json = serde_json::to_string(&expense).unwrap();
        assert!(json.contains("\"2018-10-01\""));
        assert!(json.contains("\"cost\":650"));
        let back: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expense);
    }
}

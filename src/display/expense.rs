//! Expense book display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Expense, ExpenseBook};

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl ExpenseRow {
    fn new(index: usize, expense: &Expense) -> Self {
        Self {
            index,
            date: expense.date.format("%Y-%m-%d").to_string(),
            name: expense.name.clone(),
            category: expense.category.clone(),
            cost: expense.cost.to_string(),
            tags: expense.tags.iter().cloned().collect::<Vec<_>>().join(", "),
        }
    }
}

/// Format the expense book as a table with a total line
pub fn format_expense_list(book: &ExpenseBook) -> String {
    if book.expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let rows = book
        .expenses
        .iter()
        .enumerate()
        .map(|(i, e)| ExpenseRow::new(i + 1, e));

    let mut output = Table::new(rows).with(Style::sharp()).to_string();
    output.push_str(&format!(
        "\n{} expense(s), total {}\n",
        book.expenses.len(),
        book.total()
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    #[test]
    fn test_list_shows_total() {
        let date = NaiveDate::from_ymd_opt(2018, 10, 1).unwrap();
        let book = ExpenseBook::default()
            .with_expense(Expense::new("Lunch", "Food", Money::from_cents(650), date))
            .unwrap()
            .with_expense(Expense::new("Bus", "Transport", Money::from_cents(150), date))
            .unwrap();

        let output = format_expense_list(&book);
        assert!(output.contains("Lunch"));
        assert!(output.contains("2018-10-01"));
        assert!(output.contains("2 expense(s), total $8.00"));
    }

    #[test]
    fn test_list_with_huge_costs_does_not_overflow() {
        let date = NaiveDate::from_ymd_opt(2018, 10, 1).unwrap();
        let huge = Money::parse("90000000000000000").unwrap();
        let book = ExpenseBook::default()
            .with_expense(Expense::new("Yacht", "Leisure", huge, date))
            .unwrap()
            .with_expense(Expense::new("Island", "Leisure", huge, date))
            .unwrap();

        assert_eq!(book.total(), Money::from_cents(i64::MAX));
        assert!(format_expense_list(&book).contains("2 expense(s), total"));
    }

    #[test]
    fn test_empty_book() {
        assert_eq!(format_expense_list(&ExpenseBook::default()), "No expenses found.\n");
    }
}

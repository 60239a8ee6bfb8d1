//! Expense CLI commands

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::display::format_expense_list;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{Expense, ExpenseBook, Money};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// What the money was spent on
        name: String,
        /// Spending category
        #[arg(short, long)]
        category: String,
        /// Amount (e.g., "6.50" or "$6.50")
        #[arg(short = 'x', long)]
        cost: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Delete an expense by list number or id
    Delete {
        /// List number (from `expense list`) or id
        expense: String,
    },
    /// List the expense book
    List,
}

/// Handle an expense command
pub fn handle_expense_command(storage: &mut Storage, cmd: ExpenseCommands) -> PlannerResult<()> {
    match cmd {
        ExpenseCommands::Add {
            name,
            category,
            cost,
            date,
            tags,
        } => {
            let cost = Money::parse(&cost).map_err(|e| {
                PlannerError::Validation(format!(
                    "Invalid cost '{}'. Use a format like '6.50'. Error: {}",
                    cost, e
                ))
            })?;
            let date = match date {
                Some(date) => parse_date(&date)?,
                None => Local::now().date_naive(),
            };

            let expense = Expense::new(name.trim(), category.trim(), cost, date).with_tags(tags);
            let next = storage.expense_book().with_expense(expense.clone())?;
            storage.commit(next);
            println!("New expense added: {}", expense);
        }

        ExpenseCommands::Delete { expense } => {
            let book = storage.expense_book();
            let found = select(book, &expense)?.clone();
            let next = book.without_expense(found.id)?;
            storage.commit(next);
            println!("Deleted expense: {}", found);
        }

        ExpenseCommands::List => {
            print!("{}", format_expense_list(storage.expense_book()));
        }
    }

    Ok(())
}

fn parse_date(date: &str) -> PlannerResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        PlannerError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", date))
    })
}

fn select<'a>(book: &'a ExpenseBook, query: &str) -> PlannerResult<&'a Expense> {
    if let Ok(number) = query.trim().parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|i| book.expenses.get(i))
            .ok_or_else(|| {
                PlannerError::Validation(format!(
                    "The expense index provided is invalid: {} (expense book has {})",
                    number,
                    book.expenses.len()
                ))
            });
    }

    book.find(query)
        .ok_or_else(|| PlannerError::expense_not_found(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2018-10-01").unwrap(),
            NaiveDate::from_ymd_opt(2018, 10, 1).unwrap()
        );
        assert!(parse_date("01/10/2018").unwrap_err().is_validation());
    }

    #[test]
    fn test_select_by_number_or_id() {
        let date = NaiveDate::from_ymd_opt(2018, 10, 1).unwrap();
        let lunch = Expense::new("Lunch", "Food", Money::from_cents(650), date);
        let book = ExpenseBook::default().with_expense(lunch.clone()).unwrap();

        assert_eq!(select(&book, "1").unwrap(), &lunch);
        assert_eq!(select(&book, &lunch.id.to_string()).unwrap(), &lunch);
        assert_eq!(select(&book, &lunch.id.as_uuid().to_string()).unwrap(), &lunch);
        assert!(select(&book, "2").unwrap_err().is_validation());
        assert!(select(&book, "exp-nothing").unwrap_err().is_not_found());
    }
}

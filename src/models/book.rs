//! The two books the planner keeps
//!
//! Books are treated as immutable values: every edit returns a new book, which
//! the caller commits into its `VersionedStore` as the next snapshot.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::document::{Document, DocumentKind, DocumentSnapshot};
use super::expense::Expense;
use super::ids::{ExpenseId, PersonId};
use super::money::Money;
use super::person::Person;
use crate::error::{PlannerError, PlannerResult};

/// Contacts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AddressBook {
    pub persons: Vec<Person>,
}

impl AddressBook {
    pub fn new(persons: Vec<Person>) -> Self {
        Self { persons }
    }

    /// Check whether an equivalent person is already present
    pub fn has_person(&self, person: &Person) -> bool {
        self.persons.iter().any(|p| p.is_same_person(person))
    }

    /// Return a copy with `person` appended
    pub fn with_person(&self, person: Person) -> PlannerResult<Self> {
        person
            .validate()
            .map_err(|e| PlannerError::Validation(e.to_string()))?;

        if self.has_person(&person) {
            return Err(PlannerError::Duplicate {
                entity_type: "Person",
                identifier: person.name,
            });
        }

        let mut next = self.clone();
        next.persons.push(person);
        Ok(next)
    }

    /// Return a copy without the person identified by `id`
    pub fn without_person(&self, id: PersonId) -> PlannerResult<Self> {
        let mut next = self.clone();
        let before = next.persons.len();
        next.persons.retain(|p| p.id != id);
        if next.persons.len() == before {
            return Err(PlannerError::person_not_found(id.to_string()));
        }
        Ok(next)
    }

    /// Find a person by id or by exact (case-insensitive) name
    pub fn find(&self, query: &str) -> Option<&Person> {
        if let Ok(id) = query.parse::<PersonId>() {
            if let Some(p) = self.persons.iter().find(|p| p.id == id) {
                return Some(p);
            }
        }
        self.persons
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(query.trim()))
    }
}

impl Document for AddressBook {
    const KIND: DocumentKind = DocumentKind::AddressBook;

    fn entry_count(&self) -> usize {
        self.persons.len()
    }

    fn into_snapshot(this: Arc<Self>) -> DocumentSnapshot {
        DocumentSnapshot::AddressBook(this)
    }
}

/// Spending records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpenseBook {
    pub expenses: Vec<Expense>,
}

impl ExpenseBook {
    pub fn new(expenses: Vec<Expense>) -> Self {
        Self { expenses }
    }

    /// Return a copy with `expense` appended
    pub fn with_expense(&self, expense: Expense) -> PlannerResult<Self> {
        expense
            .validate()
            .map_err(|e| PlannerError::Validation(e.to_string()))?;

        let mut next = self.clone();
        next.expenses.push(expense);
        Ok(next)
    }

    /// Return a copy without the expense identified by `id`
    pub fn without_expense(&self, id: ExpenseId) -> PlannerResult<Self> {
        let mut next = self.clone();
        let before = next.expenses.len();
        next.expenses.retain(|e| e.id != id);
        if next.expenses.len() == before {
            return Err(PlannerError::expense_not_found(id.to_string()));
        }
        Ok(next)
    }

    /// Find an expense by full id or by its displayed short id
    pub fn find(&self, query: &str) -> Option<&Expense> {
        let query = query.trim();
        if let Ok(id) = query.parse::<ExpenseId>() {
            return self.expenses.iter().find(|e| e.id == id);
        }
        self.expenses.iter().find(|e| e.id.to_string() == query)
    }

    /// Sum of all expense costs
    pub fn total(&self) -> Money {
        self.expenses.iter().map(|e| e.cost).sum()
    }
}

impl Document for ExpenseBook {
    const KIND: DocumentKind = DocumentKind::ExpenseBook;

    fn entry_count(&self) -> usize {
        self.expenses.len()
    }

    fn into_snapshot(this: Arc<Self>) -> DocumentSnapshot {
        DocumentSnapshot::ExpenseBook(this)
    }
}

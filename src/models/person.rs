//! Person model
//!
//! A contact entry in the address book.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::ids::PersonId;

/// A contact in the address book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier
    pub id: PersonId,

    /// Full name
    pub name: String,

    /// Phone number, free-form
    #[serde(default)]
    pub phone: Option<String>,

    /// Email address, free-form
    #[serde(default)]
    pub email: Option<String>,

    /// Postal address, free-form
    #[serde(default)]
    pub address: Option<String>,

    /// Tags
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Person {
    /// Create a new person with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PersonId::new(),
            name: name.into(),
            phone: None,
            email: None,
            address: None,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Two persons are the same contact if their names match case-insensitively
    pub fn is_same_person(&self, other: &Person) -> bool {
        self.name.trim().eq_ignore_ascii_case(other.name.trim())
    }

    /// Validate the person
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.name.trim().is_empty() {
            return Err(PersonValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(PersonValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for persons
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for PersonValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Person name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Person name too long ({} chars, max 100)", len)
            }
        }
    }
}

impl std::error::Error for PersonValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let person = Person::new("Alex Yeoh")
            .with_phone("87438807")
            .with_email("alexyeoh@example.com")
            .with_tags(["friends"]);

        assert_eq!(person.phone.as_deref(), Some("87438807"));
        assert!(person.tags.contains("friends"));
        assert!(person.address.is_none());
    }

    #[test]
    fn test_same_person_ignores_case() {
        let a = Person::new("Bernice Yu");
        let b = Person::new("bernice yu ");
        assert!(a.is_same_person(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_validation() {
        assert!(Person::new("Charlotte").validate().is_ok());
        assert_eq!(
            Person::new("  ").validate(),
            Err(PersonValidationError::EmptyName)
        );
        assert!(matches!(
            Person::new("x".repeat(101)).validate(),
            Err(PersonValidationError::NameTooLong(101))
        ));
    }
}

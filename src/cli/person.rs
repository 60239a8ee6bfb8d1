//! Person CLI commands
//!
//! Every mutation commits a new address book version, so it can be undone.

use clap::Subcommand;

use crate::display::format_person_list;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{AddressBook, Person};
use crate::storage::Storage;

/// Person subcommands
#[derive(Subcommand, Debug)]
pub enum PersonCommands {
    /// Add a person to the address book
    Add {
        /// Full name
        name: String,
        /// Phone number
        #[arg(short, long)]
        phone: Option<String>,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
        /// Postal address
        #[arg(short, long)]
        address: Option<String>,
        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Delete a person by list number, id or name
    Delete {
        /// List number (from `person list`), id or name
        person: String,
    },
    /// List the address book
    List {
        /// Only show persons with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },
}

/// Handle a person command
pub fn handle_person_command(storage: &mut Storage, cmd: PersonCommands) -> PlannerResult<()> {
    match cmd {
        PersonCommands::Add {
            name,
            phone,
            email,
            address,
            tags,
        } => {
            let mut person = Person::new(name.trim()).with_tags(tags);
            if let Some(phone) = phone {
                person = person.with_phone(phone);
            }
            if let Some(email) = email {
                person = person.with_email(email);
            }
            if let Some(address) = address {
                person = person.with_address(address);
            }

            let next = storage.address_book().with_person(person.clone())?;
            storage.commit(next);
            println!("New person added: {}", person);
        }

        PersonCommands::Delete { person } => {
            let book = storage.address_book();
            let found = select(book, &person)?.clone();
            let next = book.without_person(found.id)?;
            storage.commit(next);
            println!("Deleted person: {}", found.name);
        }

        PersonCommands::List { tag } => {
            print!("{}", format_person_list(storage.address_book(), tag.as_deref()));
        }
    }

    Ok(())
}

/// Resolve a 1-based list number, id or name to a person
fn select<'a>(book: &'a AddressBook, query: &str) -> PlannerResult<&'a Person> {
    if let Ok(number) = query.trim().parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|i| book.persons.get(i))
            .ok_or_else(|| {
                PlannerError::Validation(format!(
                    "The person index provided is invalid: {} (address book has {})",
                    number,
                    book.persons.len()
                ))
            });
    }

    book.find(query)
        .ok_or_else(|| PlannerError::person_not_found(query))
}

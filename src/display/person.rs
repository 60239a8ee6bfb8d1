//! Address book display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{AddressBook, Person};

#[derive(Tabled)]
struct PersonRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl PersonRow {
    fn new(index: usize, person: &Person) -> Self {
        Self {
            index,
            name: person.name.clone(),
            phone: person.phone.clone().unwrap_or_default(),
            email: person.email.clone().unwrap_or_default(),
            address: person.address.clone().unwrap_or_default(),
            tags: person.tags.iter().cloned().collect::<Vec<_>>().join(", "),
        }
    }
}

/// Format the address book as a table, optionally only persons with `tag`
///
/// Row numbers are positions in the whole book, so they stay valid for
/// `person delete` when a filter is applied.
pub fn format_person_list(book: &AddressBook, tag: Option<&str>) -> String {
    let rows: Vec<PersonRow> = book
        .persons
        .iter()
        .enumerate()
        .filter(|(_, p)| tag.map_or(true, |t| p.tags.contains(t)))
        .map(|(i, p)| PersonRow::new(i + 1, p))
        .collect();

    if rows.is_empty() {
        return "No persons found.\n".to_string();
    }

    let count = rows.len();
    let mut output = Table::new(rows).with(Style::sharp()).to_string();
    output.push_str(&format!("\n{} person(s) listed\n", count));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_book() {
        assert_eq!(format_person_list(&AddressBook::default(), None), "No persons found.\n");
    }

    #[test]
    fn test_rows_and_tag_filter() {
        let book = AddressBook::default()
            .with_person(Person::new("Alex Yeoh").with_phone("87438807"))
            .unwrap()
            .with_person(Person::new("Bernice Yu").with_tags(["friends"]))
            .unwrap();

        let all = format_person_list(&book, None);
        assert!(all.contains("Alex Yeoh"));
        assert!(all.contains("87438807"));
        assert!(all.contains("2 person(s) listed"));

        let friends = format_person_list(&book, Some("friends"));
        assert!(friends.contains("Bernice Yu"));
        assert!(!friends.contains("Alex Yeoh"));
        assert!(friends.contains("1 person(s) listed"));
    }
}

//! Test fixtures shared by the unit tests of this crate.

use userdesk_core::Entity;

use crate::field::{FieldDescriptor, FieldKind, FieldValue, Record};

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub team: Option<String>,
    pub active: bool,
    pub score: Option<i64>,
    pub joined_at: Option<String>,
}

impl Entity for Person {
    type Id = u32;

    fn id(&self) -> &u32 {
        &self.id
    }
}

const PERSON_FIELDS: &[FieldDescriptor<Person>] = &[
    FieldDescriptor {
        name: "id",
        label: "ID",
        kind: FieldKind::Integer,
        accessor: |p: &Person| FieldValue::Integer(i64::from(p.id)),
    },
    FieldDescriptor {
        name: "name",
        label: "Name",
        kind: FieldKind::Text,
        accessor: |p: &Person| FieldValue::text(&p.name),
    },
    FieldDescriptor {
        name: "email",
        label: "Email",
        kind: FieldKind::Text,
        accessor: |p: &Person| FieldValue::text(&p.email),
    },
    FieldDescriptor {
        name: "team",
        label: "Team",
        kind: FieldKind::Text,
        accessor: |p: &Person| FieldValue::opt_text(p.team.as_deref()),
    },
    FieldDescriptor {
        name: "active",
        label: "Active",
        kind: FieldKind::Boolean,
        accessor: |p: &Person| FieldValue::Bool(p.active),
    },
    FieldDescriptor {
        name: "score",
        label: "Score",
        kind: FieldKind::Integer,
        accessor: |p: &Person| p.score.map_or(FieldValue::Null, FieldValue::Integer),
    },
    FieldDescriptor {
        name: "joined_at",
        label: "Joined",
        kind: FieldKind::Timestamp,
        accessor: |p: &Person| FieldValue::timestamp(p.joined_at.as_deref()),
    },
];

impl Record for Person {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        PERSON_FIELDS
    }

    fn search_fields() -> &'static [&'static str] {
        &["name", "email"]
    }

    fn timestamp_field() -> Option<&'static str> {
        Some("joined_at")
    }
}

pub fn person(id: u32, name: &str, team: Option<&str>, joined_at: Option<&str>) -> Person {
    Person {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        team: team.map(str::to_string),
        active: id % 2 == 1,
        score: Some(i64::from(id) * 10),
        joined_at: joined_at.map(str::to_string),
    }
}

/// A small, deliberately messy roster: a null team, a null date and an
/// unparsable date.
pub fn roster() -> Vec<Person> {
    vec![
        person(1, "Alice", Some("ops"), Some("2025-01-10")),
        person(2, "bob", Some("dev"), Some("2025-02-01T09:30:00Z")),
        person(3, "Carol", None, None),
        person(4, "dave", Some("dev"), Some("not a date")),
        person(5, "Erin", Some("ops"), Some("2025-02-01T18:00:00Z")),
    ]
}

pub fn ids(items: &[Person]) -> Vec<u32> {
    items.iter().map(|p| p.id).collect()
}

//! Collection payloads as the backend returns them.

use serde::{Deserialize, Serialize};

/// Server-side paginated envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

fn first_page() -> u32 {
    1
}

/// Either a bare JSON array or a [`Paginated`] envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CollectionPayload<T> {
    List(Vec<T>),
    Page(Paginated<T>),
}

impl<T> CollectionPayload<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Self::List(items) => items,
            Self::Page(page) => &page.items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::List(items) => items,
            Self::Page(page) => page.items,
        }
    }

    /// Server-reported total for envelopes, the array length otherwise.
    pub fn total(&self) -> u64 {
        match self {
            Self::List(items) => items.len() as u64,
            Self::Page(page) => page.total,
        }
    }
}

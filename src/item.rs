use std::cmp::Ordering;
use std::fmt;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    #[inline]
    pub fn apply(&self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Price,
}

/// Whether a heap keeps the lowest or the highest price at its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    #[default]
    Min,
    Max,
}

/// A catalog record. Trees key items by `name`, heaps by `price`;
/// `category` is carried along for display only. No `Ord` impl: every
/// ordering is a named comparator picked at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub category: String,
    pub price: i32,
}

impl Item {
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: i32) -> Item {
        Item {
            name: name.into(),
            category: category.into(),
            price,
        }
    }

    /// Lexicographic on the name alone; name equality is tree equality.
    #[inline]
    pub fn compare_by_name(&self, other: &Item) -> Ordering {
        self.name.cmp(&other.name)
    }

    /// Price alone, so stable sorts keep the incoming order of ties.
    #[inline]
    pub fn compare_by_price(&self, other: &Item) -> Ordering {
        self.price.cmp(&other.price)
    }

    pub fn compare_by(&self, key: SortKey, other: &Item) -> Ordering {
        match key {
            SortKey::Name => self.compare_by_name(other),
            SortKey::Price => self.compare_by_price(other),
        }
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Item Name: {}, Category: {}, Price: {}",
            self.name, self.category, self.price
        )
    }
}

impl From<(&str, &str, i32)> for Item {
    fn from((name, category, price): (&str, &str, i32)) -> Self {
        Item::new(name, category, price)
    }
}

// one canonical line per item, each newline terminated
pub(crate) fn render_lines<'a, I>(items: I) -> String
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut out = String::new();
    for item in items {
        out.push_str(&item.to_string());
        out.push('\n');
    }
    out
}

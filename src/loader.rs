use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use log::{debug, warn};
use thiserror::Error;

use crate::item::Item;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read records: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: item count is not a number")]
    InvalidCount { line: usize },
    #[error("line {line}: invalid price for {item:?}")]
    InvalidPrice { item: String, line: usize },
    #[error("record stream ended early: expected {expected} items, got {got}")]
    UnexpectedEof { expected: usize, got: usize },
    #[error("invalid item json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses the count-prefixed text format: one line with the item count, then
/// three lines per item (name, category, price). Blank lines and surrounding
/// whitespace are tolerated; anything past the declared count is ignored.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<Item>, LoadError> {
    let mut fields = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            fields.push((index + 1, trimmed.to_string()));
        }
    }

    let mut fields = fields.into_iter();
    let (count_line, count) = match fields.next() {
        Some(entry) => entry,
        None => {
            debug!("empty record stream, loaded 0 items");
            return Ok(Vec::new());
        }
    };
    let expected: usize = count
        .parse()
        .map_err(|_| LoadError::InvalidCount { line: count_line })?;

    // the declared count is untrusted, cap the allocation by the fields present
    let mut items = Vec::with_capacity(expected.min(fields.len() / 3));
    while items.len() < expected {
        let name = match fields.next() {
            Some((_, name)) => name,
            None => break,
        };
        let category = match fields.next() {
            Some((_, category)) => category,
            None => break,
        };
        let (price_line, raw_price) = match fields.next() {
            Some(entry) => entry,
            None => break,
        };
        let price: i32 = raw_price.parse().map_err(|_| LoadError::InvalidPrice {
            item: name.clone(),
            line: price_line,
        })?;
        items.push(Item::new(name, category, price));
    }

    if items.len() < expected {
        return Err(LoadError::UnexpectedEof {
            expected,
            got: items.len(),
        });
    }
    if fields.next().is_some() {
        // menu-driven producers keep writing to the same stream, so data
        // past the declared count is not an error
        warn!("ignoring trailing data past {} declared items", expected);
    }

    debug!("loaded {} items", items.len());
    Ok(items)
}

pub fn load_path(path: impl AsRef<Path>) -> Result<Vec<Item>, LoadError> {
    let path = path.as_ref();
    debug!("reading catalog records from {}", path.display());
    let file = File::open(path)?;
    read_records(BufReader::new(file))
}

/// Reads a JSON array of items.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<Item>, LoadError> {
    let items: Vec<Item> = serde_json::from_reader(reader)?;
    debug!("loaded {} items from json", items.len());
    Ok(items)
}

pub fn load_json_path(path: impl AsRef<Path>) -> Result<Vec<Item>, LoadError> {
    let path = path.as_ref();
    debug!("reading catalog json from {}", path.display());
    let file = File::open(path)?;
    read_json(BufReader::new(file))
}

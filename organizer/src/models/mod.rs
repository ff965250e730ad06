//! Domain models shared by the parser, the organizer and the output layer.
//!
//! - [`RawRow`] - one input record keyed by raw column label
//! - [`RowSet`] - all raw rows of one input source
//! - [`Row`] - a normalized record keyed by canonical column name
//! - [`CategoryRows`] - one category of the organized result

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// =============================================================================
// Raw input
// =============================================================================

/// A record as read from a source, before normalization.
///
/// Keys keep source header order. `None` is a null cell; a column missing from
/// the record is absent from the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    cells: IndexMap<String, Option<String>>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a non-null cell.
    pub fn with(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.cells.insert(label.into(), Some(value.into()));
        self
    }

    /// Builder-style insert of a null cell.
    pub fn with_null(mut self, label: impl Into<String>) -> Self {
        self.cells.insert(label.into(), None);
        self
    }

    pub fn insert(&mut self, label: impl Into<String>, value: Option<String>) {
        self.cells.insert(label.into(), value);
    }

    pub fn get(&self, label: &str) -> Option<Option<&str>> {
        self.cells.get(label).map(|v| v.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }
}

/// All rows of one input source, in source order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowSet {
    /// Label used in diagnostics (usually the file path)
    pub source: String,
    /// Raw rows in source order
    pub rows: Vec<RawRow>,
}

impl RowSet {
    pub fn new(source: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            source: source.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Normalized rows
// =============================================================================

/// A normalized record: canonical column name to trimmed cell value.
///
/// Every present column has a value (possibly empty). Column order follows
/// the order in which columns were first seen in the raw record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: IndexMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cell. A repeated column keeps its first position and takes the
    /// new value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut String> {
        self.cells.get_mut(column)
    }

    /// Cell value with a missing column read as the empty string.
    pub fn value_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

// =============================================================================
// Organized output
// =============================================================================

/// One category of the organized result, rows already sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRows {
    pub category: String,
    pub rows: Vec<Row>,
}

impl CategoryRows {
    pub fn new(category: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            category: category.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

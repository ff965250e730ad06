//! Per-category row accumulation.

use indexmap::IndexMap;

use crate::models::Row;

/// Ordered category buckets. A bucket is created on first assignment and is
/// never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryBuckets {
    buckets: IndexMap<String, Vec<Row>>,
}

impl CategoryBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `row` to the bucket of `category`.
    pub fn assign(&mut self, category: &str, row: Row) {
        match self.buckets.get_mut(category) {
            Some(rows) => rows.push(row),
            None => {
                self.buckets.insert(category.to_string(), vec![row]);
            }
        }
    }

    /// Combine two accumulations: for each category, `self`'s rows followed by
    /// `other`'s. Categories new in `other` are appended after `self`'s.
    pub fn merge(mut self, other: CategoryBuckets) -> CategoryBuckets {
        self.merge_from(other);
        self
    }

    /// In-place [`merge`](Self::merge).
    pub fn merge_from(&mut self, other: CategoryBuckets) {
        for (category, rows) in other.buckets {
            self.buckets.entry(category).or_default().extend(rows);
        }
    }

    pub fn get(&self, category: &str) -> Option<&[Row]> {
        self.buckets.get(category).map(Vec::as_slice)
    }

    /// Remove and return the rows of `category` (empty if it never got any).
    pub fn take(&mut self, category: &str) -> Vec<Row> {
        self.buckets.shift_remove(category).unwrap_or_default()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Total rows across all buckets.
    pub fn row_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

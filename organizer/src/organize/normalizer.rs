//! Column-name normalization.
//!
//! Raw header labels are mapped to canonical column names through the
//! configured [`ColumnAliasTable`]. Labels that resolve to nothing are dropped
//! from the row.

use indexmap::IndexSet;
use tracing::{trace, warn};

use crate::config::ColumnAliasTable;
use crate::models::{RawRow, Row};

/// Resolve a raw label to its canonical column name.
///
/// The label is trimmed, then compared case-insensitively against each
/// canonical name and its aliases in table order. The first entry that
/// matches wins, so an alias claimed by two columns resolves to the one
/// declared first.
pub fn normalize<'a>(raw_label: &str, aliases: &'a ColumnAliasTable) -> Option<&'a str> {
    let label = raw_label.trim();
    aliases
        .iter()
        .find(|(canonical, alias_list)| {
            eq_ignore_case(label, canonical) || alias_list.iter().any(|a| eq_ignore_case(label, a))
        })
        .map(|(canonical, _)| canonical)
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Normalizes the rows of one source, remembering which labels were dropped
/// so each is reported once.
pub struct ColumnNormalizer<'a> {
    aliases: &'a ColumnAliasTable,
    source: &'a str,
    unknown: IndexSet<String>,
}

impl<'a> ColumnNormalizer<'a> {
    pub fn new(aliases: &'a ColumnAliasTable, source: &'a str) -> Self {
        Self {
            aliases,
            source,
            unknown: IndexSet::new(),
        }
    }

    /// Build a [`Row`] from the recognized columns of `raw`.
    ///
    /// Values are trimmed and a null cell becomes the empty string.
    pub fn normalize_row(&mut self, raw: &RawRow) -> Row {
        let mut row = Row::new();
        for (label, value) in raw.iter() {
            match normalize(label, self.aliases) {
                Some(canonical) => {
                    trace!("column '{}' -> '{}'", label, canonical);
                    row.set(canonical, value.unwrap_or("").trim());
                }
                None => {
                    if self.unknown.insert(label.trim().to_string()) {
                        warn!(
                            "{}: skipping column not specified by configuration: '{}'",
                            self.source,
                            label.trim()
                        );
                    }
                }
            }
        }
        row
    }

    /// Label of the source being normalized.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Labels dropped so far, in first-seen order.
    pub fn unknown_columns(&self) -> impl Iterator<Item = &str> {
        self.unknown.iter().map(String::as_str)
    }
}

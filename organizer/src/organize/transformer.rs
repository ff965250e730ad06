//! Column value transformers applied after normalization.
//!
//! The only transformer is date reformatting: bank exports disagree on date
//! formats, and rows sort by ordinal string comparison, so dates are rewritten
//! to one format (typically `%Y-%m-%d`) before matching and sorting.

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::warn;

use crate::error::{ConfigError, ConfigResult};
use crate::models::Row;

/// `dateTransformer` section of the configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTransformerConfig {
    /// chrono strftime formats, tried in order
    pub input_formats: Vec<String>,
    /// chrono strftime format of the rewritten value
    pub output_format: String,
}

impl DateTransformerConfig {
    pub fn new<I, S>(input_formats: I, output_format: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input_formats: input_formats.into_iter().map(Into::into).collect(),
            output_format: output_format.into(),
        }
    }
}

/// A validated date transformer.
#[derive(Debug, Clone)]
pub struct DateTransformer {
    input_formats: Vec<String>,
    output_format: String,
}

impl DateTransformer {
    pub fn compile(column: &str, config: &DateTransformerConfig) -> ConfigResult<Self> {
        if config.input_formats.is_empty() {
            return Err(ConfigError::InvalidDateFormat {
                column: column.to_string(),
                format: String::new(),
                reason: "at least one input format is required".to_string(),
            });
        }
        for format in config.input_formats.iter().chain(std::iter::once(&config.output_format)) {
            validate_format(column, format)?;
        }
        Ok(Self {
            input_formats: config.input_formats.clone(),
            output_format: config.output_format.clone(),
        })
    }

    /// Rewrite `value` using the first input format that parses it.
    ///
    /// A format with time fields parses as a date-time; otherwise as a date at
    /// midnight. Returns `None` if no format parses or the output cannot be
    /// rendered.
    pub fn transform(&self, value: &str) -> Option<String> {
        let value = value.trim();
        let parsed = self.input_formats.iter().find_map(|format| {
            NaiveDateTime::parse_from_str(value, format).ok().or_else(|| {
                NaiveDate::parse_from_str(value, format)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
        })?;

        let mut out = String::new();
        write!(out, "{}", parsed.format(&self.output_format)).ok()?;
        Some(out)
    }
}

fn validate_format(column: &str, format: &str) -> ConfigResult<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::InvalidDateFormat {
            column: column.to_string(),
            format: format.to_string(),
            reason: "unknown or incomplete strftime specifier".to_string(),
        });
    }
    Ok(())
}

/// Apply every configured transformer to `row`. Empty cells are left alone;
/// a value no format parses is kept as-is with a warning.
pub fn apply_transformers(
    row: &mut Row,
    transformers: &IndexMap<String, DateTransformer>,
    source: &str,
) {
    for (column, transformer) in transformers {
        let Some(value) = row.get_mut(column) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        match transformer.transform(value) {
            Some(rewritten) => *value = rewritten,
            None => warn!(
                "{}: no input format parses '{}' in column '{}', keeping it unchanged",
                source, value, column
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn us_to_iso() -> DateTransformer {
        DateTransformer::compile(
            "Date",
            &DateTransformerConfig::new(["%m/%d/%Y", "%Y-%m-%d"], "%Y-%m-%d"),
        )
        .unwrap()
    }

    #[test]
    fn test_first_matching_input_format() {
        let t = us_to_iso();
        assert_eq!(t.transform("01/15/2024").as_deref(), Some("2024-01-15"));
        assert_eq!(t.transform("2024-02-03").as_deref(), Some("2024-02-03"));
    }

    #[test]
    fn test_datetime_input() {
        let t = DateTransformer::compile(
            "Date",
            &DateTransformerConfig::new(["%Y-%m-%d %H:%M:%S"], "%Y-%m-%d"),
        )
        .unwrap();
        assert_eq!(t.transform("2024-03-04 17:45:00").as_deref(), Some("2024-03-04"));
    }

    #[test]
    fn test_unparsable_value() {
        assert_eq!(us_to_iso().transform("yesterday"), None);
    }

    #[test]
    fn test_invalid_format_rejected() {
        let err =
            DateTransformer::compile("Date", &DateTransformerConfig::new(["%Q"], "%Y")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDateFormat { .. }));

        let empty = DateTransformerConfig::new(Vec::<String>::new(), "%Y");
        let err = DateTransformer::compile("Date", &empty).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDateFormat { .. }));
    }

    #[test]
    fn test_apply_transformers() {
        let mut transformers = IndexMap::new();
        transformers.insert("Date".to_string(), us_to_iso());

        let mut row: Row = [("Date", "12/31/2023"), ("Amount", "5")].into_iter().collect();
        apply_transformers(&mut row, &transformers, "test");
        assert_eq!(row.get("Date"), Some("2023-12-31"));

        let mut bad: Row = [("Date", "not a date")].into_iter().collect();
        apply_transformers(&mut bad, &transformers, "test");
        assert_eq!(bad.get("Date"), Some("not a date"));

        let mut empty: Row = [("Date", "")].into_iter().collect();
        apply_transformers(&mut empty, &transformers, "test");
        assert_eq!(empty.get("Date"), Some(""));
    }
}

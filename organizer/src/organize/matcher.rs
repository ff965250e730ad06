//! Rule-based category resolution.
//!
//! Rules are indexed by canonical column name and their patterns are compiled
//! once, anchored and case-insensitive, when the configuration is built.

use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::config::CategoryRule;
use crate::error::{ConfigError, ConfigResult};
use crate::models::Row;

/// A [`CategoryRule`] with its patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    category: String,
    patterns: Vec<Regex>,
}

impl CompiledRule {
    /// Compile every pattern of `rule` as a case-insensitive full match.
    pub fn compile(rule: &CategoryRule) -> ConfigResult<Self> {
        let patterns = rule
            .regexes
            .iter()
            .map(|pattern| {
                compile_full_match(pattern).map_err(|source| ConfigError::InvalidPattern {
                    category: rule.category.clone(),
                    column: rule.column.clone(),
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self {
            category: rule.category.clone(),
            patterns,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// True when any pattern matches the whole of `value`.
    pub fn matches(&self, value: &str) -> bool {
        self.patterns.iter().any(|re| {
            trace!("comparing '{}' against /{}/", value, re.as_str());
            re.is_match(value)
        })
    }
}

/// The pattern is compiled on its own first so that an unbalanced group
/// cannot be closed by the anchoring wrapper.
///
/// A valid pattern that still fails once wrapped ends in a verbose-mode
/// (`(?x)`) comment which swallowed the closing `)$`; the wrapper is then
/// closed on a new line, which ends the comment.
fn compile_full_match(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()?;
    RegexBuilder::new(&format!("^(?:{})$", pattern))
        .case_insensitive(true)
        .build()
        .or_else(|err| {
            RegexBuilder::new(&format!("^(?:{}\n)$", pattern))
                .case_insensitive(true)
                .build()
                .map_err(|_| err)
        })
}

/// Canonical column name to the rules on that column, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RuleIndex {
    by_column: HashMap<String, Vec<CompiledRule>>,
}

impl RuleIndex {
    /// Compile and index `rules`. Fails on the first invalid pattern.
    pub fn build(rules: &[CategoryRule]) -> ConfigResult<Self> {
        let mut by_column: HashMap<String, Vec<CompiledRule>> = HashMap::new();
        for rule in rules {
            let compiled = CompiledRule::compile(rule)?;
            by_column.entry(rule.column.clone()).or_default().push(compiled);
        }
        Ok(Self { by_column })
    }

    /// Rules targeting `column`, empty when none are configured.
    pub fn rules_for(&self, column: &str) -> &[CompiledRule] {
        self.by_column.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.by_column.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.by_column.is_empty()
    }
}

/// Resolve the category of a normalized row.
///
/// Columns are scanned in row order; for each column its rules are tried in
/// declaration order. The first rule with a matching pattern decides and
/// evaluation stops. Returns `None` when nothing matches.
pub fn resolve_category<'a>(row: &Row, index: &'a RuleIndex) -> Option<&'a str> {
    for (column, value) in row.iter() {
        let value = value.trim();
        for rule in index.rules_for(column) {
            if rule.matches(value) {
                debug!(
                    "resolved category={} for column={} with value={}",
                    rule.category(),
                    column,
                    value
                );
                return Some(rule.category());
            }
        }
    }
    None
}

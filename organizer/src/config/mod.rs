//! Organizer configuration.
//!
//! [`OrganizerConfig`] is immutable once built. Building it validates the
//! default category, compiles every category regex into a
//! [`RuleIndex`](crate::organize::RuleIndex) and checks date formats, so a bad
//! configuration fails before a single row is read.
//!
//! The on-disk document (YAML or JSON) is described in [`document`].

pub mod document;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::{ConfigError, ConfigResult};
use crate::organize::matcher::RuleIndex;
use crate::organize::transformer::{DateTransformer, DateTransformerConfig};

pub use document::ConfigDocument;

// =============================================================================
// Sort direction
// =============================================================================

/// Direction of the per-category sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortType {
    #[default]
    Asc,
    Desc,
}

impl std::fmt::Display for SortType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortType::Asc => write!(f, "ASC"),
            SortType::Desc => write!(f, "DESC"),
        }
    }
}

// =============================================================================
// Column aliases
// =============================================================================

/// Canonical column names, in declaration order, each with its accepted
/// aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnAliasTable {
    entries: IndexMap<String, Vec<String>>,
}

impl ColumnAliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a canonical name. Registering the same name again replaces
    /// its aliases but keeps its original position.
    pub fn insert<I, S>(&mut self, canonical: impl Into<String>, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = Vec::new();
        for alias in aliases {
            let alias = alias.into();
            if !list.contains(&alias) {
                list.push(alias);
            }
        }
        self.entries.insert(canonical.into(), list);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<I, S>(mut self, canonical: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(canonical, aliases);
        self
    }

    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn aliases(&self, canonical: &str) -> Option<&[String]> {
        self.entries.get(canonical).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.entries.contains_key(canonical)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Category rules
// =============================================================================

/// A configured rule: rows whose `column` value fully matches any of
/// `regexes` (case-insensitive) belong to `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub column: String,
    pub regexes: Vec<String>,
}

impl CategoryRule {
    pub fn new<I, S>(category: impl Into<String>, column: impl Into<String>, regexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category: category.into(),
            column: column.into(),
            regexes: regexes.into_iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// OrganizerConfig
// =============================================================================

/// Validated, immutable configuration for [`crate::organize`].
#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    aliases: ColumnAliasTable,
    rules: Vec<CategoryRule>,
    rule_index: RuleIndex,
    transformers: IndexMap<String, DateTransformer>,
    default_category: String,
    sort_column: Option<String>,
    sort_type: SortType,
}

impl OrganizerConfig {
    /// Start building a configuration with the given default category.
    pub fn builder(default_category: impl Into<String>) -> OrganizerConfigBuilder {
        OrganizerConfigBuilder::new(default_category)
    }

    /// Parse a YAML configuration document.
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let document: ConfigDocument = serde_yaml::from_str(yaml)?;
        document.into_config()
    }

    /// Parse a JSON configuration document.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let document: ConfigDocument = serde_json::from_str(json)?;
        document.into_config()
    }

    pub fn aliases(&self) -> &ColumnAliasTable {
        &self.aliases
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn rule_index(&self) -> &RuleIndex {
        &self.rule_index
    }

    pub fn transformers(&self) -> &IndexMap<String, DateTransformer> {
        &self.transformers
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    pub fn sort_column(&self) -> Option<&str> {
        self.sort_column.as_deref()
    }

    pub fn sort_type(&self) -> SortType {
        self.sort_type
    }

    /// Output order of categories: the default category first, then each rule
    /// category at its first appearance in the rule list.
    pub fn category_order(&self) -> Vec<&str> {
        let mut order: Vec<&str> = vec![self.default_category.as_str()];
        for rule in &self.rules {
            if !order.contains(&rule.category.as_str()) {
                order.push(&rule.category);
            }
        }
        order
    }
}

/// Builder for [`OrganizerConfig`]. Validation happens in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct OrganizerConfigBuilder {
    aliases: ColumnAliasTable,
    rules: Vec<CategoryRule>,
    transformers: Vec<(String, DateTransformerConfig)>,
    default_category: String,
    sort_column: Option<String>,
    sort_type: SortType,
}

impl OrganizerConfigBuilder {
    pub fn new(default_category: impl Into<String>) -> Self {
        Self {
            default_category: default_category.into(),
            ..Self::default()
        }
    }

    /// Register a canonical column with its aliases.
    pub fn column<I, S>(mut self, canonical: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.insert(canonical, aliases);
        self
    }

    /// Replace the whole alias table.
    pub fn aliases(mut self, aliases: ColumnAliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    /// Append a rule. Declaration order is evaluation order.
    pub fn rule(mut self, rule: CategoryRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn date_transformer(
        mut self,
        column: impl Into<String>,
        config: DateTransformerConfig,
    ) -> Self {
        self.transformers.push((column.into(), config));
        self
    }

    pub fn sort_by(mut self, column: impl Into<String>, sort_type: SortType) -> Self {
        self.sort_column = Some(column.into());
        self.sort_type = sort_type;
        self
    }

    pub fn sort_column(mut self, column: Option<String>) -> Self {
        self.sort_column = column;
        self
    }

    pub fn sort_type(mut self, sort_type: SortType) -> Self {
        self.sort_type = sort_type;
        self
    }

    /// Validate and compile the configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingDefaultCategory`] for an empty default category
    /// - [`ConfigError::InvalidPattern`] for the first regex that fails to compile
    /// - [`ConfigError::InvalidDateFormat`] for an unusable date transformer
    pub fn build(self) -> ConfigResult<OrganizerConfig> {
        if self.default_category.trim().is_empty() {
            return Err(ConfigError::MissingDefaultCategory);
        }

        let rule_index = RuleIndex::build(&self.rules)?;

        for rule in &self.rules {
            if !self.aliases.contains(&rule.column) {
                warn!(
                    "rule for category '{}' targets column '{}' which is not a configured column; it will never match",
                    rule.category, rule.column
                );
            }
        }

        let mut transformers = IndexMap::new();
        for (column, config) in &self.transformers {
            if !self.aliases.contains(column) {
                warn!("date transformer targets unknown column '{}'", column);
            }
            transformers.insert(column.clone(), DateTransformer::compile(column, config)?);
        }

        if let Some(ref column) = self.sort_column {
            if !self.aliases.contains(column) {
                warn!("sort column '{}' is not a configured column; rows keep input order", column);
            }
        }

        Ok(OrganizerConfig {
            aliases: self.aliases,
            rules: self.rules,
            rule_index,
            transformers,
            default_category: self.default_category,
            sort_column: self.sort_column,
            sort_type: self.sort_type,
        })
    }
}

/// Load a configuration file. `.json` files are read as JSON, everything else
/// as YAML.
pub fn load_config<P: AsRef<Path>>(path: P) -> ConfigResult<OrganizerConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        OrganizerConfig::from_json_str(&content)
    } else {
        OrganizerConfig::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_default_category_is_fatal() {
        let err = OrganizerConfig::builder("  ").build().unwrap_err();
        assert!(matches!(err, ConfigError::MissingDefaultCategory));
    }

    #[test]
    fn test_invalid_regex_is_fatal() {
        let err = OrganizerConfig::builder("Other")
            .column("Description", Vec::<String>::new())
            .rule(CategoryRule::new("Groceries", "Description", ["Shoprite.*", "(unclosed"]))
            .build()
            .unwrap_err();

        match err {
            ConfigError::InvalidPattern { pattern, category, .. } => {
                assert_eq!(pattern, "(unclosed");
                assert_eq!(category, "Groceries");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_category_order_dedups_and_puts_default_first() {
        let config = OrganizerConfig::builder("Discretionary")
            .column("Description", ["Transaction"])
            .column("Category", Vec::<String>::new())
            .rule(CategoryRule::new("Utilities", "Description", ["pseg.*"]))
            .rule(CategoryRule::new("Groceries", "Description", ["shoprite.*"]))
            .rule(CategoryRule::new("Utilities", "Category", ["utilities"]))
            .rule(CategoryRule::new("Discretionary", "Category", ["dining"]))
            .build()
            .unwrap();

        assert_eq!(
            config.category_order(),
            vec!["Discretionary", "Utilities", "Groceries"]
        );
    }

    #[test]
    fn test_alias_table_reinsert_keeps_position() {
        let table = ColumnAliasTable::new()
            .with("Date", ["Posted"])
            .with("Amount", Vec::<String>::new())
            .with("Date", ["Transaction Date"]);

        assert_eq!(table.canonical_names().collect::<Vec<_>>(), vec!["Date", "Amount"]);
        assert_eq!(table.aliases("Date").unwrap(), ["Transaction Date".to_string()]);
    }

    #[test]
    fn test_sort_type_defaults_to_asc() {
        let config = OrganizerConfig::builder("Other").build().unwrap();
        assert_eq!(config.sort_type(), SortType::Asc);
        assert_eq!(config.sort_column(), None);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("here.yaml"));
    }
}

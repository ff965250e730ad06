//! Serde model of the configuration document.
//!
//! ```yaml
//! sortColumnName: Date
//! sortType: DESC
//! defaultCategoryName: Discretionary
//! columnNameToAliases:
//!   - Date
//!   - Description: [Transaction]
//! columnNameToCategoryConfig:
//!   - Description:
//!       - category: Groceries
//!         regexes: ["Shoprite.*", "99 ranch market.*"]
//! columnNameToTransformer:
//!   - Date:
//!       dateTransformer:
//!         inputFormats: ["%m/%d/%Y"]
//!         outputFormat: "%Y-%m-%d"
//! ```
//!
//! The same keys are accepted in JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{CategoryRule, OrganizerConfig, SortType};
use crate::error::{ConfigError, ConfigResult};
use crate::organize::transformer::DateTransformerConfig;

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default)]
    pub sort_column_name: Option<String>,

    #[serde(default)]
    pub sort_type: Option<SortType>,

    #[serde(default)]
    pub default_category_name: Option<String>,

    #[serde(default)]
    pub column_name_to_aliases: Option<Vec<AliasEntry>>,

    #[serde(default)]
    pub column_name_to_category_config: Option<Vec<IndexMap<String, Vec<CategoryEntry>>>>,

    #[serde(default)]
    pub column_name_to_transformer: Option<Vec<IndexMap<String, TransformerEntry>>>,
}

/// An entry of `columnNameToAliases`: a bare column name, or a single-key
/// mapping of column name to its aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasEntry {
    Name(String),
    WithAliases(IndexMap<String, Option<Vec<String>>>),
}

/// One `{category, regexes}` item under a column of
/// `columnNameToCategoryConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub category: String,
    pub regexes: Vec<String>,
}

/// The value under a column of `columnNameToTransformer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformerEntry {
    pub date_transformer: DateTransformerConfig,
}

impl ConfigDocument {
    /// Validate the document and build the configuration.
    pub fn into_config(self) -> ConfigResult<OrganizerConfig> {
        let default_category = self
            .default_category_name
            .ok_or(ConfigError::MissingDefaultCategory)?;

        let mut builder = OrganizerConfig::builder(default_category)
            .sort_column(self.sort_column_name)
            .sort_type(self.sort_type.unwrap_or_default());

        for entry in self.column_name_to_aliases.unwrap_or_default() {
            builder = match entry {
                AliasEntry::Name(name) => builder.column(name, Vec::<String>::new()),
                AliasEntry::WithAliases(map) => {
                    let (name, aliases) = single_entry(map, "columnNameToAliases")?;
                    builder.column(name, aliases.unwrap_or_default())
                }
            };
        }

        for map in self.column_name_to_category_config.unwrap_or_default() {
            let (column, categories) = single_entry(map, "columnNameToCategoryConfig")?;
            for entry in categories {
                builder =
                    builder.rule(CategoryRule::new(entry.category, column.clone(), entry.regexes));
            }
        }

        for map in self.column_name_to_transformer.unwrap_or_default() {
            let (column, entry) = single_entry(map, "columnNameToTransformer")?;
            builder = builder.date_transformer(column, entry.date_transformer);
        }

        builder.build()
    }
}

/// Unwrap a mapping that must hold exactly one key.
fn single_entry<V>(map: IndexMap<String, V>, key: &str) -> ConfigResult<(String, V)> {
    if map.len() != 1 {
        return Err(ConfigError::Malformed(format!(
            "each entry of {} must be a single-key mapping, found {} keys",
            key,
            map.len()
        )));
    }
    map.into_iter()
        .next()
        .ok_or_else(|| ConfigError::Malformed(format!("empty entry in {}", key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
sortColumnName: Date
sortType: DESC
defaultCategoryName: Discretionary
columnNameToAliases:
  - Date
  - Description:
      - Transaction
  - Category
  - Amount:
columnNameToCategoryConfig:
  - Description:
      - category: Groceries
        regexes:
          - "Shoprite.*"
          - "rock farmers market.*"
          - "99 ranch market.*"
      - category: Utilities
        regexes: ["pseg.*"]
  - Category:
      - category: Data
        regexes: ["internet"]
"#;

    #[test]
    fn test_yaml_document() {
        let config = OrganizerConfig::from_yaml_str(YAML).unwrap();

        assert_eq!(config.default_category(), "Discretionary");
        assert_eq!(config.sort_column(), Some("Date"));
        assert_eq!(config.sort_type(), SortType::Desc);
        assert_eq!(
            config.aliases().canonical_names().collect::<Vec<_>>(),
            vec!["Date", "Description", "Category", "Amount"]
        );
        assert_eq!(config.aliases().aliases("Description").unwrap(), ["Transaction".to_string()]);
        assert!(config.aliases().aliases("Amount").unwrap().is_empty());
        assert_eq!(config.rules().len(), 3);
        assert_eq!(
            config.category_order(),
            vec!["Discretionary", "Groceries", "Utilities", "Data"]
        );
    }

    #[test]
    fn test_json_document_matches_yaml() {
        let json = r#"{
            "sortColumnName": "Date",
            "sortType": "DESC",
            "defaultCategoryName": "Discretionary",
            "columnNameToAliases": ["Date", {"Description": ["Transaction"]}, "Category", {"Amount": null}],
            "columnNameToCategoryConfig": [
                {"Description": [
                    {"category": "Groceries", "regexes": ["Shoprite.*", "rock farmers market.*", "99 ranch market.*"]},
                    {"category": "Utilities", "regexes": ["pseg.*"]}
                ]},
                {"Category": [{"category": "Data", "regexes": ["internet"]}]}
            ]
        }"#;

        let from_json = OrganizerConfig::from_json_str(json).unwrap();
        let from_yaml = OrganizerConfig::from_yaml_str(YAML).unwrap();

        assert_eq!(from_json.aliases(), from_yaml.aliases());
        assert_eq!(from_json.rules(), from_yaml.rules());
        assert_eq!(from_json.sort_type(), from_yaml.sort_type());
    }

    #[test]
    fn test_missing_default_category() {
        let err = OrganizerConfig::from_yaml_str("sortColumnName: Date\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingDefaultCategory));
    }

    #[test]
    fn test_unknown_sort_type_rejected() {
        let err = OrganizerConfig::from_yaml_str("defaultCategoryName: Other\nsortType: SIDEWAYS\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_multi_key_alias_entry_rejected() {
        let yaml = r#"
defaultCategoryName: Other
columnNameToAliases:
  - Date: [Posted]
    Amount: [Value]
"#;
        let err = OrganizerConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn test_bad_regex_in_document() {
        let yaml = r#"
defaultCategoryName: Other
columnNameToAliases: [Description]
columnNameToCategoryConfig:
  - Description:
      - category: Broken
        regexes: ["[a-"]
"#;
        let err = OrganizerConfig::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("[a-"));
    }

    #[test]
    fn test_transformer_entry() {
        let yaml = r#"
defaultCategoryName: Other
columnNameToAliases: [Date]
columnNameToTransformer:
  - Date:
      dateTransformer:
        inputFormats: ["%m/%d/%Y"]
        outputFormat: "%Y-%m-%d"
"#;
        let config = OrganizerConfig::from_yaml_str(yaml).unwrap();
        assert!(config.transformers().contains_key("Date"));
    }
}

//! # csv-organizer - categorize and merge CSV rows
//!
//! Reads rows from several CSV exports (bank statements, card activity, ...),
//! assigns every row to a category with configurable regex rules, merges all
//! sources and writes one table grouped by category.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────────────────────┐   ┌─────────────┐
//! │  CSV files  │──▶│   Parser    │──▶│          Organizer           │──▶│   Output    │
//! │  (any enc)  │   │ (auto-enc)  │   │ normalize → match → bucket   │   │ (CSV/JSON)  │
//! └─────────────┘   └─────────────┘   │ → merge → order → sort       │   └─────────────┘
//!                                     └──────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csv_organizer::{load_config, organize_files, render_csv, ParseOptions};
//!
//! let config = load_config("organizer.yaml")?;
//! let batch = organize_files(&["checking.csv", "card.csv"], &config, &ParseOptions::default())?;
//! let columns: Vec<&str> = config.aliases().canonical_names().collect();
//! print!("{}", render_csv(&columns, &batch.categories, b',')?);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`models`] - Raw rows, normalized rows, organized categories
//! - [`config`] - Configuration model and document loading
//! - [`parser`] - CSV reading with encoding/delimiter detection
//! - [`organize`] - Normalization, matching, aggregation, ordering
//! - [`output`] - CSV and JSON rendering

// Core modules
pub mod error;
pub mod models;

// Configuration
pub mod config;

// Parsing
pub mod parser;

// Categorize and merge
pub mod organize;

// Rendering
pub mod output;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ConfigResult, CsvError, CsvResult, OrganizeError, OrganizeResult, OutputError,
    OutputResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{CategoryRows, RawRow, Row, RowSet};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{
    load_config, CategoryRule, ColumnAliasTable, ConfigDocument, OrganizerConfig,
    OrganizerConfigBuilder, SortType,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes, parse_csv_file, parse_str,
    ParseOptions, ParseResult,
};

// =============================================================================
// Re-exports - Organizer
// =============================================================================

pub use organize::{
    normalize, organize, organize_files, resolve_category, CategoryBuckets, ColumnNormalizer,
    DateTransformer, DateTransformerConfig, OrganizedBatch, RuleIndex, SourceInfo,
};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use output::{render_csv, render_json};

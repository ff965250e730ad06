//! Categorize-and-merge engine.
//!
//! - `normalizer`: raw column labels to canonical names
//! - `transformer`: cell rewriting (date formats) after normalization
//! - `matcher`: compiled rule index and first-match category resolution
//! - `aggregator`: per-category buckets and their merge
//! - `organizer`: the batch orchestration
//! - `pipeline`: file-level entry point (read CSVs, then organize)

pub mod aggregator;
pub mod matcher;
pub mod normalizer;
pub mod organizer;
pub mod pipeline;
pub mod transformer;

pub use aggregator::CategoryBuckets;
pub use matcher::{resolve_category, CompiledRule, RuleIndex};
pub use normalizer::{normalize, ColumnNormalizer};
pub use organizer::{categorize_row, organize};
pub use pipeline::{organize_files, OrganizedBatch, SourceInfo};
pub use transformer::{apply_transformers, DateTransformer, DateTransformerConfig};

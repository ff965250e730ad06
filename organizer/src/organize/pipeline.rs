//! File-level pipeline: read every CSV source, then organize.
//!
//! # Example
//!
//! ```rust,ignore
//! use csv_organizer::{load_config, organize_files, ParseOptions};
//!
//! let config = load_config("organizer.yaml")?;
//! let batch = organize_files(&["checking.csv", "card.csv"], &config, &ParseOptions::default())?;
//! for category in &batch.categories {
//!     println!("{}: {} rows", category.category, category.rows.len());
//! }
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::organizer::organize;
use crate::config::OrganizerConfig;
use crate::error::{OrganizeError, OrganizeResult};
use crate::models::{CategoryRows, RowSet};
use crate::parser::{parse_csv_file, ParseOptions};

/// What was read from one input file.
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub path: PathBuf,
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Result of [`organize_files`].
#[derive(Debug, Clone, Serialize)]
pub struct OrganizedBatch {
    /// Categories in output order, rows sorted
    pub categories: Vec<CategoryRows>,
    /// One entry per input file, in input order
    pub sources: Vec<SourceInfo>,
}

impl OrganizedBatch {
    pub fn row_count(&self) -> usize {
        self.categories.iter().map(CategoryRows::len).sum()
    }
}

/// Read all `paths` as CSV. The first unreadable file aborts the batch.
pub fn read_sources<P: AsRef<Path>>(
    paths: &[P],
    options: &ParseOptions,
) -> OrganizeResult<(Vec<RowSet>, Vec<SourceInfo>)> {
    let mut sets = Vec::with_capacity(paths.len());
    let mut infos = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let parsed = parse_csv_file(path, options).map_err(|source| OrganizeError::Source {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            "{}: encoding={} delimiter='{}' headers={:?}",
            path.display(),
            parsed.encoding,
            format_delimiter(parsed.delimiter),
            parsed.headers
        );

        infos.push(SourceInfo {
            path: path.to_path_buf(),
            encoding: parsed.encoding.clone(),
            delimiter: parsed.delimiter,
            headers: parsed.headers.clone(),
            row_count: parsed.rows.len(),
        });
        sets.push(parsed.into_row_set(path.display().to_string()));
    }

    Ok((sets, infos))
}

/// Read every CSV file and organize their rows with `config`.
pub fn organize_files<P: AsRef<Path>>(
    paths: &[P],
    config: &OrganizerConfig,
    options: &ParseOptions,
) -> OrganizeResult<OrganizedBatch> {
    let (sets, sources) = read_sources(paths, options)?;
    info!(
        "read {} rows from {} files",
        sources.iter().map(|s| s.row_count).sum::<usize>(),
        sources.len()
    );

    let categories = organize(&sets, config);
    Ok(OrganizedBatch { categories, sources })
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CsvError;
    use std::fs;

    #[test]
    fn test_missing_file_is_fatal() {
        let config = OrganizerConfig::builder("Other").build().unwrap();
        let err = organize_files(&["/no/such/file.csv"], &config, &ParseOptions::default())
            .unwrap_err();

        match err {
            OrganizeError::Source { path, source } => {
                assert_eq!(path, PathBuf::from("/no/such/file.csv"));
                assert!(matches!(source, CsvError::Io { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_source_info() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.csv");
        fs::write(
            &path,
            "Date;Description;Amount\n2024-01-01;Shoprite;10\n2024-01-02;Gas;20\n",
        )
        .unwrap();

        let config = OrganizerConfig::builder("Other")
            .column("Date", Vec::<String>::new())
            .build()
            .unwrap();
        let batch = organize_files(&[&path], &config, &ParseOptions::default()).unwrap();

        assert_eq!(batch.sources.len(), 1);
        assert_eq!(batch.sources[0].delimiter, ';');
        assert_eq!(batch.sources[0].row_count, 2);
        assert_eq!(batch.sources[0].headers, vec!["Date", "Description", "Amount"]);
        assert_eq!(batch.row_count(), 2);
    }

    #[test]
    fn test_format_delimiter() {
        assert_eq!(format_delimiter('\t'), "\\t");
        assert_eq!(format_delimiter(','), ",");
    }
}

//! Batch orchestration: normalize, transform, categorize, merge, order, sort.

use std::cmp::Ordering;
use tracing::{debug, info, warn};

use super::aggregator::CategoryBuckets;
use super::matcher::resolve_category;
use super::normalizer::ColumnNormalizer;
use super::transformer::apply_transformers;
use crate::config::{OrganizerConfig, SortType};
use crate::models::{CategoryRows, RawRow, Row, RowSet};

/// Categorize, merge and sort the rows of every input.
///
/// Rows matching no rule go to the default category. The result lists the
/// default category first, then every configured category in rule order,
/// including categories that received no rows. Within a category rows are
/// sorted by the configured sort column; ties keep input order (sources in
/// the order given, then rows in source order).
pub fn organize(inputs: &[RowSet], config: &OrganizerConfig) -> Vec<CategoryRows> {
    info!("organizing rows from {} sources", inputs.len());

    let mut all = CategoryBuckets::new();
    for input in inputs {
        let categorized = categorize_source(input, config);
        if categorized.is_empty() {
            warn!(
                "{}: organizing returned nothing, check the configuration you provided",
                input.source
            );
            continue;
        }
        all.merge_from(categorized);
    }

    let organized: Vec<CategoryRows> = config
        .category_order()
        .into_iter()
        .map(|category| {
            let mut rows = all.take(category);
            sort_rows(&mut rows, config.sort_column(), config.sort_type());
            CategoryRows::new(category, rows)
        })
        .collect();

    info!(
        "organized {} rows into {} categories",
        organized.iter().map(CategoryRows::len).sum::<usize>(),
        organized.len()
    );
    organized
}

/// Categorize one source into its own buckets.
fn categorize_source(input: &RowSet, config: &OrganizerConfig) -> CategoryBuckets {
    debug!("processing {} ({} rows)", input.source, input.len());

    let mut normalizer = ColumnNormalizer::new(config.aliases(), &input.source);
    let mut buckets = CategoryBuckets::new();
    for raw in &input.rows {
        let (category, row) = categorize_row(raw, &mut normalizer, config);
        buckets.assign(category, row);
    }
    buckets
}

/// Normalize one raw row and pick its category.
pub fn categorize_row<'c>(
    raw: &RawRow,
    normalizer: &mut ColumnNormalizer<'_>,
    config: &'c OrganizerConfig,
) -> (&'c str, Row) {
    let mut row = normalizer.normalize_row(raw);
    apply_transformers(&mut row, config.transformers(), normalizer.source());

    let category = resolve_category(&row, config.rule_index()).unwrap_or_else(|| {
        debug!("no category resolved, using default={}", config.default_category());
        config.default_category()
    });
    (category, row)
}

/// Stable sort by ordinal comparison of the sort column. A missing cell reads
/// as the empty string. Equal keys keep input order in both directions.
fn sort_rows(rows: &mut [Row], column: Option<&str>, sort_type: SortType) {
    let Some(column) = column else {
        return;
    };
    rows.sort_by(|a, b| {
        let (a, b) = match sort_type {
            SortType::Asc => (a, b),
            SortType::Desc => (b, a),
        };
        compare_cells(a.value_or_empty(column), b.value_or_empty(column))
    });
}

fn compare_cells(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}

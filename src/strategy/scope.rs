use std::ops::Range;

use itertools::Itertools;
use serde_json::Value;

use crate::{
    definition::{ColumnDefinition, PARENT_SCOPE_INDEX_RANGE, SortStrategy},
    error::RankError,
    index_range::{IndexRange, parse_index_range},
    story::Story,
};

/// Parent column indexes configured on `strategy`. `None` selects global mode,
/// including when the configured range does not parse.
pub fn parent_scope(strategy: &SortStrategy) -> Option<IndexRange> {
    strategy
        .config_value(PARENT_SCOPE_INDEX_RANGE)
        .and_then(Value::as_str)
        .and_then(parse_index_range)
}

/// Normalized names of the parent columns, in index order. Stops at the first
/// index with no column, so a wide range never walks past the definition.
pub fn parent_columns(
    columns: &[ColumnDefinition],
    indexes: &IndexRange,
) -> Result<Vec<String>, RankError> {
    indexes
        .indexes()
        .map(|index| {
            columns
                .iter()
                .find(|column| column.index == index)
                .map(ColumnDefinition::normalized_name)
                .ok_or(RankError::UnknownParentColumn { index })
        })
        .collect()
}

/// Maximal runs of adjacent stories that agree on every parent column.
pub fn parent_runs(stories: &[Story], parent_columns: &[String]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;
    for (_, run) in &stories.iter().chunk_by(|story| {
        parent_columns
            .iter()
            .map(|name| story.get(name))
            .collect::<Vec<_>>()
    }) {
        let len = run.count();
        runs.push(start..start + len);
        start += len;
    }
    runs
}

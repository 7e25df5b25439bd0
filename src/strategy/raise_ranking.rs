use log::debug;

use crate::{
    definition::{ColumnDefinition, ColumnType, SortStrategy},
    error::RankError,
    story::Story,
};

use super::scope::{parent_columns, parent_runs, parent_scope};

/// Boolean columns with a positive weight, lightest first so the heaviest
/// partition is applied last and dominates.
fn cascade<F>(columns: &[ColumnDefinition], weight: F) -> Vec<String>
where
    F: Fn(&ColumnDefinition) -> i64,
{
    let mut weighted: Vec<(&ColumnDefinition, i64)> = columns
        .iter()
        .filter(|column| column.column_type == Some(ColumnType::Boolean))
        .map(|column| (column, weight(column)))
        .filter(|(_, weight)| *weight > 0)
        .collect();
    weighted.sort_by(|a, b| b.1.cmp(&a.1));
    weighted
        .into_iter()
        .rev()
        .map(|(column, _)| column.normalized_name())
        .collect()
}

fn is_raised(story: &Story, name: &str) -> bool {
    story
        .get(name)
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

/// Stable partition: raised stories first, each group in input order.
fn partition(stories: &mut [Story], cascade: &[String]) {
    for name in cascade {
        stories.sort_by_key(|story| !is_raised(story, name));
    }
}

pub fn sort_by_raise_ranking(
    mut stories: Vec<Story>,
    columns: &[ColumnDefinition],
    strategy: &SortStrategy,
) -> Result<Vec<Story>, RankError> {
    match parent_scope(strategy) {
        None => {
            let cascade = cascade(columns, |column| column.raise_ranking);
            debug!("Raising {} stories by {:?}", stories.len(), cascade);
            partition(&mut stories, &cascade);
        }
        Some(indexes) => {
            let cascade = cascade(columns, |column| column.scope_raise_ranking);
            if cascade.is_empty() {
                return Ok(stories);
            }
            let parents = parent_columns(columns, &indexes)?;
            let runs = parent_runs(&stories, &parents);
            debug!(
                "Raising within {} run(s) under parents {:?} by {:?}",
                runs.len(),
                parents,
                cascade
            );
            for run in runs.into_iter().filter(|run| run.len() > 1) {
                partition(&mut stories[run], &cascade);
            }
        }
    }
    Ok(stories)
}

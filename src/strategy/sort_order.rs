use log::debug;

use crate::{
    definition::{ColumnDefinition, SortDirection, SortStrategy},
    error::RankError,
    story::{ComparableValue, Story},
};

use super::scope::{parent_columns, parent_runs, parent_scope};

type SortKey = (String, SortDirection);

/// Sorts by every key column. One stable pass per key, last key first, so the
/// lowest-index key dominates.
fn sort_by_keys(stories: &mut [Story], keys: &[SortKey]) {
    for (name, direction) in keys.iter().rev() {
        stories.sort_by(|a, b| {
            let ordering = ComparableValue(a.get(name)).cmp(&ComparableValue(b.get(name)));
            if direction.is_descending() {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }
}

fn keys_by_index<F>(columns: &[ColumnDefinition], select: F) -> Vec<SortKey>
where
    F: Fn(&ColumnDefinition) -> Option<SortDirection>,
{
    let mut ordered: Vec<&ColumnDefinition> = columns.iter().collect();
    ordered.sort_by_key(|column| column.index);
    ordered
        .into_iter()
        .filter_map(|column| select(column).map(|direction| (column.normalized_name(), direction)))
        .collect()
}

pub fn sort_by_property_and_order(
    mut stories: Vec<Story>,
    columns: &[ColumnDefinition],
    strategy: &SortStrategy,
) -> Result<Vec<Story>, RankError> {
    match parent_scope(strategy) {
        None => {
            let keys = keys_by_index(columns, |column| {
                column.require_sort.then_some(column.sort_order)
            });
            debug!("Sorting {} stories by {:?}", stories.len(), keys);
            sort_by_keys(&mut stories, &keys);
        }
        Some(indexes) => {
            let parents = parent_columns(columns, &indexes)?;
            let keys = keys_by_index(columns, |column| {
                column.scope_require_sort.then_some(column.scope_sort_order)
            });
            let runs = parent_runs(&stories, &parents);
            debug!(
                "Sorting {} run(s) under parents {:?} by {:?}",
                runs.len(),
                parents,
                keys
            );
            for run in runs.into_iter().filter(|run| run.len() > 1) {
                sort_by_keys(&mut stories[run], &keys);
            }
        }
    }
    Ok(stories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ColumnType, PARENT_SCOPE_INDEX_RANGE, SORT_ORDER, Step};
    use crate::story::StoryFactory;

    fn names(stories: &[Story]) -> Vec<String> {
        stories.iter().map(|s| s.format_value("name")).collect()
    }

    fn build(columns: &[ColumnDefinition], rows: &[(&str, &str, &str)]) -> Vec<Story> {
        let factory = StoryFactory::new(columns.to_vec());
        rows.iter()
            .map(|(name, epic, estimate)| {
                let mut story = factory.create_story();
                story.set_raw("name", name).expect("name");
                story.set_raw("epic", epic).expect("epic");
                story.set_raw("estimate", estimate).expect("estimate");
                story
            })
            .collect()
    }

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new(1, "name", ColumnType::Text),
            ColumnDefinition::new(2, "epic", ColumnType::Text),
            ColumnDefinition::new(3, "estimate", ColumnType::Number),
        ]
    }

    #[test]
    fn global_sort_honors_direction() {
        let mut columns = columns();
        columns[0].require_sort = true;
        let strategy = Step::new(SORT_ORDER, true, 1);
        let stories = build(&columns, &[("s2", "", ""), ("s1", "", "")]);

        let sorted = sort_by_property_and_order(stories, &columns, &strategy).expect("sorted");
        assert_eq!(names(&sorted), vec!["s1", "s2"]);

        columns[0].sort_order = SortDirection::Descending;
        let resorted = sort_by_property_and_order(sorted, &columns, &strategy).expect("sorted");
        assert_eq!(names(&resorted), vec!["s2", "s1"]);
    }

    #[test]
    fn lower_index_key_dominates_and_absent_sorts_first() {
        let mut columns = columns();
        columns[1].require_sort = true;
        columns[2].require_sort = true;
        columns[2].sort_order = SortDirection::Descending;
        let stories = build(
            &columns,
            &[("a", "E2", "1"), ("b", "E1", "3"), ("c", "E1", "8"), ("d", "", "5")],
        );
        let sorted =
            sort_by_property_and_order(stories, &columns, &Step::new(SORT_ORDER, true, 1))
                .expect("sorted");
        assert_eq!(names(&sorted), vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn scoped_sort_stays_inside_parent_runs() {
        let mut columns = columns();
        columns[2].scope_require_sort = true;
        columns[2].scope_sort_order = SortDirection::Descending;
        let strategy = Step::new(SORT_ORDER, true, 1).with_config(PARENT_SCOPE_INDEX_RANGE, "2");
        let stories = build(
            &columns,
            &[
                ("a", "E2", "1"),
                ("b", "E2", "5"),
                ("c", "E1", "2"),
                ("d", "E1", "9"),
                ("e", "E2", "7"),
            ],
        );
        let sorted = sort_by_property_and_order(stories, &columns, &strategy).expect("sorted");
        assert_eq!(names(&sorted), vec!["b", "a", "d", "c", "e"]);
    }

    #[test]
    fn scoped_sort_rejects_missing_parent_column() {
        let strategy = Step::new(SORT_ORDER, true, 1).with_config(PARENT_SCOPE_INDEX_RANGE, "9");
        let err = sort_by_property_and_order(build(&columns(), &[]), &columns(), &strategy)
            .expect_err("unknown parent");
        assert_eq!(err, RankError::UnknownParentColumn { index: 9 });
    }
}

//! Pre-process steps that run before ranking.
//!
//! Steps only flip `needs_ranking`; they never drop or reorder stories. Steps
//! that need the remote tracker are recorded as skipped.

use std::collections::HashSet;

use log::{debug, info, warn};
use serde_json::Value;

use crate::{
    definition::{
        CREATE_JIRA_STORY, Definition, FILTER_OUT_STORY_BASED_ON_JIRA_STATUS,
        FILTER_OUT_STORY_WITHOUT_ID, JIRA_STATUSES, RETRIEVE_JIRA_INFORMATION,
    },
    story::Story,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PreProcessReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
    pub excluded: usize,
}

fn exclude_where<F>(stories: &mut [Story], predicate: F) -> usize
where
    F: Fn(&Story) -> bool,
{
    let mut excluded = 0;
    for story in stories.iter_mut().filter(|story| story.needs_ranking()) {
        if predicate(story) {
            story.set_needs_ranking(false);
            excluded += 1;
        }
    }
    excluded
}

fn status_filter(value: Option<&Value>) -> HashSet<String> {
    value
        .and_then(Value::as_array)
        .map(|statuses| {
            statuses
                .iter()
                .filter_map(Value::as_str)
                .map(|status| status.trim().to_uppercase())
                .collect()
        })
        .unwrap_or_default()
}

pub fn run_pre_process_steps(definition: &Definition, stories: &mut [Story]) -> PreProcessReport {
    let mut report = PreProcessReport::default();

    for step in definition.pre_process_steps() {
        let excluded = if step.is_named(FILTER_OUT_STORY_WITHOUT_ID) {
            exclude_where(stories, |story| story.format_value("StoryId").trim().is_empty())
        } else if step.is_named(FILTER_OUT_STORY_BASED_ON_JIRA_STATUS) {
            let statuses = status_filter(step.config_value(JIRA_STATUSES));
            exclude_where(stories, |story| {
                statuses.contains(&story.format_value("Status").trim().to_uppercase())
            })
        } else if step.is_named(RETRIEVE_JIRA_INFORMATION) || step.is_named(CREATE_JIRA_STORY) {
            warn!(
                "Skipping pre-process step '{}': no issue tracker connection is configured",
                step.name
            );
            report.skipped.push(step.name.clone());
            continue;
        } else {
            warn!("Skipping unknown pre-process step '{}'", step.name);
            report.skipped.push(step.name.clone());
            continue;
        };
        debug!("Step '{}' excluded {} story(ies)", step.name, excluded);
        report.excluded += excluded;
        report.applied.push(step.name.clone());
    }

    info!(
        "Pre-processing applied {} step(s), skipped {}, excluded {} story(ies)",
        report.applied.len(),
        report.skipped.len(),
        report.excluded
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ColumnDefinition, ColumnType, Step};
    use serde_json::json;

    fn definition(steps: Vec<Step>) -> Definition {
        Definition::new(
            vec![
                ColumnDefinition::new(1, "StoryId", ColumnType::Text),
                ColumnDefinition::new(2, "Status", ColumnType::Text),
            ],
            Vec::new(),
            steps,
        )
    }

    fn stories(definition: &Definition, rows: &[(&str, &str)]) -> Vec<Story> {
        let factory = definition.story_factory();
        rows.iter()
            .map(|(id, status)| {
                let mut story = factory.create_story();
                story.set_raw("StoryId", id).expect("id");
                story.set_raw("Status", status).expect("status");
                story
            })
            .collect()
    }

    #[test]
    fn filters_flag_instead_of_removing() {
        let definition = definition(vec![
            Step::new(FILTER_OUT_STORY_BASED_ON_JIRA_STATUS, true, 3)
                .with_config(JIRA_STATUSES, json!(["Closed", "PENDING RELEASE"])),
            Step::new(FILTER_OUT_STORY_WITHOUT_ID, true, 1),
            Step::new(RETRIEVE_JIRA_INFORMATION, true, 2),
        ]);
        let mut stories = stories(
            &definition,
            &[
                ("A-1", "Open"),
                ("", "Open"),
                ("A-2", "closed"),
                ("A-3", "Pending Release"),
                ("  ", "Closed"),
            ],
        );
        let report = run_pre_process_steps(&definition, &mut stories);

        assert_eq!(stories.len(), 5);
        let flags: Vec<_> = stories.iter().map(Story::needs_ranking).collect();
        assert_eq!(flags, vec![true, false, false, false, false]);
        assert_eq!(
            report,
            PreProcessReport {
                applied: vec![
                    FILTER_OUT_STORY_WITHOUT_ID.to_string(),
                    FILTER_OUT_STORY_BASED_ON_JIRA_STATUS.to_string()
                ],
                skipped: vec![RETRIEVE_JIRA_INFORMATION.to_string()],
                excluded: 4,
            }
        );
    }

    #[test]
    fn disabled_steps_do_nothing() {
        let definition = definition(vec![Step::new(FILTER_OUT_STORY_WITHOUT_ID, false, 1)]);
        let mut stories = stories(&definition, &[("", "Open")]);
        let report = run_pre_process_steps(&definition, &mut stories);
        assert!(stories[0].needs_ranking());
        assert_eq!(report, PreProcessReport::default());
    }
}

//! Milestone labels and the sprint schedule that ranks them.
//!
//! A [`Milestone`] keeps the raw label it was read from and a derived
//! priority. The priority is only meaningful after
//! [`Milestone::resolve_priority`] has been called against a
//! [`SprintSchedule`]; until then it is `0`.

use std::{cmp::Ordering, fmt, fs, path::Path};

use log::debug;
use serde_json::Value;

use crate::error::ScheduleError;

#[derive(Debug, Clone, Default)]
pub struct SprintSchedule {
    entries: Vec<(String, i64)>,
}

impl SprintSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a schedule document: an array of `{ "Priority": n, "Sprints": [..] }`
    /// objects. Entries with an invalid priority or sprint list are skipped.
    pub fn load(content: &str) -> Result<Self, ScheduleError> {
        let raw: Value = serde_json::from_str(content).map_err(|err| ScheduleError::Syntax {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        })?;

        let mut schedule = SprintSchedule::new();
        let Some(items) = raw.as_array() else {
            return Ok(schedule);
        };

        for item in items {
            let Some(object) = item.as_object() else {
                continue;
            };
            let mut priority = 0i64;
            let mut sprints = Vec::new();
            for (key, value) in object {
                match key.trim().to_ascii_lowercase().as_str() {
                    "priority" => {
                        if let Some(parsed) = value.as_i64() {
                            priority = parsed;
                        }
                    }
                    "sprints" => {
                        if let Some(list) = value.as_array() {
                            sprints.extend(
                                list.iter()
                                    .filter_map(Value::as_str)
                                    .filter(|sprint| !sprint.is_empty())
                                    .map(str::to_string),
                            );
                        }
                    }
                    _ => {}
                }
            }
            schedule
                .entries
                .extend(sprints.into_iter().map(|sprint| (sprint, priority)));
        }
        debug!("Loaded {} sprint schedule entries", schedule.entries.len());
        Ok(schedule)
    }

    pub fn load_file(path: &Path) -> Result<Self, ScheduleError> {
        let content = fs::read_to_string(path).map_err(|source| ScheduleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(&content)
    }

    pub fn push(&mut self, sprint: impl Into<String>, priority: i64) {
        self.entries.push((sprint.into(), priority));
    }

    /// First entry whose sprint name contains `label` (case-insensitive), or `0`.
    pub fn priority_of(&self, label: &str) -> i64 {
        let needle = label.to_uppercase();
        self.entries
            .iter()
            .find(|(sprint, _)| sprint.to_uppercase().contains(&needle))
            .map(|(_, priority)| *priority)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Milestone {
    label: String,
    priority: i64,
}

impl Milestone {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            priority: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    pub fn resolve_priority(&mut self, schedule: &SprintSchedule) {
        self.priority = if self.label.is_empty() {
            0
        } else {
            schedule.priority_of(&self.label)
        };
    }
}

impl PartialEq for Milestone {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl Eq for Milestone {}

impl PartialOrd for Milestone {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Milestone {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority)
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE: &str = r#"[
        { "Priority": 1, "Sprints": ["R134 S1", "M109", "R139 S2"] },
        { "Priority": 2, "Sprints": ["R140", "M123"] },
        { "Priority": 3, "Sprints": ["M125", "R141", ""] },
        { "Priority": "high", "Sprints": ["R142"] }
    ]"#;

    fn schedule() -> SprintSchedule {
        SprintSchedule::load(SCHEDULE).expect("valid schedule")
    }

    #[test]
    fn load_skips_empty_sprints() {
        let schedule = schedule();
        assert_eq!(schedule.len(), 8);
        assert_eq!(schedule.priority_of("R140"), 2);
        assert_eq!(schedule.priority_of("R142"), 0);
    }

    #[test]
    fn unknown_label_resolves_to_zero() {
        let schedule = SprintSchedule::new();
        assert_eq!(schedule.priority_of("R138"), 0);
    }

    #[test]
    fn resolve_matches_fragments_case_insensitively() {
        let schedule = schedule();
        let mut milestone = Milestone::new("r139");
        milestone.resolve_priority(&schedule);
        assert_eq!(milestone.priority(), 1);
    }

    #[test]
    fn milestones_compare_by_priority_only() {
        let schedule = schedule();
        let resolve = |label: &str| {
            let mut milestone = Milestone::new(label);
            milestone.resolve_priority(&schedule);
            milestone
        };
        let m1 = resolve("M123");
        let m2 = resolve("M125");
        let m3 = resolve("m125");
        let m4 = resolve("R141");
        assert!(m1 < m2);
        assert!(m2 >= m1);
        assert_eq!(m2, m3);
        assert_eq!(m3, m4);
        assert_ne!(m1, m4);
        assert_eq!(m3.to_string(), "m125");
    }

    #[test]
    fn malformed_schedule_reports_position() {
        let err = SprintSchedule::load("[{").expect_err("malformed json");
        assert!(matches!(err, ScheduleError::Syntax { line: 1, .. }));
    }
}

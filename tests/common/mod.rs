#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use backlog_rank::definition::Definition;
use backlog_rank::story::{Story, StoryFactory};
use tempfile::{TempDir, tempdir};

/// Definition exercising every strategy: weighted promotion on two priority
/// columns, then scoped sorting and scoped flag promotion under the partner
/// priority.
pub const DEFINITION_JSON: &str = r#"[
  { "Version": 1 },
  { "PreProcessSteps": [
      { "Name": "FilterOutStoryWithoutId", "Enabled": true, "Priority": 1 }
  ] },
  { "SortStrategies": [
      { "Name": "InlineWeights", "Enabled": true, "Priority": 1 },
      { "Name": "SortOrder", "Enabled": true, "Priority": 2,
        "Config": { "ParentScopeIndexRange": "3" } },
      { "Name": "RaiseRanking", "Enabled": true, "Priority": 3,
        "Config": { "ParentScopeIndexRange": "3" } }
  ] },
  { "Columns": [
      { "Index": 1, "Name": "StoryId", "Type": "str" },
      { "Index": 2, "Name": "Title", "Type": "str" },
      { "Index": 3, "Name": "Partner Priority", "Type": "priority", "InlineWeights": 2 },
      { "Index": 4, "Name": "Product Value", "Type": "priority", "InlineWeights": 1 },
      { "Index": 5, "Name": "Estimate", "Type": "number", "ScopeRequireSort": true },
      { "Index": 6, "Name": "Blocker", "Type": "bool", "ScopeRaiseRanking": 1 }
  ] }
]"#;

pub const BACKLOG_CSV: &str = "\
StoryId,Title,Partner Priority,Product Value,Estimate,Blocker
S-1,Alpha,Low,High,5,No
S-2,Bravo,High,Low,8,No
,Charlie,Critical,Critical,1,Yes
S-4,Delta,High,Low,3,Yes
S-5,Echo,Low,High,2,No
S-6,Foxtrot,Middle,,1,No
";

/// StoryIds of [`BACKLOG_CSV`] after pre-processing and ranking.
pub const RANKED_IDS: &[&str] = &["S-4", "S-2", "S-5", "S-1", "S-6", ""];

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

pub fn sample_definition() -> Definition {
    Definition::load(DEFINITION_JSON).expect("sample definition parses")
}

/// Builds one story per row; each row pairs column names with raw values.
pub fn stories(factory: &StoryFactory, rows: &[&[(&str, &str)]]) -> Vec<Story> {
    rows.iter()
        .map(|row| {
            let mut story = factory.create_story();
            for (name, value) in row.iter() {
                story.set_raw(name, value).expect("raw value converts");
            }
            story
        })
        .collect()
}

pub fn values(stories: &[Story], column: &str) -> Vec<String> {
    stories.iter().map(|story| story.format_value(column)).collect()
}

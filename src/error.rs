use std::path::PathBuf;

use itertools::Itertools;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("The structure of the definition file is wrong. Hint: {message} in line {line}:{column}.")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },
    #[error("The definition file has below issues need to be fixed:\n{}", numbered(.issues))]
    Parse { issues: Vec<String> },
    #[error("Reading definition file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("The structure of the sprint schedule file is wrong. Hint: {message} in line {line}:{column}.")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },
    #[error("Reading sprint schedule file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoryError {
    #[error("Failed to parse '{value}' as {expected} for property '{property}'")]
    InvalidValue {
        property: String,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankError {
    #[error("The compared stories were built by different factories")]
    FactoryMismatch,
    #[error("Parent scope index {index} does not match any column")]
    UnknownParentColumn { index: i64 },
}

fn numbered(issues: &[String]) -> String {
    issues
        .iter()
        .enumerate()
        .map(|(idx, issue)| format!("{}. {issue}", idx + 1))
        .join("\n")
}

impl DefinitionError {
    pub(crate) fn syntax(err: &serde_json::Error) -> Self {
        DefinitionError::Syntax {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

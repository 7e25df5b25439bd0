//! Backlog definition model: columns, sort strategies, and pre-process steps.
//!
//! A [`Definition`] is the canonical, immutable description of one backlog
//! layout. It is parsed from a document shaped as a list of single-section
//! objects:
//!
//! ```json
//! [
//!   { "Version": 1 },
//!   { "PreProcessSteps": [ { "Name": "FilterOutStoryWithoutId", "Enabled": true, "Priority": 1 } ] },
//!   { "SortStrategies": [ { "Name": "InlineWeights", "Enabled": true, "Priority": 1 } ] },
//!   { "Columns": [ { "Index": 1, "Name": "StoryId", "Type": "str" } ] }
//! ]
//! ```
//!
//! ## Responsibilities
//!
//! - Permissive, case-insensitive parsing that collects every item failure
//!   into one [`DefinitionError::Parse`]
//! - Semantic validation returning plain-language violations
//! - Accessors used by the ranking pipeline and the outer shell

use std::{
    collections::{BTreeMap, HashSet},
    fmt,
    fs,
    path::Path,
};

use itertools::Itertools;
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::DefinitionError,
    index_range::{is_index_range_valid, parse_index_range},
    story::StoryFactory,
};

pub const INLINE_WEIGHTS: &str = "InlineWeights";
pub const SORT_ORDER: &str = "SortOrder";
pub const RAISE_RANKING: &str = "RaiseRanking";
pub const PARENT_SCOPE_INDEX_RANGE: &str = "ParentScopeIndexRange";

pub const CREATE_JIRA_STORY: &str = "CreateJiraStory";
pub const FILTER_OUT_STORY_WITHOUT_ID: &str = "FilterOutStoryWithoutId";
pub const RETRIEVE_JIRA_INFORMATION: &str = "RetrieveJiraInformation";
pub const FILTER_OUT_STORY_BASED_ON_JIRA_STATUS: &str = "FilterOutStoryBasedOnJiraStatus";
pub const JIRA_STATUSES: &str = "JiraStatuses";

const KNOWN_PRE_PROCESS_STEPS: &[&str] = &[
    CREATE_JIRA_STORY,
    FILTER_OUT_STORY_WITHOUT_ID,
    RETRIEVE_JIRA_INFORMATION,
    FILTER_OUT_STORY_BASED_ON_JIRA_STATUS,
];

const DEFAULT_VALUE_DELIMITER: &str = "|";
const DEFAULT_VERSION: i64 = 1;

/// Strips spaces and newlines, trims, and lowercases a column name.
pub fn normalize_column_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '\n' | '\r'))
        .collect::<String>()
        .trim()
        .to_lowercase()
}

fn key_matches(key: &str, expected: &str) -> bool {
    key.trim().eq_ignore_ascii_case(expected)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnType {
    Text,
    Boolean,
    Timestamp,
    Priority,
    Milestone,
    Number,
}

impl ColumnType {
    /// Maps a document token (`str`, `bool`, `datetime`, `priority`,
    /// `milestone`, `number`) to a column type.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "str" => Some(ColumnType::Text),
            "bool" => Some(ColumnType::Boolean),
            "datetime" => Some(ColumnType::Timestamp),
            "priority" => Some(ColumnType::Priority),
            "milestone" => Some(ColumnType::Milestone),
            "number" => Some(ColumnType::Number),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            ColumnType::Text => "str",
            ColumnType::Boolean => "bool",
            ColumnType::Timestamp => "datetime",
            ColumnType::Priority => "priority",
            ColumnType::Milestone => "milestone",
            ColumnType::Number => "number",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    pub fn is_descending(self) -> bool {
        matches!(self, SortDirection::Descending)
    }

    fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Link between a column and a field of the remote tracker. Only the outer
/// collaborators interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FieldMapping {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDefinition {
    pub index: i64,
    pub name: String,
    pub column_type: Option<ColumnType>,
    pub require_sort: bool,
    pub sort_order: SortDirection,
    pub scope_require_sort: bool,
    pub scope_sort_order: SortDirection,
    pub inline_weights: i64,
    pub raise_ranking: i64,
    pub scope_raise_ranking: i64,
    pub field_mapping: Option<FieldMapping>,
    pub query_info: bool,
    pub update_info: bool,
    pub delimiter: String,
}

impl Default for ColumnDefinition {
    fn default() -> Self {
        Self {
            index: 0,
            name: String::new(),
            column_type: None,
            require_sort: false,
            sort_order: SortDirection::Ascending,
            scope_require_sort: false,
            scope_sort_order: SortDirection::Ascending,
            inline_weights: -1,
            raise_ranking: -1,
            scope_raise_ranking: -1,
            field_mapping: None,
            query_info: false,
            update_info: false,
            delimiter: DEFAULT_VALUE_DELIMITER.to_string(),
        }
    }
}

impl ColumnDefinition {
    pub fn new(index: i64, name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            index,
            name: name.into(),
            column_type: Some(column_type),
            ..Self::default()
        }
    }

    pub fn normalized_name(&self) -> String {
        normalize_column_name(&self.name)
    }

    fn describe_type(&self) -> String {
        self.column_type
            .map(|ty| ty.to_string())
            .unwrap_or_else(|| "?".to_string())
    }
}

/// A named, prioritized, toggleable rule. Used both for sort strategies and
/// pre-process steps. Config keys are stored lowercased.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub name: String,
    pub enabled: bool,
    pub priority: i64,
    config: BTreeMap<String, Value>,
}

pub type SortStrategy = Step;
pub type PreProcessStep = Step;

impl Step {
    pub fn new(name: impl Into<String>, enabled: bool, priority: i64) -> Self {
        Self {
            name: name.into(),
            enabled,
            priority,
            config: BTreeMap::new(),
        }
    }

    pub fn with_config(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.config.insert(normalize_config_key(key), value.into());
        self
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name)
    }

    pub fn config_value(&self, key: &str) -> Option<&Value> {
        self.config.get(&normalize_config_key(key))
    }

    pub fn has_config(&self, key: &str) -> bool {
        self.config_value(key).is_some()
    }

    pub fn config(&self) -> &BTreeMap<String, Value> {
        &self.config
    }
}

fn normalize_config_key(key: &str) -> String {
    key.trim().to_lowercase()
}

#[derive(Debug, Clone)]
pub struct Definition {
    version: i64,
    columns: Vec<ColumnDefinition>,
    sort_strategies: Vec<SortStrategy>,
    pre_process_steps: Vec<PreProcessStep>,
}

impl Default for Definition {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION,
            columns: Vec::new(),
            sort_strategies: Vec::new(),
            pre_process_steps: Vec::new(),
        }
    }
}

impl Definition {
    pub fn new(
        columns: Vec<ColumnDefinition>,
        sort_strategies: Vec<SortStrategy>,
        pre_process_steps: Vec<PreProcessStep>,
    ) -> Self {
        Self {
            version: DEFAULT_VERSION,
            columns,
            sort_strategies,
            pre_process_steps,
        }
    }

    pub fn load(content: &str) -> Result<Self, DefinitionError> {
        let raw: Value =
            serde_json::from_str(content).map_err(|err| DefinitionError::syntax(&err))?;
        Self::from_document(&raw)
    }

    /// Loads a definition file. `.yml` and `.yaml` files are read as YAML,
    /// everything else as JSON.
    pub fn load_file(path: &Path) -> Result<Self, DefinitionError> {
        let content = fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));
        if !is_yaml {
            return Self::load(&content);
        }
        let raw: Value = serde_yaml::from_str(&content).map_err(|err| {
            let (line, column) = err
                .location()
                .map(|location| (location.line(), location.column()))
                .unwrap_or_default();
            DefinitionError::Syntax {
                message: err.to_string(),
                line,
                column,
            }
        })?;
        Self::from_document(&raw)
    }

    pub fn from_document(raw: &Value) -> Result<Self, DefinitionError> {
        let Some(sections) = raw.as_array() else {
            return Err(DefinitionError::Parse {
                issues: vec!["The definition document must be a list of sections.".to_string()],
            });
        };

        let mut definition = Definition::default();
        let mut issues = Vec::new();

        for section in sections.iter().filter_map(Value::as_object) {
            for (name, configuration) in section {
                if key_matches(name, "Version") {
                    if let Some(version) = configuration.as_i64() {
                        definition.version = version;
                    }
                    continue;
                }
                let kind = if key_matches(name, "PreProcessSteps") {
                    SectionKind::PreProcessSteps
                } else if key_matches(name, "SortStrategies") {
                    SectionKind::SortStrategies
                } else if key_matches(name, "Columns") {
                    SectionKind::Columns
                } else {
                    debug!("Ignoring unknown definition section '{name}'");
                    continue;
                };
                let Some(items) = configuration.as_array() else {
                    issues.push(format!("The {name} section must be a list."));
                    continue;
                };
                for item in items {
                    let parsed = match kind {
                        SectionKind::PreProcessSteps => parse_step(item, "pre-process step")
                            .map(|step| definition.pre_process_steps.push(step)),
                        SectionKind::SortStrategies => parse_step(item, "sort strategy")
                            .map(|step| definition.sort_strategies.push(step)),
                        SectionKind::Columns => {
                            parse_column(item).map(|column| definition.columns.push(column))
                        }
                    };
                    if let Err(issue) = parsed {
                        issues.push(issue);
                    }
                }
            }
        }

        if !issues.is_empty() {
            return Err(DefinitionError::Parse {
                issues: issues.into_iter().unique().collect(),
            });
        }
        debug!(
            "Parsed definition v{} with {} column(s), {} strategy(ies), {} step(s)",
            definition.version,
            definition.columns.len(),
            definition.sort_strategies.len(),
            definition.pre_process_steps.len()
        );
        Ok(definition)
    }

    /// Returns every violation found; an empty list means the definition can
    /// be used for ranking.
    pub fn validate(&self) -> Vec<String> {
        let mut violations = self.validate_pre_process_steps();
        violations.extend(self.validate_sort_strategies());
        violations.extend(self.validate_columns());
        violations
    }

    fn validate_pre_process_steps(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let column_names = self.column_names();
        let mut priorities = HashSet::new();

        for step in &self.pre_process_steps {
            if !KNOWN_PRE_PROCESS_STEPS.iter().any(|known| step.is_named(known)) {
                violations.push(format!(
                    "The PreProcessStep name is invalid. PreProcessStep: {}",
                    step.name
                ));
                continue;
            }

            if step.enabled && step.is_named(CREATE_JIRA_STORY) {
                for required in ["ProjectType", "IssueType"] {
                    if !column_names.contains(&normalize_column_name(required)) {
                        violations.push(format!(
                            "The PreProcessStep: {CREATE_JIRA_STORY} must have a column named {required}."
                        ));
                    }
                }
            }

            if step.enabled && step.is_named(FILTER_OUT_STORY_BASED_ON_JIRA_STATUS) {
                if !column_names.contains(&normalize_column_name("Status")) {
                    violations.push(format!(
                        "The PreProcessStep: {FILTER_OUT_STORY_BASED_ON_JIRA_STATUS} must have a column named Status."
                    ));
                }
                let retrieved_first = self
                    .pre_process_step(RETRIEVE_JIRA_INFORMATION)
                    .is_some_and(|retrieve| retrieve.priority < step.priority);
                if !retrieved_first {
                    violations.push(format!(
                        "The step named {RETRIEVE_JIRA_INFORMATION} must be processed before {FILTER_OUT_STORY_BASED_ON_JIRA_STATUS}."
                    ));
                }
            }

            if step.priority < 0 {
                violations.push(format!(
                    "The pre-process step priority is invalid. PreProcessStep: {}",
                    step.name
                ));
            } else if !priorities.insert(step.priority) {
                violations.push(format!(
                    "The pre-process step priority is duplicate. PreProcessStep: {}",
                    step.name
                ));
            }

            if let Some(statuses) = step.config_value(JIRA_STATUSES) {
                if !step.is_named(FILTER_OUT_STORY_BASED_ON_JIRA_STATUS) {
                    violations.push(format!(
                        "Only {FILTER_OUT_STORY_BASED_ON_JIRA_STATUS} step support {JIRA_STATUSES} config. PreProcessStep: {}.",
                        step.name
                    ));
                }
                if !statuses.is_array() {
                    violations.push(format!(
                        "The format of the Jira Statuses is invalid. PreProcessStep: {}. Supported format like: ['CLOSED', 'PENDING RELEASE'].",
                        step.name
                    ));
                }
            }
        }
        violations
    }

    fn validate_sort_strategies(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let mut priorities = HashSet::new();
        let known_indexes: HashSet<i64> = self.columns.iter().map(|c| c.index).collect();

        for strategy in &self.sort_strategies {
            if strategy.name.trim().is_empty() {
                violations.push("The strategy name is invalid.".to_string());
                continue;
            }

            if strategy.priority < 0 {
                violations.push(format!(
                    "The strategy priority is invalid. Strategy: {}",
                    strategy.name
                ));
            } else if !priorities.insert(strategy.priority) {
                violations.push(format!(
                    "The strategy priority is duplicate. Strategy: {}",
                    strategy.name
                ));
            }

            let Some(range) = strategy.config_value(PARENT_SCOPE_INDEX_RANGE) else {
                continue;
            };
            if !strategy.is_named(SORT_ORDER) && !strategy.is_named(RAISE_RANKING) {
                violations.push(format!(
                    "Only {RAISE_RANKING} and {SORT_ORDER} strategy support {PARENT_SCOPE_INDEX_RANGE} config. Strategy: {}.",
                    strategy.name
                ));
            }
            match range.as_str().filter(|statement| is_index_range_valid(statement)) {
                None => violations.push(format!(
                    "The format of the Parent Level Index Range is invalid. Strategy: {}. Supported format strings like: 1-20 or 20,30.",
                    strategy.name
                )),
                Some(statement) => match parse_index_range(statement) {
                    None => violations.push(format!(
                        "The Parent Level Index Range is out of range. Strategy: {}.",
                        strategy.name
                    )),
                    Some(range) => {
                        if let Some(index) =
                            range.indexes().find(|index| !known_indexes.contains(index))
                        {
                            violations.push(format!(
                                "The Parent Level Index Range refers to a missing column index {index}. Strategy: {}.",
                                strategy.name
                            ));
                        }
                    }
                },
            }
        }
        violations
    }

    fn validate_columns(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let mut names = HashSet::new();
        let mut indexes = HashSet::new();
        let mut inline_weights = HashSet::new();
        let mut field_names = HashSet::new();
        let mut field_paths = HashSet::new();
        let mut has_story_id = false;

        for column in &self.columns {
            let name = &column.name;
            let normalized = column.normalized_name();
            if normalized.is_empty() {
                violations.push(format!("Column name cannot be empty. Index: {}", column.index));
                continue;
            }
            if !names.insert(normalized.clone()) {
                violations.push(format!("Column named {name} has been duplicated."));
                continue;
            }
            if normalized == normalize_column_name("StoryId") {
                has_story_id = true;
            }

            if !indexes.insert(column.index) {
                violations.push(format!("Duplicate Index. Column: {name}"));
            }

            let column_type = column.column_type;
            if column_type.is_none() {
                violations.push(format!("Invalid Column Type. Column: {name}"));
            }

            if column.inline_weights > 0 {
                if column_type != Some(ColumnType::Priority) {
                    violations.push(format!(
                        "Column do not support Inline Weights. Currently only Priority type support. Column: {name}"
                    ));
                }
                if !inline_weights.insert(column.inline_weights) {
                    violations.push(format!(
                        "Duplicate Inline Weights. Currently only support different line weights. Column: {name}"
                    ));
                }
            }

            if column.raise_ranking > 0 && column_type != Some(ColumnType::Boolean) {
                violations.push(format!(
                    "Column do not support Raise Ranking feature. Column: {name}"
                ));
            }
            if column.scope_raise_ranking > 0 && column_type != Some(ColumnType::Boolean) {
                violations.push(format!(
                    "Column do not support Scope Raise Ranking feature. Column: {name}"
                ));
            }

            if let Some(mapping) = &column.field_mapping {
                if mapping.name.trim().is_empty() {
                    violations.push(format!(
                        "Jira Field Mapping has the invalid name. Column: {name}"
                    ));
                } else if !field_names.insert(mapping.name.clone()) {
                    violations.push(format!(
                        "Column has duplicate jira field name. Name: {}, Column: {name}",
                        mapping.name
                    ));
                }
                if mapping.path.trim().is_empty() {
                    violations.push(format!(
                        "Jira Field Mapping has the invalid path. Column: {name}"
                    ));
                } else if !field_paths.insert(mapping.path.clone()) {
                    violations.push(format!(
                        "Column has duplicate jira field path. Path: {}, Column: {name}",
                        mapping.path
                    ));
                }
            }
        }

        let needs_story_id = [
            CREATE_JIRA_STORY,
            FILTER_OUT_STORY_WITHOUT_ID,
            RETRIEVE_JIRA_INFORMATION,
        ]
        .iter()
        .any(|step| self.pre_process_step(step).is_some());
        if needs_story_id && !self.columns.is_empty() && !has_story_id {
            violations.push(
                "Must have a column named StoryId so that program can identify the record."
                    .to_string(),
            );
        }

        if violations.is_empty() {
            let contiguous = self
                .columns
                .iter()
                .map(|column| column.index)
                .sorted()
                .enumerate()
                .all(|(position, index)| index == position as i64 + 1);
            if !contiguous {
                violations.push("Column indices must be contiguous from 1.".to_string());
            }
        }
        violations
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    /// Columns ordered by index.
    pub fn columns(&self) -> Vec<ColumnDefinition> {
        self.columns
            .iter()
            .sorted_by_key(|column| column.index)
            .cloned()
            .collect()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(ColumnDefinition::normalized_name)
            .collect()
    }

    pub fn column_by_index(&self, index: i64) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|column| column.index == index)
    }

    /// Columns whose field mapping path starts with `key` (first dotted segment).
    pub fn columns_by_field_mapping(&self, key: &str) -> Vec<ColumnDefinition> {
        let wanted = normalize_column_name(key);
        self.columns
            .iter()
            .filter(|column| {
                column.field_mapping.as_ref().is_some_and(|mapping| {
                    let head = mapping.path.split('.').next().unwrap_or_default();
                    normalize_column_name(head) == wanted
                })
            })
            .cloned()
            .collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn max_column_index(&self) -> Option<i64> {
        self.columns.iter().map(|column| column.index).max()
    }

    /// Enabled sort strategies in ascending priority order.
    pub fn sort_strategies(&self) -> Vec<SortStrategy> {
        steps_by_priority(&self.sort_strategies, true)
    }

    pub fn disabled_sort_strategies(&self) -> Vec<SortStrategy> {
        steps_by_priority(&self.sort_strategies, false)
    }

    /// Enabled pre-process steps in ascending priority order.
    pub fn pre_process_steps(&self) -> Vec<PreProcessStep> {
        steps_by_priority(&self.pre_process_steps, true)
    }

    pub fn pre_process_step(&self, name: &str) -> Option<&PreProcessStep> {
        self.pre_process_steps
            .iter()
            .find(|step| step.enabled && step.is_named(name))
    }

    pub fn story_factory(&self) -> StoryFactory {
        StoryFactory::new(self.columns())
    }
}

fn steps_by_priority(steps: &[Step], enabled: bool) -> Vec<Step> {
    steps
        .iter()
        .filter(|step| step.enabled == enabled)
        .sorted_by_key(|step| step.priority)
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy)]
enum SectionKind {
    PreProcessSteps,
    SortStrategies,
    Columns,
}

fn item_object<'a>(item: &'a Value, kind: &str) -> Result<&'a Map<String, Value>, String> {
    item.as_object()
        .ok_or_else(|| format!("The {kind} item must be an object."))
}

fn parse_step(item: &Value, kind: &str) -> Result<Step, String> {
    let object = item_object(item, kind)?;
    let mut step = Step::new(String::new(), false, 0);

    for (key, value) in object {
        if key_matches(key, "Name") {
            step.name = value
                .as_str()
                .ok_or_else(|| format!("The Name property in the {kind} is invalid."))?
                .to_string();
        } else if key_matches(key, "Enabled") {
            step.enabled = value.as_bool().unwrap_or(false);
        } else if key_matches(key, "Priority") {
            step.priority = value
                .as_i64()
                .ok_or_else(|| format!("The Priority property in the {kind} is invalid."))?;
        } else if key_matches(key, "Config") {
            step.config = value
                .as_object()
                .map(|config| {
                    config
                        .iter()
                        .map(|(k, v)| (normalize_config_key(k), v.clone()))
                        .collect()
                })
                .unwrap_or_default();
        }
    }
    Ok(step)
}

fn column_bool(value: &Value, property: &str) -> Result<Option<bool>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(flag) => Ok(Some(*flag)),
        _ => Err(format!(
            "The {property} property in the column definition should be boolean."
        )),
    }
}

fn column_int(value: &Value, property: &str) -> Result<Option<i64>, String> {
    match value {
        Value::Null => Ok(None),
        other => other.as_i64().map(Some).ok_or_else(|| {
            format!("The {property} property in the column definition should be integer.")
        }),
    }
}

fn parse_field_mapping(value: &Value) -> Result<Option<FieldMapping>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Object(object) => {
            let mut mapping = FieldMapping::default();
            for (key, value) in object {
                let text = value.as_str().unwrap_or_default().to_string();
                if key_matches(key, "name") {
                    mapping.name = text;
                } else if key_matches(key, "path") {
                    mapping.path = text;
                }
            }
            Ok(Some(mapping))
        }
        _ => Err("Jira Field Mapping can only be dictionary.".to_string()),
    }
}

fn parse_column(item: &Value) -> Result<ColumnDefinition, String> {
    let object = item_object(item, "column definition")?;
    let mut column = ColumnDefinition::default();

    for (key, value) in object {
        let key = key.trim().to_ascii_lowercase();
        match key.as_str() {
            "index" => {
                if value.is_null() {
                    return Err("Column definition must has an index.".to_string());
                }
                column.index = value.as_i64().ok_or_else(|| {
                    "The Index property type in the column definition is not integer.".to_string()
                })?;
            }
            "name" => {
                if value.is_null() {
                    return Err("Column definition must has a name.".to_string());
                }
                column.name = value
                    .as_str()
                    .ok_or_else(|| {
                        "The Name property type in the column definition should be string."
                            .to_string()
                    })?
                    .to_string();
            }
            "type" => column.column_type = value.as_str().and_then(ColumnType::from_token),
            "requiresort" => {
                column.require_sort = column_bool(value, "RequireSort")?.unwrap_or(false);
            }
            "sortorder" => {
                column.sort_order = SortDirection::from_descending(
                    column_bool(value, "SortOrder")?.unwrap_or(false),
                );
            }
            "scoperequiresort" => {
                column.scope_require_sort =
                    column_bool(value, "ScopeRequireSort")?.unwrap_or(false);
            }
            "scopesortorder" => {
                column.scope_sort_order = SortDirection::from_descending(
                    column_bool(value, "ScopeSortOrder")?.unwrap_or(false),
                );
            }
            "inlineweights" => {
                column.inline_weights = column_int(value, "InlineWeights")?.unwrap_or(-1);
            }
            "raiseranking" => {
                column.raise_ranking = column_int(value, "RaiseRanking")?.unwrap_or(-1);
            }
            "scoperaiseranking" => {
                column.scope_raise_ranking =
                    column_int(value, "ScopeRaiseRanking")?.unwrap_or(-1);
            }
            "jirafieldmapping" | "fieldmapping" => {
                column.field_mapping = parse_field_mapping(value)?;
            }
            "queryjirainfo" => {
                column.query_info = column_bool(value, "QueryJiraInfo")?.unwrap_or(false);
            }
            "updatejirainfo" => {
                column.update_info = column_bool(value, "UpdateJiraInfo")?.unwrap_or(false);
            }
            "delimiter" => {
                if let Some(delimiter) = value.as_str() {
                    column.delimiter = delimiter.trim().to_lowercase();
                }
            }
            _ => {}
        }
    }
    Ok(column)
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}({})", self.index, self.name, self.describe_type())
    }
}

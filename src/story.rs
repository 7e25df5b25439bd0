use std::{
    cmp::Ordering,
    collections::HashMap,
    fmt,
    str::FromStr,
    sync::{Arc, OnceLock},
};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;

use crate::{
    definition::{ColumnDefinition, ColumnType, normalize_column_name},
    error::StoryError,
    milestone::{Milestone, SprintSchedule},
    priority::Priority,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Text(String),
    Boolean(bool),
    Timestamp(NaiveDateTime),
    Priority(Priority),
    Milestone(Milestone),
    Number(Decimal),
}

impl PropertyValue {
    fn variant_rank(&self) -> u8 {
        match self {
            PropertyValue::Text(_) => 0,
            PropertyValue::Boolean(_) => 1,
            PropertyValue::Timestamp(_) => 2,
            PropertyValue::Priority(_) => 3,
            PropertyValue::Milestone(_) => 4,
            PropertyValue::Number(_) => 5,
        }
    }

    pub fn as_priority(&self) -> Option<Priority> {
        match self {
            PropertyValue::Priority(priority) => Some(*priority),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            PropertyValue::Text(text) => text.clone(),
            PropertyValue::Boolean(true) => "Yes".to_string(),
            PropertyValue::Boolean(false) => "No".to_string(),
            PropertyValue::Timestamp(ts) => ts.format("%Y-%m-%d").to_string(),
            PropertyValue::Priority(priority) => priority.to_string(),
            PropertyValue::Milestone(milestone) => milestone.to_string(),
            PropertyValue::Number(number) => number.to_string(),
        }
    }
}

/// Values of one column share a variant, so the variant rank only breaks
/// ties for hand-built stories that mix types under one name.
impl Ord for PropertyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (PropertyValue::Text(a), PropertyValue::Text(b)) => a.cmp(b),
            (PropertyValue::Boolean(a), PropertyValue::Boolean(b)) => a.cmp(b),
            (PropertyValue::Timestamp(a), PropertyValue::Timestamp(b)) => a.cmp(b),
            (PropertyValue::Priority(a), PropertyValue::Priority(b)) => a.cmp(b),
            (PropertyValue::Milestone(a), PropertyValue::Milestone(b)) => a.cmp(b),
            (PropertyValue::Number(a), PropertyValue::Number(b)) => a.cmp(b),
            _ => self.variant_rank().cmp(&other.variant_rank()),
        }
    }
}

impl PartialOrd for PropertyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Optional property value that orders absent before present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparableValue<'a>(pub Option<&'a PropertyValue>);

impl Ord for ComparableValue<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(left), Some(right)) => left.cmp(right),
        }
    }
}

impl PartialOrd for ComparableValue<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub fn convert_to_bool(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.eq_ignore_ascii_case("yes") || trimmed.eq_ignore_ascii_case("true")
}

fn number_fragment() -> &'static Regex {
    static FRAGMENT: OnceLock<Regex> = OnceLock::new();
    FRAGMENT.get_or_init(|| Regex::new(r"[0-9.]{1,10}").expect("number pattern compiles"))
}

/// Reads the first numeric fragment of `raw`, so `"~3.5 days"` becomes `3.5`.
/// Text without a usable fragment is zero.
pub fn convert_to_decimal(raw: &str) -> Decimal {
    number_fragment()
        .find(raw)
        .and_then(|fragment| Decimal::from_str(fragment.as_str()).ok())
        .unwrap_or(Decimal::ZERO)
}

pub fn convert_to_datetime(raw: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

    let value = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[derive(Debug)]
struct FactoryInner {
    columns: Vec<ColumnDefinition>,
    types: HashMap<String, ColumnType>,
    weight_rules: Vec<(String, i64)>,
}

/// Builds stories for one column layout. Clones share the same layout, and
/// two stories are comparable only when their factories are the same
/// allocation.
#[derive(Debug, Clone)]
pub struct StoryFactory {
    inner: Arc<FactoryInner>,
}

impl StoryFactory {
    pub fn new(columns: Vec<ColumnDefinition>) -> Self {
        let types = columns
            .iter()
            .filter_map(|column| {
                column
                    .column_type
                    .map(|ty| (column.normalized_name(), ty))
            })
            .collect();
        let mut weight_rules: Vec<(String, i64)> = columns
            .iter()
            .filter(|column| column.inline_weights > 0)
            .map(|column| (column.normalized_name(), column.inline_weights))
            .collect();
        weight_rules.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            inner: Arc::new(FactoryInner {
                columns,
                types,
                weight_rules,
            }),
        }
    }

    pub fn create_story(&self) -> Story {
        Story {
            factory: self.clone(),
            properties: HashMap::new(),
            needs_ranking: true,
            row_number: None,
        }
    }

    pub fn same_factory(&self, other: &StoryFactory) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.inner.columns
    }

    /// Inline-weight rules as `(normalized name, weight)`, heaviest first.
    pub fn weight_rules(&self) -> &[(String, i64)] {
        &self.inner.weight_rules
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.inner.types.get(&normalize_column_name(name)).copied()
    }

    pub fn column_by_index(&self, index: i64) -> Option<&ColumnDefinition> {
        self.inner.columns.iter().find(|column| column.index == index)
    }
}

/// One backlog row: a property bag keyed by normalized column name.
///
/// Stories have no whole-record ordering; only the ranking strategies order
/// them, so comparing two stories directly does not compile:
///
/// ```compile_fail
/// use backlog_rank::definition::{ColumnDefinition, ColumnType};
/// use backlog_rank::story::StoryFactory;
///
/// let factory = StoryFactory::new(vec![ColumnDefinition::new(1, "Title", ColumnType::Text)]);
/// let a = factory.create_story();
/// let b = factory.create_story();
/// let _ = a < b;
/// ```
#[derive(Debug, Clone)]
pub struct Story {
    factory: StoryFactory,
    properties: HashMap<String, PropertyValue>,
    needs_ranking: bool,
    row_number: Option<usize>,
}

impl Story {
    pub fn factory(&self) -> &StoryFactory {
        &self.factory
    }

    pub fn same_factory(&self, other: &Story) -> bool {
        self.factory.same_factory(&other.factory)
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(&normalize_column_name(name))
    }

    pub fn set(&mut self, name: &str, value: PropertyValue) {
        self.properties.insert(normalize_column_name(name), value);
    }

    pub fn clear(&mut self, name: &str) {
        self.properties.remove(&normalize_column_name(name));
    }

    /// Converts `raw` by the column's declared type and stores it. Columns the
    /// factory does not know are stored as text; blank input clears the value.
    pub fn set_raw(&mut self, name: &str, raw: &str) -> Result<(), StoryError> {
        if raw.trim().is_empty() {
            self.clear(name);
            return Ok(());
        }
        let value = match self.factory.column_type(name) {
            None | Some(ColumnType::Text) => PropertyValue::Text(raw.to_string()),
            Some(ColumnType::Boolean) => PropertyValue::Boolean(convert_to_bool(raw)),
            Some(ColumnType::Priority) => PropertyValue::Priority(Priority::from_text(raw)),
            Some(ColumnType::Milestone) => PropertyValue::Milestone(Milestone::new(raw.trim())),
            Some(ColumnType::Number) => PropertyValue::Number(convert_to_decimal(raw)),
            Some(ColumnType::Timestamp) => {
                let parsed = convert_to_datetime(raw).ok_or_else(|| StoryError::InvalidValue {
                    property: name.to_string(),
                    value: raw.to_string(),
                    expected: "timestamp",
                })?;
                PropertyValue::Timestamp(parsed)
            }
        };
        self.set(name, value);
        Ok(())
    }

    pub fn format_value(&self, name: &str) -> String {
        self.get(name)
            .map(PropertyValue::as_display)
            .unwrap_or_default()
    }

    pub fn resolve_milestones(&mut self, schedule: &SprintSchedule) {
        for value in self.properties.values_mut() {
            if let PropertyValue::Milestone(milestone) = value {
                milestone.resolve_priority(schedule);
            }
        }
    }

    pub fn needs_ranking(&self) -> bool {
        self.needs_ranking
    }

    pub fn set_needs_ranking(&mut self, needs_ranking: bool) {
        self.needs_ranking = needs_ranking;
    }

    pub fn row_number(&self) -> Option<usize> {
        self.row_number
    }

    pub fn set_row_number(&mut self, row_number: usize) {
        self.row_number = Some(row_number);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn factory() -> StoryFactory {
        let mut urgency = ColumnDefinition::new(2, "Urgency", ColumnType::Priority);
        urgency.inline_weights = 1;
        let mut value = ColumnDefinition::new(3, "Partner Priority", ColumnType::Priority);
        value.inline_weights = 5;
        StoryFactory::new(vec![
            ColumnDefinition::new(1, "Title", ColumnType::Text),
            urgency,
            value,
            ColumnDefinition::new(4, "Blocked", ColumnType::Boolean),
            ColumnDefinition::new(5, "Deadline", ColumnType::Timestamp),
            ColumnDefinition::new(6, "Estimate", ColumnType::Number),
            ColumnDefinition::new(7, "Sprint", ColumnType::Milestone),
        ])
    }

    #[test]
    fn weight_rules_are_heaviest_first() {
        let factory = factory();
        assert_eq!(
            factory.weight_rules(),
            &[("partnerpriority".to_string(), 5), ("urgency".to_string(), 1)]
        );
    }

    #[test]
    fn factory_identity_follows_the_shared_layout() {
        let first = factory();
        let second = factory();
        let a = first.create_story();
        let b = first.clone().create_story();
        let c = second.create_story();
        assert!(a.same_factory(&b));
        assert!(!a.same_factory(&c));
    }

    #[test]
    fn set_raw_converts_by_declared_type() {
        let mut story = factory().create_story();
        story.set_raw("title", "Login page").expect("text");
        story.set_raw("Partner Priority", "high").expect("priority");
        story.set_raw("Blocked", " YES ").expect("bool");
        story.set_raw("Estimate", "~3.5 days").expect("number");
        story.set_raw("Sprint", "R140").expect("milestone");
        story.set_raw("Notes", "free text").expect("undeclared");

        assert_eq!(story.get("Title"), Some(&PropertyValue::Text("Login page".into())));
        assert_eq!(
            story.get("partnerpriority").and_then(PropertyValue::as_priority),
            Some(Priority::High)
        );
        assert_eq!(story.get("blocked").and_then(PropertyValue::as_bool), Some(true));
        assert_eq!(story.format_value("Estimate"), "3.5");
        assert_eq!(story.format_value("Sprint"), "R140");
        assert_eq!(story.format_value("notes"), "free text");
        assert_eq!(story.format_value("Blocked"), "Yes");
    }

    #[test]
    fn blank_input_clears_the_property() {
        let mut story = factory().create_story();
        story.set_raw("Title", "x").expect("text");
        story.set_raw("Title", "   ").expect("blank");
        assert!(story.get("Title").is_none());
        assert_eq!(story.format_value("Title"), "");
    }

    #[test]
    fn invalid_timestamp_is_reported() {
        let mut story = factory().create_story();
        let err = story.set_raw("Deadline", "next week").expect_err("bad date");
        assert_eq!(
            err,
            StoryError::InvalidValue {
                property: "Deadline".to_string(),
                value: "next week".to_string(),
                expected: "timestamp",
            }
        );
    }

    #[test]
    fn convert_to_datetime_accepts_common_layouts() {
        for raw in [
            "2024-05-06",
            "2024/05/06",
            "05/06/2024",
            "06-05-2024",
            "2024-05-06 14:30",
            "2024-05-06T14:30:00",
            "2024-05-06T14:30:00+00:00",
        ] {
            let parsed = convert_to_datetime(raw).unwrap_or_else(|| panic!("{raw} parses"));
            assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 5, 6).expect("date"));
        }
        assert_eq!(
            convert_to_datetime("2024-05-06 14:30").map(|ts| ts.hour()),
            Some(14)
        );
        assert!(convert_to_datetime("soon").is_none());
    }

    #[test]
    fn convert_to_decimal_falls_back_to_zero() {
        assert_eq!(convert_to_decimal("13"), Decimal::from(13));
        assert_eq!(convert_to_decimal("about 8 points"), Decimal::from(8));
        assert_eq!(convert_to_decimal("none"), Decimal::ZERO);
        assert_eq!(convert_to_decimal("1.2.3"), Decimal::ZERO);
    }

    #[test]
    fn convert_to_bool_accepts_yes_and_true() {
        assert!(convert_to_bool("Yes"));
        assert!(convert_to_bool("TRUE"));
        assert!(!convert_to_bool("no"));
        assert!(!convert_to_bool("1"));
    }

    #[test]
    fn milestones_resolve_against_schedule() {
        let mut schedule = SprintSchedule::new();
        schedule.push("R140 S1", 2);
        let mut story = factory().create_story();
        story.set_raw("Sprint", "r140").expect("milestone");
        story.resolve_milestones(&schedule);
        let Some(PropertyValue::Milestone(milestone)) = story.get("Sprint") else {
            panic!("milestone property");
        };
        assert_eq!(milestone.priority(), 2);
    }

    #[test]
    fn comparable_value_orders_none_before_some() {
        let low = PropertyValue::Priority(Priority::Low);
        assert!(ComparableValue(None) < ComparableValue(Some(&low)));
        assert_eq!(ComparableValue(None), ComparableValue(None));
        let text = PropertyValue::Text("a".into());
        assert!(ComparableValue(Some(&text)) < ComparableValue(Some(&low)));
    }

    #[test]
    fn provenance_flags_default_to_rankable() {
        let mut story = factory().create_story();
        assert!(story.needs_ranking());
        assert_eq!(story.row_number(), None);
        story.set_needs_ranking(false);
        story.set_row_number(3);
        assert!(!story.needs_ranking());
        assert_eq!(story.row_number(), Some(3));
    }
}

// Date-based view filter for task lists

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Task;

/// Which due-date category of tasks to show
///
/// Unrecognized values are kept verbatim in `Other` so that whatever the
/// caller set round-trips through persistence unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DateFilter {
    #[default]
    Upcoming,
    Today,
    Past,
    Other(String),
}

impl DateFilter {
    pub fn as_str(&self) -> &str {
        match self {
            DateFilter::Upcoming => "upcoming",
            DateFilter::Today => "today",
            DateFilter::Past => "past",
            DateFilter::Other(s) => s,
        }
    }

    /// Whether `task` falls in this category relative to `today`
    ///
    /// Tasks without a parseable due date count as upcoming. `Other` matches everything.
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        let due = task.due_date();
        match self {
            DateFilter::Upcoming => due.is_none_or(|d| d > today),
            DateFilter::Today => due == Some(today),
            DateFilter::Past => due.is_some_and(|d| d < today),
            DateFilter::Other(_) => true,
        }
    }
}

impl From<String> for DateFilter {
    fn from(value: String) -> Self {
        match value.as_str() {
            "upcoming" => DateFilter::Upcoming,
            "today" => DateFilter::Today,
            "past" => DateFilter::Past,
            _ => DateFilter::Other(value),
        }
    }
}

impl From<&str> for DateFilter {
    fn from(value: &str) -> Self {
        DateFilter::from(value.to_string())
    }
}

impl From<DateFilter> for String {
    fn from(filter: DateFilter) -> Self {
        match filter {
            DateFilter::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for DateFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTask;

    fn task_due(due: Option<&str>) -> Task {
        let mut task = NewTask::new("t").into_task("1".to_string());
        task.due = due.map(str::to_string);
        task
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn test_filter_from_string() {
        assert_eq!(DateFilter::from("upcoming"), DateFilter::Upcoming);
        assert_eq!(DateFilter::from("today"), DateFilter::Today);
        assert_eq!(DateFilter::from("past"), DateFilter::Past);
        assert_eq!(DateFilter::from("someday"), DateFilter::Other("someday".to_string()));
    }

    #[test]
    fn test_filter_serialization() {
        assert_eq!(serde_json::to_string(&DateFilter::Past).unwrap(), "\"past\"");
        assert_eq!(
            serde_json::to_string(&DateFilter::Other("weird".to_string())).unwrap(),
            "\"weird\""
        );

        let filter: DateFilter = serde_json::from_str("\"weird\"").unwrap();
        assert_eq!(filter, DateFilter::Other("weird".to_string()));
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(DateFilter::Upcoming.to_string(), "upcoming");
        assert_eq!(DateFilter::Other("x".to_string()).to_string(), "x");
    }

    #[test]
    fn test_filter_matches_by_due_date() {
        let past = task_due(Some("2024-05-09T12:00:00.000Z"));
        let now = task_due(Some("2024-05-10T08:00:00.000Z"));
        let later = task_due(Some("2024-05-11T00:00:00.000Z"));
        let undated = task_due(None);

        assert!(DateFilter::Past.matches(&past, today()));
        assert!(!DateFilter::Past.matches(&now, today()));
        assert!(!DateFilter::Past.matches(&undated, today()));

        assert!(DateFilter::Today.matches(&now, today()));
        assert!(!DateFilter::Today.matches(&later, today()));

        assert!(DateFilter::Upcoming.matches(&later, today()));
        assert!(DateFilter::Upcoming.matches(&undated, today()));
        assert!(!DateFilter::Upcoming.matches(&past, today()));
    }

    #[test]
    fn test_unknown_filter_matches_everything() {
        let filter = DateFilter::from("all");
        assert!(filter.matches(&task_due(Some("2000-01-01T00:00:00Z")), today()));
        assert!(filter.matches(&task_due(None), today()));
    }
}

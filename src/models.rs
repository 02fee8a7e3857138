use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-managed resource types with a list screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Team,
    Action,
    Datasource,
    Dataset,
    Expectation,
    Validation,
    Suggestion,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Team,
        ResourceKind::Action,
        ResourceKind::Datasource,
        ResourceKind::Dataset,
        ResourceKind::Expectation,
        ResourceKind::Validation,
        ResourceKind::Suggestion,
    ];

    /// Screen title
    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Team => "Teams",
            ResourceKind::Action => "Actions",
            ResourceKind::Datasource => "Datasources",
            ResourceKind::Dataset => "Datasets",
            ResourceKind::Expectation => "Expectations",
            ResourceKind::Validation => "Validations",
            ResourceKind::Suggestion => "Suggestions",
        }
    }

    /// Singular name used in modal and dialog titles
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Team => "Team",
            ResourceKind::Action => "Action",
            ResourceKind::Datasource => "Datasource",
            ResourceKind::Dataset => "Dataset",
            ResourceKind::Expectation => "Expectation",
            ResourceKind::Validation => "Validation",
            ResourceKind::Suggestion => "Suggestion",
        }
    }

    /// Lowercase plural for messages
    pub fn noun(&self) -> &'static str {
        match self {
            ResourceKind::Team => "teams",
            ResourceKind::Action => "actions",
            ResourceKind::Datasource => "data sources",
            ResourceKind::Dataset => "datasets",
            ResourceKind::Expectation => "expectations",
            ResourceKind::Validation => "validations",
            ResourceKind::Suggestion => "suggestions",
        }
    }

    /// Rows can be created and edited through a modal
    pub fn is_editable(&self) -> bool {
        matches!(self, ResourceKind::Team | ResourceKind::Action | ResourceKind::Datasource)
    }

    pub fn is_deletable(&self) -> bool {
        !matches!(self, ResourceKind::Validation)
    }

    /// Forms are generated from a server-supplied JSON Schema
    pub fn is_schema_driven(&self) -> bool {
        matches!(self, ResourceKind::Action | ResourceKind::Datasource)
    }

    pub fn delete_prompt(&self) -> (&'static str, &'static str) {
        match self {
            ResourceKind::Team => ("Delete Team", "Are you sure you would like to delete this team?"),
            ResourceKind::Action => ("Delete Action", "Are you sure you would like to delete this action?"),
            ResourceKind::Datasource => (
                "Delete Datasource",
                "Deleting a datasource will also remove its datasets, expectations, and validations.",
            ),
            ResourceKind::Dataset => (
                "Delete Dataset",
                "Deleting a dataset will also remove its expectations and validations.",
            ),
            ResourceKind::Expectation => (
                "Delete Expectation",
                "Are you sure you would like to delete this expectation?",
            ),
            ResourceKind::Validation => ("Delete Validation", ""),
            ResourceKind::Suggestion => (
                "Delete Suggestion",
                "Are you sure you would like to dismiss this suggestion?",
            ),
        }
    }
}

/// A console user as returned by `/user` and `/user/me`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub is_verified: bool,
}

/// Server-assigned key of an opaque resource row
pub fn resource_key(row: &Value) -> Option<String> {
    match row.get("key")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Display text of a JSON value inside a table cell
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(s) if s.is_empty() => String::from("-"),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Parse the timestamp formats the service emits
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Humanized distance from `now`, e.g. "5 minutes ago" or "in an hour".
/// Unparseable input is returned unchanged.
pub fn relative_time(text: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(text) else {
        return text.to_string();
    };

    let delta = now.signed_duration_since(then).num_seconds();
    let phrase = humanize(delta.unsigned_abs());
    if delta >= 0 {
        format!("{} ago", phrase)
    } else {
        format!("in {}", phrase)
    }
}

fn humanize(seconds: u64) -> String {
    let minutes = (seconds as f64 / 60.0).round() as u64;
    let hours = (seconds as f64 / 3600.0).round() as u64;
    let days = (seconds as f64 / 86_400.0).round() as u64;
    let months = (seconds as f64 / 2_629_746.0).round() as u64;
    let years = (seconds as f64 / 31_556_952.0).round() as u64;

    match seconds {
        0..=44 => String::from("a few seconds"),
        45..=89 => String::from("a minute"),
        _ if seconds < 45 * 60 => format!("{} minutes", minutes.max(2)),
        _ if seconds < 90 * 60 => String::from("an hour"),
        _ if seconds < 22 * 3600 => format!("{} hours", hours.max(2)),
        _ if seconds < 36 * 3600 => String::from("a day"),
        _ if seconds < 26 * 86_400 => format!("{} days", days.max(2)),
        _ if seconds < 46 * 86_400 => String::from("a month"),
        _ if seconds < 320 * 86_400 => format!("{} months", months.max(2)),
        _ if seconds < 548 * 86_400 => String::from("a year"),
        _ => format!("{} years", years.max(2)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_relative_time() {
        assert_eq!(relative_time("2024-05-10T11:59:50Z", now()), "a few seconds ago");
        assert_eq!(relative_time("2024-05-10T11:55:00Z", now()), "5 minutes ago");
        assert_eq!(relative_time("2024-05-10 09:00:00", now()), "3 hours ago");
        assert_eq!(relative_time("2024-05-09T12:00:00", now()), "a day ago");
        assert_eq!(relative_time("2024-05-06T12:00:00.123456", now()), "4 days ago");
        assert_eq!(relative_time("2021-05-10T12:00:00Z", now()), "3 years ago");
        assert_eq!(relative_time("2024-05-10T13:00:00Z", now()), "in an hour");
    }

    #[test]
    fn test_relative_time_keeps_garbage() {
        assert_eq!(relative_time("yesterday-ish", now()), "yesterday-ish");
    }

    #[test]
    fn test_resource_key() {
        assert_eq!(resource_key(&json!({"key": "t1"})), Some("t1".to_string()));
        assert_eq!(resource_key(&json!({"key": 7})), Some("7".to_string()));
        assert_eq!(resource_key(&json!({"team_name": "Alpha"})), None);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!(["a@x.com", "b@x.com"])), "a@x.com, b@x.com");
        assert_eq!(cell_text(&Value::Null), "-");
        assert_eq!(cell_text(&json!(true)), "true");
    }
}

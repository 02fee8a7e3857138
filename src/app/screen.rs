//! List screens: fetched rows, load state, selection and paging

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::api::ApiResponse;
use crate::constants::PAGE_SIZE;
use crate::models::{cell_text, relative_time, resource_key, ResourceKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
}

/// How a cell value is turned into text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellFormat {
    Plain,
    /// Timestamp rendered as "5 minutes ago"
    Relative,
}

#[derive(Clone, Copy, Debug)]
pub struct Column {
    pub title: &'static str,
    pub field: &'static str,
    pub format: CellFormat,
}

const fn col(title: &'static str, field: &'static str) -> Column {
    Column {
        title,
        field,
        format: CellFormat::Plain,
    }
}

const fn rel(title: &'static str, field: &'static str) -> Column {
    Column {
        title,
        field,
        format: CellFormat::Relative,
    }
}

const TEAM_COLUMNS: &[Column] = &[
    col("Team Name", "team_name"),
    col("Members", "members"),
    col("Last Modified", "modified_date"),
];
const ACTION_COLUMNS: &[Column] = &[
    col("Action Name", "action_name"),
    col("Action Type", "action_type"),
    rel("Last Modified", "modified_date"),
];
const DATASOURCE_COLUMNS: &[Column] = &[
    col("Name", "datasource_name"),
    col("Engine", "engine"),
    rel("Last Modified", "modified_date"),
];
const DATASET_COLUMNS: &[Column] = &[
    col("Name", "dataset_name"),
    col("Datasource", "datasource_id"),
    rel("Last Modified", "modified_date"),
];
const EXPECTATION_COLUMNS: &[Column] = &[
    col("Type", "expectation_type"),
    col("Dataset", "dataset_id"),
    col("Enabled", "enabled"),
    rel("Last Modified", "modified_date"),
];
const VALIDATION_COLUMNS: &[Column] = &[
    col("Dataset", "dataset_id"),
    col("Success", "success"),
    rel("Run Time", "run_time"),
];
const SUGGESTION_COLUMNS: &[Column] = &[
    col("Type", "expectation_type"),
    col("Dataset", "dataset_id"),
    col("Enabled", "enabled"),
    rel("Created", "create_date"),
];

pub fn columns(kind: ResourceKind) -> &'static [Column] {
    match kind {
        ResourceKind::Team => TEAM_COLUMNS,
        ResourceKind::Action => ACTION_COLUMNS,
        ResourceKind::Datasource => DATASOURCE_COLUMNS,
        ResourceKind::Dataset => DATASET_COLUMNS,
        ResourceKind::Expectation => EXPECTATION_COLUMNS,
        ResourceKind::Validation => VALIDATION_COLUMNS,
        ResourceKind::Suggestion => SUGGESTION_COLUMNS,
    }
}

/// Text of one cell
pub fn cell(row: &Value, column: &Column, now: DateTime<Utc>) -> String {
    let value = row.get(column.field).unwrap_or(&Value::Null);
    match (column.format, value) {
        (CellFormat::Relative, Value::String(s)) if !s.is_empty() => relative_time(s, now),
        _ => cell_text(value),
    }
}

/// Transient state of one resource list
#[derive(Clone, Debug)]
pub struct ListScreen {
    pub kind: ResourceKind,
    pub rows: Vec<Value>,
    pub load: LoadState,
    /// Set when the list must be fetched again
    pub refresh: bool,
    pub selected: usize,
}

impl ListScreen {
    pub fn new(kind: ResourceKind) -> Self {
        ListScreen {
            kind,
            rows: Vec::new(),
            load: LoadState::Idle,
            refresh: true,
            selected: 0,
        }
    }

    pub fn needs_fetch(&self) -> bool {
        self.refresh && self.load != LoadState::Loading
    }

    pub fn begin_fetch(&mut self) {
        self.load = LoadState::Loading;
    }

    /// Apply a list reply. `None` means the call produced no response to
    /// inspect. Returns the notification text on failure.
    pub fn apply_list(&mut self, response: Option<&ApiResponse>) -> Result<(), String> {
        self.refresh = false;
        self.load = LoadState::Loaded;

        match response {
            Some(response) if response.is_ok() => match &response.data {
                Some(Value::Array(items)) => {
                    self.rows = items.clone();
                    self.clamp_selection();
                    Ok(())
                }
                _ => Err(self.load_error()),
            },
            _ => Err(self.load_error()),
        }
    }

    pub fn load_error(&self) -> String {
        format!("An error occurred while retrieving {}.", self.kind.noun())
    }

    /// Drop the row with `key`. Returns false if no row matched.
    pub fn remove_row(&mut self, key: &str) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| resource_key(row).as_deref() != Some(key));
        self.clamp_selection();
        self.rows.len() != before
    }

    pub fn selected_row(&self) -> Option<&Value> {
        self.rows.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn next_page(&mut self) {
        if self.page() + 1 < self.page_count() {
            self.selected = (self.page() + 1) * PAGE_SIZE;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page() > 0 {
            self.selected = (self.page() - 1) * PAGE_SIZE;
        }
    }

    pub fn page(&self) -> usize {
        self.selected / PAGE_SIZE
    }

    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(PAGE_SIZE).max(1)
    }

    /// Cell text of the rows on the current page
    pub fn page_rows(&self, now: DateTime<Utc>) -> Vec<Vec<String>> {
        let cols = columns(self.kind);
        self.rows
            .iter()
            .skip(self.page() * PAGE_SIZE)
            .take(PAGE_SIZE)
            .map(|row| cols.iter().map(|c| cell(row, c, now)).collect())
            .collect()
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
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
    fn test_team_list_renders_alpha() {
        let mut screen = ListScreen::new(ResourceKind::Team);
        let response = ApiResponse::new(
            200,
            json!([{"key": "t1", "team_name": "Alpha", "members": ["a@x.com"]}]),
        );
        assert!(screen.apply_list(Some(&response)).is_ok());

        let rows = screen.page_rows(now());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], vec!["Alpha", "a@x.com", "-"]);
        assert!(!screen.refresh);
        assert_eq!(screen.load, LoadState::Loaded);
    }

    #[test]
    fn test_row_count_matches_collection_for_every_kind() {
        let items: Vec<Value> = (0..23).map(|i| json!({"key": format!("k{}", i)})).collect();
        for kind in ResourceKind::ALL {
            let mut screen = ListScreen::new(kind);
            screen
                .apply_list(Some(&ApiResponse::new(200, Value::Array(items.clone()))))
                .unwrap();
            assert_eq!(screen.rows.len(), 23);
            assert_eq!(screen.page_count(), 3);
        }
    }

    #[test]
    fn test_failed_fetch_notifies_and_clears_refresh() {
        let mut screen = ListScreen::new(ResourceKind::Datasource);
        screen.begin_fetch();
        assert!(!screen.needs_fetch());

        let err = screen
            .apply_list(Some(&ApiResponse::new(500, json!({"detail": "boom"}))))
            .unwrap_err();
        assert_eq!(err, "An error occurred while retrieving data sources.");
        assert!(!screen.refresh);

        assert!(screen.apply_list(None).is_err());
        assert!(screen.apply_list(Some(&ApiResponse::new(200, json!({"not": "a list"})))).is_err());
    }

    #[test]
    fn test_remove_row_only_matching_key() {
        let mut screen = ListScreen::new(ResourceKind::Action);
        screen.rows = vec![json!({"key": "a1"}), json!({"key": "a2"}), json!({"key": "a3"})];
        screen.selected = 2;

        assert!(screen.remove_row("a3"));
        assert_eq!(screen.rows, vec![json!({"key": "a1"}), json!({"key": "a2"})]);
        assert_eq!(screen.selected, 1);
        assert!(!screen.remove_row("zzz"));
        assert_eq!(screen.rows.len(), 2);
    }

    #[test]
    fn test_paging() {
        let mut screen = ListScreen::new(ResourceKind::Team);
        screen.rows = (0..25).map(|i| json!({"key": i, "team_name": format!("team {}", i)})).collect();

        screen.next_page();
        assert_eq!(screen.selected, 10);
        let rows = screen.page_rows(now());
        assert_eq!(rows[0][0], "team 10");

        screen.next_page();
        screen.next_page();
        assert_eq!(screen.page(), 2);
        assert_eq!(screen.page_rows(now()).len(), 5);

        screen.prev_page();
        assert_eq!(screen.selected, 10);
    }

    #[test]
    fn test_relative_column() {
        let row = json!({"action_name": "page", "action_type": "Slack", "modified_date": "2024-05-10T11:55:00"});
        let cells: Vec<String> = columns(ResourceKind::Action).iter().map(|c| cell(&row, c, now())).collect();
        assert_eq!(cells, vec!["page", "Slack", "5 minutes ago"]);
    }
}

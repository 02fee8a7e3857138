//! Create/update modal for editable resources

use serde_json::{Map, Value};

use crate::api::{ApiCall, ApiResponse};
use crate::forms::{FieldKind, Form, FormField, SchemaCatalog};
use crate::models::ResourceKind;

const ACTION_IGNORED: &[&str] = &[
    "key",
    "create_date",
    "created_by",
    "modified_date",
    "action_name",
    "action_type",
];
const DATASOURCE_IGNORED: &[&str] = &["key", "create_date", "created_by", "modified_date", "engine"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalMode {
    Create,
    Update { key: String },
}

/// Result of a create/update reply as seen by the modal
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Close after the settle delay and refetch the list
    Saved,
    /// Server rejected the payload; show the detail in the modal
    Rejected(String),
    /// Blocking notification, modal stays open
    Notify(&'static str),
}

impl SubmitOutcome {
    pub fn from_response(response: &ApiResponse) -> Self {
        if response.status == Some(200) {
            SubmitOutcome::Saved
        } else if response.status.is_none() {
            SubmitOutcome::Notify("API appears to be down.")
        } else if let Some(detail) = response.detail() {
            SubmitOutcome::Rejected(detail)
        } else {
            SubmitOutcome::Notify("An unknown error occurred.")
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResourceModal {
    pub kind: ResourceKind,
    pub mode: ModalMode,
    pub form: Form,
    pub selected_type: Option<String>,
    pub status_line: Option<String>,
    /// A create/update call is in flight
    pub submitting: bool,
    /// Saved; waiting for the settle delay before closing
    pub closing: bool,
    /// Schema (or user list for teams) was requested during this opening
    pub lookup_requested: bool,
    type_options: Vec<Value>,
    prefill: Option<Map<String, Value>>,
}

impl ResourceModal {
    pub fn create(kind: ResourceKind) -> Self {
        Self::new(kind, ModalMode::Create, None)
    }

    /// Open pre-filled from a table row. Action kwargs are flattened into
    /// the field values.
    pub fn update(kind: ResourceKind, key: String, row: &Value) -> Self {
        let mut values = row.as_object().cloned().unwrap_or_default();
        if kind == ResourceKind::Action {
            if let Some(Value::Object(kwargs)) = values.remove("kwargs") {
                values.extend(kwargs);
            }
        }
        Self::new(kind, ModalMode::Update { key }, Some(values))
    }

    fn new(kind: ResourceKind, mode: ModalMode, prefill: Option<Map<String, Value>>) -> Self {
        let mut modal = ResourceModal {
            kind,
            mode,
            form: Form::new(static_fields(kind, &[])),
            selected_type: None,
            status_line: None,
            submitting: false,
            closing: false,
            lookup_requested: false,
            type_options: Vec::new(),
            prefill,
        };
        if let Some(values) = &modal.prefill {
            modal.form.set_values(values);
        }
        if !kind.is_schema_driven() {
            modal.prefill = None;
        }
        modal
    }

    pub fn title(&self) -> String {
        match self.mode {
            ModalMode::Create => format!("Create {}", self.kind.singular()),
            ModalMode::Update { .. } => format!("Update {}", self.kind.singular()),
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            ModalMode::Create => "Create",
            ModalMode::Update { .. } => "Update",
        }
    }

    /// Field whose value picks the schema document
    pub fn type_field(&self) -> Option<&'static str> {
        match self.kind {
            ResourceKind::Action => Some("action_type"),
            ResourceKind::Datasource => Some("engine"),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.submitting || self.closing
    }

    /// Fill the type select from a freshly available catalog and apply any
    /// pending pre-fill
    pub fn apply_catalog(&mut self, catalog: &SchemaCatalog) {
        self.type_options = catalog.titles().into_iter().map(Value::String).collect();
        let inputs = self.form.inputs();
        let focused = self.form.focused;
        self.form = Form::new(static_fields(self.kind, &self.type_options));
        self.form.restore_inputs(&inputs);
        self.form.focused = focused.min(self.form.fields.len().saturating_sub(1));

        let Some(values) = self.prefill.take() else {
            return;
        };
        let chosen = self
            .type_field()
            .and_then(|name| values.get(name))
            .and_then(Value::as_str)
            .map(String::from);
        if let Some(title) = chosen {
            self.select_type(&title, catalog);
        }
        self.form.set_values(&values);
    }

    /// Rebuild the dynamic fields for `title`, carrying over same-name inputs
    pub fn select_type(&mut self, title: &str, catalog: &SchemaCatalog) {
        let Some(type_field) = self.type_field() else {
            return;
        };
        let ignored = match self.kind {
            ResourceKind::Action => ACTION_IGNORED,
            _ => DATASOURCE_IGNORED,
        };

        let inputs = self.form.inputs();
        let focused = self.form.focused;
        let mut fields = static_fields(self.kind, &self.type_options);
        if let Some(doc) = catalog.get(title) {
            fields.extend(doc.fields(ignored));
        }

        self.form = Form::new(fields);
        self.form.restore_inputs(&inputs);
        if let Some(field) = self.form.field_mut(type_field) {
            field.input = title.to_string();
        }
        self.form.focused = focused.min(self.form.fields.len().saturating_sub(1));
        self.selected_type = Some(title.to_string());
        tracing::debug!(kind = ?self.kind, title, fields = self.form.fields.len(), "Rebuilt schema form");
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.form.focused_field_mut() {
            field.push_char(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.form.focused_field_mut() {
            field.backspace();
        }
    }

    /// Cycle the focused select; a new type rebuilds the form
    pub fn cycle(&mut self, forward: bool, catalog: Option<&SchemaCatalog>) {
        let type_field = self.type_field();
        let Some(field) = self.form.focused_field_mut() else {
            return;
        };
        if !field.cycle(forward) {
            return;
        }

        if type_field == Some(field.name.as_str()) {
            let title = field.input.clone();
            if let Some(catalog) = catalog {
                self.select_type(&title, catalog);
            }
        }
    }

    /// Validate and build the create/update call. Returns `None` while busy
    /// or when any field fails validation.
    pub fn submit(&mut self) -> Option<ApiCall> {
        if self.is_busy() {
            return None;
        }

        let values = match self.form.validate() {
            Ok(values) => values,
            Err(errors) => {
                tracing::debug!(kind = ?self.kind, ?errors, "Form validation failed");
                return None;
            }
        };

        self.status_line = None;
        self.submitting = true;
        let payload = build_payload(self.kind, values);
        Some(match &self.mode {
            ModalMode::Create => ApiCall::Create {
                kind: self.kind,
                payload,
            },
            ModalMode::Update { key } => ApiCall::Update {
                kind: self.kind,
                key: key.clone(),
                payload,
            },
        })
    }

    /// Record a create/update reply
    pub fn finish_submit(&mut self, response: &ApiResponse) -> SubmitOutcome {
        self.submitting = false;
        let outcome = SubmitOutcome::from_response(response);
        match &outcome {
            SubmitOutcome::Saved => self.closing = true,
            SubmitOutcome::Rejected(detail) => self.status_line = Some(detail.clone()),
            SubmitOutcome::Notify(_) => {}
        }
        outcome
    }
}

fn static_fields(kind: ResourceKind, type_options: &[Value]) -> Vec<FormField> {
    match kind {
        ResourceKind::Team => vec![
            FormField::new("team_name", "Team Name", FieldKind::Text).required("Enter a team name"),
            FormField::new("members", "Members", FieldKind::Tags).required("Select the team members"),
        ],
        ResourceKind::Action => vec![
            FormField::new("action_name", "Action Name", FieldKind::Text).required("Enter an action name"),
            FormField::new("action_type", "Action Type", FieldKind::Select(type_options.to_vec()))
                .required("Select the action type"),
        ],
        ResourceKind::Datasource => vec![
            FormField::new("engine", "Engine", FieldKind::Select(type_options.to_vec())).required("Select the engine")
        ],
        _ => Vec::new(),
    }
}

/// Shape validated form values into the payload the API expects
pub fn build_payload(kind: ResourceKind, mut values: Map<String, Value>) -> Value {
    if kind != ResourceKind::Action {
        return Value::Object(values);
    }

    let mut payload = Map::new();
    for name in ["action_name", "action_type"] {
        if let Some(value) = values.remove(name) {
            payload.insert(name.to_string(), value);
        }
    }
    payload.insert("kwargs".to_string(), Value::Object(values));
    Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::from_value(&json!([
            {
                "title": "Email",
                "properties": {
                    "key": {"type": "string"},
                    "action_name": {"type": "string"},
                    "recipients": {"type": "array", "items": {"type": "string"}},
                    "priority": {"enum": ["P1", "P2"]}
                },
                "required": ["recipients"]
            },
            {
                "title": "Slack",
                "properties": {
                    "slack_webhook": {"type": "string"},
                    "priority": {"enum": ["P1", "P2"]}
                },
                "required": ["slack_webhook"]
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_empty_team_name_issues_no_call() {
        let mut modal = ResourceModal::create(ResourceKind::Team);
        modal.form.field_mut("members").unwrap().input = "a@x.com".into();

        assert_eq!(modal.submit(), None);
        assert!(!modal.submitting);
        assert_eq!(
            modal.form.field("team_name").unwrap().error.as_deref(),
            Some("Enter a team name")
        );
    }

    #[test]
    fn test_team_create_payload() {
        let mut modal = ResourceModal::create(ResourceKind::Team);
        modal.form.field_mut("team_name").unwrap().input = "Alpha".into();
        modal.form.field_mut("members").unwrap().input = "a@x.com, b@x.com".into();

        let call = modal.submit().unwrap();
        assert_eq!(
            call,
            ApiCall::Create {
                kind: ResourceKind::Team,
                payload: json!({"team_name": "Alpha", "members": ["a@x.com", "b@x.com"]}),
            }
        );
        assert!(modal.submitting);
        assert_eq!(modal.submit(), None);
    }

    #[test]
    fn test_team_update_prefills_from_row() {
        let row = json!({"key": "t1", "team_name": "Alpha", "members": ["a@x.com"]});
        let mut modal = ResourceModal::update(ResourceKind::Team, "t1".into(), &row);
        assert_eq!(modal.title(), "Update Team");
        assert_eq!(modal.submit_label(), "Update");
        assert_eq!(modal.form.field("team_name").unwrap().input, "Alpha");

        match modal.submit().unwrap() {
            ApiCall::Update { key, .. } => assert_eq!(key, "t1"),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_action_type_change_rebuilds_and_carries_values() {
        let catalog = catalog();
        let mut modal = ResourceModal::create(ResourceKind::Action);
        modal.apply_catalog(&catalog);
        modal.form.field_mut("action_name").unwrap().input = "page ops".into();

        modal.select_type("Email", &catalog);
        let names: Vec<&str> = modal.form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["action_name", "action_type", "recipients", "priority"]);
        modal.form.field_mut("priority").unwrap().input = "P2".into();

        modal.select_type("Slack", &catalog);
        let names: Vec<&str> = modal.form.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["action_name", "action_type", "slack_webhook", "priority"]);
        assert_eq!(modal.form.field("action_name").unwrap().input, "page ops");
        assert_eq!(modal.form.field("priority").unwrap().input, "P2");
        assert_eq!(modal.form.field("action_type").unwrap().input, "Slack");
    }

    #[test]
    fn test_cycling_type_select_rebuilds() {
        let catalog = catalog();
        let mut modal = ResourceModal::create(ResourceKind::Action);
        modal.apply_catalog(&catalog);
        modal.form.focus_next();

        modal.cycle(true, Some(&catalog));
        assert_eq!(modal.selected_type.as_deref(), Some("Email"));
        assert!(modal.form.field("recipients").is_some());
    }

    #[test]
    fn test_action_payload_nests_kwargs() {
        let catalog = catalog();
        let mut modal = ResourceModal::create(ResourceKind::Action);
        modal.apply_catalog(&catalog);
        modal.select_type("Slack", &catalog);
        modal.form.field_mut("action_name").unwrap().input = "alerts".into();
        modal.form.field_mut("slack_webhook").unwrap().input = "https://hooks.example/x".into();

        let Some(ApiCall::Create { payload, .. }) = modal.submit() else {
            panic!("expected create call");
        };
        assert_eq!(
            payload,
            json!({
                "action_name": "alerts",
                "action_type": "Slack",
                "kwargs": {"slack_webhook": "https://hooks.example/x"}
            })
        );
    }

    #[test]
    fn test_action_update_waits_for_catalog_then_flattens_kwargs() {
        let row = json!({
            "key": "a1",
            "action_name": "alerts",
            "action_type": "Slack",
            "kwargs": {"slack_webhook": "https://hooks.example/x", "priority": "P1"}
        });
        let mut modal = ResourceModal::update(ResourceKind::Action, "a1".into(), &row);
        assert_eq!(modal.form.field("action_name").unwrap().input, "alerts");
        assert!(modal.form.field("slack_webhook").is_none());

        modal.apply_catalog(&catalog());
        assert_eq!(modal.selected_type.as_deref(), Some("Slack"));
        assert_eq!(modal.form.field("slack_webhook").unwrap().input, "https://hooks.example/x");
        assert_eq!(modal.form.field("priority").unwrap().input, "P1");
    }

    #[test]
    fn test_required_schema_field_blocks_submit() {
        let catalog = catalog();
        let mut modal = ResourceModal::create(ResourceKind::Action);
        modal.apply_catalog(&catalog);
        modal.select_type("Email", &catalog);
        modal.form.field_mut("action_name").unwrap().input = "alerts".into();

        assert_eq!(modal.submit(), None);
        assert_eq!(
            modal.form.field("recipients").unwrap().error.as_deref(),
            Some("required field.")
        );
    }

    #[test]
    fn test_submit_outcomes() {
        let mut modal = ResourceModal::create(ResourceKind::Team);
        modal.submitting = true;
        assert_eq!(modal.finish_submit(&ApiResponse::new(200, json!({}))), SubmitOutcome::Saved);
        assert!(modal.closing);

        let mut modal = ResourceModal::create(ResourceKind::Team);
        assert_eq!(
            modal.finish_submit(&ApiResponse::unreachable()),
            SubmitOutcome::Notify("API appears to be down.")
        );
        assert_eq!(
            modal.finish_submit(&ApiResponse::new(409, json!({"detail": "Team exists"}))),
            SubmitOutcome::Rejected("Team exists".into())
        );
        assert_eq!(modal.status_line.as_deref(), Some("Team exists"));
        assert_eq!(
            modal.finish_submit(&ApiResponse::new(500, json!("oops"))),
            SubmitOutcome::Notify("An unknown error occurred.")
        );
    }
}

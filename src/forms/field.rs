//! Form fields, local validation rules and value conversion

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

/// How a field is edited and how its input becomes a JSON value
#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    Text,
    /// Text that renders masked
    Secret,
    /// Parsed to an integer when the input is a number
    Integer,
    /// One of a fixed set of values, cycled with left/right
    Select(Vec<Value>),
    /// Comma separated list of strings
    Tags,
}

/// Compiled JSON Schema fragment for one field
#[derive(Clone)]
pub struct FieldValidator {
    inner: Arc<jsonschema::Validator>,
}

impl fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldValidator")
    }
}

impl FieldValidator {
    /// Compile a property fragment. Fragments that do not compile yield
    /// `None`; the field is then only checked by its required rule.
    pub fn compile(fragment: &Value) -> Option<Self> {
        match jsonschema::options().should_validate_formats(true).build(fragment) {
            Ok(validator) => Some(FieldValidator {
                inner: Arc::new(validator),
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping validator for schema fragment");
                None
            }
        }
    }

    pub fn check(&self, value: &Value) -> Result<(), String> {
        let messages: Vec<String> = self.inner.iter_errors(value).map(|e| e.to_string()).collect();
        let joined = build_validation_errors(&messages);
        if joined.is_empty() {
            Ok(())
        } else {
            Err(joined)
        }
    }
}

/// Join validator messages one per line, dropping "unknown keyword" noise
pub fn build_validation_errors(messages: &[String]) -> String {
    messages
        .iter()
        .filter(|m| !m.is_empty() && !m.contains("unknown keyword"))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Clone, Debug)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    /// Message shown when the field is left empty; `None` = optional
    pub required: Option<String>,
    pub placeholder: Option<String>,
    pub tooltip: Option<String>,
    pub validator: Option<FieldValidator>,
    pub input: String,
    pub error: Option<String>,
}

impl FormField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        FormField {
            name: name.into(),
            label: label.into(),
            kind,
            required: None,
            placeholder: None,
            tooltip: None,
            validator: None,
            input: String::new(),
            error: None,
        }
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = Some(message.into());
        self
    }

    pub fn placeholder(mut self, placeholder: Option<String>) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn tooltip(mut self, tooltip: Option<String>) -> Self {
        self.tooltip = tooltip;
        self
    }

    pub fn validator(mut self, validator: Option<FieldValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// The JSON value of the current input, `None` when nothing was entered
    pub fn value(&self) -> Option<Value> {
        if self.input.trim().is_empty() {
            return None;
        }

        match &self.kind {
            FieldKind::Text | FieldKind::Secret => Some(Value::String(self.input.clone())),
            FieldKind::Integer => match self.input.trim().parse::<i64>() {
                Ok(n) => Some(Value::from(n)),
                Err(_) => Some(Value::String(self.input.clone())),
            },
            FieldKind::Select(options) => options
                .iter()
                .find(|option| option_label(option) == self.input)
                .cloned(),
            FieldKind::Tags => {
                let tags: Vec<Value> = self
                    .input
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(|t| Value::String(t.to_string()))
                    .collect();
                if tags.is_empty() {
                    None
                } else {
                    Some(Value::Array(tags))
                }
            }
        }
    }

    /// Load a value coming from the server into the input buffer
    pub fn set_value(&mut self, value: &Value) {
        self.input = match (&self.kind, value) {
            (_, Value::Null) => String::new(),
            (FieldKind::Tags, Value::Array(items)) => items
                .iter()
                .map(option_label)
                .collect::<Vec<_>>()
                .join(", "),
            (_, other) => option_label(other),
        };
    }

    /// Apply the required rule and the schema validator
    pub fn validate(&mut self) -> Result<Option<Value>, String> {
        let result = match (self.value(), &self.required) {
            (None, Some(message)) => Err(message.clone()),
            (None, None) => Ok(None),
            (Some(value), _) => match &self.validator {
                Some(validator) => validator.check(&value).map(|_| Some(value)),
                None => Ok(Some(value)),
            },
        };
        self.error = result.as_ref().err().cloned();
        result
    }

    pub fn push_char(&mut self, c: char) {
        if !matches!(self.kind, FieldKind::Select(_)) {
            self.input.push(c);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        if matches!(self.kind, FieldKind::Select(_)) {
            self.input.clear();
        } else {
            self.input.pop();
        }
        self.error = None;
    }

    /// Step through select options. Returns true if the value changed.
    pub fn cycle(&mut self, forward: bool) -> bool {
        let FieldKind::Select(options) = &self.kind else {
            return false;
        };
        if options.is_empty() {
            return false;
        }

        let labels: Vec<String> = options.iter().map(option_label).collect();
        let next = match labels.iter().position(|l| *l == self.input) {
            None if forward => 0,
            None => labels.len() - 1,
            Some(i) if forward => (i + 1) % labels.len(),
            Some(i) => i.checked_sub(1).unwrap_or(labels.len() - 1),
        };

        let changed = labels[next] != self.input;
        self.input = labels[next].clone();
        self.error = None;
        changed
    }

    /// Input as it should appear on screen
    pub fn display(&self) -> String {
        match self.kind {
            FieldKind::Secret => "*".repeat(self.input.chars().count()),
            _ => self.input.clone(),
        }
    }
}

/// Label of a select option or list item
pub fn option_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// An ordered set of fields with one focused field
#[derive(Clone, Debug, Default)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub focused: usize,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        Form { fields, focused: 0 }
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.focused)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focused = self.focused.checked_sub(1).unwrap_or(self.fields.len() - 1);
        }
    }

    /// Copy values from an object into fields with matching names
    pub fn set_values(&mut self, values: &Map<String, Value>) {
        for field in &mut self.fields {
            if let Some(value) = values.get(&field.name) {
                field.set_value(value);
            }
        }
    }

    /// Current inputs keyed by field name, for carrying over on rebuild
    pub fn inputs(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.input.clone()))
            .collect()
    }

    pub fn restore_inputs(&mut self, inputs: &[(String, String)]) {
        for (name, input) in inputs {
            if let Some(field) = self.field_mut(name) {
                field.input = input.clone();
            }
        }
    }

    /// Validate every field. On success returns the entered values in
    /// field order; empty optional fields are left out.
    pub fn validate(&mut self) -> Result<Map<String, Value>, Vec<String>> {
        let mut values = Map::new();
        let mut errors = Vec::new();

        for field in &mut self.fields {
            match field.validate() {
                Ok(Some(value)) => {
                    values.insert(field.name.clone(), value);
                }
                Ok(None) => {}
                Err(message) => errors.push(format!("{}: {}", field.label, message)),
            }
        }

        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }

    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.input.clear();
            field.error = None;
        }
        self.focused = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_rule_blocks_empty() {
        let mut field = FormField::new("team_name", "Team Name", FieldKind::Text).required("Enter a team name");
        field.input = String::from("   ");
        assert_eq!(field.validate(), Err(String::from("Enter a team name")));
        assert_eq!(field.error.as_deref(), Some("Enter a team name"));
    }

    #[test]
    fn test_integer_parsing() {
        let mut field = FormField::new("smtp_port", "Port", FieldKind::Integer);
        field.input = String::from("587");
        assert_eq!(field.value(), Some(json!(587)));
        field.input = String::from("58x");
        assert_eq!(field.value(), Some(json!("58x")));
    }

    #[test]
    fn test_tags_split_and_trim() {
        let mut field = FormField::new("members", "Members", FieldKind::Tags);
        field.input = String::from("a@x.com, b@x.com,,");
        assert_eq!(field.value(), Some(json!(["a@x.com", "b@x.com"])));

        field.set_value(&json!(["c@x.com", "d@x.com"]));
        assert_eq!(field.input, "c@x.com, d@x.com");
    }

    #[test]
    fn test_select_cycles_both_ways() {
        let mut field = FormField::new(
            "priority",
            "Priority",
            FieldKind::Select(vec![json!("P1"), json!("P2"), json!("P3")]),
        );
        assert!(field.cycle(true));
        assert_eq!(field.input, "P1");
        field.cycle(false);
        assert_eq!(field.input, "P3");
        field.push_char('x');
        assert_eq!(field.input, "P3");
        assert_eq!(field.value(), Some(json!("P3")));
    }

    #[test]
    fn test_validator_message() {
        let validator = FieldValidator::compile(&json!({"type": "integer"})).unwrap();
        let mut field = FormField::new("port", "Port", FieldKind::Integer).validator(Some(validator));
        field.input = String::from("abc");
        let err = field.validate().unwrap_err();
        assert!(err.contains("integer"), "{}", err);

        field.input = String::from("25");
        assert_eq!(field.validate(), Ok(Some(json!(25))));
    }

    #[test]
    fn test_unknown_keyword_messages_dropped() {
        let messages = vec![
            String::from("unknown keyword: placeholder"),
            String::from("\"x\" is not a \"email\""),
        ];
        assert_eq!(build_validation_errors(&messages), "\"x\" is not a \"email\"");
    }

    #[test]
    fn test_form_validate_collects_values_in_order() {
        let mut form = Form::new(vec![
            FormField::new("team_name", "Team Name", FieldKind::Text).required("Enter a team name"),
            FormField::new("notes", "Notes", FieldKind::Text),
            FormField::new("members", "Members", FieldKind::Tags).required("Select the team members"),
        ]);
        form.fields[0].input = String::from("Alpha");
        form.fields[2].input = String::from("a@x.com");

        let values = form.validate().unwrap();
        assert_eq!(Value::Object(values), json!({"team_name": "Alpha", "members": ["a@x.com"]}));
    }

    #[test]
    fn test_secret_display_masks() {
        let mut field = FormField::new("password", "Password", FieldKind::Secret);
        field.input = String::from("hunter2");
        assert_eq!(field.display(), "*******");
    }
}

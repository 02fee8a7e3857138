//! Server-supplied JSON Schema documents and the fields generated from them

use serde_json::{Map, Value};

use super::field::{FieldKind, FieldValidator, FormField};

/// Message of the rule added for a document's `required` properties
pub const REQUIRED_MESSAGE: &str = "required field.";

/// One schema document, e.g. the settings of a single action type
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaDoc {
    pub title: String,
    pub properties: Map<String, Value>,
    pub required: Vec<String>,
}

impl SchemaDoc {
    fn from_value(value: &Value) -> Option<Self> {
        let title = value.get("title")?.as_str()?.to_string();
        let properties = value
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let required = value
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Some(SchemaDoc {
            title,
            properties,
            required,
        })
    }

    /// One field per property in document order, skipping `ignored` names
    pub fn fields(&self, ignored: &[&str]) -> Vec<FormField> {
        self.properties
            .iter()
            .filter(|(name, _)| !ignored.contains(&name.as_str()))
            .map(|(name, fragment)| field_for_property(name, fragment, self.required.contains(name)))
            .collect()
    }
}

/// The list of documents returned by a `json_schema` endpoint
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaCatalog {
    docs: Vec<SchemaDoc>,
}

impl SchemaCatalog {
    /// Accepts an array of documents or a single document. Entries without
    /// a title are skipped.
    pub fn from_value(value: &Value) -> Option<Self> {
        let docs: Vec<SchemaDoc> = match value {
            Value::Array(items) => items.iter().filter_map(SchemaDoc::from_value).collect(),
            Value::Object(_) => SchemaDoc::from_value(value).into_iter().collect(),
            _ => return None,
        };
        Some(SchemaCatalog { docs })
    }

    pub fn titles(&self) -> Vec<String> {
        self.docs.iter().map(|d| d.title.clone()).collect()
    }

    pub fn get(&self, title: &str) -> Option<&SchemaDoc> {
        self.docs.iter().find(|d| d.title == title)
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

fn field_for_property(name: &str, fragment: &Value, required: bool) -> FormField {
    let label = fragment
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(name)
        .to_string();
    let placeholder = fragment
        .get("placeholder")
        .and_then(Value::as_str)
        .map(String::from);
    let tooltip = fragment
        .get("description")
        .and_then(Value::as_str)
        .map(String::from);

    let mut field = FormField::new(name, label, kind_for_fragment(fragment))
        .placeholder(placeholder)
        .tooltip(tooltip)
        .validator(FieldValidator::compile(fragment));
    if required {
        field = field.required(REQUIRED_MESSAGE);
    }
    field
}

fn kind_for_fragment(fragment: &Value) -> FieldKind {
    if let Some(options) = fragment.get("enum").and_then(Value::as_array) {
        return FieldKind::Select(options.clone());
    }

    match fragment.get("type").and_then(Value::as_str) {
        Some("integer") => FieldKind::Integer,
        Some("array") => FieldKind::Tags,
        Some("boolean") => FieldKind::Select(vec![Value::Bool(true), Value::Bool(false)]),
        _ if fragment.get("format").and_then(Value::as_str) == Some("password") => FieldKind::Secret,
        _ => FieldKind::Text,
    }
}

//! Render state - data structure sent from App layer to UI for rendering

use serde_json::Value;

use crate::models::ResourceKind;
use crate::routes::Route;

/// One form field as the UI draws it
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub label: String,
    /// Input text, masked for secrets
    pub value: String,
    pub placeholder: Option<String>,
    pub tooltip: Option<String>,
    pub error: Option<String>,
    pub required: bool,
    pub is_select: bool,
    pub focused: bool,
}

/// Current page of a resource table
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub kind: ResourceKind,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    /// Selected row index within the page
    pub selected: Option<usize>,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalView {
    pub title: String,
    pub submit_label: &'static str,
    pub fields: Vec<FieldView>,
    pub status_line: Option<String>,
    pub busy: bool,
    /// Known user emails listed under the members field
    pub hints: Vec<String>,
    pub awaiting_schema: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmView {
    pub title: &'static str,
    pub content: &'static str,
    pub pending: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub metrics: Option<Value>,
    pub issues: Option<Value>,
    pub loading: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginView {
    pub fields: Vec<FieldView>,
    pub methods: Vec<String>,
    pub status_line: Option<String>,
    pub submitting: bool,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    pub route: Route,
    pub user_email: Option<String>,

    // Screens
    pub list: Option<ListView>,
    pub dashboard: DashboardView,
    pub login: LoginView,

    // Popups
    pub modal: Option<ModalView>,
    pub confirm: Option<ConfirmView>,
    pub notification: Option<String>,
    pub flash: Option<String>,
    pub show_help: bool,

    pub is_loading: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            route: Route::Dashboard,
            user_email: None,
            list: None,
            dashboard: DashboardView::default(),
            login: LoginView::default(),
            modal: None,
            confirm: None,
            notification: None,
            flash: None,
            show_help: false,
            is_loading: false,
        }
    }
}

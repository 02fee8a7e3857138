//! App state - pure data structure with no I/O logic

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;

use crate::api::ApiCall;
use crate::app::modal::ResourceModal;
use crate::app::screen::{columns, ListScreen, LoadState};
use crate::forms::{FieldKind, Form, FormField, SchemaCatalog};
use crate::messages::render::{
    ConfirmView, DashboardView, FieldView, ListView, LoginView, ModalView, RenderState,
};
use crate::messages::NetworkCommand;
use crate::models::{ResourceKind, User};
use crate::routes::Route;

/// Instruction for the actor produced by a state transition
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Send(NetworkCommand),
    /// Deliver `TimerEvent` back to the state after a delay
    After(Duration, TimerEvent),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// Settle delay after a successful submit elapsed
    CloseModal,
    /// Status bar message expired, cleared only if still showing
    ClearFlash(String),
}

/// What an in-flight request was issued for
#[derive(Clone, Debug, PartialEq)]
pub enum Purpose {
    Me,
    Users,
    Metrics,
    Issues,
    AuthMethods,
    Login,
    Logout,
    List(ResourceKind),
    Schema(ResourceKind),
    Submit(ResourceKind),
    Delete { kind: ResourceKind, key: String },
    EnableSuggestion,
    ValidateDataset,
    RefreshSample(ResourceKind),
}

/// Pending delete confirmation
#[derive(Clone, Debug, PartialEq)]
pub struct ConfirmDelete {
    pub kind: ResourceKind,
    pub key: String,
    /// Delete call issued, waiting for it to settle
    pub pending: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Dashboard {
    pub metrics: Option<Value>,
    pub issues: Option<Value>,
    pub refresh: bool,
    /// Dashboard calls still in flight
    pub in_flight: u8,
}

#[derive(Clone, Debug)]
pub struct LoginScreen {
    pub form: Form,
    pub methods: Vec<String>,
    pub methods_requested: bool,
    pub status_line: Option<String>,
    pub submitting: bool,
}

impl LoginScreen {
    pub fn new() -> Self {
        LoginScreen {
            form: Form::new(vec![
                FormField::new("username", "Email", FieldKind::Text).required("Enter your username"),
                FormField::new("password", "Password", FieldKind::Secret).required("Enter your password"),
            ]),
            methods: Vec::new(),
            methods_requested: false,
            status_line: None,
            submitting: false,
        }
    }
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub route: Route,
    /// Where to go after a successful login
    pub return_to: Option<Route>,

    // Screens
    pub screens: HashMap<ResourceKind, ListScreen>,
    pub dashboard: Dashboard,
    pub login: LoginScreen,

    // Overlays
    pub modal: Option<ResourceModal>,
    pub confirm: Option<ConfirmDelete>,
    pub notification: Option<String>,
    pub flash: Option<String>,
    pub show_help: bool,

    // Session data
    pub me: Option<User>,
    pub users: Vec<User>,
    pub schemas: HashMap<ResourceKind, SchemaCatalog>,

    // Requests
    pub next_request_id: u64,
    pub pending: HashMap<u64, Purpose>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Route::Dashboard)
    }
}

impl AppState {
    pub fn new(start_route: Route) -> Self {
        AppState {
            route: start_route,
            return_to: None,
            screens: ResourceKind::ALL
                .into_iter()
                .map(|kind| (kind, ListScreen::new(kind)))
                .collect(),
            dashboard: Dashboard {
                refresh: true,
                ..Dashboard::default()
            },
            login: LoginScreen::new(),
            modal: None,
            confirm: None,
            notification: None,
            flash: None,
            show_help: false,
            me: None,
            users: Vec::new(),
            schemas: HashMap::new(),
            next_request_id: 1,
            pending: HashMap::new(),
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Register a call and wrap it as a network effect
    pub fn request(&mut self, purpose: Purpose, call: ApiCall) -> Effect {
        let id = self.next_id();
        tracing::debug!(id, ?purpose, "Issuing request");
        self.pending.insert(id, purpose);
        Effect::Send(NetworkCommand::Call { id, call })
    }

    pub fn screen(&self, kind: ResourceKind) -> Option<&ListScreen> {
        self.screens.get(&kind)
    }

    pub fn screen_mut(&mut self, kind: ResourceKind) -> Option<&mut ListScreen> {
        self.screens.get_mut(&kind)
    }

    /// The list screen behind the current route
    pub fn active_screen(&self) -> Option<&ListScreen> {
        match self.route {
            Route::Resource(kind) => self.screen(kind),
            _ => None,
        }
    }

    pub fn active_screen_mut(&mut self) -> Option<&mut ListScreen> {
        match self.route {
            Route::Resource(kind) => self.screen_mut(kind),
            _ => None,
        }
    }

    pub fn active_kind(&self) -> Option<ResourceKind> {
        match self.route {
            Route::Resource(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let now = Utc::now();

        let list = self.active_screen().map(|screen| {
            let on_page = screen.selected % crate::constants::PAGE_SIZE;
            ListView {
                kind: screen.kind,
                columns: columns(screen.kind).iter().map(|c| c.title).collect(),
                rows: screen.page_rows(now),
                selected: (!screen.rows.is_empty()).then_some(on_page),
                page: screen.page(),
                page_count: screen.page_count(),
                total: screen.rows.len(),
                loading: screen.load == LoadState::Loading,
            }
        });

        let modal = self.modal.as_ref().map(|modal| ModalView {
            title: modal.title(),
            submit_label: modal.submit_label(),
            fields: field_views(&modal.form),
            status_line: modal.status_line.clone(),
            busy: modal.is_busy(),
            hints: if modal.kind == ResourceKind::Team {
                self.users.iter().map(|u| u.email.clone()).collect()
            } else {
                Vec::new()
            },
            awaiting_schema: modal.kind.is_schema_driven() && !self.schemas.contains_key(&modal.kind),
        });

        let confirm = self.confirm.as_ref().map(|confirm| {
            let (title, content) = confirm.kind.delete_prompt();
            ConfirmView {
                title,
                content,
                pending: confirm.pending,
            }
        });

        RenderState {
            route: self.route,
            user_email: self.me.as_ref().map(|u| u.email.clone()),
            list,
            dashboard: DashboardView {
                metrics: self.dashboard.metrics.clone(),
                issues: self.dashboard.issues.clone(),
                loading: self.dashboard.in_flight > 0,
            },
            login: LoginView {
                fields: field_views(&self.login.form),
                methods: self.login.methods.clone(),
                status_line: self.login.status_line.clone(),
                submitting: self.login.submitting,
            },
            modal,
            confirm,
            notification: self.notification.clone(),
            flash: self.flash.clone(),
            show_help: self.show_help,
            is_loading: self.is_loading(),
        }
    }
}

fn field_views(form: &Form) -> Vec<FieldView> {
    form.fields
        .iter()
        .enumerate()
        .map(|(i, field)| FieldView {
            label: field.label.clone(),
            value: field.display(),
            placeholder: field.placeholder.clone(),
            tooltip: field.tooltip.clone(),
            error: field.error.clone(),
            required: field.required.is_some(),
            is_select: matches!(field.kind, FieldKind::Select(_)),
            focused: i == form.focused,
        })
        .collect()
}

//! Command handlers - business logic for processing UI events and replies

use serde_json::{json, Value};

use crate::api::{handle_failure, ApiCall, ApiResponse, Handled, Reply};
use crate::app::modal::{ResourceModal, SubmitOutcome};
use crate::app::screen::LoadState;
use crate::app::state::{ConfirmDelete, Effect, Purpose, TimerEvent};
use crate::app::AppState;
use crate::constants::{FLASH_DURATION, SUBMIT_SETTLE_DELAY};
use crate::forms::field::option_label;
use crate::forms::SchemaCatalog;
use crate::messages::NetworkResponse;
use crate::models::{resource_key, ResourceKind, User};
use crate::routes::Route;

/// Reply after the shared failure handler ran. `Err(None)` carries no
/// response to inspect.
type Outcome = Result<ApiResponse, Option<ApiResponse>>;

impl AppState {
    // ========================
    // Startup and fetch scheduling
    // ========================

    /// Calls issued once when the actor starts
    pub fn startup(&mut self) -> Vec<Effect> {
        vec![self.request(Purpose::Me, ApiCall::GetMe)]
    }

    /// Issue the fetches the visible screen is waiting for
    pub fn poll(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();

        match self.route {
            Route::Resource(kind) => {
                if let Some(screen) = self.screen_mut(kind) {
                    if screen.needs_fetch() {
                        screen.begin_fetch();
                        effects.push(self.request(Purpose::List(kind), ApiCall::List(kind)));
                    }
                }
            }
            Route::Dashboard => {
                if self.dashboard.refresh && self.dashboard.in_flight == 0 {
                    self.dashboard.refresh = false;
                    self.dashboard.in_flight = 2;
                    effects.push(self.request(Purpose::Metrics, ApiCall::GetDashboardMetrics));
                    effects.push(self.request(Purpose::Issues, ApiCall::GetDashboardIssues));
                }
            }
            Route::Login => {
                if !self.login.methods_requested {
                    self.login.methods_requested = true;
                    effects.push(self.request(Purpose::AuthMethods, ApiCall::GetAuthMethods));
                }
            }
        }

        let lookup = match &mut self.modal {
            Some(modal) if !modal.lookup_requested => {
                modal.lookup_requested = true;
                Some(modal.kind)
            }
            _ => None,
        };
        match lookup {
            Some(ResourceKind::Team) => effects.push(self.request(Purpose::Users, ApiCall::GetUsers)),
            Some(kind) if kind.is_schema_driven() && !self.schemas.contains_key(&kind) => {
                effects.push(self.request(Purpose::Schema(kind), ApiCall::JsonSchema(kind)));
            }
            _ => {}
        }

        effects
    }

    // ========================
    // Navigation
    // ========================

    pub fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        tracing::info!(from = self.route.path(), to = route.path(), "Navigating");

        self.route = route;
        self.show_help = false;
        self.flash = None;
        match route {
            Route::Resource(kind) => {
                if let Some(screen) = self.screen_mut(kind) {
                    screen.refresh = true;
                }
            }
            Route::Dashboard => self.dashboard.refresh = true,
            Route::Login => {}
        }
    }

    pub fn refresh(&mut self) {
        match self.route {
            Route::Dashboard => self.dashboard.refresh = true,
            _ => {
                if let Some(screen) = self.active_screen_mut() {
                    screen.refresh = true;
                }
            }
        }
    }

    /// Remember where the user was, drop overlays and show the login screen
    pub fn redirect_to_login(&mut self) {
        if self.route != Route::Login {
            self.return_to = Some(self.route);
        }
        tracing::info!(return_to = ?self.return_to, "Redirecting to login");

        self.modal = None;
        self.confirm = None;
        self.me = None;
        self.drop_session_requests();
        self.login.submitting = false;
        self.navigate(Route::Login);
    }

    /// Forget calls issued for the old session so their replies are ignored
    fn drop_session_requests(&mut self) {
        self.pending
            .retain(|_, purpose| matches!(purpose, Purpose::Login | Purpose::AuthMethods));
        self.dashboard.in_flight = 0;
        self.dashboard.refresh = true;
        for screen in self.screens.values_mut() {
            if screen.load == LoadState::Loading {
                screen.load = LoadState::Idle;
            }
        }
    }

    // ========================
    // Table
    // ========================

    pub fn select_next(&mut self) {
        if let Some(screen) = self.active_screen_mut() {
            screen.select_next();
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(screen) = self.active_screen_mut() {
            screen.select_prev();
        }
    }

    pub fn next_page(&mut self) {
        if let Some(screen) = self.active_screen_mut() {
            screen.next_page();
        }
    }

    pub fn prev_page(&mut self) {
        if let Some(screen) = self.active_screen_mut() {
            screen.prev_page();
        }
    }

    /// Key of the selected row on the active screen
    fn selected_key(&self) -> Option<(ResourceKind, String)> {
        let screen = self.active_screen()?;
        let key = resource_key(screen.selected_row()?)?;
        Some((screen.kind, key))
    }

    // ========================
    // Modal
    // ========================

    pub fn open_create(&mut self) {
        let Some(kind) = self.active_kind().filter(ResourceKind::is_editable) else {
            return;
        };
        let mut modal = ResourceModal::create(kind);
        if let Some(catalog) = self.schemas.get(&kind) {
            modal.apply_catalog(catalog);
        }
        self.modal = Some(modal);
    }

    pub fn open_edit(&mut self) {
        let Some(kind) = self.active_kind().filter(ResourceKind::is_editable) else {
            return;
        };
        let Some(row) = self.active_screen().and_then(|s| s.selected_row()).cloned() else {
            return;
        };
        let Some(key) = resource_key(&row) else {
            tracing::warn!(?kind, "Selected row has no key");
            return;
        };

        let mut modal = ResourceModal::update(kind, key, &row);
        if let Some(catalog) = self.schemas.get(&kind) {
            modal.apply_catalog(catalog);
        }
        self.modal = Some(modal);
    }

    /// Close the modal and discard its inputs. A modal already saved still
    /// signals its screen to refetch.
    pub fn cancel_modal(&mut self) {
        let Some(modal) = self.modal.take() else {
            return;
        };
        if modal.closing {
            if let Some(screen) = self.screen_mut(modal.kind) {
                screen.refresh = true;
            }
        }
    }

    pub fn next_field(&mut self) {
        match &mut self.modal {
            Some(modal) => modal.form.focus_next(),
            None if self.route == Route::Login => self.login.form.focus_next(),
            None => {}
        }
    }

    pub fn prev_field(&mut self) {
        match &mut self.modal {
            Some(modal) => modal.form.focus_prev(),
            None if self.route == Route::Login => self.login.form.focus_prev(),
            None => {}
        }
    }

    pub fn enter_char(&mut self, c: char) {
        match &mut self.modal {
            Some(modal) => modal.push_char(c),
            None if self.route == Route::Login => {
                if let Some(field) = self.login.form.focused_field_mut() {
                    field.push_char(c);
                }
            }
            None => {}
        }
    }

    pub fn delete_char(&mut self) {
        match &mut self.modal {
            Some(modal) => modal.backspace(),
            None if self.route == Route::Login => {
                if let Some(field) = self.login.form.focused_field_mut() {
                    field.backspace();
                }
            }
            None => {}
        }
    }

    pub fn cycle_option(&mut self, forward: bool) {
        if let Some(modal) = &mut self.modal {
            modal.cycle(forward, self.schemas.get(&modal.kind));
        }
    }

    /// Submit the modal or the login form
    pub fn submit(&mut self) -> Vec<Effect> {
        if let Some(modal) = &mut self.modal {
            let kind = modal.kind;
            return match modal.submit() {
                Some(call) => {
                    tracing::info!(?kind, "Submitting form");
                    vec![self.request(Purpose::Submit(kind), call)]
                }
                None => Vec::new(),
            };
        }

        if self.route == Route::Login {
            return self.submit_login();
        }
        Vec::new()
    }

    pub fn handle_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::CloseModal => {
                if !self.modal.as_ref().is_some_and(|m| m.closing) {
                    return;
                }
                let Some(modal) = self.modal.take() else {
                    return;
                };
                if let Some(screen) = self.screen_mut(modal.kind) {
                    screen.refresh = true;
                }
            }
            TimerEvent::ClearFlash(message) => {
                if self.flash.as_ref() == Some(&message) {
                    self.flash = None;
                }
            }
        }
    }

    // ========================
    // Row actions
    // ========================

    pub fn request_delete(&mut self) {
        let Some((kind, key)) = self.selected_key() else {
            return;
        };
        if kind.is_deletable() {
            self.confirm = Some(ConfirmDelete {
                kind,
                key,
                pending: false,
            });
        }
    }

    pub fn confirm_yes(&mut self) -> Vec<Effect> {
        let Some(confirm) = &mut self.confirm else {
            return Vec::new();
        };
        if confirm.pending {
            return Vec::new();
        }
        confirm.pending = true;

        let (kind, key) = (confirm.kind, confirm.key.clone());
        tracing::info!(?kind, %key, "Deleting row");
        vec![self.request(
            Purpose::Delete {
                kind,
                key: key.clone(),
            },
            ApiCall::Delete { kind, key },
        )]
    }

    pub fn confirm_no(&mut self) {
        if self.confirm.as_ref().is_some_and(|c| !c.pending) {
            self.confirm = None;
        }
    }

    pub fn enable_suggestion(&mut self) -> Vec<Effect> {
        match self.selected_key() {
            Some((ResourceKind::Suggestion, key)) => {
                vec![self.request(Purpose::EnableSuggestion, ApiCall::EnableSuggestion { key })]
            }
            _ => Vec::new(),
        }
    }

    pub fn validate_dataset(&mut self) -> Vec<Effect> {
        match self.selected_key() {
            Some((ResourceKind::Dataset, key)) => vec![self.request(
                Purpose::ValidateDataset,
                ApiCall::ValidateDataset {
                    payload: json!({ "dataset_id": key }),
                },
            )],
            _ => Vec::new(),
        }
    }

    pub fn refresh_sample(&mut self) -> Vec<Effect> {
        match self.selected_key() {
            Some((kind @ ResourceKind::Dataset, key)) => {
                vec![self.request(Purpose::RefreshSample(kind), ApiCall::RefreshSample { key })]
            }
            _ => Vec::new(),
        }
    }

    // ========================
    // Session
    // ========================

    fn submit_login(&mut self) -> Vec<Effect> {
        if self.login.submitting {
            return Vec::new();
        }
        let Ok(values) = self.login.form.validate() else {
            return Vec::new();
        };

        let text = |name: &str| values.get(name).map(option_label).unwrap_or_default();
        let (username, password) = (text("username"), text("password"));
        self.login.submitting = true;
        self.login.status_line = None;
        tracing::info!(%username, "Logging in");
        vec![self.request(Purpose::Login, ApiCall::Login { username, password })]
    }

    pub fn logout(&mut self) -> Vec<Effect> {
        if self.route == Route::Login {
            return Vec::new();
        }
        vec![self.request(Purpose::Logout, ApiCall::Logout)]
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Show a transient status bar message
    fn flash(&mut self, message: &str) -> Vec<Effect> {
        self.flash = Some(message.to_string());
        vec![Effect::After(FLASH_DURATION, TimerEvent::ClearFlash(message.to_string()))]
    }

    fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "Showing notification");
        self.notification = Some(message);
    }

    // ========================
    // Network responses
    // ========================

    /// Route a reply to the request's purpose. Unknown ids are ignored.
    pub fn handle_response(&mut self, response: NetworkResponse) -> Vec<Effect> {
        let NetworkResponse::Completed { id, result } = response;
        let Some(purpose) = self.pending.remove(&id) else {
            tracing::debug!(id, "Ignoring reply for unknown request");
            return Vec::new();
        };

        let outcome: Outcome = match result {
            Ok(Reply::Response(response)) => Ok(response),
            Ok(Reply::Body(body)) => Ok(ApiResponse::new(200, body)),
            Err(failure) => match handle_failure(failure, self.route.path()) {
                Handled::RedirectToLogin => {
                    self.settle_redirected(&purpose);
                    self.redirect_to_login();
                    return Vec::new();
                }
                Handled::Response(response) => Err(Some(response)),
                Handled::Nothing => Err(None),
            },
        };

        match purpose {
            Purpose::Me => {
                if let Ok(response) = outcome {
                    self.me = parse_data::<User>(&response);
                }
            }
            Purpose::Users => match outcome {
                Ok(response) => self.users = parse_data::<Vec<User>>(&response).unwrap_or_default(),
                Err(_) => self.notify("An error occurred while retrieving users."),
            },
            Purpose::Metrics => self.on_dashboard_reply(true, outcome),
            Purpose::Issues => self.on_dashboard_reply(false, outcome),
            Purpose::AuthMethods => {
                if let Ok(response) = outcome {
                    self.login.methods = auth_method_names(response.data.as_ref());
                }
            }
            Purpose::Login => return self.on_login_reply(outcome),
            Purpose::Logout => {
                self.me = None;
                self.return_to = None;
                self.modal = None;
                self.confirm = None;
                self.login = Default::default();
                self.drop_session_requests();
                self.navigate(Route::Login);
            }
            Purpose::List(kind) => self.on_list_reply(kind, outcome),
            Purpose::Schema(kind) => self.on_schema_reply(kind, outcome),
            Purpose::Submit(kind) => return self.on_submit_reply(kind, outcome),
            Purpose::Delete { kind, key } => {
                self.confirm = None;
                if outcome.is_ok() {
                    if let Some(screen) = self.screen_mut(kind) {
                        screen.remove_row(&key);
                    }
                }
            }
            Purpose::EnableSuggestion => match outcome {
                Ok(_) => {
                    if let Some(screen) = self.screen_mut(ResourceKind::Suggestion) {
                        screen.refresh = true;
                    }
                    return self.flash("Suggestion enabled.");
                }
                Err(_) => self.notify("An error occurred while enabling the suggestion."),
            },
            Purpose::ValidateDataset => match outcome {
                Ok(_) => return self.flash("Validation started."),
                Err(_) => self.notify("An error occurred while validating the dataset."),
            },
            Purpose::RefreshSample(kind) => match outcome {
                Ok(_) => {
                    if let Some(screen) = self.screen_mut(kind) {
                        screen.refresh = true;
                    }
                    return self.flash("Sample refreshed.");
                }
                Err(_) => self.notify("An error occurred while refreshing the dataset sample."),
            },
        }

        Vec::new()
    }

    /// Clear in-flight markers for a reply that ended in a redirect
    fn settle_redirected(&mut self, purpose: &Purpose) {
        if *purpose == Purpose::AuthMethods {
            self.login.methods_requested = false;
        }
    }

    fn on_list_reply(&mut self, kind: ResourceKind, outcome: Outcome) {
        let Some(screen) = self.screen_mut(kind) else {
            return;
        };
        let response = match &outcome {
            Ok(response) => Some(response),
            Err(response) => response.as_ref(),
        };
        match screen.apply_list(response) {
            Ok(()) => tracing::info!(?kind, rows = screen.rows.len(), "List loaded"),
            Err(message) => self.notify(message),
        }
    }

    fn on_dashboard_reply(&mut self, metrics: bool, outcome: Outcome) {
        self.dashboard.in_flight = self.dashboard.in_flight.saturating_sub(1);
        let label = if metrics { "metrics" } else { "issues" };

        match outcome {
            Ok(response) if response.is_ok() => {
                let data = response.data.unwrap_or(Value::Null);
                if metrics {
                    self.dashboard.metrics = Some(data);
                } else {
                    self.dashboard.issues = Some(data);
                }
            }
            _ => self.notify(format!("An error occurred while retrieving dashboard {}.", label)),
        }
    }

    fn on_schema_reply(&mut self, kind: ResourceKind, outcome: Outcome) {
        let catalog = match outcome {
            Ok(response) if response.is_ok() => response.data.as_ref().and_then(SchemaCatalog::from_value),
            _ => None,
        };
        let catalog = catalog.filter(|c| !c.is_empty());

        let Some(catalog) = catalog else {
            self.notify(format!(
                "An error occurred while retrieving {} schema.",
                kind.singular().to_lowercase()
            ));
            return;
        };

        tracing::info!(?kind, types = ?catalog.titles(), "Schema loaded");
        if let Some(modal) = self.modal.as_mut().filter(|m| m.kind == kind) {
            modal.apply_catalog(&catalog);
        }
        self.schemas.insert(kind, catalog);
    }

    fn on_submit_reply(&mut self, kind: ResourceKind, outcome: Outcome) -> Vec<Effect> {
        let response = match outcome {
            Ok(response) => response,
            Err(Some(response)) => response,
            Err(None) => {
                if let Some(modal) = self.modal.as_mut() {
                    modal.submitting = false;
                }
                return Vec::new();
            }
        };

        let Some(modal) = self.modal.as_mut().filter(|m| m.kind == kind && m.submitting) else {
            // Modal was cancelled while the call was in flight
            if response.is_ok() {
                if let Some(screen) = self.screen_mut(kind) {
                    screen.refresh = true;
                }
            }
            return Vec::new();
        };

        match modal.finish_submit(&response) {
            SubmitOutcome::Saved => {
                tracing::info!(?kind, "Saved");
                vec![Effect::After(SUBMIT_SETTLE_DELAY, TimerEvent::CloseModal)]
            }
            SubmitOutcome::Rejected(detail) => {
                tracing::warn!(?kind, %detail, "Server rejected the form");
                Vec::new()
            }
            SubmitOutcome::Notify(message) => {
                self.notify(message);
                Vec::new()
            }
        }
    }

    fn on_login_reply(&mut self, outcome: Outcome) -> Vec<Effect> {
        self.login.submitting = false;
        match outcome {
            Ok(_) => {
                tracing::info!("Logged in");
                self.login.form.reset();
                self.login.status_line = None;
                for screen in self.screens.values_mut() {
                    screen.refresh = true;
                }
                let target = self.return_to.take().unwrap_or(Route::Dashboard);
                self.navigate(target);
                vec![self.request(Purpose::Me, ApiCall::GetMe)]
            }
            Err(response) => {
                let detail = response.as_ref().and_then(ApiResponse::detail);
                self.login.status_line = Some(detail.unwrap_or_else(|| String::from("Login failed.")));
                Vec::new()
            }
        }
    }
}

fn parse_data<T: serde::de::DeserializeOwned>(response: &ApiResponse) -> Option<T> {
    let data = response.data.clone()?;
    match serde_json::from_value(data) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "Unexpected response shape");
            None
        }
    }
}

/// Names of the sign-in methods the server offers
fn auth_method_names(data: Option<&Value>) -> Vec<String> {
    match data {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item.get("name") {
                Some(name) => option_label(name),
                None => option_label(item),
            })
            .collect(),
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

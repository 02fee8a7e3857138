//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::messages::RenderState;
use crate::models::ResourceKind;
use crate::routes::Route;

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Navigation
    Navigate(Route),
    Refresh,

    // Table
    SelectNext,
    SelectPrev,
    NextPage,
    PrevPage,

    // Row actions
    OpenCreate,
    OpenEdit,
    RequestDelete,
    EnableSuggestion,
    ValidateDataset,
    RefreshSample,

    // Delete confirmation
    ConfirmYes,
    ConfirmNo,

    // Form editing (modal and login screen)
    NextField,
    PrevField,
    CharInput(char),
    Backspace,
    CycleOption { forward: bool },
    Submit,
    Cancel,

    // Popups
    ToggleHelp,
    CloseHelp,
    DismissNotification,

    // Session
    Logout,

    // System
    Quit,
}

/// Which part of the UI currently owns the keyboard
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum KeyContext {
    Notification,
    Help,
    Confirm,
    Modal,
    Login,
    Dashboard,
    List(ResourceKind),
}

impl KeyContext {
    /// Topmost overlay wins, then the current route
    pub fn of(state: &RenderState) -> KeyContext {
        if state.notification.is_some() {
            KeyContext::Notification
        } else if state.show_help {
            KeyContext::Help
        } else if state.confirm.is_some() {
            KeyContext::Confirm
        } else if state.modal.is_some() {
            KeyContext::Modal
        } else {
            match state.route {
                Route::Login => KeyContext::Login,
                Route::Dashboard => KeyContext::Dashboard,
                Route::Resource(kind) => KeyContext::List(kind),
            }
        }
    }
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, context: KeyContext) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    match context {
        KeyContext::Notification => Some(UiEvent::DismissNotification),
        KeyContext::Help => Some(UiEvent::CloseHelp),
        KeyContext::Confirm => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => Some(UiEvent::ConfirmYes),
            KeyCode::Char('n') | KeyCode::Esc => Some(UiEvent::ConfirmNo),
            _ => None,
        },
        KeyContext::Modal => handle_form_keys(key, true),
        KeyContext::Login => handle_form_keys(key, false),
        KeyContext::Dashboard => handle_screen_keys(key),
        KeyContext::List(kind) => handle_list_keys(key, kind).or_else(|| handle_screen_keys(key)),
    }
}

/// Keys shared by the modal and the login form
fn handle_form_keys(key: KeyEvent, in_modal: bool) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc if in_modal => Some(UiEvent::Cancel),
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
        KeyCode::Left => Some(UiEvent::CycleOption { forward: false }),
        KeyCode::Right => Some(UiEvent::CycleOption { forward: true }),
        KeyCode::Enter => Some(UiEvent::Submit),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}

/// Keys for screens reached from the number row
fn handle_screen_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('r') => Some(UiEvent::Refresh),
        KeyCode::Char('L') => Some(UiEvent::Logout),
        KeyCode::Char(c) if c.is_ascii_digit() => c
            .to_digit(10)
            .and_then(|n| Route::for_hotkey(n as usize))
            .map(UiEvent::Navigate),
        _ => None,
    }
}

fn handle_list_keys(key: KeyEvent, kind: ResourceKind) -> Option<UiEvent> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
        KeyCode::Left => Some(UiEvent::PrevPage),
        KeyCode::Right => Some(UiEvent::NextPage),
        KeyCode::Char('n') if kind.is_editable() => Some(UiEvent::OpenCreate),
        KeyCode::Char('e') | KeyCode::Enter if kind.is_editable() => Some(UiEvent::OpenEdit),
        KeyCode::Char('d') if kind.is_deletable() => Some(UiEvent::RequestDelete),
        KeyCode::Char('a') if kind == ResourceKind::Suggestion => Some(UiEvent::EnableSuggestion),
        KeyCode::Char('v') if kind == ResourceKind::Dataset => Some(UiEvent::ValidateDataset),
        KeyCode::Char('s') if kind == ResourceKind::Dataset => Some(UiEvent::RefreshSample),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::render::{ConfirmView, ModalView};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_number_keys_navigate() {
        assert_eq!(
            key_to_ui_event(key(KeyCode::Char('2')), KeyContext::Dashboard),
            Some(UiEvent::Navigate(Route::Resource(ResourceKind::Team)))
        );
        assert_eq!(key_to_ui_event(key(KeyCode::Char('9')), KeyContext::Dashboard), None);
    }

    #[test]
    fn test_row_actions_follow_resource() {
        let teams = KeyContext::List(ResourceKind::Team);
        let validations = KeyContext::List(ResourceKind::Validation);
        let datasets = KeyContext::List(ResourceKind::Dataset);

        assert_eq!(key_to_ui_event(key(KeyCode::Char('n')), teams), Some(UiEvent::OpenCreate));
        assert_eq!(key_to_ui_event(key(KeyCode::Char('d')), teams), Some(UiEvent::RequestDelete));
        assert_eq!(key_to_ui_event(key(KeyCode::Char('d')), validations), None);
        assert_eq!(key_to_ui_event(key(KeyCode::Char('n')), datasets), None);
        assert_eq!(key_to_ui_event(key(KeyCode::Char('v')), datasets), Some(UiEvent::ValidateDataset));
        assert_eq!(key_to_ui_event(key(KeyCode::Char('q')), datasets), Some(UiEvent::Quit));
    }

    #[test]
    fn test_modal_captures_letters() {
        assert_eq!(
            key_to_ui_event(key(KeyCode::Char('q')), KeyContext::Modal),
            Some(UiEvent::CharInput('q'))
        );
        assert_eq!(key_to_ui_event(key(KeyCode::Esc), KeyContext::Modal), Some(UiEvent::Cancel));
        assert_eq!(key_to_ui_event(key(KeyCode::Esc), KeyContext::Login), None);
        assert_eq!(
            key_to_ui_event(key(KeyCode::Right), KeyContext::Modal),
            Some(UiEvent::CycleOption { forward: true })
        );
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_ui_event(ctrl_c, KeyContext::Login), Some(UiEvent::Quit));
        assert_eq!(key_to_ui_event(ctrl_c, KeyContext::Notification), Some(UiEvent::Quit));
    }

    #[test]
    fn test_context_prefers_overlays() {
        let mut state = RenderState {
            route: Route::Resource(ResourceKind::Team),
            ..RenderState::default()
        };
        assert_eq!(KeyContext::of(&state), KeyContext::List(ResourceKind::Team));

        state.modal = Some(ModalView {
            title: "Create Team".into(),
            submit_label: "Create",
            fields: Vec::new(),
            status_line: None,
            busy: false,
            hints: Vec::new(),
            awaiting_schema: false,
        });
        assert_eq!(KeyContext::of(&state), KeyContext::Modal);

        state.confirm = Some(ConfirmView {
            title: "Delete Team",
            content: "",
            pending: false,
        });
        assert_eq!(KeyContext::of(&state), KeyContext::Confirm);

        state.notification = Some("An error occurred while retrieving teams.".into());
        assert_eq!(KeyContext::of(&state), KeyContext::Notification);
        assert_eq!(
            key_to_ui_event(key(KeyCode::Char('x')), KeyContext::of(&state)),
            Some(UiEvent::DismissNotification)
        );
    }
}

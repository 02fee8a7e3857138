//! App actor - message loop processing UI events, network responses and timers

use tokio::sync::mpsc;

use crate::app::state::{AppState, Effect, TimerEvent};
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use crate::routes::Route;

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
    timer_tx: mpsc::UnboundedSender<TimerEvent>,
    timer_rx: mpsc::UnboundedReceiver<TimerEvent>,
}

impl AppActor {
    pub fn new(
        start_route: Route,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        AppActor {
            state: AppState::new(start_route),
            network_tx,
            render_tx,
            timer_tx,
            timer_rx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        let effects = self.state.startup();
        self.apply(effects);
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                event = ui_rx.recv() => {
                    let Some(event) = event else { break };
                    if event == UiEvent::Quit {
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let effects = self.handle_ui_event(event);
                    self.apply(effects);
                }
                Some(response) = net_rx.recv() => {
                    let effects = self.state.handle_response(response);
                    self.apply(effects);
                }
                Some(timer) = self.timer_rx.recv() => {
                    self.state.handle_timer(timer);
                    self.apply(Vec::new());
                }
            }
            let _ = self.render_tx.send(self.state.to_render_state());
        }
    }

    /// Execute effects, then whatever fetches the new state is waiting for
    fn apply(&mut self, mut effects: Vec<Effect>) {
        effects.extend(self.state.poll());

        for effect in effects {
            match effect {
                Effect::Send(cmd) => {
                    let _ = self.network_tx.send(cmd);
                }
                Effect::After(delay, event) => {
                    let timer_tx = self.timer_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = timer_tx.send(event);
                    });
                }
            }
        }
    }

    /// Handle a UI event and collect the effects it produced
    fn handle_ui_event(&mut self, event: UiEvent) -> Vec<Effect> {
        match event {
            // Navigation
            UiEvent::Navigate(route) => self.state.navigate(route),
            UiEvent::Refresh => self.state.refresh(),

            // Table
            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::SelectPrev => self.state.select_prev(),
            UiEvent::NextPage => self.state.next_page(),
            UiEvent::PrevPage => self.state.prev_page(),

            // Row actions
            UiEvent::OpenCreate => self.state.open_create(),
            UiEvent::OpenEdit => self.state.open_edit(),
            UiEvent::RequestDelete => self.state.request_delete(),
            UiEvent::EnableSuggestion => return self.state.enable_suggestion(),
            UiEvent::ValidateDataset => return self.state.validate_dataset(),
            UiEvent::RefreshSample => return self.state.refresh_sample(),

            // Delete confirmation
            UiEvent::ConfirmYes => return self.state.confirm_yes(),
            UiEvent::ConfirmNo => self.state.confirm_no(),

            // Forms
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CycleOption { forward } => self.state.cycle_option(forward),
            UiEvent::Submit => return self.state.submit(),
            UiEvent::Cancel => self.state.cancel_modal(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),
            UiEvent::DismissNotification => self.state.dismiss_notification(),

            // Session
            UiEvent::Logout => return self.state.logout(),

            // Handled by the run loop
            UiEvent::Quit => {}
        }

        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiCall, ApiResponse, Reply};
    use crate::models::ResourceKind;

    #[tokio::test]
    async fn test_startup_fetches_me_and_active_screen() {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (net_tx, mut net_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(Route::Resource(ResourceKind::Team), net_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, resp_rx));

        let Some(NetworkCommand::Call { call, .. }) = net_rx.recv().await else {
            panic!("expected a call");
        };
        assert_eq!(call, ApiCall::GetMe);
        let Some(NetworkCommand::Call { id, call }) = net_rx.recv().await else {
            panic!("expected a call");
        };
        assert_eq!(call, ApiCall::List(ResourceKind::Team));

        let rows = serde_json::json!([{"key": "t1", "team_name": "Alpha"}]);
        resp_tx
            .send(NetworkResponse::Completed {
                id,
                result: Ok(Reply::Response(ApiResponse::new(200, rows))),
            })
            .unwrap();

        let mut loaded = None;
        while let Some(render) = render_rx.recv().await {
            if render.list.as_ref().is_some_and(|l| l.total == 1) {
                loaded = Some(render);
                break;
            }
        }
        assert_eq!(loaded.unwrap().list.unwrap().rows[0][0], "Alpha");

        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();
        assert_eq!(net_rx.recv().await, Some(NetworkCommand::Shutdown));
    }
}

//! DQ Console - terminal admin console for a data-quality service
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async REST calls

use std::io;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use dq_console::api::ApiClient;
use dq_console::app::AppActor;
use dq_console::config::Config;
use dq_console::constants::{APP_NAME, APP_VERSION, LOG_FILE, LOG_FILTER_ENV};
use dq_console::messages::render::{ListView, ModalView};
use dq_console::messages::{key_to_ui_event, KeyContext, NetworkCommand, NetworkResponse, RenderState, UiEvent};
use dq_console::network::NetworkActor;
use dq_console::routes::Route;
use dq_console::ui::{centered_rect, flag_color, form_lines, highlight_json, pretty_json, render_tabs};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let config = Config::load()?;
    tracing::info!(api_domain = %config.api_domain, version = APP_VERSION, "Starting {}", APP_NAME);
    let client = ApiClient::new(&config)
        .map_err(|e| anyhow::anyhow!("could not build HTTP client: {}", e))?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(client, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(config.start_route(), net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx, &config.api_domain).await?;

    tracing::info!("Shutting down");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
    api_domain: &str,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state, api_domain))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, KeyContext::of(&current_state)) {
                    let quit = event == UiEvent::Quit;
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState, api_domain: &str) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Tab bar
            Constraint::Min(0),     // Content
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_tab_bar(f, state, main_chunks[0]);

    match state.route {
        Route::Login => draw_login(f, state, main_chunks[1]),
        Route::Dashboard => draw_dashboard(f, state, main_chunks[1]),
        Route::Resource(_) => {
            if let Some(list) = &state.list {
                draw_list(f, list, main_chunks[1]);
            }
        }
    }

    draw_status_bar(f, state, api_domain, main_chunks[2]);

    // Popups, topmost last
    if let Some(modal) = &state.modal {
        draw_modal(f, modal, area);
    }
    if let Some(confirm) = &state.confirm {
        draw_confirm(f, confirm.title, confirm.content, confirm.pending, area);
    }
    if state.show_help {
        draw_help_popup(f, area);
    }
    if let Some(message) = &state.notification {
        draw_notification(f, message, area);
    }
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let titles: Vec<String> = Route::NAVIGABLE
        .iter()
        .enumerate()
        .map(|(i, route)| format!(" {}:{} ", i + 1, route.title()))
        .collect();
    let titles: Vec<&str> = titles.iter().map(String::as_str).collect();
    let selected = Route::NAVIGABLE
        .iter()
        .position(|r| *r == state.route)
        .unwrap_or(0);

    if state.route == Route::Login {
        let line = Line::from(Span::styled(
            format!(" {} ", APP_NAME),
            Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
        ));
        f.render_widget(Paragraph::new(line), area);
        return;
    }
    f.render_widget(render_tabs(&titles, selected), area);
}

fn draw_list(f: &mut Frame, list: &ListView, area: Rect) {
    let title = format!(
        " {} ({}) - page {}/{} ",
        list.kind.title(),
        list.total,
        list.page + 1,
        list.page_count
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));

    if list.loading && list.rows.is_empty() {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(loading, area);
        return;
    }

    let header = Row::new(list.columns.iter().map(|c| Cell::from(*c)))
        .style(Style::default().fg(Color::Yellow).bold());
    let rows: Vec<Row> = list
        .rows
        .iter()
        .enumerate()
        .map(|(i, cells)| {
            let row = Row::new(cells.iter().map(|text| match flag_color(text) {
                Some(color) => Cell::from(text.clone()).style(Style::default().fg(color)),
                None => Cell::from(text.clone()),
            }));
            if Some(i) == list.selected {
                row.style(Style::default().bg(Color::DarkGray).bold())
            } else {
                row
            }
        })
        .collect();
    let widths = vec![Constraint::Fill(1); list.columns.len()];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}

fn draw_dashboard(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let panels = [
        (" Metrics ", &state.dashboard.metrics, chunks[0]),
        (" Issues ", &state.dashboard.issues, chunks[1]),
    ];
    for (title, data, rect) in panels {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan));
        let lines = match data {
            Some(value) => highlight_json(&pretty_json(value)),
            None if state.dashboard.loading => vec![Line::styled("Loading...", Style::default().fg(Color::DarkGray))],
            None => vec![Line::styled("No data", Style::default().fg(Color::DarkGray))],
        };
        f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), rect);
    }
}

fn draw_login(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(50, 60, area);
    let mut lines = vec![
        Line::styled("Sign in", Style::default().fg(Color::Cyan).bold()),
        Line::raw(""),
    ];
    lines.extend(form_lines(&state.login.fields));
    lines.push(Line::raw(""));

    if !state.login.methods.is_empty() {
        lines.push(Line::styled(
            format!("Methods: {}", state.login.methods.join(", ")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(status) = &state.login.status_line {
        lines.push(Line::styled(status.clone(), Style::default().fg(Color::Red)));
    }
    let action = if state.login.submitting { "Signing in..." } else { "Enter: sign in  Tab: next field" };
    lines.push(Line::styled(action, Style::default().fg(Color::DarkGray)));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Login ")
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), popup_area);
}

fn draw_modal(f: &mut Frame, modal: &ModalView, area: Rect) {
    let popup_area = centered_rect(60, 80, area);

    let mut lines = Vec::new();
    if modal.awaiting_schema {
        lines.push(Line::styled("Loading schema...", Style::default().fg(Color::DarkGray)));
    }
    lines.extend(form_lines(&modal.fields));

    if !modal.hints.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("Users: {}", modal.hints.join(", ")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(Line::raw(""));
    if let Some(status) = &modal.status_line {
        for text in status.lines() {
            lines.push(Line::styled(text.to_string(), Style::default().fg(Color::Red)));
        }
    }
    let footer = if modal.busy {
        String::from("Saving...")
    } else {
        format!("Enter: {}  Esc: Cancel", modal.submit_label)
    };
    lines.push(Line::styled(footer, Style::default().fg(Color::Yellow)));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", modal.title))
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, popup_area);
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), popup_area);
}

fn draw_confirm(f: &mut Frame, title: &str, content: &str, pending: bool, area: Rect) {
    let popup_area = centered_rect(50, 25, area);
    let prompt = if pending { "Deleting..." } else { "y: Delete  n: Cancel" };
    let lines = vec![
        Line::raw(content.to_string()),
        Line::raw(""),
        Line::styled(prompt, Style::default().fg(Color::Yellow)),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, popup_area);
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), popup_area);
}

fn draw_notification(f: &mut Frame, message: &str, area: Rect) {
    let popup_area = centered_rect(50, 20, area);
    let lines = vec![
        Line::styled(message.to_string(), Style::default().fg(Color::Red)),
        Line::raw(""),
        Line::styled("Press any key", Style::default().fg(Color::DarkGray)),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Error ")
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, popup_area);
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), popup_area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, api_domain: &str, area: Rect) {
    let user = state.user_email.as_deref().unwrap_or("not signed in");
    let mut spans = vec![
        Span::styled(format!(" {} ", user), Style::default().fg(Color::Cyan)),
        Span::raw(format!("| {} ", api_domain)),
    ];
    if state.is_loading {
        spans.push(Span::styled("| loading... ", Style::default().fg(Color::Yellow)));
    }
    if let Some(flash) = &state.flash {
        spans.push(Span::styled(format!("| {} ", flash), Style::default().fg(Color::Green)));
    }
    spans.push(Span::raw("| ?: help  q: quit"));

    let status = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    f.render_widget(status, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = vec![
        Line::styled("Navigation", Style::default().fg(Color::Cyan).bold()),
        Line::raw("  1-8         Switch screen"),
        Line::raw("  Up/Down     Select row"),
        Line::raw("  Left/Right  Previous/next page"),
        Line::raw("  r           Refresh"),
        Line::raw(""),
        Line::styled("Rows", Style::default().fg(Color::Cyan).bold()),
        Line::raw("  n           Create (Teams, Actions, Datasources)"),
        Line::raw("  e / Enter   Edit selected row"),
        Line::raw("  d           Delete selected row"),
        Line::raw("  a           Enable suggestion"),
        Line::raw("  v / s       Validate dataset / refresh sample"),
        Line::raw(""),
        Line::styled("Forms", Style::default().fg(Color::Cyan).bold()),
        Line::raw("  Tab         Next field"),
        Line::raw("  Left/Right  Change selection"),
        Line::raw("  Enter       Submit"),
        Line::raw("  Esc         Cancel"),
        Line::raw(""),
        Line::raw("  L           Log out"),
        Line::raw("  q / Ctrl+C  Quit"),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, popup_area);
    f.render_widget(Paragraph::new(help_text).block(block), popup_area);
}

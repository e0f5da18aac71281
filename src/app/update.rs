use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tracing::error;

use crate::api::ApiClient;
use crate::app::form::{FormRow, FormState};
use crate::app::{AppState, InputMode, ModalState, PendingAction};
use crate::ui;

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    api: &ApiClient,
) -> Result<()> {
    let mut app = AppState::new();

    loop {
        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        // Queued API work runs after the frame, so the loading/saving state
        // is on screen while the blocking call is in flight.
        if let Some(action) = app.pending.take() {
            perform_pending_action(&mut app, api, action);
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.input_mode {
                        InputMode::Normal => {
                            if !handle_normal_key(&mut app, key.code) {
                                break;
                            }
                        }
                        InputMode::Search => handle_search_key(&mut app, key.code),
                        InputMode::Modal => handle_modal_key(&mut app, key.code),
                    }
                }
            }
        }
    }

    Ok(())
}

/// Normal-mode keys. Returns false when the app should quit.
pub fn handle_normal_key(app: &mut AppState, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('q') => return false,
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
        }
        KeyCode::Char('n') => {
            app.modal = Some(ModalState::Form(FormState::create()));
            app.input_mode = InputMode::Modal;
        }
        KeyCode::Enter | KeyCode::Char('e') => {
            if let Some(client) = app.selected_client() {
                app.modal = Some(ModalState::Form(FormState::edit(client)));
                app.input_mode = InputMode::Modal;
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(client) = app.selected_client() {
                // "No" preselected
                app.modal = Some(ModalState::DeleteConfirm {
                    id: client.id,
                    name: client.name.clone(),
                    selected: 1,
                });
                app.input_mode = InputMode::Modal;
            }
        }
        KeyCode::Char('r') => app.queue(PendingAction::Refresh),
        KeyCode::Up | KeyCode::Char('k') => {
            if app.selected_index > 0 {
                app.selected_index -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.selected_index + 1 < app.clients.len() {
                app.selected_index += 1;
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            let rpp = app.rows_per_page.max(1);
            if app.selected_index >= rpp {
                app.selected_index -= rpp;
            } else {
                app.selected_index = 0;
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let rpp = app.rows_per_page.max(1);
            let new_idx = app.selected_index.saturating_add(rpp);
            app.selected_index = new_idx.min(app.clients.len().saturating_sub(1));
        }
        _ => {}
    }
    true
}

/// Search-mode keys. Every edit to the query re-fetches from the server.
pub fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            if !app.search_query.is_empty() {
                app.search_query.clear();
                app.queue(PendingAction::Refresh);
            }
        }
        KeyCode::Backspace => {
            if app.search_query.pop().is_some() {
                app.queue(PendingAction::Refresh);
            }
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            app.queue(PendingAction::Refresh);
        }
        _ => {}
    }
}

pub fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::Form(form)) => {
            // All input is ignored while the save request is in flight.
            if form.submitting {
                return;
            }
            match code {
                KeyCode::Esc => close_modal(app),
                KeyCode::Up | KeyCode::BackTab => form.move_up(),
                KeyCode::Down | KeyCode::Tab => form.move_down(),
                KeyCode::Delete => {
                    if let FormRow::Phone(i, _) = form.selected_row() {
                        form.remove_phone(i);
                    }
                }
                KeyCode::Enter => match form.selected_row() {
                    FormRow::AddPhone => form.add_phone(),
                    FormRow::Submit => {
                        if form.validate() {
                            form.submitting = true;
                            app.pending = Some(PendingAction::Save);
                        }
                    }
                    _ => form.move_down(),
                },
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) => form.insert_char(c),
                _ => {}
            }
        }
        Some(ModalState::DeleteConfirm { id, selected, .. }) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Left | KeyCode::Right => {
                *selected = if *selected == 0 { 1 } else { 0 };
            }
            KeyCode::Enter => {
                if *selected == 0 {
                    let id = *id;
                    app.pending = Some(PendingAction::Delete { id });
                } else {
                    close_modal(app);
                }
            }
            _ => {}
        },
        Some(ModalState::Info { .. }) => match code {
            KeyCode::Esc | KeyCode::Enter => close_modal(app),
            _ => {}
        },
        None => {}
    }
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}

/// Execute queued API work and fold the result back into the state.
pub fn perform_pending_action(app: &mut AppState, api: &ApiClient, action: PendingAction) {
    match action {
        PendingAction::Refresh => {
            let term = if app.search_query.is_empty() {
                None
            } else {
                Some(app.search_query.clone())
            };
            match api.list(term.as_deref()) {
                Ok(clients) => {
                    app.clients = clients;
                    if app.selected_index >= app.clients.len() {
                        app.selected_index = app.clients.len().saturating_sub(1);
                    }
                }
                Err(e) => {
                    error!("list clients failed: {e}");
                    app.modal = Some(ModalState::Info {
                        message: format!("Failed to load clients: {e}"),
                    });
                    app.input_mode = InputMode::Modal;
                }
            }
            app.loading = false;
        }
        PendingAction::Save => {
            let Some(ModalState::Form(form)) = app.modal.as_mut() else {
                return;
            };
            let payload = form.draft.to_payload();
            let result = match form.draft.id {
                Some(id) => api.update(id, &payload).map(|_| ()),
                None => api.create(&payload).map(|_| ()),
            };
            form.submitting = false;
            match result {
                Ok(()) => {
                    app.modal = None;
                    app.input_mode = InputMode::Normal;
                    app.queue(PendingAction::Refresh);
                }
                Err(e) => {
                    error!("save client failed: {e}");
                    form.apply_server_error(&e);
                }
            }
        }
        PendingAction::Delete { id } => match api.remove(id) {
            Ok(()) => {
                app.modal = None;
                app.input_mode = InputMode::Normal;
                app.queue(PendingAction::Refresh);
            }
            Err(e) => {
                error!("delete client failed: {e}");
                app.modal = Some(ModalState::Info {
                    message: format!("Failed to delete client: {e}"),
                });
                app.input_mode = InputMode::Modal;
            }
        },
    }
}

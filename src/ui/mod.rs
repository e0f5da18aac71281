pub mod clients;
pub mod components;
pub mod form;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let prompt = if app.input_mode == InputMode::Search || !app.search_query.is_empty() {
        format!("  Search: {}", app.search_query)
    } else {
        String::new()
    };
    let header = Paragraph::new(format!(
        "petshop-manager{prompt}  clients:{}  | n: new; Enter: edit; d: delete; /: search; r: reload; q: quit",
        app.clients.len()
    ))
    .block(
        Block::default()
            .title("petshop-manager")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(header, root[0]);

    if app.loading {
        let p = Paragraph::new("Loading clients...")
            .style(Style::default().fg(app.theme.text))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        f.render_widget(p, root[1]);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
            .split(root[1]);
        clients::render_clients_table(f, body[0], app);
        clients::render_client_details(f, body[1], app);
    }

    components::render_status_bar(f, root[2], app);

    if app.modal.is_some() {
        let area = f.area();
        render_modal(f, area, app);
    }
}

fn render_modal(f: &mut Frame, area: Rect, app: &mut AppState) {
    if let Some(state) = app.modal.clone() {
        match &state {
            ModalState::Form(_) => form::render_form_modal(f, area, app, &state),
            ModalState::DeleteConfirm { .. } => {
                components::render_delete_confirm_modal(f, area, app, &state)
            }
            ModalState::Info { .. } => components::render_info_modal(f, area, app, &state),
        }
    }
}

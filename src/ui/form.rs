//! Create/edit form modal.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::form::{FormRow, FormState, PhonePart, field_for_row};
use crate::app::{AppState, ModalState};
use crate::ui::components::centered_rect;

pub fn render_form_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    let ModalState::Form(form) = state else {
        return;
    };

    let rows = form.rows();
    let mut lines: Vec<Line> = Vec::with_capacity(rows.len() + form.errors.len() + 2);
    for (idx, row) in rows.iter().enumerate() {
        let marker = if idx == form.cursor { "▶" } else { " " };
        let (label, value) = row_label_value(form, *row);
        lines.push(Line::raw(format!("{marker} {label}{value}")));

        // Errors render under their field; phone errors only under the
        // number row so the pair doesn't repeat the same message.
        if !matches!(row, FormRow::Phone(_, PhonePart::AreaCode)) {
            if let Some(field) = field_for_row(*row) {
                if let Some(message) = form.errors.get(&field) {
                    lines.push(Line::from(Span::styled(
                        format!("    {message}"),
                        Style::default().fg(app.theme.error),
                    )));
                }
            }
        }
    }
    if let Some(message) = &form.server_error {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(app.theme.error),
        )));
    }
    if form.submitting {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "Saving...",
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }

    let title = if form.is_editing() { "Edit client" } else { "New client" };
    let width = 64u16.min(area.width.saturating_sub(4)).max(44);
    let height = ((lines.len() as u16) + 2)
        .min(area.height.saturating_sub(2))
        .max(8);
    let rect = centered_rect(width, height, area);
    let p = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

fn row_label_value(form: &FormState, row: FormRow) -> (String, String) {
    match row {
        FormRow::Name => ("Name: ".to_string(), form.draft.name.clone()),
        FormRow::SocialName => ("Social name: ".to_string(), form.draft.social_name.clone()),
        FormRow::Email => ("Email: ".to_string(), form.draft.email.clone()),
        FormRow::Cpf => ("CPF: ".to_string(), form.draft.cpf.clone()),
        FormRow::Address(field) => (
            format!("{}: ", field.label()),
            form.draft.address.field(field).to_string(),
        ),
        FormRow::AdditionalInfo => (
            "Additional info: ".to_string(),
            form.draft.address.additional_info.clone(),
        ),
        FormRow::Phone(i, PhonePart::AreaCode) => (
            format!("Phone {} area code: ", i + 1),
            form.draft
                .phones
                .get(i)
                .map(|p| p.area_code.clone())
                .unwrap_or_default(),
        ),
        FormRow::Phone(i, PhonePart::Number) => (
            format!("Phone {} number: ", i + 1),
            form.draft
                .phones
                .get(i)
                .map(|p| p.number.clone())
                .unwrap_or_default(),
        ),
        FormRow::AddPhone => ("[ Add phone ]".to_string(), String::new()),
        FormRow::Submit => ("[ Save ]".to_string(), String::new()),
    }
}

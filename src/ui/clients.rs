//! Clients table and details pane.

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use crate::app::AppState;
use crate::model::{Client, Phone};
use crate::validate::{format_cpf, format_phone};

pub fn render_clients_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    if app.clients.is_empty() {
        let msg = if app.search_query.is_empty() {
            "No clients registered. Press 'n' to add one."
        } else {
            "No clients match the search."
        };
        let p = Paragraph::new(msg).style(Style::default().fg(app.theme.text)).block(
            Block::default()
                .title("Clients")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(p, area);
        return;
    }

    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(app.clients.len());
    let slice = &app.clients[start..end];

    let rows = slice.iter().enumerate().map(|(i, c)| {
        let absolute_index = start + i;
        let style = if absolute_index == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(c.name.clone()),
            Cell::from(format_cpf(&c.cpf)),
            Cell::from(phones_summary(&c.phones)),
            Cell::from(city_summary(c)),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Percentage(35),
        Constraint::Length(14),
        Constraint::Percentage(30),
        Constraint::Percentage(20),
    ];

    let header = Row::new(vec!["NAME", "CPF", "PHONES", "CITY"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title("Clients")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

pub fn render_client_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.selected_client() {
        Some(c) => {
            let mut lines = vec![
                format!("Name: {}", c.name),
                format!("Social name: {}", c.social_name.as_deref().unwrap_or("-")),
                format!("Email: {}", c.email.as_deref().unwrap_or("-")),
                format!("CPF: {}", format_cpf(&c.cpf)),
            ];
            match &c.address {
                Some(a) => {
                    lines.push(format!("Address: {}, {} - {}", a.street, a.number, a.neighborhood));
                    lines.push(format!("         {}/{}  {}", a.city, a.state, a.postal_code));
                    if let Some(info) = &a.additional_info {
                        lines.push(format!("         {}", info));
                    }
                }
                None => lines.push("Address: -".to_string()),
            }
            lines.push(format!("Phones: {}", phones_summary(&c.phones)));
            lines.push(format!("Created: {}", format_date(c.created_at)));
            lines.push(format!("Updated: {}", format_date(c.updated_at)));
            lines.join("\n")
        }
        None => String::new(),
    };

    let p = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

fn phones_summary(phones: &[Phone]) -> String {
    if phones.is_empty() {
        return "-".to_string();
    }
    phones
        .iter()
        .map(|p| format_phone(&p.area_code, &p.number))
        .collect::<Vec<_>>()
        .join(", ")
}

fn city_summary(client: &Client) -> String {
    match &client.address {
        Some(a) => format!("{}/{}", a.city, a.state),
        None => "-".to_string(),
    }
}

fn format_date(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(ts) => ts.format("%d/%m/%Y %H:%M").to_string(),
        None => "-".to_string(),
    }
}

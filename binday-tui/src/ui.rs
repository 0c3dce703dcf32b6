use binday_core::classify::{self, ServiceKind};
use binday_core::controller::Phase;
use chrono::Local;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use crate::app::App;

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    // Title / header
    let header = Paragraph::new("binday – Reading bin collection days")
        .block(Block::default().borders(Borders::ALL).title("Binday"));
    frame.render_widget(header, *header_area);

    // Main screen: schedule when an address is selected, search otherwise
    if app.view.selected.is_some() {
        draw_schedule_view(frame, app, *content_area);
    } else {
        draw_address_search(frame, app, *content_area);
    }

    // Status bar
    let nav_hint = if app.view.selected.is_some() {
        "c change address · r refresh · q/Esc quit"
    } else {
        "Type your postcode · ↑/↓ move · Enter select · Esc quit"
    };

    let busy = matches!(
        app.view.phase,
        Phase::SearchingAddresses | Phase::LoadingSchedule
    );

    let status_text = if busy {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.view.error {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.view.error.is_some() {
        Style::default().fg(Color::Red)
    } else if busy {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_address_search(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // input
            Constraint::Min(0),    // candidates
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [input_area, results_area] = chunks else {
        return;
    };

    let input = Paragraph::new(app.view.postcode.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Postcode (e.g. RG30 1DB)"),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(input, *input_area);

    let items = if app.view.candidates.is_empty() {
        let hint = if app.view.postcode.trim().is_empty() {
            "Enter your postcode to find your bin collection schedule."
        } else if app.view.phase == Phase::SearchingAddresses {
            "Searching…"
        } else {
            "No addresses yet. Keep typing, the search runs on its own."
        };
        vec![ListItem::new(hint)]
    } else {
        app.view
            .candidates
            .iter()
            .map(|address| {
                ListItem::new(format!(
                    "{} · UPRN {}",
                    address.short_address, address.uprn
                ))
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select your address (↑/↓, Enter)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.view.candidates.is_empty() {
        state.select(Some(app.candidate_index));
    }
    frame.render_stateful_widget(list, *results_area, &mut state);
}

fn draw_schedule_view(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let address_label = app
        .view
        .selected
        .as_ref()
        .map_or("<address>", |address| address.short_address.as_str());

    let title = format!("Collections for {address_label}");

    if app.view.phase == Phase::LoadingSchedule {
        let paragraph = Paragraph::new("Loading collection schedule…")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    if app.view.schedule.is_empty() {
        let paragraph = Paragraph::new(
            "No upcoming collections found for this address.\n\
             Contact the council if you believe this is an error.",
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let today = Local::now().date_naive();

    let rows = app.view.schedule.iter().map(|event| {
        let kind = ServiceKind::classify(&event.service);
        let label = format!("{} {}", kind.icon(), kind.short_name());
        let when = classify::display_date(event, today);

        Row::new(vec![
            Cell::from(label),
            Cell::from(when),
            Cell::from(event.day.clone()),
            Cell::from(event.round.clone()),
        ])
        .style(Style::default().fg(service_color(kind)))
    });

    let column_widths = [
        Constraint::Length(14),
        Constraint::Length(24),
        Constraint::Length(12),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Service", "When", "Day", "Round"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);

    frame.render_widget(table, area);
}

fn service_color(kind: ServiceKind) -> Color {
    match kind {
        ServiceKind::Food => Color::LightRed,
        ServiceKind::Recycling => Color::Green,
        ServiceKind::Garden => Color::LightGreen,
        ServiceKind::Waste => Color::Blue,
        ServiceKind::Other => Color::Magenta,
    }
}

use crate::app::{App, InputMode, Screen};
use redact_admin::DataSource;
use redact_core::{LogEntry, LogLevel, RedactionCategory};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use time::OffsetDateTime;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    match app.screen {
        Screen::Tool => draw_tool(f, app, chunks[1]),
        Screen::Users => draw_users(f, app, chunks[1]),
        Screen::Logs => draw_logs(f, app, chunks[1]),
    }
    draw_footer(f, app, chunks[2]);

    if app.input_mode == InputMode::ShowingHelp {
        draw_help(f);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let user = match &app.session {
        Some(session) if session.is_valid() => format!("  [{}]", session.username),
        _ => String::new(),
    };
    let title = Paragraph::new(format!("Just Redact - {}{}", app.screen.title(), user))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn draw_tool(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let selection = app.form.selection();
    let items: Vec<ListItem> = RedactionCategory::ALL
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let mark = if selection.contains(*category) { "[x]" } else { "[ ]" };
            let style = if i == app.selected_category {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!("{} {}", mark, category.label())).style(style)
        })
        .collect();

    let toggle_label = if app.form.is_all_selected() {
        "Deselect all"
    } else {
        "Select all"
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(
                "Categories ({}/{}) a: {}",
                selection.len(),
                RedactionCategory::ALL.len(),
                toggle_label
            )),
    );
    f.render_widget(list, chunks[0]);

    let mut lines = Vec::new();
    match app.form.file() {
        Some(file) => {
            lines.push(Line::from(vec![
                Span::styled("Document: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(file.name.clone()),
            ]));
            lines.push(Line::from(format!("Type: {}", file.mime_type)));
            lines.push(Line::from(format!("Size: {} bytes", file.size())));
        }
        None => lines.push(Line::from(
            "No document selected. Press 'o' to choose a PDF, image or text file.",
        )),
    }
    lines.push(Line::from(""));

    if app.is_submitting() {
        lines.push(Line::styled(
            "Redacting...",
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(error) = app.form.error() {
        lines.push(Line::styled(error.to_string(), Style::default().fg(Color::Red)));
    }
    if let Some(path) = &app.last_output {
        lines.push(Line::styled(
            format!("Last output: {}", path.display()),
            Style::default().fg(Color::Green),
        ));
    }

    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Document"))
        .wrap(Wrap { trim: false });
    f.render_widget(panel, chunks[1]);
}

fn draw_users(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .users
        .users()
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let state = if user.blocked { "blocked" } else { "active" };
            let mut style = if user.blocked {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            if i == app.selected_user {
                style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            }
            ListItem::new(format!(
                "{:>3}  {:<16} {:<28} {}",
                user.id, user.name, user.email, state
            ))
            .style(style)
        })
        .collect();

    let mut title = format!("Users ({})", app.users.users().len());
    if app.users.source() == DataSource::Fallback {
        title.push_str(" - sample data");
    }
    if app.users.pending_count() > 0 {
        title.push_str(&format!(" - {} pending", app.users.pending_count()));
    }

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn draw_logs(f: &mut Frame, app: &App, area: Rect) {
    let entries = app.logs.entries();
    let items: Vec<ListItem> = entries.iter().map(|e| log_item(e)).collect();

    let filter = app
        .logs
        .level()
        .map(|l| l.to_string())
        .unwrap_or_else(|| "all".to_string());
    let mut title = format!("Logs ({}) level: {}", entries.len(), filter);
    if app.logs.source() == DataSource::Fallback {
        title.push_str(" - sample data");
    }

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn log_item(entry: &LogEntry) -> ListItem<'static> {
    let color = match entry.level {
        LogLevel::Info => Color::Green,
        LogLevel::Warn => Color::Yellow,
        LogLevel::Error => Color::Red,
    };
    let actor = entry
        .actor
        .as_deref()
        .map(|a| format!("{}: ", a))
        .unwrap_or_default();

    ListItem::new(Line::from(vec![
        Span::styled(format_timestamp(entry.timestamp), Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(format!("{:<5}", entry.level.to_string()), Style::default().fg(color)),
        Span::raw(" "),
        Span::raw(format!("{}{}", actor, entry.message)),
    ]))
}

pub(crate) fn format_timestamp(secs: i64) -> String {
    match OffsetDateTime::from_unix_timestamp(secs) {
        Ok(dt) => format!(
            "{:04}-{:02}-{:02} {:02}:{:02}",
            dt.year(),
            dt.month() as u8,
            dt.day(),
            dt.hour(),
            dt.minute()
        ),
        Err(_) => secs.to_string(),
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let line = match app.input_mode {
        InputMode::EnteringPath => Line::from(vec![
            Span::styled("Path: ", Style::default().fg(Color::Yellow)),
            Span::raw(app.input_buffer.clone()),
            Span::raw("_"),
        ]),
        InputMode::ConfirmDelete => {
            let name = app
                .users
                .users()
                .get(app.selected_user)
                .map(|u| u.name.as_str())
                .unwrap_or("user");
            Line::from(vec![
                Span::styled(
                    format!("Delete {}? ", name),
                    Style::default().fg(Color::Red),
                ),
                Span::styled("y", Style::default().fg(Color::Yellow)),
                Span::raw(":yes "),
                Span::styled("n", Style::default().fg(Color::Yellow)),
                Span::raw(":no"),
            ])
        }
        _ => {
            let status = app
                .status_message
                .clone()
                .unwrap_or_else(|| "Ready".to_string());
            let mut spans = vec![Span::raw(status), Span::raw(" | ")];
            for (key, action) in key_hints(app.screen) {
                spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
                spans.push(Span::raw(format!(":{} ", action)));
            }
            Line::from(spans)
        }
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn key_hints(screen: Screen) -> &'static [(&'static str, &'static str)] {
    match screen {
        Screen::Tool => &[
            ("q", "quit"),
            ("o", "open"),
            ("space", "toggle"),
            ("a", "all"),
            ("enter", "redact"),
            ("tab", "admin"),
        ],
        Screen::Users => &[
            ("q", "quit"),
            ("b", "block"),
            ("d", "delete"),
            ("r", "refresh"),
            ("tab", "logs"),
        ],
        Screen::Logs => &[
            ("q", "quit"),
            ("l", "level"),
            ("r", "refresh"),
            ("tab", "tool"),
        ],
    }
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());
    let lines = vec![
        Line::styled("Document", Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  o        choose a document by path"),
        Line::from("  j/k      move between categories"),
        Line::from("  space    toggle the highlighted category"),
        Line::from("  a        select or deselect every category"),
        Line::from("  enter/s  redact and save the result"),
        Line::from(""),
        Line::styled("Admin", Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  tab      cycle tool, users and logs"),
        Line::from("  b        block or unblock the highlighted user"),
        Line::from("  d        delete the highlighted user"),
        Line::from("  l        cycle the log level filter"),
        Line::from("  r        reload from the server"),
        Line::from(""),
        Line::from("  ?/esc    close this help"),
    ];

    let help = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

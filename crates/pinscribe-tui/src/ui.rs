use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Tabs};
use ratatui::Frame;
use std::time::SystemTime;

use crate::app::{App, Tab, LANGUAGES};

pub fn draw(frame: &mut Frame, app: &App) {
    let [tabs_area, main_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(frame.area());

    draw_tabs(frame, app, tabs_area);

    match app.tab {
        Tab::Transcript => draw_transcript(frame, app, main_area),
        Tab::Settings => draw_settings(frame, app, main_area),
        Tab::Logs => draw_logs(frame, app, main_area),
    }
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = vec!["1:Transcript", "2:Settings", "3:Logs"];
    let selected = match app.tab {
        Tab::Transcript => 0,
        Tab::Settings => 1,
        Tab::Logs => 2,
    };
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("pinscribe"))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(app.theme.accent())
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_transcript(frame: &mut Frame, app: &App, area: Rect) {
    let [status_area, current_area, entries_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(area);

    // Status: recording indicator + active language + last warning
    let mut status_spans = vec![
        if app.state.is_recording {
            Span::styled("● REC", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        } else {
            Span::styled("■ idle", Style::default().fg(app.theme.dim()))
        },
        Span::raw(format!("  lang: {}", app.state.language)),
    ];
    if let Some(warning) = app.state.warnings.last() {
        status_spans.push(Span::styled(
            format!("  ⚠ {}", warning),
            Style::default().fg(Color::Yellow),
        ));
    }
    let status = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Status (r=record, c=clear)"),
    );
    frame.render_widget(status, status_area);

    // The in-progress utterance
    let current = if app.state.current.is_empty() {
        Paragraph::new(Span::styled("…", Style::default().fg(app.theme.dim())))
    } else {
        Paragraph::new(Span::styled(
            app.state.current.as_str(),
            Style::default().fg(Color::Cyan),
        ))
    };
    frame.render_widget(
        current.block(Block::default().borders(Borders::ALL).title("Listening")),
        current_area,
    );

    // Committed entries, newest first
    let items: Vec<ListItem> = app
        .state
        .entries
        .iter()
        .rev()
        .take(app.max_entries)
        .map(|entry| {
            let line = Line::from(vec![
                Span::styled(
                    format!("[{}] ", format_clock(entry.committed_at)),
                    Style::default().fg(app.theme.dim()),
                ),
                Span::raw(entry.text.as_str()),
            ]);
            ListItem::new(line)
        })
        .collect();

    let title = format!("Transcript ({} entries)", app.state.entries.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, entries_area);
}

fn draw_settings(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = LANGUAGES
        .iter()
        .enumerate()
        .map(|(index, (locale, label))| {
            let marker = if index == app.selected_language { ">" } else { " " };
            let active = if *locale == app.state.language {
                " (active)"
            } else {
                ""
            };
            let line = Line::from(vec![
                Span::raw(format!("{} ", marker)),
                Span::styled(
                    *label,
                    if index == app.selected_language {
                        Style::default()
                            .fg(app.theme.accent())
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    },
                ),
                Span::raw(format!("  [{}]{}", locale, active)),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Language (Up/Down=select, Enter=apply)"),
    );
    frame.render_widget(list, area);
}

fn draw_logs(frame: &mut Frame, app: &App, area: Rect) {
    let logs = app.logs.lock().unwrap();
    let total = logs.len();

    let visible_height = area.height.saturating_sub(2) as usize; // account for borders
    let scroll = app.log_scroll.min(total.saturating_sub(visible_height));
    let end = total.saturating_sub(scroll);
    let start = end.saturating_sub(visible_height);

    let items: Vec<ListItem> = logs
        .iter()
        .skip(start)
        .take(end - start)
        .map(|line| ListItem::new(line.as_str()))
        .collect();

    let title = if app.log_auto_scroll {
        "Logs (auto-scroll)"
    } else {
        "Logs (Up/Down=scroll, G=bottom)"
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

/// Wall-clock HH:MM:SS (UTC) for an entry's commit time.
fn format_clock(time: SystemTime) -> String {
    let secs = time
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let of_day = secs % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        of_day / 3600,
        (of_day % 3600) / 60,
        of_day % 60
    )
}

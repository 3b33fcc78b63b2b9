use crate::app::{App, InputMode};
use crate::view::{CatalogView, EMPTY_MESSAGE};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthStr;

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(3) + search(3) + list(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let header_text = format!(
        " Movie Catalog   [{} movies]",
        app.catalog.state().len()
    );
    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, chunks[0]);

    // ── Search bar ──
    let search_style = match app.input_mode {
        InputMode::Searching => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let search_label = if app.input_mode == InputMode::Searching {
        " Search (Enter/Esc to finish): "
    } else {
        " Search (/): "
    };
    let search_text = format!("{}{}", search_label, app.search);
    let search_bar = Paragraph::new(search_text)
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(search_style)
                .title(" Search "),
        );
    frame.render_widget(search_bar, chunks[1]);

    if app.input_mode == InputMode::Searching && app.form.is_none() {
        let cursor_x = chunks[1].x + 1 + search_label.width() as u16 + app.search.width() as u16;
        let cursor_y = chunks[1].y + 1;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    // ── List ──
    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Movies ");

    match &app.view {
        CatalogView::Empty => {
            let empty = Paragraph::new(EMPTY_MESSAGE)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(list_block);
            frame.render_widget(empty, chunks[2]);
        }
        CatalogView::Items(items) => {
            let title_width = (area.width as usize).saturating_sub(40);
            let rows: Vec<ListItem> = items
                .iter()
                .map(|item| {
                    let actions: Vec<&str> = item.affordances.iter().map(|a| a.label()).collect();
                    let line = Line::from(vec![
                        Span::styled(
                            format!("{:>5} ", item.id),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::styled(
                            truncate_str(&item.title, title_width),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!(" ({})", item.year),
                            Style::default().fg(Color::Yellow),
                        ),
                        Span::raw(" - "),
                        Span::styled(item.genre.clone(), Style::default().fg(Color::Magenta)),
                        Span::styled(
                            format!("  {}", actions.join(" ")),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]);
                    ListItem::new(line)
                })
                .collect();

            let position = format!(" {} of {} ", app.selected + 1, items.len());
            let list_widget = List::new(rows)
                .block(list_block.title_bottom(Line::from(position).alignment(Alignment::Right)))
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▸ ");

            let mut list_state = ListState::default();
            list_state.select(Some(app.selected));
            frame.render_stateful_widget(list_widget, chunks[2], &mut list_state);
        }
    }

    // ── Status bar ──
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" ↑↓", key_style),
        Span::raw(" Navigate  "),
        Span::styled("/", key_style),
        Span::raw(" Search  "),
        Span::styled("a", key_style),
        Span::raw(" Add  "),
        Span::styled("e", key_style),
        Span::raw(" Edit  "),
        Span::styled("d", key_style),
        Span::raw(" Delete  "),
        Span::styled("?", key_style),
        Span::raw(" Help  "),
        Span::styled("q", key_style),
        Span::raw(" Quit  "),
        Span::styled(
            &app.status_msg,
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let status_bar = Paragraph::new(status_line);
    frame.render_widget(status_bar, chunks[3]);
}

/// Truncate a string to `max_width` characters, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(max_width.saturating_sub(1)).collect();
        result.push('…');
        result
    }
}

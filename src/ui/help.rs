use super::form::centered_rect;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn binding<'a>(keys: &'a str, action: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {:<10}", keys), Style::default().fg(Color::Yellow)),
        Span::raw(action),
    ])
}

pub fn render(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(""),
        section("  Global"),
        binding("?", "Toggle this help"),
        binding("q", "Quit application"),
        binding("Ctrl+C", "Quit from anywhere"),
        Line::from(""),
        section("  Movie List"),
        binding("↑/k ↓/j", "Navigate up/down"),
        binding("PgUp/PgDn", "Move one page"),
        binding("g/G", "Jump to first/last movie"),
        binding("/", "Search title and genre (filters as you type)"),
        binding("Esc", "Clear search"),
        binding("a", "Add a movie"),
        binding("e", "Edit selected movie"),
        binding("d", "Delete selected movie"),
        binding("r", "Reload from backend"),
        Line::from(""),
        section("  Movie Form"),
        binding("Tab/↓", "Next field"),
        binding("S-Tab/↑", "Previous field"),
        binding("Ctrl+U", "Clear field"),
        binding("Enter", "Save (an empty field abandons an edit)"),
        binding("Esc", "Close form"),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}

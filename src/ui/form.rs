use crate::movie::{DraftFields, MovieId, MovieRecord};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

/// What submitting the form will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPurpose {
    Create,
    Edit(MovieId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Year,
    Genre,
}

impl FormField {
    pub const ALL: [FormField; 3] = [Self::Title, Self::Year, Self::Genre];

    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::Year,
            Self::Year => Self::Genre,
            Self::Genre => Self::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Title => Self::Genre,
            Self::Year => Self::Title,
            Self::Genre => Self::Year,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Year => "Year",
            Self::Genre => "Genre",
        }
    }
}

/// Result of form input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    Submit,
    Cancel,
}

/// Three-field movie form used for both adding and editing.
pub struct MovieForm {
    purpose: FormPurpose,
    fields: DraftFields,
    focus: FormField,
    error_message: Option<String>,
    pending: bool,
}

impl MovieForm {
    pub fn create(fields: DraftFields) -> Self {
        Self {
            purpose: FormPurpose::Create,
            fields,
            focus: FormField::Title,
            error_message: None,
            pending: false,
        }
    }

    /// Edit form pre-filled with the record's current values.
    pub fn edit(record: &MovieRecord) -> Self {
        Self {
            purpose: FormPurpose::Edit(record.id.clone()),
            fields: record.to_fields(),
            focus: FormField::Title,
            error_message: None,
            pending: false,
        }
    }

    pub fn purpose(&self) -> &FormPurpose {
        &self.purpose
    }

    pub fn fields(&self) -> &DraftFields {
        &self.fields
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.fields.title,
            FormField::Year => &mut self.fields.year,
            FormField::Genre => &mut self.fields.genre,
        }
    }

    fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.fields.title,
            FormField::Year => &self.fields.year,
            FormField::Genre => &self.fields.genre,
        }
    }

    /// Handle keyboard input. Edits are ignored while a submit is in flight.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormInput> {
        match key.code {
            KeyCode::Esc => return Some(FormInput::Cancel),
            KeyCode::Enter if !self.pending => return Some(FormInput::Submit),
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            _ if self.pending => {}
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.field_mut(self.focus).clear();
            }
            KeyCode::Char(c) => {
                self.field_mut(self.focus).push(c);
                self.error_message = None;
            }
            KeyCode::Backspace => {
                self.field_mut(self.focus).pop();
            }
            _ => {}
        }
        None
    }

    /// Mark the form as waiting for the backend.
    pub fn set_pending(&mut self) {
        self.pending = true;
        self.error_message = None;
    }

    /// Show an error and keep the typed values.
    pub fn set_error(&mut self, message: String) {
        self.pending = false;
        self.error_message = Some(message);
    }

    /// Hand the typed values back, e.g. to remember an unfinished draft.
    pub fn into_fields(self) -> DraftFields {
        self.fields
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = centered_rect(60, 40, frame.area());

        frame.render_widget(Clear, area);

        let title = match &self.purpose {
            FormPurpose::Create => " Add Movie ".to_string(),
            FormPurpose::Edit(id) => format!(" Edit Movie #{} ", id),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(inner);

        for (i, field) in FormField::ALL.into_iter().enumerate() {
            let focused = field == self.focus();
            let style = if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let input = Paragraph::new(self.field(field).to_string())
                .style(Style::default().fg(Color::White))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(style)
                        .title(format!(" {} ", field.label())),
                );
            let rect = chunks[i + 1];
            frame.render_widget(input, rect);

            if focused && !self.is_pending() {
                let cursor_x = rect.x + 1 + self.field(field).width() as u16;
                frame.set_cursor_position((cursor_x.min(rect.right().saturating_sub(2)), rect.y + 1));
            }
        }

        let footer = if let Some(error) = self.error_message() {
            Paragraph::new(error).style(Style::default().fg(Color::Red))
        } else if self.is_pending() {
            Paragraph::new("Saving…").style(Style::default().fg(Color::Yellow))
        } else {
            Paragraph::new("Tab: Next field | Enter: Save | Esc: Cancel")
                .style(Style::default().fg(Color::DarkGray))
        };
        frame.render_widget(footer.alignment(Alignment::Center), chunks[4]);
    }
}

/// Calculate a centered rectangle for the overlay
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}

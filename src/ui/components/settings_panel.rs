use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::settings::{Settings, TestType};
use crate::ui::theme::Theme;

pub struct SettingsPanel<'a> {
    fields: Vec<(String, String)>,
    selected: usize,
    dimmed: Option<usize>,
    status: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> SettingsPanel<'a> {
    pub fn new(
        draft: &Settings,
        theme_name: &str,
        selected: usize,
        status: Option<&'a str>,
        theme: &'a Theme,
    ) -> Self {
        let fields = vec![
            ("Mode".to_string(), draft.mode.label()),
            ("Test Type".to_string(), draft.test_type.as_str().to_string()),
            ("Duration".to_string(), format!("{}s", draft.duration_secs)),
            ("Word Count".to_string(), draft.word_count.to_string()),
            ("Theme".to_string(), theme_name.to_string()),
        ];
        // the limit that does not apply to the chosen test type
        let dimmed = match draft.test_type {
            TestType::Time => Some(3),
            TestType::Words => Some(2),
        };
        Self {
            fields,
            selected,
            dimmed,
            status,
            theme,
        }
    }
}

impl Widget for SettingsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Settings ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(self.fields.len() as u16 * 2),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            "  Up/Down to choose, Left/Right to change",
            Style::default().fg(colors.text_pending()),
        )))
        .render(layout[0], buf);

        let field_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.fields
                    .iter()
                    .map(|_| Constraint::Length(2))
                    .collect::<Vec<_>>(),
            )
            .split(layout[1]);

        for (i, (label, value)) in self.fields.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { " > " } else { "   " };

            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });
            let value_style = if self.dimmed == Some(i) {
                Style::default()
                    .fg(colors.text_pending())
                    .add_modifier(Modifier::DIM)
            } else if is_selected {
                Style::default().fg(colors.text_cursor_bg())
            } else {
                Style::default().fg(colors.fg())
            };

            Paragraph::new(Line::from(vec![
                Span::styled(format!("{indicator}{label:<12}"), label_style),
                Span::styled(format!("< {value} >"), value_style),
            ]))
            .render(field_layout[i], buf);
        }

        if let Some(status) = self.status {
            Paragraph::new(Line::from(Span::styled(
                format!("  {status}"),
                Style::default().fg(colors.warning()),
            )))
            .render(layout[3], buf);
        }

        Paragraph::new(Line::from(Span::styled(
            "  [Enter] Apply  [Esc] Cancel",
            Style::default().fg(colors.accent()),
        )))
        .render(layout[4], buf);
    }
}

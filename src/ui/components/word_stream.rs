use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::generator::WordSource;
use crate::session::engine::{SessionEngine, WordStatus};
use crate::session::input::WordOutcome;
use crate::ui::theme::{Theme, ThemeColors};

/// The window of words around the cursor plus the input line below it.
pub struct WordStream<'a, S: WordSource> {
    engine: &'a SessionEngine<S>,
    theme: &'a Theme,
}

impl<'a, S: WordSource> WordStream<'a, S> {
    pub fn new(engine: &'a SessionEngine<S>, theme: &'a Theme) -> Self {
        Self { engine, theme }
    }
}

fn status_style(status: WordStatus, colors: &ThemeColors) -> Style {
    match status {
        WordStatus::Done(WordOutcome::Correct) => Style::default().fg(colors.text_correct()),
        WordStatus::Done(WordOutcome::Incorrect) => Style::default()
            .fg(colors.text_incorrect())
            .add_modifier(Modifier::UNDERLINED | Modifier::CROSSED_OUT),
        WordStatus::Current { on_track: true } => Style::default()
            .fg(colors.text_cursor_fg())
            .bg(colors.text_cursor_bg())
            .add_modifier(Modifier::BOLD),
        WordStatus::Current { on_track: false } => Style::default()
            .fg(colors.text_incorrect())
            .bg(colors.text_incorrect_bg())
            .add_modifier(Modifier::BOLD),
        WordStatus::Upcoming => Style::default().fg(colors.text_pending()),
    }
}

fn word_spans<'a, S: WordSource>(
    engine: &'a SessionEngine<S>,
    colors: &ThemeColors,
) -> Vec<Span<'a>> {
    let words = engine.words();
    let mut spans = Vec::new();
    for idx in engine.visible_window() {
        if !spans.is_empty() {
            spans.push(Span::raw(" "));
        }
        let style = status_style(engine.word_status(idx), colors);
        spans.push(Span::styled(words[idx].as_str(), style));
    }
    spans
}

impl<S: WordSource> Widget for WordStream<'_, S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(area);

        let words_block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(Line::from(word_spans(self.engine, colors)))
            .block(words_block)
            .wrap(Wrap { trim: false })
            .render(rows[0], buf);

        let input = &self.engine.state().current_input;
        let input_line = if input.is_empty() {
            let hint = if self.engine.is_active() {
                "Keep typing..."
            } else {
                "Start typing to begin..."
            };
            Line::from(Span::styled(
                hint,
                Style::default()
                    .fg(colors.text_pending())
                    .add_modifier(Modifier::ITALIC),
            ))
        } else {
            let fg = if self.engine.input_on_track() {
                colors.fg()
            } else {
                colors.error()
            };
            Line::from(vec![
                Span::styled(input.as_str(), Style::default().fg(fg)),
                Span::styled(" ", Style::default().bg(colors.text_cursor_bg())),
            ])
        };

        let input_block = Block::bordered()
            .title(" Input ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(input_line)
            .block(input_block)
            .render(rows[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::ScriptedWordSource;
    use crate::session::settings::{Mode, Settings, TestType};

    fn engine() -> SessionEngine<ScriptedWordSource> {
        let settings = Settings {
            mode: Mode::Normal,
            test_type: TestType::Words,
            duration_secs: 30,
            word_count: 3,
        };
        SessionEngine::new(settings, ScriptedWordSource::cycling(["cat", "dog", "fox"])).unwrap()
    }

    fn buffer_text(buf: &Buffer) -> String {
        buf.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn renders_words_and_placeholder() {
        let theme = Theme::default();
        let engine = engine();
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);
        WordStream::new(&engine, &theme).render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("cat dog fox"));
        assert!(text.contains("Start typing to begin..."));
    }

    #[test]
    fn renders_pending_input() {
        let theme = Theme::default();
        let mut engine = engine();
        engine.submit_input("ca");
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);
        WordStream::new(&engine, &theme).render(area, &mut buf);
        assert!(buffer_text(&buf).contains("ca"));
    }

    #[test]
    fn spans_follow_word_status() {
        let theme = Theme::default();
        let colors = &theme.colors;
        let mut engine = engine();
        engine.submit_input("cot ");
        let spans = word_spans(&engine, colors);
        // word, gap, word, gap, word
        assert_eq!(spans.len(), 5);
        assert_eq!(spans[0].style.fg, Some(colors.text_incorrect()));
        assert_eq!(spans[2].style.bg, Some(colors.text_cursor_bg()));
        assert_eq!(spans[4].style.fg, Some(colors.text_pending()));
    }
}

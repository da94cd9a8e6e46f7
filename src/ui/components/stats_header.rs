use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::generator::WordSource;
use crate::session::engine::SessionEngine;
use crate::session::settings::TestType;
use crate::ui::theme::Theme;

/// Live counters shown above the words.
pub struct StatsHeader<'a, S: WordSource> {
    engine: &'a SessionEngine<S>,
    now: Instant,
    theme: &'a Theme,
}

impl<'a, S: WordSource> StatsHeader<'a, S> {
    pub fn new(engine: &'a SessionEngine<S>, now: Instant, theme: &'a Theme) -> Self {
        Self { engine, now, theme }
    }
}

pub(crate) fn stat_pairs<S: WordSource>(
    engine: &SessionEngine<S>,
    now: Instant,
) -> Vec<(&'static str, String)> {
    let settings = engine.settings();
    let state = engine.state();
    let stats = engine.stats_at(now);

    let limit = match settings.test_type {
        TestType::Time => ("Time", format!("{}s", state.time_left)),
        TestType::Words => (
            "Words",
            format!("{}/{}", state.words_completed, settings.word_count),
        ),
    };

    vec![
        limit,
        ("WPM", stats.wpm.to_string()),
        ("Accuracy", format!("{}%", stats.accuracy)),
        ("Errors", state.error_count.to_string()),
    ]
}

impl<S: WordSource> Widget for StatsHeader<'_, S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let label_style = Style::default().fg(colors.header_fg());
        let value_style = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);

        let mut spans = Vec::new();
        let pairs = stat_pairs(self.engine, self.now);
        for (i, (label, value)) in pairs.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    "  \u{2502}  ",
                    Style::default().fg(colors.border()),
                ));
            }
            spans.push(Span::styled(format!("{label} "), label_style));
            spans.push(Span::styled(value, value_style));
        }

        let title = format!(
            " NeoType \u{00b7} {} \u{00b7} {} ",
            self.engine.settings().mode.label(),
            self.engine.settings().limit_label()
        );

        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.header_bg()));

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::generator::ScriptedWordSource;
    use crate::session::settings::{Mode, Settings};

    #[test]
    fn timed_pairs_show_time_left() {
        let settings = Settings {
            mode: Mode::Normal,
            test_type: TestType::Time,
            duration_secs: 30,
            word_count: 50,
        };
        let engine = SessionEngine::new(settings, ScriptedWordSource::cycling(["cat"])).unwrap();
        let pairs = stat_pairs(&engine, Instant::now());
        assert_eq!(pairs[0], ("Time", "30s".to_string()));
        assert_eq!(pairs[1], ("WPM", "0".to_string()));
        assert_eq!(pairs[2], ("Accuracy", "100%".to_string()));
        assert_eq!(pairs[3], ("Errors", "0".to_string()));
    }

    #[test]
    fn words_pairs_show_quota() {
        let settings = Settings {
            mode: Mode::RightHand,
            test_type: TestType::Words,
            duration_secs: 30,
            word_count: 10,
        };
        let mut engine =
            SessionEngine::new(settings, ScriptedWordSource::cycling(["you", "hum"])).unwrap();
        let t0 = Instant::now();
        engine.submit_input_at("you ", t0);
        engine.submit_input_at("him ", t0);
        let pairs = stat_pairs(&engine, t0 + Duration::from_secs(60));
        assert_eq!(pairs[0], ("Words", "1/10".to_string()));
        assert_eq!(pairs[3], ("Errors", "1".to_string()));
    }
}

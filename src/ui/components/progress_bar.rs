use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::generator::WordSource;
use crate::session::engine::SessionEngine;
use crate::session::settings::TestType;
use crate::ui::theme::Theme;

pub struct ProgressBar<'a> {
    pub label: String,
    pub ratio: f64,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: impl Into<String>, ratio: f64, theme: &'a Theme) -> Self {
        Self {
            label: label.into(),
            ratio: ratio.clamp(0.0, 1.0),
            theme,
        }
    }

    /// Seconds spent in a timed test or words done in a words test.
    pub fn for_session<S: WordSource>(engine: &SessionEngine<S>, theme: &'a Theme) -> Self {
        let settings = engine.settings();
        let state = engine.state();
        let label = match settings.test_type {
            TestType::Time => format!(
                "{}s / {}s",
                settings.duration_secs.saturating_sub(state.time_left),
                settings.duration_secs
            ),
            TestType::Words => format!("{} / {} words", state.words_completed, settings.word_count),
        };
        Self::new(label, engine.progress(), theme)
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * f64::from(inner.width)) as u16;
        let percent = format!("{:.0}%", self.ratio * 100.0);

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_x = inner.x + (inner.width.saturating_sub(percent.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &percent, Style::default().fg(colors.fg()));
    }
}

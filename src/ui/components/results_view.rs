use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::result::{PerformanceLevel, SessionSummary};
use crate::ui::theme::Theme;

pub struct ResultsView<'a> {
    pub summary: &'a SessionSummary,
    pub theme: &'a Theme,
}

impl<'a> ResultsView<'a> {
    pub fn new(summary: &'a SessionSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for ResultsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let summary = self.summary;

        let block = Block::bordered()
            .title(" Test Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(2),
                Constraint::Length(1),
            ])
            .split(inner);

        let level = summary.level();
        let level_color = match level {
            PerformanceLevel::Expert | PerformanceLevel::Advanced => colors.success(),
            PerformanceLevel::Intermediate => colors.warning(),
            PerformanceLevel::Beginner => colors.text_pending(),
        };
        let mut heading = vec![
            Span::styled(
                "Results",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  \u{00b7}  ", Style::default().fg(colors.border())),
            Span::styled(
                level.as_str(),
                Style::default().fg(level_color).add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(reason) = summary.end_reason {
            heading.push(Span::styled(
                format!("  ({})", reason.as_str()),
                Style::default().fg(colors.text_pending()),
            ));
        }
        Paragraph::new(Line::from(heading))
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let acc_color = match summary.accuracy {
            95.. => colors.success(),
            90..=94 => colors.warning(),
            _ => colors.error(),
        };
        let err_color = if summary.errors == 0 {
            colors.success()
        } else {
            colors.error()
        };

        let rows = [
            (
                "  Speed:    ",
                format!("{} WPM", summary.wpm),
                colors.accent(),
                summary.speed_remark(),
            ),
            (
                "  Accuracy: ",
                format!("{}%", summary.accuracy),
                acc_color,
                summary.accuracy_remark(),
            ),
            (
                "  Errors:   ",
                summary.errors.to_string(),
                err_color,
                summary.errors_remark(),
            ),
        ];
        for (slot, (label, value, color, remark)) in layout[1..4].iter().zip(rows) {
            Paragraph::new(Line::from(vec![
                Span::styled(label, Style::default().fg(colors.fg())),
                Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(format!("  {remark}"), Style::default().fg(colors.text_pending())),
            ]))
            .render(*slot, buf);
        }

        let detail = format!(
            "  {:.1}s \u{00b7} {}/{} chars \u{00b7} {} words \u{00b7} {} \u{00b7} {}",
            summary.elapsed_secs,
            summary.correct_chars,
            summary.total_chars,
            summary.words_completed,
            summary.settings.mode.label(),
            summary.settings.limit_label(),
        );
        Paragraph::new(Line::from(Span::styled(
            detail,
            Style::default().fg(colors.text_pending()),
        )))
        .render(layout[4], buf);

        let mut tip_lines = vec![Line::from(Span::styled(
            "  Tips",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ))];
        for tip in summary.tips() {
            tip_lines.push(Line::from(Span::styled(
                format!("  \u{2022} {tip}"),
                Style::default().fg(colors.fg()),
            )));
        }
        Paragraph::new(tip_lines)
            .wrap(Wrap { trim: false })
            .render(layout[6], buf);

        Paragraph::new(Line::from(Span::styled(
            format!("  {}", summary.share_text()),
            Style::default()
                .fg(colors.fg())
                .add_modifier(Modifier::ITALIC),
        )))
        .render(layout[7], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("  [r] Retry  ", Style::default().fg(colors.accent())),
            Span::styled("[s] Settings  ", Style::default().fg(colors.accent())),
            Span::styled("[Esc] Back  ", Style::default().fg(colors.accent())),
            Span::styled("[q] Quit", Style::default().fg(colors.accent())),
        ]))
        .render(layout[8], buf);
    }
}

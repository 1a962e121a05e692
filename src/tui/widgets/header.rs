use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, today: NaiveDate, done_today: usize, total: usize) {
    let date_str = today.format("%A, %b %d, %Y").to_string();

    let title_line = Line::from(vec![
        Span::styled("  ✔ ", theme::accent().add_modifier(Modifier::BOLD)),
        Span::styled("habittrack", theme::accent().add_modifier(Modifier::BOLD)),
    ]);

    let date_line = Line::from(vec![
        Span::styled(date_str, theme::dim()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(
            format!("{}/{} done today", done_today, total),
            if total > 0 && done_today == total {
                theme::green()
            } else {
                theme::amber()
            },
        ),
    ]);

    let text = vec![title_line, Line::from(""), date_line];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::accent().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

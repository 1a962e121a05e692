use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::CategoryCompletion;
use crate::tui::theme;
use crate::utils::format::rate_bar;

pub fn render(frame: &mut Frame, area: Rect, categories: &[CategoryCompletion]) {
    let block = Block::default()
        .title(Span::styled(" Categories ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(false))
        .style(theme::surface());

    let mut lines = vec![Line::from("")];
    if categories.is_empty() {
        lines.push(Line::from(Span::styled("  Nothing tracked yet", theme::dim())));
    }
    for c in categories {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<10}", c.category.display_name()),
                theme::category(c.category),
            ),
            Span::styled(rate_bar(c.completion_rate, 10), theme::rate(c.completion_rate)),
            Span::styled(format!(" {:>3}%", c.completion_rate), theme::rate(c.completion_rate)),
            Span::styled(format!("  ×{}", c.count), theme::dim()),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

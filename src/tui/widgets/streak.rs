use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::StatsSummary;
use crate::tui::theme;
use crate::utils::format::{format_streak, rate_bar};

pub fn render(frame: &mut Frame, area: Rect, stats: &StatsSummary, window_days: u32) {
    let block = Block::default()
        .title(Span::styled(" Streak ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(false))
        .style(theme::surface());

    // Streak bar (12 chars wide, filled proportional to streak/window)
    let bar_len = 12usize;
    let ratio = (stats.current_streak as f64 / window_days.max(1) as f64).min(1.0);
    let filled = (ratio * bar_len as f64).round() as usize;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(bar_len - filled));

    let streak_line = Line::from(vec![
        Span::styled("  ", theme::dim()),
        Span::styled(bar, theme::green()),
        Span::styled(
            format!("  {}", format_streak(stats.current_streak)),
            theme::green().add_modifier(Modifier::BOLD),
        ),
    ]);

    let rate_line = Line::from(vec![
        Span::styled("  ", theme::dim()),
        Span::styled(rate_bar(stats.completion_rate, bar_len), theme::rate(stats.completion_rate)),
        Span::styled(
            format!("  {}% in {}d", stats.completion_rate, window_days),
            theme::rate(stats.completion_rate),
        ),
    ]);

    let meta_line = Line::from(vec![Span::styled(
        format!(
            "  Best: {}  ·  Habits: {}",
            format_streak(stats.best_streak),
            stats.total_habits
        ),
        theme::dim(),
    )]);

    let text = vec![Line::from(""), streak_line, rate_line, Line::from(""), meta_line];
    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}

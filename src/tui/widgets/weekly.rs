use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::engine::dates::trailing_days;
use crate::models::HabitWithStats;
use crate::tui::theme;

/// Last `days` days of the focused habit, one column per day.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    habit: Option<&HabitWithStats>,
    today: NaiveDate,
    days: u32,
) {
    let title = match habit {
        Some(h) => format!(" {} ", h.habit.name),
        None => " Week ".to_string(),
    };
    let block = Block::default()
        .title(Span::styled(title, theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(false))
        .style(theme::surface());

    let dates = trailing_days(today, days);

    let mut label_spans = vec![Span::styled("  ", theme::dim())];
    let mut dot_spans = vec![Span::styled("  ", theme::dim())];
    let mut done = 0usize;

    for day in &dates {
        let label = day.format("%a").to_string();
        let label_style = if *day == today {
            theme::accent().add_modifier(Modifier::BOLD)
        } else {
            theme::dim()
        };
        label_spans.push(Span::styled(format!("{:<4}", &label[..label.len().min(3)]), label_style));

        let record = habit.and_then(|h| h.completions.iter().find(|c| c.date == *day));
        let (dot, style) = match record {
            Some(c) if c.completed => {
                done += 1;
                ("●", theme::green().add_modifier(Modifier::BOLD))
            }
            Some(_) => ("✗", theme::red()),
            None => ("○", theme::dim()),
        };
        dot_spans.push(Span::styled(format!("{:<4}", dot), style));
    }

    let meta_line = Line::from(Span::styled(
        format!("  {}/{} days done", done, dates.len()),
        theme::dim(),
    ));

    let text = vec![
        Line::from(""),
        Line::from(label_spans),
        Line::from(dot_spans),
        Line::from(""),
        meta_line,
    ];
    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}

use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState},
    Frame,
};

use crate::models::HabitWithStats;
use crate::tui::theme;
use crate::utils::format::{fit_width, format_streak};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    habits: &[HabitWithStats],
    today: NaiveDate,
    focused_idx: usize,
) {
    let block = Block::default()
        .title(Span::styled(" Today ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(true))
        .style(theme::surface());

    if habits.is_empty() {
        let empty = List::new(vec![
            ListItem::new(""),
            ListItem::new(Line::from(Span::styled(
                "  No habits yet, press [a] to add one",
                theme::dim(),
            ))),
        ])
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // name column takes what is left after icon, category and streak
    let name_width = (area.width as usize).saturating_sub(32).clamp(8, 40);

    let items: Vec<ListItem> = habits
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let is_focused = i == focused_idx;
            let today_record = h.completions.iter().find(|c| c.date == today);

            let (icon, status_style) = match today_record {
                Some(c) if c.completed => ("●", theme::green()),
                Some(_) => ("✗", theme::red()),
                None => ("○", theme::dim()),
            };

            let name_style = if is_focused {
                theme::accent().add_modifier(Modifier::BOLD)
            } else {
                theme::bold()
            };

            let line = Line::from(vec![
                Span::styled(if is_focused { " ▸ " } else { "   " }, theme::accent()),
                Span::styled(icon, status_style),
                Span::styled(" ", theme::dim()),
                Span::styled(fit_width(&h.habit.name, name_width), name_style),
                Span::styled(
                    format!(" {:<10}", h.habit.category.display_name()),
                    theme::category(h.habit.category),
                ),
                Span::styled(format!("{:>9}", format_streak(h.streak)), theme::dim()),
            ]);

            ListItem::new(line)
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(focused_idx.min(habits.len() - 1)));

    let list = List::new(items).block(block);
    frame.render_stateful_widget(list, area, &mut state);
}

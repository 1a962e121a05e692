use ratatui::style::{Color, Modifier, Style};

use crate::models::Category;

pub const BG: Color = Color::Rgb(16, 18, 20);
pub const SURFACE: Color = Color::Rgb(24, 28, 31);
pub const BORDER: Color = Color::Rgb(48, 56, 60);
pub const TEXT: Color = Color::Rgb(222, 228, 226);
pub const TEXT_DIM: Color = Color::Rgb(118, 130, 128);
pub const ACCENT: Color = Color::Rgb(72, 166, 152);
pub const GREEN: Color = Color::Rgb(104, 170, 96);
pub const AMBER: Color = Color::Rgb(214, 150, 64);
pub const RED: Color = Color::Rgb(190, 84, 74);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border(focused: bool) -> Style {
    if focused {
        accent()
    } else {
        Style::default().fg(BORDER)
    }
}

/// Style for a 0-100 completion rate.
pub fn rate(rate: u32) -> Style {
    match rate {
        80..=100 => green(),
        40..=79 => amber(),
        1..=39 => red(),
        _ => dim(),
    }
}

pub fn category(category: Category) -> Style {
    let color = match category {
        Category::Health => Color::Rgb(110, 180, 120),
        Category::Fitness => Color::Rgb(220, 120, 80),
        Category::Education => Color::Rgb(100, 150, 220),
        Category::Wellness => Color::Rgb(180, 130, 200),
        Category::Work => Color::Rgb(200, 180, 90),
        Category::Personal => Color::Rgb(90, 190, 190),
    };
    Style::default().fg(color)
}

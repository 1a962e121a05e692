use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Format a streak as "N day" / "N days"
pub fn format_streak(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Bar for a 0-100 percentage
pub fn rate_bar(rate: u32, width: usize) -> String {
    progress_bar(rate, 100, width)
}

/// Pad or cut `s` to exactly `width` terminal columns, ending cut text with '…'.
pub fn fit_width(s: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(s);
    if current <= width {
        return format!("{}{}", s, " ".repeat(width - current));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_to_width() {
        assert_eq!(rate_bar(50, 10), "█████░░░░░");
        assert_eq!(rate_bar(0, 4), "░░░░");
        assert_eq!(progress_bar(3, 0, 3), "░░░");
        assert_eq!(progress_bar(40, 30, 5), "█████");
    }

    #[test]
    fn fit_width_pads_and_truncates() {
        assert_eq!(fit_width("Run", 6), "Run   ");
        assert_eq!(fit_width("Meditation", 6), "Medit…");
        assert_eq!(UnicodeWidthStr::width(fit_width("読書読書読書", 7).as_str()), 7);
        assert_eq!(fit_width("abc", 0), "");
    }

    #[test]
    fn streak_wording() {
        assert_eq!(format_streak(1), "1 day");
        assert_eq!(format_streak(0), "0 days");
    }
}

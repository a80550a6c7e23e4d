use tutorly_lib::notice::{Notice, NoticeLevel};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
}

pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Print a notice the way a toast would show it; errors go to stderr
pub fn print_notice(notice: &Notice, use_color: bool) {
    match notice.level {
        NoticeLevel::Success => println!("{}", paint(&notice.to_string(), Color::GREEN, use_color)),
        NoticeLevel::Error => eprintln!("{}", paint(&notice.to_string(), Color::RED, use_color)),
    }
}

/// Cut `text` to `width` characters, marking the cut with "..."
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(3);
    format!("{}...", text.chars().take(keep).collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("Present simple", 20), "Present simple");
        assert_eq!(truncate("Present simple", 10), "Present...");
        assert_eq!(truncate("日本語のテキスト", 5), "日本...");
    }

    #[test]
    fn test_paint_without_color() {
        assert_eq!(paint("ok", Color::GREEN, false), "ok");
        assert_eq!(paint("ok", Color::GREEN, true), "\x1b[32mok\x1b[0m");
    }
}

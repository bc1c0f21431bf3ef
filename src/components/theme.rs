use tui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeColor {
    Primary,
    Accent,
    Dim,
    Winner,
    Error,
}

pub fn resolve(color: ThemeColor) -> Style {
    match color {
        ThemeColor::Primary => Style::default().fg(Color::Rgb(0, 122, 195)),
        ThemeColor::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ThemeColor::Dim => Style::default().fg(Color::Indexed(240)),
        ThemeColor::Winner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ThemeColor::Error => Style::default().fg(Color::Red),
    }
}

/// Highlight for the row or cell under the cursor.
pub fn selected() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

pub fn normal() -> Style {
    Style::default().fg(Color::Gray)
}

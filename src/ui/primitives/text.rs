use crossterm::style::Stylize;

use crate::ui::theme;

/// Semantic role of a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
    Warning,
    Info,
    Dim,
}

/// Color `text` by tone; plain text when color is off
pub fn paint(text: &str, tone: Tone, supports_color: bool) -> String {
    if !supports_color {
        return text.to_string();
    }
    let color = match tone {
        Tone::Success => theme::colors::SUCCESS,
        Tone::Error => theme::colors::ERROR,
        Tone::Warning => theme::colors::WARNING,
        Tone::Info => theme::colors::INFO,
        Tone::Dim => theme::colors::DIM,
    };
    format!("{}", text.with(color))
}

/// Bold (and optionally colored) text for titles
pub fn strong(text: &str, tone: Option<Tone>, supports_color: bool) -> String {
    if !supports_color {
        return text.to_string();
    }
    match tone {
        Some(tone) => {
            let colored = paint(text, tone, true);
            format!("{}", colored.bold())
        }
        None => format!("{}", text.bold()),
    }
}

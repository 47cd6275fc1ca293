//! Theming and color definitions for the terminal chrome.
//!
//! The diagram itself is themed in [`crate::theme`]; these styles cover the
//! panes, bars and overlays around it. Semantic ANSI colors are used so the
//! chrome adapts to the terminal's palette.

use ratatui::style::{Color, Modifier, Style};

/// Border style for a pane, highlighted when focused.
pub fn pane_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

/// Style for the editor's source text.
pub fn source_text() -> Style {
    Style::default()
}

/// Style for the preformatted failure text inside the diagram pane.
pub fn error_text() -> Style {
    Style::default().fg(Color::Red)
}

/// Style for the error banner line.
pub fn error_banner() -> Style {
    Style::default().bg(Color::Red).fg(Color::White)
}

/// Style for the status bar.
pub fn status_bar() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Style for dim placeholder text (empty preview, missing graphics support).
pub fn placeholder() -> Style {
    Style::default()
        .fg(Color::Indexed(245))
        .add_modifier(Modifier::DIM)
}

/// Style for key names inside the help overlay.
pub fn help_key() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

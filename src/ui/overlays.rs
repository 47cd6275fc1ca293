use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

const HELP_ENTRIES: &[(&str, &str)] = &[
    ("Tab", "switch between source and diagram pane"),
    ("type / Enter / Backspace", "edit the diagram source"),
    ("Ctrl+Left / Ctrl+Right", "move by word"),
    ("Ctrl+Home / Ctrl+End", "start / end of source"),
    ("Ctrl+L", "clear the source"),
    ("arrows or drag", "pan the diagram (diagram pane)"),
    ("+ / - or wheel", "zoom the diagram"),
    ("0", "reset pan and zoom"),
    ("F1 or ?", "toggle this help"),
    ("Ctrl+Q", "quit"),
];

pub fn render_help_overlay(frame: &mut Frame, area: Rect) {
    #[allow(clippy::cast_possible_truncation)]
    let height = (HELP_ENTRIES.len() as u16 + 2).min(area.height);
    let popup = centered_rect(area, 56.min(area.width), height);

    let lines: Vec<Line> = HELP_ENTRIES
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!(" {key:<26}"), super::style::help_key()),
                Span::raw((*action).to_string()),
            ])
        })
        .collect();

    let block = Block::default().title(" Help ").borders(Borders::ALL);
    let help = Paragraph::new(lines).block(block);
    frame.render_widget(Clear, popup);
    frame.render_widget(help, popup);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

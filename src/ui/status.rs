use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, Pane, Preview};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let focus = match model.focus {
        Pane::Editor => "[editor]",
        Pane::Preview => "[preview]",
    };
    let line_info = format!(
        "Ln {}/{}",
        model.buffer.cursor().line + 1,
        model.buffer.line_count()
    );
    let zoom_info = format!("zoom {}%", model.viewport.scale_percent());
    let render_info = match &model.preview {
        Preview::Empty => "empty",
        Preview::Rendered { .. } => "ok",
        Preview::Failed { .. } => "error",
    };

    let status = format!(
        " mermpad  {focus}  {line_info}  {zoom_info}  [{render_info}]  Tab:pane  F1:help  Ctrl+Q:quit",
    );

    let status_bar = Paragraph::new(status).style(super::style::status_bar());
    frame.render_widget(status_bar, area);
}

/// One-line banner under the panes, shown only while the last render failed.
pub fn render_error_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Preview::Failed { message } = &model.preview else {
        return;
    };
    // Banner is a single line; the full text lives in the diagram pane.
    let first_line = message.lines().next().unwrap_or(message);
    let bar = Paragraph::new(format!("[error] {first_line}")).style(super::style::error_banner());
    frame.render_widget(bar, area);
}

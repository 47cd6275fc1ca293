use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, Pane, Preview};

use super::{overlays, preview, status, EDITOR_WIDTH_PERCENT, PREVIEW_WIDTH_PERCENT};

/// The screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Source pane (left column), including its border.
    pub editor: Rect,
    /// Diagram pane (right column), including its border.
    pub preview: Rect,
    /// Error banner row, present only while the last render failed.
    pub banner: Option<Rect>,
    /// Status bar row.
    pub status: Rect,
}

pub fn split_main_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(EDITOR_WIDTH_PERCENT),
            Constraint::Percentage(PREVIEW_WIDTH_PERCENT),
        ])
        .split(area)
}

/// Compute the frame layout. Input handling uses the same function so mouse
/// hit-testing always agrees with what was drawn.
pub fn screen_layout(area: Rect, banner_visible: bool) -> ScreenLayout {
    let footer_rows = 1 + u16::from(banner_visible);
    let panes_area = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };
    let banner = banner_visible.then(|| Rect {
        y: area.y + area.height.saturating_sub(2),
        height: 1,
        ..area
    });
    let status = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };
    let columns = split_main_columns(panes_area);
    ScreenLayout {
        editor: columns[0],
        preview: columns[1],
        banner,
        status,
    }
}

/// Content width of the diagram pane in columns, given the terminal width.
///
/// Used to pick the rasterization width for the preview image.
pub fn preview_content_width(total_width: u16) -> u16 {
    let area = Rect::new(0, 0, total_width, 1);
    let preview_width = split_main_columns(area)[1].width;
    preview_width.saturating_sub(2).max(1)
}

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = screen_layout(area, matches!(model.preview, Preview::Failed { .. }));

    render_editor(model, frame, layout.editor);
    preview::render_preview(model, frame, layout.preview);

    if let Some(banner) = layout.banner {
        status::render_error_bar(model, frame, banner);
    }
    status::render_status_bar(model, frame, layout.status);

    if model.help_visible {
        overlays::render_help_overlay(frame, area);
    }
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Mermaid Source ")
        .borders(Borders::ALL)
        .border_style(super::style::pane_border(model.focus == Pane::Editor));
    let inner = block.inner(area);

    let visible_rows = inner.height as usize;
    let start = model.editor_scroll;
    let lines: Vec<Line> = (start..start + visible_rows)
        .map_while(|idx| model.buffer.line_at(idx))
        .map(|text| Line::styled(text, super::style::source_text()))
        .collect();

    let editor = Paragraph::new(lines).block(block);
    frame.render_widget(editor, area);

    // Hardware cursor marks the edit position while the editor has focus.
    if model.focus == Pane::Editor && !model.help_visible {
        let cursor = model.buffer.cursor();
        if cursor.line >= start && cursor.line < start + visible_rows {
            let prefix = model
                .buffer
                .line_at(cursor.line)
                .map(|line| {
                    let byte_col = cursor.col.min(line.len());
                    line[..byte_col].width()
                })
                .unwrap_or(0);
            #[allow(clippy::cast_possible_truncation)]
            let col = (prefix as u16).min(inner.width.saturating_sub(1));
            #[allow(clippy::cast_possible_truncation)]
            let row = (cursor.line - start) as u16;
            frame.set_cursor_position((inner.x + col, inner.y + row));
        }
    }
}

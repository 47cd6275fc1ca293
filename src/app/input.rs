use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::{Message, Model, Pane};
use crate::editor::Direction;

use super::event_loop::ResizeDebouncer;

/// Translate a terminal event into a message, if it means anything.
pub(super) fn handle_event(
    event: &Event,
    model: &Model,
    now_ms: u64,
    resize_debouncer: &mut ResizeDebouncer,
) -> Option<Message> {
    match event {
        Event::Key(key) => handle_key(*key, model),
        Event::Mouse(mouse) => handle_mouse(*mouse, model),
        Event::Resize(w, h) => {
            resize_debouncer.queue(*w, *h, now_ms);
            None
        }
        _ => None,
    }
}

fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global bindings, regardless of focus
    match key.code {
        KeyCode::Char('q') if ctrl => return Some(Message::Quit),
        KeyCode::F(1) => return Some(Message::ToggleHelp),
        _ => {}
    }

    // Any other key dismisses the help overlay
    if model.help_visible {
        return Some(Message::HideHelp);
    }

    if key.code == KeyCode::Tab {
        return Some(Message::SwitchFocus);
    }

    match model.focus {
        Pane::Editor => editor_key(key, ctrl, model),
        Pane::Preview => preview_key(key),
    }
}

fn editor_key(key: KeyEvent, ctrl: bool, model: &Model) -> Option<Message> {
    let page = model.editor_view_rows().max(1);
    match key.code {
        KeyCode::Char('l') if ctrl => Some(Message::ClearSource),
        KeyCode::Left if ctrl => Some(Message::MoveWordLeft),
        KeyCode::Right if ctrl => Some(Message::MoveWordRight),
        KeyCode::Home if ctrl => Some(Message::MoveToStart),
        KeyCode::End if ctrl => Some(Message::MoveToEnd),
        KeyCode::Char(ch) if !ctrl => Some(Message::InsertChar(ch)),
        KeyCode::Enter => Some(Message::SplitLine),
        KeyCode::Backspace => Some(Message::DeleteBack),
        KeyCode::Delete => Some(Message::DeleteForward),
        KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
        KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
        KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
        KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
        KeyCode::Home => Some(Message::MoveHome),
        KeyCode::End => Some(Message::MoveEnd),
        KeyCode::PageUp => Some(Message::EditorScrollUp(page)),
        KeyCode::PageDown => Some(Message::EditorScrollDown(page)),
        _ => None,
    }
}

fn preview_key(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Char('+' | '=') => Some(Message::ZoomIn),
        KeyCode::Char('-') => Some(Message::ZoomOut),
        KeyCode::Char('0') => Some(Message::ResetView),
        KeyCode::Char('?') => Some(Message::ToggleHelp),
        KeyCode::Left | KeyCode::Char('h') => Some(Message::Pan(-2, 0)),
        KeyCode::Right | KeyCode::Char('l') => Some(Message::Pan(2, 0)),
        KeyCode::Up | KeyCode::Char('k') => Some(Message::Pan(0, -1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Message::Pan(0, 1)),
        _ => None,
    }
}

fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
    if model.help_visible {
        if matches!(mouse.kind, MouseEventKind::Down(_)) {
            return Some(Message::HideHelp);
        }
        return None;
    }

    let area = Rect::new(0, 0, model.terminal_width, model.terminal_height);
    let layout = crate::ui::screen_layout(area, model.preview.is_failed());
    let in_editor = point_in_rect(mouse.column, mouse.row, layout.editor);
    let in_preview = point_in_rect(mouse.column, mouse.row, layout.preview);

    match mouse.kind {
        // A drag that started in the diagram pane keeps panning even when the
        // pointer leaves it; panning is boundless.
        MouseEventKind::Drag(MouseButton::Left) if model.pan_drag.is_some() => {
            Some(Message::UpdatePanDrag(mouse.column, mouse.row))
        }
        MouseEventKind::Up(MouseButton::Left) if model.pan_drag.is_some() => {
            Some(Message::EndPanDrag)
        }
        MouseEventKind::Down(MouseButton::Left) if in_preview => {
            Some(Message::StartPanDrag(mouse.column, mouse.row))
        }
        MouseEventKind::Down(MouseButton::Left) if in_editor => {
            let line = model.editor_scroll
                + usize::from(mouse.row.saturating_sub(layout.editor.y + 1));
            let col = usize::from(mouse.column.saturating_sub(layout.editor.x + 1));
            Some(Message::MoveTo(line, col))
        }
        MouseEventKind::ScrollUp if in_preview => Some(Message::ZoomIn),
        MouseEventKind::ScrollDown if in_preview => Some(Message::ZoomOut),
        MouseEventKind::ScrollUp if in_editor => Some(Message::EditorScrollUp(3)),
        MouseEventKind::ScrollDown if in_editor => Some(Message::EditorScrollDown(3)),
        _ => None,
    }
}

const fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

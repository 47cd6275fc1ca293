use crate::app::model::{Model, Pane};
use crate::editor::Direction;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editor
    /// Insert a character at the cursor
    InsertChar(char),
    /// Delete character before cursor (Backspace)
    DeleteBack,
    /// Delete character at cursor (Delete)
    DeleteForward,
    /// Split line at cursor (Enter)
    SplitLine,
    /// Discard the whole source (Ctrl+L)
    ClearSource,
    /// Move cursor in a direction
    MoveCursor(Direction),
    /// Move cursor to beginning of line (Home)
    MoveHome,
    /// Move cursor to end of line (End)
    MoveEnd,
    /// Move cursor one word left (Ctrl+Left)
    MoveWordLeft,
    /// Move cursor one word right (Ctrl+Right)
    MoveWordRight,
    /// Move cursor to start of source (Ctrl+Home)
    MoveToStart,
    /// Move cursor to end of source (Ctrl+End)
    MoveToEnd,
    /// Move cursor to absolute position (line, col) — e.g. from mouse click
    MoveTo(usize, usize),
    /// Scroll editor viewport up by n lines
    EditorScrollUp(usize),
    /// Scroll editor viewport down by n lines
    EditorScrollDown(usize),

    // Rendering
    /// Debounce expired: render the current source (side effect)
    RenderDiagram,

    // Diagram viewport
    /// Zoom the diagram in one step
    ZoomIn,
    /// Zoom the diagram out one step
    ZoomOut,
    /// Pan the diagram by a cell delta
    Pan(i32, i32),
    /// Reset pan and zoom to identity
    ResetView,
    /// Begin a drag-pan at a screen position (mouse down)
    StartPanDrag(u16, u16),
    /// Continue a drag-pan (mouse drag)
    UpdatePanDrag(u16, u16),
    /// Finish a drag-pan (mouse up)
    EndPanDrag,

    // Chrome
    /// Switch focus between the source and diagram panes
    SwitchFocus,
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

impl Message {
    /// Whether this message changes the diagram source, and therefore should
    /// (re)arm the render debouncer. `ClearSource` is absent on purpose: it
    /// re-renders immediately instead of waiting out the quiet period.
    pub const fn mutates_source(&self) -> bool {
        matches!(
            self,
            Self::InsertChar(_) | Self::DeleteBack | Self::DeleteForward | Self::SplitLine
        )
    }
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// No side effects should occur in this function.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Editor
        Message::InsertChar(ch) => {
            model.buffer.insert_char(ch);
            ensure_cursor_visible(&mut model);
        }
        Message::DeleteBack => {
            model.buffer.delete_back();
            ensure_cursor_visible(&mut model);
        }
        Message::DeleteForward => {
            model.buffer.delete_forward();
        }
        Message::SplitLine => {
            model.buffer.split_line();
            ensure_cursor_visible(&mut model);
        }
        Message::ClearSource => {
            model.buffer.clear();
            model.editor_scroll = 0;
        }
        Message::MoveCursor(dir) => {
            model.buffer.move_cursor(dir);
            ensure_cursor_visible(&mut model);
        }
        Message::MoveHome => {
            model.buffer.move_home();
        }
        Message::MoveEnd => {
            model.buffer.move_end();
        }
        Message::MoveWordLeft => {
            model.buffer.move_word_left();
            ensure_cursor_visible(&mut model);
        }
        Message::MoveWordRight => {
            model.buffer.move_word_right();
            ensure_cursor_visible(&mut model);
        }
        Message::MoveToStart => {
            model.buffer.move_to_start();
            ensure_cursor_visible(&mut model);
        }
        Message::MoveToEnd => {
            model.buffer.move_to_end();
            ensure_cursor_visible(&mut model);
        }
        Message::MoveTo(line, col) => {
            // Mouse click: a click in the source pane also claims focus.
            model.focus = Pane::Editor;
            model.buffer.move_to(line, col);
            ensure_cursor_visible(&mut model);
        }
        Message::EditorScrollUp(n) => {
            model.editor_scroll = model.editor_scroll.saturating_sub(n);
        }
        Message::EditorScrollDown(n) => {
            model.editor_scroll += n;
            model.clamp_editor_scroll();
        }

        // RenderDiagram: handled in effects (side effect)
        Message::RenderDiagram => {}

        // Diagram viewport
        Message::ZoomIn => {
            model.viewport.zoom_in();
        }
        Message::ZoomOut => {
            model.viewport.zoom_out();
        }
        Message::Pan(dx, dy) => {
            model.viewport.pan_by(dx, dy);
        }
        Message::ResetView => {
            model.viewport.reset();
        }
        Message::StartPanDrag(x, y) => {
            model.focus = Pane::Preview;
            model.pan_drag = Some((x, y));
        }
        Message::UpdatePanDrag(x, y) => {
            if let Some((last_x, last_y)) = model.pan_drag {
                let dx = i32::from(x) - i32::from(last_x);
                let dy = i32::from(y) - i32::from(last_y);
                model.viewport.pan_by(dx, dy);
                model.pan_drag = Some((x, y));
            }
        }
        Message::EndPanDrag => {
            model.pan_drag = None;
        }

        // Chrome
        Message::SwitchFocus => {
            model.focus = match model.focus {
                Pane::Editor => Pane::Preview,
                Pane::Preview => Pane::Editor,
            };
        }
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }

        // Window
        Message::Resize(width, height) => {
            model.terminal_width = width;
            model.terminal_height = height;
            // Pane width changed, so the cached rasterization is stale; the
            // next ensure pass rebuilds it at the new fit width.
            model.clamp_editor_scroll();
            ensure_cursor_visible(&mut model);
        }

        // Application
        Message::Quit => {
            model.should_quit = true;
        }
    }
    model
}

/// Ensure the editor cursor line is visible in the editor pane.
fn ensure_cursor_visible(model: &mut Model) {
    let cursor_line = model.buffer.cursor().line;
    let visible_rows = model.editor_view_rows();
    if visible_rows == 0 {
        model.editor_scroll = cursor_line;
        return;
    }

    if cursor_line < model.editor_scroll {
        model.editor_scroll = cursor_line;
    } else if cursor_line >= model.editor_scroll + visible_rows {
        model.editor_scroll = cursor_line + 1 - visible_rows;
    }
}

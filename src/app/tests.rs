use crate::diagram::EXAMPLE_DIAGRAM;
use crate::editor::Direction;
use crate::ui::viewport::{MAX_SCALE, MIN_SCALE};

use super::effects::{handle_message_side_effects, render_preview};
use super::{Message, Model, Pane, Preview, update};

fn create_test_model() -> Model {
    Model::new("graph TD\n    A --> B", (120, 40))
}

// --- Editing ---

#[test]
fn test_insert_char_updates_buffer() {
    let model = create_test_model();
    let model = update(model, Message::MoveToEnd);
    let model = update(model, Message::InsertChar('!'));
    assert!(model.buffer.text().ends_with('!'));
}

#[test]
fn test_clear_source_empties_buffer() {
    let mut model = create_test_model();
    model.editor_scroll = 1;
    let model = update(model, Message::ClearSource);
    assert!(model.buffer.is_blank());
    assert_eq!(model.editor_scroll, 0);
}

#[test]
fn test_edit_messages_arm_the_debouncer() {
    assert!(Message::InsertChar('a').mutates_source());
    assert!(Message::DeleteBack.mutates_source());
    assert!(Message::DeleteForward.mutates_source());
    assert!(Message::SplitLine.mutates_source());
}

#[test]
fn test_navigation_messages_do_not_arm_the_debouncer() {
    assert!(!Message::MoveCursor(Direction::Down).mutates_source());
    assert!(!Message::ZoomIn.mutates_source());
    assert!(!Message::SwitchFocus.mutates_source());
    assert!(!Message::RenderDiagram.mutates_source());
}

// --- Render attempts ---

#[test]
fn test_initial_example_renders_without_error() {
    let mut model = Model::new(EXAMPLE_DIAGRAM, (120, 40));
    render_preview(&mut model);
    match &model.preview {
        Preview::Rendered { svg } => assert!(svg.contains("<svg")),
        other => panic!("expected rendered preview, got {other:?}"),
    }
}

#[test]
fn test_blank_source_clears_preview_without_rendering() {
    let mut model = Model::new("   \n\t\n", (120, 40));
    render_preview(&mut model);
    assert_eq!(model.preview, Preview::Empty);
    // The renderer was never invoked: no attempt id was allocated.
    assert_eq!(model.render_seq(), 0);
}

#[test]
fn test_successful_render_clears_prior_error() {
    let mut model = create_test_model();
    model.set_preview(Preview::Failed {
        message: "previous failure".to_string(),
    });
    render_preview(&mut model);
    assert!(model.preview.is_rendered());
    assert_eq!(model.preview.error_message(), None);
}

#[test]
fn test_clearing_source_after_success_empties_preview() {
    let mut model = create_test_model();
    render_preview(&mut model);
    assert!(model.preview.is_rendered());

    let mut model = update(model, Message::ClearSource);
    handle_message_side_effects(&mut model, &Message::ClearSource);
    assert_eq!(model.preview, Preview::Empty);
}

#[test]
fn test_identical_source_renders_identically() {
    let mut model = create_test_model();
    render_preview(&mut model);
    let first = match &model.preview {
        Preview::Rendered { svg } => svg.clone(),
        other => panic!("expected rendered preview, got {other:?}"),
    };
    render_preview(&mut model);
    let second = match &model.preview {
        Preview::Rendered { svg } => svg.clone(),
        other => panic!("expected rendered preview, got {other:?}"),
    };
    assert_eq!(first, second);
}

#[test]
fn test_each_attempt_gets_a_fresh_id() {
    let mut model = create_test_model();
    render_preview(&mut model);
    let first = model.render_seq();
    render_preview(&mut model);
    assert_eq!(model.render_seq(), first + 1);
}

#[test]
fn test_rasterization_failure_demotes_preview_to_failed() {
    let mut model = create_test_model()
        .with_picker(Some(ratatui_image::picker::Picker::halfblocks()));
    model.set_preview(Preview::Rendered {
        svg: "this is not svg".to_string(),
    });
    model.ensure_preview_protocol();
    assert!(model.preview.is_failed());
    assert!(!model.preview.error_message().unwrap_or_default().is_empty());
    assert!(model.preview_protocol_mut().is_none());
}

#[test]
fn test_failed_preview_reports_message_and_no_markup() {
    let preview = Preview::Failed {
        message: "Parse error on line 1".to_string(),
    };
    assert!(preview.is_failed());
    assert!(!preview.is_rendered());
    assert_eq!(preview.error_message(), Some("Parse error on line 1"));
}

// --- Viewport ---

#[test]
fn test_zoom_messages_change_scale_within_bounds() {
    let mut model = create_test_model();
    for _ in 0..100 {
        model = update(model, Message::ZoomIn);
    }
    assert!((model.viewport.scale() - MAX_SCALE).abs() < f64::EPSILON);
    for _ in 0..200 {
        model = update(model, Message::ZoomOut);
    }
    assert!((model.viewport.scale() - MIN_SCALE).abs() < f64::EPSILON);
}

#[test]
fn test_pan_message_accumulates() {
    let model = create_test_model();
    let model = update(model, Message::Pan(4, -2));
    let model = update(model, Message::Pan(-1, -1));
    assert_eq!(model.viewport.pan(), (3, -3));
}

#[test]
fn test_reset_view_restores_identity() {
    let model = create_test_model();
    let model = update(model, Message::ZoomIn);
    let model = update(model, Message::Pan(10, 10));
    let model = update(model, Message::ResetView);
    assert!(model.viewport.is_identity());
}

#[test]
fn test_drag_pan_sequence_moves_viewport() {
    let model = create_test_model();
    let model = update(model, Message::StartPanDrag(50, 10));
    assert_eq!(model.focus, Pane::Preview);
    let model = update(model, Message::UpdatePanDrag(46, 13));
    assert_eq!(model.viewport.pan(), (-4, 3));
    let model = update(model, Message::EndPanDrag);
    assert!(model.pan_drag.is_none());
}

#[test]
fn test_drag_updates_without_start_are_ignored() {
    let model = create_test_model();
    let model = update(model, Message::UpdatePanDrag(10, 10));
    assert_eq!(model.viewport.pan(), (0, 0));
}

// --- Chrome ---

#[test]
fn test_switch_focus_toggles_between_panes() {
    let model = create_test_model();
    assert_eq!(model.focus, Pane::Editor);
    let model = update(model, Message::SwitchFocus);
    assert_eq!(model.focus, Pane::Preview);
    let model = update(model, Message::SwitchFocus);
    assert_eq!(model.focus, Pane::Editor);
}

#[test]
fn test_click_in_editor_claims_focus_and_moves_cursor() {
    let mut model = create_test_model();
    model.focus = Pane::Preview;
    let model = update(model, Message::MoveTo(1, 4));
    assert_eq!(model.focus, Pane::Editor);
    assert_eq!(model.buffer.cursor().line, 1);
    assert_eq!(model.buffer.cursor().col, 4);
}

#[test]
fn test_toggle_help_changes_visibility() {
    let model = create_test_model();
    assert!(!model.help_visible);
    let model = update(model, Message::ToggleHelp);
    assert!(model.help_visible);
    let model = update(model, Message::HideHelp);
    assert!(!model.help_visible);
}

#[test]
fn test_resize_updates_terminal_size() {
    let model = create_test_model();
    let model = update(model, Message::Resize(200, 60));
    assert_eq!((model.terminal_width, model.terminal_height), (200, 60));
}

#[test]
fn test_quit_sets_flag() {
    let model = create_test_model();
    let model = update(model, Message::Quit);
    assert!(model.should_quit);
}

// --- Editor scrolling ---

#[test]
fn test_cursor_movement_scrolls_editor_into_view() {
    let mut source = String::from("graph TD\n");
    for i in 0..100 {
        source.push_str(&format!("    N{i} --> N{}\n", i + 1));
    }
    let mut model = Model::new(&source, (120, 40));
    model = update(model, Message::MoveToEnd);
    let rows = model.editor_view_rows();
    let cursor_line = model.buffer.cursor().line;
    assert!(cursor_line >= model.editor_scroll);
    assert!(cursor_line < model.editor_scroll + rows);
}

#[test]
fn test_editor_scroll_clamps_to_buffer() {
    let model = create_test_model();
    let model = update(model, Message::EditorScrollDown(1000));
    assert!(model.editor_scroll < model.buffer.line_count());
}

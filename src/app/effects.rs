use crate::app::{Message, Model, Preview};

/// Run the side effects a message carries beyond its pure state change.
pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
    match msg {
        Message::RenderDiagram => render_preview(model),
        // Clearing the source must not wait out the debounce window before
        // the stale diagram disappears.
        Message::ClearSource => render_preview(model),
        _ => {}
    }
}

/// Execute a render attempt against the current source.
///
/// Blank source clears the preview without touching the renderer. Otherwise
/// the attempt atomically replaces the preview state with either the new
/// markup or the failure text.
pub(super) fn render_preview(model: &mut Model) {
    if model.buffer.is_blank() {
        model.set_preview(Preview::Empty);
        return;
    }

    let seq = model.begin_render_attempt();
    let source = model.buffer.text();
    match crate::diagram::render_to_svg(&source) {
        Ok(svg) => {
            tracing::debug!(seq, bytes = svg.len(), "diagram rendered");
            model.set_preview(Preview::Rendered { svg });
        }
        Err(err) => {
            tracing::debug!(seq, error = %err, "diagram render failed");
            model.set_preview(Preview::Failed {
                message: err.to_string(),
            });
        }
    }
}

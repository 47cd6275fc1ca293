use ratatui::layout::Rect;
use ratatui_image::picker::{Picker, ProtocolType};
use ratatui_image::protocol::StatefulProtocol;

use crate::editor::EditorBuffer;
use crate::ui::viewport::Viewport;

/// Smallest rasterization width; below this text in the diagram is mush.
const MIN_RASTER_WIDTH_PX: u32 = 64;
/// Largest rasterization width; caps pixmap allocation at high zoom on wide
/// terminals.
const MAX_RASTER_WIDTH_PX: u32 = 8192;

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Editor,
    Preview,
}

/// Outcome of the most recent render attempt.
///
/// Exactly one variant holds at any time, so rendered output and an error
/// message can never coexist. A new attempt replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Blank source; nothing rendered and no error.
    Empty,
    /// The renderer produced markup.
    Rendered { svg: String },
    /// The renderer (or rasterizer) rejected the source.
    Failed { message: String },
}

impl Preview {
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub const fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }

    /// The failure text, when the last attempt failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Identity of a cached rasterization. A protocol built for an older render
/// attempt or a different transform never reaches the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ProtocolStamp {
    seq: u64,
    zoom_milli: u32,
    pane_cols: u16,
}

struct PreviewProtocol {
    protocol: StatefulProtocol,
    width_cols: u16,
    height_rows: u16,
    stamp: ProtocolStamp,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// The diagram source being edited
    pub buffer: EditorBuffer,
    /// Outcome of the most recent render attempt
    pub preview: Preview,
    /// Pan/zoom transform over the rendered diagram
    pub viewport: Viewport,
    /// Which pane has keyboard focus
    pub focus: Pane,
    /// First visible source line in the editor pane
    pub editor_scroll: usize,
    /// Whether the help overlay is visible
    pub help_visible: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Terminal size in cells
    pub terminal_width: u16,
    pub terminal_height: u16,
    /// Graphics picker for terminal image output
    pub picker: Option<Picker>,
    /// Last mouse position of an active drag-pan, if any
    pub(super) pan_drag: Option<(u16, u16)>,
    /// Monotonic id of the current render attempt
    render_seq: u64,
    /// Rasterized preview for the current render attempt and transform
    protocol: Option<PreviewProtocol>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("preview", &self.preview)
            .field("focus", &self.focus)
            .field("render_seq", &self.render_seq)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a new model holding the given diagram source.
    pub fn new(source: &str, terminal_size: (u16, u16)) -> Self {
        Self {
            buffer: EditorBuffer::from_text(source),
            preview: Preview::Empty,
            viewport: Viewport::new(),
            focus: Pane::Editor,
            editor_scroll: 0,
            help_visible: false,
            should_quit: false,
            terminal_width: terminal_size.0,
            terminal_height: terminal_size.1,
            picker: None,
            pan_drag: None,
            render_seq: 0,
            protocol: None,
        }
    }

    /// Set the image picker.
    #[must_use]
    pub fn with_picker(mut self, picker: Option<Picker>) -> Self {
        self.picker = picker;
        self
    }

    /// Id of the most recent render attempt.
    pub const fn render_seq(&self) -> u64 {
        self.render_seq
    }

    /// Start a render attempt: allocate a fresh id for it.
    pub const fn begin_render_attempt(&mut self) -> u64 {
        self.render_seq += 1;
        self.render_seq
    }

    /// Replace the preview state, discarding any cached rasterization so
    /// artifacts of a previous render can never linger on screen.
    pub fn set_preview(&mut self, preview: Preview) {
        self.preview = preview;
        self.protocol = None;
    }

    /// The picker's protocol type, if graphics output is available.
    pub fn picker_protocol_type(&self) -> Option<ProtocolType> {
        self.picker.as_ref().map(Picker::protocol_type)
    }

    /// The cached rasterization with its cell footprint, for the view layer.
    pub fn preview_protocol_mut(&mut self) -> Option<(&mut StatefulProtocol, u16, u16)> {
        self.protocol
            .as_mut()
            .map(|p| (&mut p.protocol, p.width_cols, p.height_rows))
    }

    /// Make sure the cached rasterization matches the current render attempt
    /// and viewport transform, rebuilding it if not.
    ///
    /// Called once per frame before drawing. A rasterization failure demotes
    /// the preview to [`Preview::Failed`].
    pub fn ensure_preview_protocol(&mut self) {
        let svg = match &self.preview {
            Preview::Rendered { svg } => svg.clone(),
            _ => {
                self.protocol = None;
                return;
            }
        };
        let Some(picker) = &self.picker else {
            return;
        };

        let pane_cols = crate::ui::preview_content_width(self.terminal_width);
        // Millis of zoom are plenty of resolution for a cache key.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let zoom_milli = (self.viewport.scale() * 1000.0).round() as u32;
        let stamp = ProtocolStamp {
            seq: self.render_seq,
            zoom_milli,
            pane_cols,
        };
        if self.protocol.as_ref().is_some_and(|p| p.stamp == stamp) {
            return;
        }

        let font_size = picker.font_size();
        let fit_px = f64::from(u32::from(pane_cols) * u32::from(font_size.0));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let target_px =
            ((fit_px * self.viewport.scale()) as u32).clamp(MIN_RASTER_WIDTH_PX, MAX_RASTER_WIDTH_PX);

        tracing::debug!(
            seq = self.render_seq,
            zoom_milli,
            target_px,
            "rasterizing preview"
        );
        match crate::diagram::rasterize_svg(&svg, target_px) {
            Ok(img) => {
                let width_cols = cell_span(img.width(), font_size.0);
                let height_rows = cell_span(img.height(), font_size.1);
                let protocol = picker.new_resize_protocol(img);
                self.protocol = Some(PreviewProtocol {
                    protocol,
                    width_cols,
                    height_rows,
                    stamp,
                });
            }
            Err(err) => {
                tracing::debug!(seq = self.render_seq, error = %err, "rasterization failed");
                self.set_preview(Preview::Failed {
                    message: err.to_string(),
                });
            }
        }
    }

    /// Rows of source text visible in the editor pane.
    pub fn editor_view_rows(&self) -> usize {
        let area = Rect::new(0, 0, self.terminal_width, self.terminal_height);
        let layout = crate::ui::screen_layout(area, self.preview.is_failed());
        usize::from(layout.editor.height.saturating_sub(2))
    }

    /// Clamp the editor scroll to the buffer length.
    pub fn clamp_editor_scroll(&mut self) {
        let max = self.buffer.line_count().saturating_sub(1);
        self.editor_scroll = self.editor_scroll.min(max);
    }
}

/// Cells needed to span `px` pixels at `cell_px` pixels per cell.
fn cell_span(px: u32, cell_px: u16) -> u16 {
    let cell_px = u32::from(cell_px).max(1);
    u16::try_from(px.div_ceil(cell_px)).unwrap_or(u16::MAX).max(1)
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self::new("", (80, 24))
    }
}

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui_image::picker::ProtocolType;
use ratatui_image::{Resize, StatefulImage};

use crate::app::{Model, Pane, Preview};

/// Render the diagram pane: the rasterized preview through the pan/zoom
/// viewport, the failure text, or nothing for a blank source.
pub fn render_preview(model: &mut Model, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Diagram ")
        .borders(Borders::ALL)
        .border_style(super::style::pane_border(model.focus == Pane::Preview));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Preview::Failed { message } = &model.preview {
        render_failure(message, frame, inner);
        return;
    }
    if matches!(model.preview, Preview::Empty) {
        return;
    }
    render_image(model, frame, inner);
}

/// Failure text is shown preformatted inside the pane; the banner under the
/// panes repeats the first line.
fn render_failure(message: &str, frame: &mut Frame, inner: Rect) {
    let text = Paragraph::new(message.to_string())
        .style(super::style::error_text())
        .wrap(Wrap { trim: false });
    frame.render_widget(text, inner);
}

fn render_image(model: &mut Model, frame: &mut Frame, inner: Rect) {
    let (pan_x, pan_y) = model.viewport.pan();
    let halfblocks = model
        .picker_protocol_type()
        .is_some_and(|p| matches!(p, ProtocolType::Halfblocks));

    let Some((protocol, img_w, img_h)) = model.preview_protocol_mut() else {
        let hint = Paragraph::new("rendering unavailable: no terminal graphics support")
            .style(super::style::placeholder());
        frame.render_widget(hint, inner);
        return;
    };

    let pane_w = i32::from(inner.width);
    let pane_h = i32::from(inner.height);
    let img_w_i = i32::from(img_w);
    let img_h_i = i32::from(img_h);

    // Image origin relative to the pane: centered, then shifted by the pan
    // offset. Panning is boundless so the image may sit entirely outside.
    let origin_x = (pane_w - img_w_i) / 2 + pan_x;
    let origin_y = (pane_h - img_h_i) / 2 + pan_y;

    let src_x = (-origin_x).max(0);
    let src_y = (-origin_y).max(0);
    let dst_x = origin_x.max(0);
    let dst_y = origin_y.max(0);
    let vis_w = (img_w_i - src_x).min(pane_w - dst_x);
    let vis_h = (img_h_i - src_y).min(pane_h - dst_y);
    if vis_w <= 0 || vis_h <= 0 {
        return;
    }

    // Render the full image into a temp buffer, then blit the window the
    // viewport exposes. Row-slicing a direct render would fight graphics
    // protocols that anchor the payload in a single cell.
    let temp_area = Rect::new(0, 0, img_w, img_h);
    let mut temp_buf = ratatui::buffer::Buffer::empty(temp_area);
    let resize = if halfblocks {
        // Nearest-neighbor causes strong color aliasing artifacts in half-cell mode.
        Resize::Scale(Some(image::imageops::FilterType::CatmullRom))
    } else {
        Resize::Scale(None)
    };
    let image_widget = StatefulImage::default().resize(resize);
    image_widget.render(temp_area, &mut temp_buf, protocol);

    let frame_buf = frame.buffer_mut();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    for row in 0..vis_h as u16 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        for col in 0..vis_w as u16 {
            let src_cell = &temp_buf[(src_x as u16 + col, src_y as u16 + row)];
            let dst = (inner.x + dst_x as u16 + col, inner.y + dst_y as u16 + row);
            if dst.0 < frame_buf.area.width && dst.1 < frame_buf.area.height {
                frame_buf[dst] = src_cell.clone();
            }
        }
    }
}

//! Diagram rendering.
//!
//! The render-controller seam over the external renderer: diagram source
//! goes in, themed SVG (or a raster image for the terminal) comes out.
//! Parsing and layout are owned entirely by `mermaid-rs-renderer`;
//! rasterization by `resvg`. Nothing here retries or pre-validates — a
//! failure is reported and the next edit tries again.

use std::sync::Arc;

use image::DynamicImage;
use mermaid_rs_renderer::config::LayoutConfig;
use mermaid_rs_renderer::layout::compute_layout;
use mermaid_rs_renderer::parser::parse_mermaid;
use mermaid_rs_renderer::render::render_svg;
use resvg::usvg::fontdb;
use thiserror::Error;

use crate::theme::diagram_theme;

/// The diagram every session starts from.
pub const EXAMPLE_DIAGRAM: &str = "\
graph TD
    subgraph User Interaction
        FE[Frontend UI]
    end

    subgraph Backend System
        API[Backend Services]
        Cache[Redis Cache]
        DB[Postgres DB]
        Queue[Kafka Queue]
        Workers[Async Workers]
    end

    FE -- GET /events --> API
    API -- check cache --> Cache
    Cache -- hit --> API
    API -- miss --> DB
    DB -- events --> API
    API -- results --> FE

    FE -- POST /orders --> API
    API -- lock seats --> Cache
    API -- create order --> DB
    API -- publish --> Queue
    Queue -- order events --> Workers
";

/// A failed render attempt.
///
/// The `Display` text of a variant is exactly what the UI shows the user.
#[derive(Debug, Error)]
pub enum DiagramError {
    /// The renderer rejected the diagram source.
    #[error("{0}")]
    Render(String),
    /// The generated SVG could not be rasterized.
    #[error("rasterize failed: {0}")]
    Rasterize(String),
}

/// Render mermaid diagram source to a themed SVG string.
///
/// # Errors
///
/// Returns [`DiagramError::Render`] if the renderer rejects the source.
pub fn render_to_svg(source: &str) -> Result<String, DiagramError> {
    let parsed = parse_mermaid(source).map_err(|e| DiagramError::Render(e.to_string()))?;
    let theme = diagram_theme();
    let layout_config = LayoutConfig::default();
    let laid_out = compute_layout(&parsed.graph, theme, &layout_config);
    Ok(render_svg(&laid_out, theme, &layout_config))
}

/// Render mermaid diagram source to a raster image.
///
/// The SVG is rasterized directly at `target_width_px` so the terminal
/// never has to upscale a small bitmap.
///
/// # Errors
///
/// Returns an error if the source cannot be rendered or the SVG cannot
/// be rasterized.
pub fn render_to_image(source: &str, target_width_px: u32) -> Result<DynamicImage, DiagramError> {
    let svg = render_to_svg(source)?;
    rasterize_svg(&svg, target_width_px)
}

/// Rasterize an SVG string to a `DynamicImage`.
///
/// Scales the SVG so its width matches `target_width_px`, preserving the
/// aspect ratio.
///
/// # Errors
///
/// Returns [`DiagramError::Rasterize`] if the SVG cannot be parsed or the
/// target pixmap cannot be allocated.
pub fn rasterize_svg(svg: &str, target_width_px: u32) -> Result<DynamicImage, DiagramError> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let opts = resvg::usvg::Options {
        fontdb: Arc::new(db),
        ..Default::default()
    };

    let tree = resvg::usvg::Tree::from_str(svg, &opts)
        .map_err(|e| DiagramError::Rasterize(e.to_string()))?;
    let size = tree.size();

    let scale = target_width_px as f32 / size.width();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let width = ((size.width() * scale).ceil() as u32).max(1);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let height = ((size.height() * scale).ceil() as u32).max(1);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| DiagramError::Rasterize(format!("cannot allocate pixmap {width}x{height}")))?;

    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    let rgba = pixmap.data().to_vec();
    let img_buf = image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| DiagramError::Rasterize("pixmap data did not form an image".to_string()))?;

    Ok(DynamicImage::ImageRgba8(img_buf))
}

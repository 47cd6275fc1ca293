//! One-time diagram theme configuration.
//!
//! The renderer is handed a single fixed theme: dark "ink" strokes and text
//! on an eggshell paper background, thin lines, a quiet pen-on-paper look.
//! The theme is built lazily, exactly once per process, the first time the
//! render path touches it.

use mermaid_rs_renderer::theme::Theme;
use once_cell::sync::Lazy;

/// Stroke, line and text color.
pub const INK: &str = "#424242";
/// Background fill for nodes, clusters, notes and labels.
pub const EGGSHELL: &str = "#F8F6F0";

static DIAGRAM_THEME: Lazy<Theme> = Lazy::new(|| {
    let mut theme = Theme::mermaid_default();
    theme.font_family = "Helvetica, Arial, sans-serif".to_string();
    theme.font_size = 14.0;
    theme.primary_color = EGGSHELL.to_string();
    theme.primary_text_color = INK.to_string();
    theme.primary_border_color = INK.to_string();
    theme.line_color = INK.to_string();
    theme.secondary_color = EGGSHELL.to_string();
    theme.tertiary_color = EGGSHELL.to_string();
    theme.edge_label_background = EGGSHELL.to_string();
    theme.cluster_background = EGGSHELL.to_string();
    theme.cluster_border = INK.to_string();
    theme.background = EGGSHELL.to_string();
    theme
});

/// The application's diagram theme.
///
/// Initialized on first use and shared for the process lifetime; repeated
/// calls return the same configuration.
pub fn diagram_theme() -> &'static Theme {
    &DIAGRAM_THEME
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_uses_ink_on_eggshell() {
        let theme = diagram_theme();
        assert_eq!(theme.line_color, INK);
        assert_eq!(theme.primary_text_color, INK);
        assert_eq!(theme.primary_color, EGGSHELL);
        assert_eq!(theme.background, EGGSHELL);
    }

    #[test]
    fn test_theme_is_stable_across_calls() {
        let first = diagram_theme() as *const Theme;
        let second = diagram_theme() as *const Theme;
        assert_eq!(first, second);
    }
}

/// Ghost text for inline suggestion previews
///
/// Ghost text shows one suggested continuation right after the cursor in a
/// lighter style, so the user sees what will be inserted before accepting it.
use cphrase_completion::GhostTextStyle;
use serde::{Deserialize, Serialize};

/// Inline preview anchored at a cursor offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhostText {
    /// Text to preview
    pub text: String,
    /// Character offset the preview is attached to
    pub anchor: usize,
}

impl GhostText {
    pub fn new(text: String, anchor: usize) -> Self {
        Self { text, anchor }
    }

    /// Number of lines the preview spans
    pub fn line_count(&self) -> usize {
        self.text.lines().count().max(1)
    }
}

/// Font style of an inline decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Italic,
}

/// What the host needs to draw a ghost-text decoration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationSpec {
    /// Text drawn after the anchor
    pub content_text: String,
    /// CSS color
    pub color: String,
    /// Font style
    pub font_style: FontStyle,
}

/// Build the decoration for `ghost` in the given style
pub fn decoration_for(ghost: &GhostText, style: GhostTextStyle) -> DecorationSpec {
    let (color, font_style) = match style {
        GhostTextStyle::Italic => ("rgba(128, 128, 128, 0.7)", FontStyle::Italic),
        GhostTextStyle::Faded => ("rgba(128, 128, 128, 0.7)", FontStyle::Normal),
        GhostTextStyle::Dimmed => ("rgba(128, 128, 128, 0.4)", FontStyle::Normal),
    };

    DecorationSpec {
        content_text: ghost.text.clone(),
        color: color.to_string(),
        font_style,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoration_italic() {
        let ghost = GhostText::new("printf();".to_string(), 4);
        let spec = decoration_for(&ghost, GhostTextStyle::Italic);

        assert_eq!(spec.content_text, "printf();");
        assert_eq!(spec.font_style, FontStyle::Italic);
        assert_eq!(spec.color, "rgba(128, 128, 128, 0.7)");
    }

    #[test]
    fn test_decoration_dimmed() {
        let ghost = GhostText::new("x".to_string(), 0);
        let spec = decoration_for(&ghost, GhostTextStyle::Dimmed);
        assert_eq!(spec.font_style, FontStyle::Normal);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(GhostText::new(String::new(), 0).line_count(), 1);
        assert_eq!(GhostText::new("a\nb\nc".to_string(), 0).line_count(), 3);
    }
}

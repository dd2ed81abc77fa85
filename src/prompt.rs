use crate::ansi::{self, ColorToken, RESET, Style};
use crate::layout::Geometry;

/// Columns between the panel's left edge and where prompts start: the side
/// glyph plus its gap.
pub const INPUT_INSET: usize = 2;

/// Styling of an inline prompt: how the question is drawn and how the
/// user's typing is drawn after it. Unset colors emit no escape at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptStyle {
    pub text_color: Option<ColorToken>,
    pub text_style: Option<Style>,
    pub input_color: Option<ColorToken>,
    pub input_style: Option<Style>,
    pub indent: usize,
}

impl PromptStyle {
    pub fn text(mut self, color: ColorToken) -> Self {
        self.text_color = Some(color);
        self
    }

    pub fn text_style(mut self, style: Style) -> Self {
        self.text_style = Some(style);
        self
    }

    pub fn input(mut self, color: ColorToken) -> Self {
        self.input_color = Some(color);
        self
    }

    pub fn input_style(mut self, style: Style) -> Self {
        self.input_style = Some(style);
        self
    }

    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

fn color_code(color: Option<ColorToken>) -> String {
    color.map(ColorToken::foreground).unwrap_or_default()
}

/// The line shown in front of the cursor. It ends with the input styling
/// still open so the echoed input picks it up; the caller resets afterwards.
pub fn prefix(text: &str, style: &PromptStyle, geometry: &Geometry) -> String {
    format!(
        "{lead}{text_color}{text_style}{text}{reset}{input_color}{input_style}",
        lead = " ".repeat(geometry.offset() + INPUT_INSET + style.indent),
        text_color = color_code(style.text_color),
        text_style = ansi::style_code(style.text_style),
        reset = RESET,
        input_color = color_code(style.input_color),
        input_style = ansi::style_code(style.input_style),
    )
}

//! Text layout: greedy word wrap under a visible-width budget and the
//! bordered row formatting used for every panel line.

use crate::ansi::{self, Alignment, ColorToken, RESET, Style};

/// Glyph on both sides of a text row and of non-heavy dividers.
pub const SIDE_GLYPH: char = '|';
/// Corner glyph closing a heavy divider.
pub const CORNER_GLYPH: char = '+';
/// Fill character of a heavy (bordering) divider.
pub const HEAVY_FILL: char = '-';
/// Columns reserved outside the content area: two border glyphs plus two gaps.
pub const FRAME_WIDTH: usize = 4;

/// Terminal size and the content width derived from it for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub terminal_width: u16,
    pub terminal_height: u16,
    pub content_width: usize,
}

impl Geometry {
    /// Content width is the terminal width minus the gutter, never below 1.
    pub fn measure((columns, rows): (u16, u16), gutter: usize) -> Self {
        Self {
            terminal_width: columns,
            terminal_height: rows,
            content_width: (columns as usize).saturating_sub(gutter).max(1),
        }
    }

    /// Left indent that centers the panel block horizontally.
    pub fn offset(&self) -> usize {
        (self.terminal_width as usize).saturating_sub(self.content_width) / 2
    }
}

/// Color, attribute and alignment of a text row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub color: ColorToken,
    pub style: Option<Style>,
    pub alignment: Alignment,
}

impl TextStyle {
    pub fn new(color: ColorToken) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Greedily packs whitespace-separated words into lines whose visible width
/// stays below `width`. A word that is wider than `width` by itself gets a
/// line of its own and is never split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut words = text.split_whitespace();

    let Some(first) = words.next() else {
        return vec![String::new()];
    };

    let mut lines = Vec::new();
    let mut current = first.to_string();
    let mut current_width = ansi::visible_width(first);

    for word in words {
        let word_width = ansi::visible_width(word);
        if current_width + 1 + word_width < width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_width = word_width;
        }
    }
    lines.push(current);
    lines
}

/// Splits `padding` into (left, right) spaces for the given alignment.
/// Center puts the odd extra space on the right.
pub fn split_padding(alignment: Alignment, padding: usize) -> (usize, usize) {
    match alignment {
        Alignment::Left => (0, padding),
        Alignment::Right => (padding, 0),
        Alignment::Center => {
            let left = padding / 2;
            (left, padding - left)
        }
    }
}

/// Builds one bordered row:
/// `|<gap><left pad><styled text><reset><right pad><gap>|`
///
/// Padding is measured on the visible width, so embedded escapes in `text`
/// do not shift the right border. Text wider than `width` gets no padding;
/// callers wrap first.
pub fn format_line(text: &str, width: usize, look: &TextStyle, gap: char) -> String {
    let border = ColorToken::Border.foreground();
    let padding = width.saturating_sub(ansi::visible_width(text));
    let (left, right) = split_padding(look.alignment, padding);

    let mut row = String::with_capacity(text.len() + width + 64);
    row.push_str(&border);
    row.push(SIDE_GLYPH);
    row.push(gap);
    row.push_str(&" ".repeat(left));
    row.push_str(&look.color.foreground());
    row.push_str(&ansi::style_code(look.style));
    row.push_str(text);
    row.push_str(RESET);
    row.push_str(&" ".repeat(right));
    row.push_str(&border);
    row.push(gap);
    row.push(SIDE_GLYPH);
    row.push_str(RESET);
    row
}

/// Builds a divider row filled with `fill`. Heavy dividers (`-`) close with
/// `+` corners, every other fill keeps the `|` sides.
pub fn format_divider(width: usize, fill: char, color: ColorToken) -> String {
    let border = ColorToken::Border.foreground();
    let corner = if fill == HEAVY_FILL { CORNER_GLYPH } else { SIDE_GLYPH };
    let run: String = std::iter::repeat(fill).take(width).collect();

    format!(
        "{border}{corner}{fill}{color}{run}{border}{fill}{corner}{reset}",
        color = color.foreground(),
        reset = RESET,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::{strip_codes, visible_width};

    const SAMPLE: &str = "the quick brown fox jumps over the lazy dog while \
                          the modloader reflows every line to the terminal width";

    #[test]
    fn test_wrap_respects_width() {
        for width in 5..40 {
            for line in wrap(SAMPLE, width) {
                let fits = visible_width(&line) <= width;
                let lone_word = !line.contains(' ');
                assert!(fits || lone_word, "{:?} wider than {}", line, width);
            }
        }
    }

    #[test]
    fn test_wrap_keeps_long_word_whole() {
        let lines = wrap("a supercalifragilistic b", 6);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_wrap_measures_visible_width() {
        let red = ColorToken::Error.foreground();
        let text = format!("{red}aaa{reset} {red}bbb{reset} ccc", reset = RESET);
        let lines = wrap(&text, 8);
        assert_eq!(lines.len(), 2);
        assert_eq!(strip_codes(&lines[0]), "aaa bbb");
        assert_eq!(lines[1], "ccc");
    }

    #[test]
    fn test_wrap_empty_input() {
        assert_eq!(wrap("", 10), vec![String::new()]);
        assert_eq!(wrap("   \t ", 10), vec![String::new()]);
        assert_eq!(wrap("single", 0), vec!["single".to_string()]);
    }

    #[test]
    fn test_wrap_preserves_word_order() {
        let joined = wrap(SAMPLE, 12).join(" ");
        assert_eq!(joined, SAMPLE.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_format_line_width_for_every_alignment() {
        let styled = format!("{}hi there{}", ColorToken::Accent.foreground(), RESET);
        for alignment in [Alignment::Left, Alignment::Right, Alignment::Center] {
            let look = TextStyle::new(ColorToken::Text)
                .with_style(Style::Italic)
                .aligned(alignment);
            for width in [8, 9, 20, 31] {
                let row = format_line(&styled, width, &look, ' ');
                assert_eq!(visible_width(&row), width + FRAME_WIDTH);
            }
        }
    }

    #[test]
    fn test_format_line_alignment_placement() {
        let look = TextStyle::default();
        let left = strip_codes(&format_line("ab", 5, &look, ' ')).into_owned();
        assert_eq!(left, "| ab    |");

        let right = strip_codes(&format_line("ab", 5, &look.aligned(Alignment::Right), ' ')).into_owned();
        assert_eq!(right, "|    ab |");

        let center = strip_codes(&format_line("ab", 5, &look.aligned(Alignment::Center), ' ')).into_owned();
        assert_eq!(center, "|  ab   |");
    }

    #[test]
    fn test_center_padding_extra_goes_right() {
        for padding in 0..50 {
            let (left, right) = split_padding(Alignment::Center, padding);
            assert_eq!(left + right, padding);
            assert!(right - left <= 1);
        }
        assert_eq!(split_padding(Alignment::Left, 7), (0, 7));
        assert_eq!(split_padding(Alignment::Right, 7), (7, 0));
    }

    #[test]
    fn test_format_line_overflow_has_no_padding() {
        let row = format_line("abcdefgh", 4, &TextStyle::default(), ' ');
        assert_eq!(strip_codes(&row), "| abcdefgh |");
    }

    #[test]
    fn test_format_divider_glyphs() {
        let heavy = format_divider(3, HEAVY_FILL, ColorToken::Border);
        assert_eq!(strip_codes(&heavy), "+-----+");

        let blank = format_divider(3, ' ', ColorToken::Border);
        assert_eq!(strip_codes(&blank), "|     |");
        assert_eq!(visible_width(&blank), 3 + FRAME_WIDTH);
    }

    #[test]
    fn test_geometry_floor_and_offset() {
        let narrow = Geometry::measure((30, 10), 48);
        assert_eq!(narrow.content_width, 1);
        assert_eq!(narrow.offset(), 14);

        let wide = Geometry::measure((120, 40), 48);
        assert_eq!(wide.content_width, 72);
        assert_eq!(wide.offset(), 24);
    }
}

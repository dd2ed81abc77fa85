//! Escape-code helpers: semantic color and style tokens, and the
//! measurement side (stripping escapes to get the visible width).
//!
//! Everything here returns plain `String`s so callers compose styling by
//! concatenation. No terminal state is touched.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crossterm::style::{Attribute, Color, SetAttribute, SetForegroundColor};
use lazy_static::lazy_static;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_width::UnicodeWidthStr;

use crate::error::Error;

/// Resets every color and attribute.
pub const RESET: &str = "\x1b[0m";

pub static PALETTE: Lazy<Palette> = Lazy::new(Palette::new);

lazy_static! {
    // CSI sequences (colors, cursor movement) and OSC sequences terminated by BEL or ST.
    static ref ESCAPE_RE: Regex = Regex::new(
        r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)"
    ).expect("escape sequence pattern is valid");
}

/// RGB values behind the named color tokens.
pub struct Palette {
    border: (u8, u8, u8),
    title: (u8, u8, u8),
    section_title: (u8, u8, u8),
    text: (u8, u8, u8),
    muted: (u8, u8, u8),
    accent: (u8, u8, u8),
    success: (u8, u8, u8),
    warning: (u8, u8, u8),
    error: (u8, u8, u8),
}

impl Palette {
    fn new() -> Self {
        Self {
            border: (0x58, 0x58, 0x58),
            title: (0x00, 0xa2, 0xff),
            section_title: (0xff, 0xff, 0xff),
            text: (0xd4, 0xd4, 0xd4),
            muted: (0x80, 0x80, 0x80),
            accent: (0x3d, 0xc9, 0xb0),
            success: (0x6a, 0xd1, 0x6a),
            warning: (0xe5, 0xc0, 0x7b),
            error: (0xf0, 0x55, 0x55),
        }
    }
}

/// A semantic foreground/background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorToken {
    /// The terminal's own default color.
    #[default]
    Default,
    Border,
    Title,
    SectionTitle,
    Text,
    Muted,
    Accent,
    Success,
    Warning,
    Error,
    Rgb(u8, u8, u8),
}

impl ColorToken {
    /// Resolved RGB triple, `None` for [`ColorToken::Default`].
    pub fn rgb(self) -> Option<(u8, u8, u8)> {
        let p = &*PALETTE;
        match self {
            ColorToken::Default => None,
            ColorToken::Border => Some(p.border),
            ColorToken::Title => Some(p.title),
            ColorToken::SectionTitle => Some(p.section_title),
            ColorToken::Text => Some(p.text),
            ColorToken::Muted => Some(p.muted),
            ColorToken::Accent => Some(p.accent),
            ColorToken::Success => Some(p.success),
            ColorToken::Warning => Some(p.warning),
            ColorToken::Error => Some(p.error),
            ColorToken::Rgb(r, g, b) => Some((r, g, b)),
        }
    }

    /// Foreground escape sequence. `Default` switches back to the terminal
    /// foreground so text never inherits the border color around it.
    pub fn foreground(self) -> String {
        let color = match self.rgb() {
            Some((r, g, b)) => Color::Rgb { r, g, b },
            None => Color::Reset,
        };
        SetForegroundColor(color).to_string()
    }

    /// `#rrggbb` form, `None` for `Default`.
    pub fn hex(self) -> Option<String> {
        self.rgb()
            .map(|(r, g, b)| format!("#{:02x}{:02x}{:02x}", r, g, b))
    }
}

impl FromStr for ColorToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if let Some(hex) = raw.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| Error::InvalidColor(s.to_string()));
        }
        match raw.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "" | "default" => Ok(ColorToken::Default),
            "border" => Ok(ColorToken::Border),
            "title" => Ok(ColorToken::Title),
            "section_title" => Ok(ColorToken::SectionTitle),
            "text" => Ok(ColorToken::Text),
            "muted" => Ok(ColorToken::Muted),
            "accent" => Ok(ColorToken::Accent),
            "success" => Ok(ColorToken::Success),
            "warning" => Ok(ColorToken::Warning),
            "error" => Ok(ColorToken::Error),
            _ => Err(Error::InvalidColor(s.to_string())),
        }
    }
}

fn parse_hex(hex: &str) -> Option<ColorToken> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(ColorToken::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Shorthand for [`ColorToken::foreground`].
pub fn foreground(token: ColorToken) -> String {
    token.foreground()
}

/// OSC 11 sequence that changes the terminal's default background for the
/// rest of the session. Empty for `Default`.
pub fn background_sequence(token: ColorToken) -> String {
    match token.hex() {
        Some(hex) => format!("\x1b]11;{}\x07", hex),
        None => String::new(),
    }
}

/// Text attribute applied on top of a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Bold,
    Italic,
    Underline,
    DoubleUnderline,
    Overline,
    Strikethrough,
    Hidden,
    Dim,
    Blink,
}

impl Style {
    fn attribute(self) -> Attribute {
        match self {
            Style::Bold => Attribute::Bold,
            Style::Italic => Attribute::Italic,
            Style::Underline => Attribute::Underlined,
            Style::DoubleUnderline => Attribute::DoubleUnderlined,
            Style::Overline => Attribute::OverLined,
            Style::Strikethrough => Attribute::CrossedOut,
            Style::Hidden => Attribute::Hidden,
            Style::Dim => Attribute::Dim,
            Style::Blink => Attribute::SlowBlink,
        }
    }

    pub fn code(self) -> String {
        SetAttribute(self.attribute()).to_string()
    }
}

impl FromStr for Style {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "bold" => Ok(Style::Bold),
            "italic" => Ok(Style::Italic),
            "underline" => Ok(Style::Underline),
            "double_underline" => Ok(Style::DoubleUnderline),
            "overline" => Ok(Style::Overline),
            "strikethrough" => Ok(Style::Strikethrough),
            "hidden" => Ok(Style::Hidden),
            "dim" => Ok(Style::Dim),
            "blink" => Ok(Style::Blink),
            _ => Err(Error::UnknownStyle(s.to_string())),
        }
    }
}

/// Escape sequence for an optional style; no style means no sequence.
pub fn style_code(style: Option<Style>) -> String {
    style.map(Style::code).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
    Center,
}

impl FromStr for Alignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "right" => Ok(Alignment::Right),
            "center" | "centre" => Ok(Alignment::Center),
            _ => Err(Error::UnknownAlignment(s.to_string())),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Center => "center",
        };
        f.write_str(name)
    }
}

/// Removes escape sequences. Only for measuring; never print the result
/// in place of the original.
pub fn strip_codes(text: &str) -> Cow<'_, str> {
    ESCAPE_RE.replace_all(text, "")
}

/// Columns the text occupies once escape sequences are removed.
pub fn visible_width(text: &str) -> usize {
    UnicodeWidthStr::width(strip_codes(text).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STYLES: [Style; 9] = [
        Style::Bold,
        Style::Italic,
        Style::Underline,
        Style::DoubleUnderline,
        Style::Overline,
        Style::Strikethrough,
        Style::Hidden,
        Style::Dim,
        Style::Blink,
    ];

    #[test]
    fn test_strip_codes_round_trips_styling() {
        let text = "Grüße, 世界 -- plain";
        for style in ALL_STYLES {
            let styled = format!("{}{}{}", ColorToken::Accent.foreground(), style.code(), text);
            assert_eq!(strip_codes(&styled), text);
        }
        let styled = format!("{}{}{}", ColorToken::Default.foreground(), text, RESET);
        assert_eq!(strip_codes(&styled), text);
    }

    #[test]
    fn test_strip_codes_removes_osc_background() {
        let text = format!("{}hello", background_sequence(ColorToken::Rgb(0x1f, 0x1f, 0x1f)));
        assert_eq!(strip_codes(&text), "hello");
    }

    #[test]
    fn test_strip_codes_leaves_plain_text_untouched() {
        let text = "no [escapes] here; 1;2m";
        assert_eq!(strip_codes(text), text);
    }

    #[test]
    fn test_visible_width_ignores_escapes() {
        let styled = format!("{}abc{}", ColorToken::Error.foreground(), RESET);
        assert_eq!(visible_width(&styled), 3);
        assert_eq!(visible_width("日本"), 4);
    }

    #[test]
    fn test_foreground_sequences() {
        assert_eq!(ColorToken::Rgb(1, 2, 3).foreground(), "\x1b[38;2;1;2;3m");
        assert_eq!(ColorToken::Default.foreground(), "\x1b[39m");
        assert_eq!(style_code(None), "");
        assert_eq!(Style::Bold.code(), "\x1b[1m");
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!("#1f1f1f".parse::<ColorToken>().unwrap(), ColorToken::Rgb(0x1f, 0x1f, 0x1f));
        assert_eq!("section-title".parse::<ColorToken>().unwrap(), ColorToken::SectionTitle);
        assert!("#12345".parse::<ColorToken>().is_err());
        assert!("chartreuse".parse::<ColorToken>().is_err());
        assert_eq!("Double Underline".parse::<Style>().unwrap(), Style::DoubleUnderline);
        assert!("wavy".parse::<Style>().is_err());
        assert_eq!("CENTER".parse::<Alignment>().unwrap(), Alignment::Center);
        assert!("justify".parse::<Alignment>().is_err());
    }

    #[test]
    fn test_hex_round_trip() {
        let token = ColorToken::Rgb(0xab, 0x01, 0xff);
        assert_eq!(token.hex().as_deref(), Some("#ab01ff"));
        assert_eq!(ColorToken::Default.hex(), None);
    }
}

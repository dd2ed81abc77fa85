//! Panel document model and the auto-rendering [`Panel`].
//!
//! A document is a structural prefix (title block, section title, optional
//! section description, closing dividers) followed by the lines a caller
//! adds. The prefix lives in named slots so that resetting the body or
//! swapping the description never depends on positional offsets.
//!
//! Layout of the prefix, top to bottom:
//!
//! ```text
//! +---------------+   top border
//! | Kliko's ...   |   name
//! | Version: x    |   version
//! +---------------+   border
//! |               |   blank
//! | Section       |   section title
//! | Description   |   description (optional)
//! |               |   blank
//! +---------------+   bottom border
//! ```

use crate::ansi::{self, Alignment, ColorToken, Style};
use crate::backend::{Backend, ConsoleBackend};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::layout::{Geometry, HEAVY_FILL, TextStyle};
use crate::logging::DebugLogger;
use crate::meta;
use crate::prompt::{self, PromptStyle};
use crate::render;

/// Number of structural records in front of the body without a description.
pub const PREFIX_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    pub content: String,
    pub look: TextStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DividerRecord {
    pub fill: char,
    pub color: ColorToken,
}

/// One row (or, once wrapped, several rows) of a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Text(TextRecord),
    Divider(DividerRecord),
}

impl Record {
    pub fn text(content: impl Into<String>, look: TextStyle) -> Self {
        Record::Text(TextRecord {
            content: content.into(),
            look,
        })
    }

    pub fn divider(fill: char) -> Self {
        Record::Divider(DividerRecord {
            fill,
            color: ColorToken::Border,
        })
    }

    /// Heavy divider drawn with `+` corners.
    pub fn border() -> Self {
        Self::divider(HEAVY_FILL)
    }

    /// Empty row between the side borders.
    pub fn blank() -> Self {
        Self::divider(' ')
    }

    pub fn is_divider(&self) -> bool {
        matches!(self, Record::Divider(_))
    }
}

/// Section heading of a panel and how it is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub description: Option<String>,
    pub look: TextStyle,
    /// Terminal background for the panel's session; the settings' background
    /// when `None`.
    pub background: Option<ColorToken>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            look: TextStyle::new(ColorToken::SectionTitle),
            background: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: ColorToken) -> Self {
        self.look.color = color;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.look.style = Some(style);
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.look.alignment = alignment;
        self
    }

    pub fn background(mut self, background: ColorToken) -> Self {
        self.background = Some(background);
        self
    }
}

/// Ordered panel content, kept in named slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    header: Vec<Record>,
    // Always `Record::Text`; kept as a record so rendering can borrow it.
    section_title: Record,
    description: Option<Record>,
    closing: [Record; 2],
    body: Vec<Record>,
}

impl Document {
    pub fn new(section: &Section) -> Self {
        let title_look = TextStyle::new(ColorToken::Title);
        Self {
            header: vec![
                Record::border(),
                Record::text(meta::NAME, title_look),
                Record::text(format!("Version: {}", meta::VERSION), title_look),
                Record::border(),
                Record::blank(),
            ],
            section_title: Record::text(section.title.clone(), section.look),
            description: section
                .description
                .as_ref()
                .map(|description| Record::text(description.clone(), section.look)),
            closing: [Record::blank(), Record::border()],
            body: Vec::new(),
        }
    }

    /// All records in render order.
    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.header
            .iter()
            .chain(std::iter::once(&self.section_title))
            .chain(self.description.iter())
            .chain(self.closing.iter())
            .chain(self.body.iter())
    }

    pub fn len(&self) -> usize {
        self.prefix_len() + self.body.len()
    }

    /// Length of the structural prefix: 8, or 9 with a description.
    pub fn prefix_len(&self) -> usize {
        PREFIX_LEN + usize::from(self.description.is_some())
    }

    /// Color, style and alignment of the section title.
    pub fn section_look(&self) -> TextStyle {
        match &self.section_title {
            Record::Text(text) => text.look,
            Record::Divider(_) => TextStyle::new(ColorToken::SectionTitle),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match &self.description {
            Some(Record::Text(text)) => Some(&text.content),
            _ => None,
        }
    }

    /// Records added after the structural prefix.
    pub fn body(&self) -> &[Record] {
        &self.body
    }

    pub fn push(&mut self, record: Record) {
        self.body.push(record);
    }

    /// Pops `count` body records. The structural prefix is never touched:
    /// asking for more than the body holds fails and changes nothing.
    pub fn remove_last(&mut self, count: usize) -> Result<()> {
        let available = self.body.len();
        if count > available {
            return Err(Error::Underflow {
                requested: count,
                available,
            });
        }
        self.body.truncate(available - count);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.body.clear();
    }

    /// Replaces the description slot. The new description takes the section
    /// title's color, style and alignment; `None` drops the slot.
    pub fn set_description(&mut self, description: Option<String>) {
        let look = self.section_look();
        self.description = description.map(|content| Record::text(content, look));
    }
}

/// A document bound to a terminal. Every mutation repaints the whole panel
/// before returning.
pub struct Panel<B: Backend = ConsoleBackend> {
    backend: B,
    document: Document,
    gutter: usize,
    logger: DebugLogger,
    geometry: Geometry,
}

impl Panel<ConsoleBackend> {
    /// Opens a panel on the process terminal.
    pub fn console(settings: &Settings, section: Section) -> Result<Self> {
        Self::open(ConsoleBackend::new(), settings, section)
    }
}

impl<B: Backend> Panel<B> {
    /// Builds the structural prefix for `section`, applies the terminal
    /// background and draws the panel once.
    pub fn open(backend: B, settings: &Settings, section: Section) -> Result<Self> {
        let background = section
            .background
            .unwrap_or_else(|| settings.background_token());
        let document = Document::new(&section);
        let mut panel = Self {
            backend,
            document,
            gutter: settings.gutter,
            logger: settings.logger(),
            geometry: Geometry::measure((0, 0), settings.gutter),
        };

        panel.backend.write_raw(&ansi::background_sequence(background))?;
        panel.refresh()?;
        Ok(panel)
    }

    /// Repaints from scratch at the current terminal size.
    pub fn refresh(&mut self) -> Result<()> {
        self.geometry = render::render(&mut self.backend, &self.document, self.gutter, &self.logger)?;
        Ok(())
    }

    pub fn add_record(&mut self, record: Record) -> Result<()> {
        self.document.push(record);
        self.refresh()
    }

    pub fn add_line(&mut self, text: impl Into<String>, look: TextStyle) -> Result<()> {
        self.add_record(Record::text(text, look))
    }

    /// Plain line in the terminal's default color, left aligned.
    pub fn add_text(&mut self, text: impl Into<String>) -> Result<()> {
        self.add_line(text, TextStyle::default())
    }

    /// Divider filled with `fill` (`' '` for a blank row, `'-'` for a border).
    pub fn add_fill_divider(&mut self, fill: char) -> Result<()> {
        self.add_record(Record::divider(fill))
    }

    pub fn add_divider(&mut self) -> Result<()> {
        self.add_record(Record::border())
    }

    /// Removes the last `count` added lines. Fails with
    /// [`Error::Underflow`] when fewer lines were added; the title block and
    /// section rows are never removed.
    pub fn remove_last(&mut self, count: usize) -> Result<()> {
        self.document.remove_last(count)?;
        self.refresh()
    }

    /// Drops every added line, keeping the structural prefix.
    pub fn reset(&mut self) -> Result<()> {
        self.document.reset();
        self.refresh()
    }

    pub fn change_section_description(&mut self, description: Option<&str>) -> Result<()> {
        self.document.set_description(description.map(str::to_string));
        self.refresh()
    }

    /// Shows `text` inside the panel's left border and blocks until the user
    /// submits a line. The line is returned exactly as typed.
    pub fn prompt(&mut self, text: &str, style: &PromptStyle) -> Result<String> {
        let geometry = Geometry::measure(self.backend.size()?, self.gutter);
        let prefix = prompt::prefix(text, style, &geometry);

        let answer = self.backend.read_line(&prefix);
        self.backend.write_raw(ansi::RESET)?;
        answer
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn len(&self) -> usize {
        self.document.len()
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.document.records()
    }

    /// Geometry of the most recent render.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::strip_codes;
    use crate::backend::MemoryBackend;

    fn open(section: Section) -> Panel<MemoryBackend> {
        Panel::open(MemoryBackend::new(100, 40), &Settings::default(), section).unwrap()
    }

    fn frame_text(panel: &Panel<MemoryBackend>) -> Vec<String> {
        panel
            .backend()
            .last_frame()
            .iter()
            .map(|line| strip_codes(line).into_owned())
            .collect()
    }

    #[test]
    fn test_structural_prefix_without_description() {
        let panel = open(Section::new("X"));
        assert_eq!(panel.len(), 8);

        let kinds: Vec<bool> = panel.records().map(Record::is_divider).collect();
        assert_eq!(kinds, [true, false, false, true, true, false, true, true]);
        assert_eq!(panel.backend().frames().len(), 1);
    }

    #[test]
    fn test_structural_prefix_with_description() {
        let panel = open(Section::new("X").with_description("Y"));
        assert_eq!(panel.len(), 9);

        let records: Vec<&Record> = panel.records().collect();
        match records[6] {
            Record::Text(text) => assert_eq!(text.content, "Y"),
            other => panic!("expected description, got {:?}", other),
        }
        assert!(records[7].is_divider());
        assert!(records[8].is_divider());
    }

    #[test]
    fn test_title_block_uses_metadata() {
        let panel = open(Section::new("Mods"));
        let frame = frame_text(&panel);
        assert!(frame[1].contains(meta::NAME));
        assert!(frame[2].contains(&format!("Version: {}", meta::VERSION)));
        assert!(frame[5].contains("Mods"));
        assert!(frame[0].trim().starts_with('+'));
    }

    #[test]
    fn test_reset_keeps_prefix() {
        let mut panel = open(Section::new("X"));
        panel.add_text("a").unwrap();
        panel.add_divider().unwrap();
        panel.add_fill_divider('=').unwrap();
        assert_eq!(panel.len(), 11);
        panel.reset().unwrap();
        assert_eq!(panel.len(), 8);

        let mut panel = open(Section::new("X").with_description("Y"));
        panel.add_text("a").unwrap();
        panel.reset().unwrap();
        assert_eq!(panel.len(), 9);
        assert_eq!(panel.document().description(), Some("Y"));
    }

    #[test]
    fn test_every_mutation_repaints() {
        let mut panel = open(Section::new("X"));
        panel.add_text("a").unwrap();
        panel.add_line("b", TextStyle::new(ColorToken::Accent)).unwrap();
        panel.remove_last(1).unwrap();
        panel.change_section_description(Some("d")).unwrap();
        panel.reset().unwrap();
        assert_eq!(panel.backend().frames().len(), 6);
    }

    #[test]
    fn test_change_section_description_round_trip() {
        let mut panel = open(Section::new("X").color(ColorToken::Warning).style(Style::Bold).alignment(Alignment::Center));
        panel.add_text("body").unwrap();

        panel.change_section_description(Some("desc")).unwrap();
        assert_eq!(panel.len(), 10);
        let records: Vec<&Record> = panel.records().collect();
        match records[6] {
            Record::Text(text) => {
                assert_eq!(text.content, "desc");
                assert_eq!(text.look, panel.document().section_look());
                assert_eq!(text.look.alignment, Alignment::Center);
            }
            other => panic!("expected description, got {:?}", other),
        }
        assert!(records[7].is_divider());
        assert!(records[8].is_divider());

        panel.change_section_description(Some("other")).unwrap();
        assert_eq!(panel.len(), 10);
        assert_eq!(panel.document().description(), Some("other"));

        panel.change_section_description(None).unwrap();
        assert_eq!(panel.len(), 9);
        panel.reset().unwrap();
        assert_eq!(panel.len(), 8);
    }

    #[test]
    fn test_remove_last_underflow_is_guarded() {
        let mut panel = open(Section::new("X"));
        panel.add_text("a").unwrap();
        panel.add_text("b").unwrap();

        let err = panel.remove_last(3).unwrap_err();
        assert!(matches!(err, Error::Underflow { requested: 3, available: 2 }));
        assert_eq!(panel.len(), 10);

        panel.remove_last(2).unwrap();
        assert_eq!(panel.len(), 8);
        panel.remove_last(0).unwrap();
        assert!(panel.remove_last(1).is_err());
    }

    #[test]
    fn test_open_applies_background() {
        let panel = open(Section::new("X").background(ColorToken::Rgb(0, 0, 0)));
        assert_eq!(panel.backend().raw(), "\x1b]11;#000000\x07");

        let panel = open(Section::new("X"));
        assert!(panel.backend().raw().contains("#1f1f1f"));
    }

    #[test]
    fn test_panel_rerenders_after_resize() {
        let mut panel = open(Section::new("X"));
        assert_eq!(panel.geometry().content_width, 52);

        panel.backend_mut().resize(80, 24);
        panel.add_text("resized").unwrap();
        assert_eq!(panel.geometry().content_width, 32);
        let frame = frame_text(&panel);
        assert!(frame.iter().all(|line| line.starts_with(&" ".repeat(24))));
    }

    #[test]
    fn test_prompt_returns_raw_line() {
        let mut panel = open(Section::new("X"));
        panel.backend_mut().push_input("  Some Answer ");

        let answer = panel.prompt("Name: ", &PromptStyle::default().indent(1)).unwrap();
        assert_eq!(answer, "  Some Answer ");

        let shown = strip_codes(&panel.backend().prompts()[0]).into_owned();
        assert_eq!(shown, format!("{}Name: ", " ".repeat(24 + 2 + 1)));
        assert!(panel.backend().raw().ends_with(ansi::RESET));
    }

    #[test]
    fn test_prompt_on_closed_input() {
        let mut panel = open(Section::new("X"));
        assert!(matches!(panel.prompt("? ", &PromptStyle::default()), Err(Error::InputClosed)));
        assert!(panel.backend().raw().ends_with(ansi::RESET));
    }
}

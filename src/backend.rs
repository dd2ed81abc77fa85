//! Terminal I/O boundary. Panels only ever talk to the terminal through
//! [`Backend`], which keeps rendering testable without a real tty.

use std::collections::VecDeque;
use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::{Error, Result};

/// Size reported when the terminal cannot be queried (pipes, CI).
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

pub trait Backend {
    /// Current (columns, rows).
    fn size(&self) -> Result<(u16, u16)>;
    fn clear(&mut self) -> Result<()>;
    /// Writes `line` followed by a newline.
    fn write_line(&mut self, line: &str) -> Result<()>;
    /// Writes `text` as is, without a newline.
    fn write_raw(&mut self, text: &str) -> Result<()>;
    /// Shows `prefix` on the current line and blocks until a line is submitted.
    fn read_line(&mut self, prefix: &str) -> Result<String>;
}

/// The real terminal: crossterm for size and clearing, rustyline for input.
#[derive(Default)]
pub struct ConsoleBackend {
    editor: Option<DefaultEditor>,
}

impl ConsoleBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn editor(&mut self) -> Result<&mut DefaultEditor> {
        if self.editor.is_none() {
            self.editor = Some(DefaultEditor::new()?);
        }
        self.editor.as_mut().ok_or(Error::InputClosed)
    }
}

impl Backend for ConsoleBackend {
    fn size(&self) -> Result<(u16, u16)> {
        match terminal::size() {
            Ok((0, _)) | Err(_) => Ok(FALLBACK_SIZE),
            Ok(size) => Ok(size),
        }
    }

    fn clear(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        Ok(())
    }

    fn write_raw(&mut self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", text)?;
        stdout.flush()?;
        Ok(())
    }

    fn read_line(&mut self, prefix: &str) -> Result<String> {
        match self.editor()?.readline(prefix) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Eof) => Err(Error::InputClosed),
            Err(ReadlineError::Interrupted) => Err(Error::Interrupted),
            Err(err) => Err(Error::Readline(err)),
        }
    }
}

/// In-memory terminal with a fixed size. Each `clear` starts a new frame;
/// `read_line` answers from a queue of scripted inputs.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    size: (u16, u16),
    frames: Vec<Vec<String>>,
    raw: String,
    prompts: Vec<String>,
    inputs: VecDeque<String>,
}

impl MemoryBackend {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            size: (columns, rows),
            frames: Vec::new(),
            raw: String::new(),
            prompts: Vec::new(),
            inputs: VecDeque::new(),
        }
    }

    /// Simulates a terminal resize; picked up by the next render.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.size = (columns, rows);
    }

    pub fn push_input(&mut self, line: impl Into<String>) {
        self.inputs.push_back(line.into());
    }

    pub fn frames(&self) -> &[Vec<String>] {
        &self.frames
    }

    /// Lines of the most recent frame.
    pub fn last_frame(&self) -> &[String] {
        self.frames.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Everything written with `write_raw`.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Prefixes shown by `read_line`, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Backend for MemoryBackend {
    fn size(&self) -> Result<(u16, u16)> {
        Ok(self.size)
    }

    fn clear(&mut self) -> Result<()> {
        self.frames.push(Vec::new());
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        if self.frames.is_empty() {
            self.frames.push(Vec::new());
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.push(line.to_string());
        }
        Ok(())
    }

    fn write_raw(&mut self, text: &str) -> Result<()> {
        self.raw.push_str(text);
        Ok(())
    }

    fn read_line(&mut self, prefix: &str) -> Result<String> {
        self.prompts.push(prefix.to_string());
        self.inputs.pop_front().ok_or(Error::InputClosed)
    }
}

//! Terminal front-end for Kliko's modloader.
//!
//! The core is a bordered, titled panel that reflows its text to the live
//! terminal width and repaints itself after every change. Around it sit the
//! pieces the screens are built from: the FastFlag profile store, the
//! license registry, settings and a debug logger.

pub mod ansi;
pub mod backend;
pub mod config;
pub mod error;
pub mod fastflags;
pub mod layout;
pub mod licenses;
pub mod logging;
pub mod meta;
pub mod panel;
pub mod prompt;
pub mod render;

pub use ansi::{Alignment, ColorToken, Style};
pub use backend::{Backend, ConsoleBackend, MemoryBackend};
pub use config::Settings;
pub use error::{Error, Result};
pub use fastflags::{FlagMap, Profile, ProfileStore};
pub use layout::{Geometry, TextStyle};
pub use licenses::License;
pub use logging::{DebugLogger, LogLevel};
pub use panel::{Document, Panel, Record, Section};
pub use prompt::PromptStyle;

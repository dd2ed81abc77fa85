//! Full-repaint render pass: measure, clear, draw every record.

use crate::backend::Backend;
use crate::error::Result;
use crate::layout::{self, Geometry};
use crate::logging::DebugLogger;
use crate::panel::{Document, Record};

/// Display lines for one record at the given geometry. Text wider than the
/// content area is wrapped first; each wrapped piece becomes its own row.
pub fn record_lines(record: &Record, geometry: &Geometry) -> Vec<String> {
    let width = geometry.content_width;
    match record {
        Record::Divider(divider) => vec![layout::format_divider(width, divider.fill, divider.color)],
        Record::Text(text) => {
            let pieces = if crate::ansi::visible_width(&text.content) > width {
                layout::wrap(&text.content, width)
            } else {
                vec![text.content.clone()]
            };
            pieces
                .iter()
                .map(|piece| layout::format_line(piece, width, &text.look, ' '))
                .collect()
        }
    }
}

/// Re-reads the terminal size, clears the screen and writes the whole
/// document, each row indented so the panel sits centered. Returns the
/// geometry used for this pass.
pub fn render<B: Backend + ?Sized>(
    backend: &mut B,
    document: &Document,
    gutter: usize,
    logger: &DebugLogger,
) -> Result<Geometry> {
    let geometry = Geometry::measure(backend.size()?, gutter);
    let indent = " ".repeat(geometry.offset());

    backend.clear()?;

    let mut written = 0;
    for record in document.records() {
        for line in record_lines(record, &geometry) {
            backend.write_line(&format!("{}{}", indent, line))?;
            written += 1;
        }
    }

    // Logging is best effort; a failing log file must not break the screen.
    let _ = logger.log_render(&geometry, document.len(), written);
    Ok(geometry)
}

//! # Text Display Surface
//!
//! The controller sees the screen as a fixed number of text rows. Writes go to
//! a back buffer and only become visible on [`TextDisplay::show`], so a screen
//! can clear and rewrite a single row (a partial redraw) without touching the
//! rest.
//!
//! Two surfaces are provided:
//! - [`terminal::TerminalDisplay`]: plain text rows in a box, for development
//! - [`frame::FrameDisplay`]: rows rasterized with embedded-graphics onto a
//!   packed 1-bit frame, handed to a [`frame::FrameSink`] on commit

pub mod frame;
pub mod terminal;

use std::io;
use thiserror::Error;

/// Rows on the 128x64 panel with the 6x10 font and 12 px row pitch.
pub const DEFAULT_ROWS: usize = 5;
/// Characters per row at 6 px per glyph.
pub const DEFAULT_COLUMNS: usize = 21;

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("row {row} out of range (display has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("display output: {0}")]
    Io(#[from] io::Error),
}

/// Row-addressed text output.
pub trait TextDisplay {
    /// Number of addressable rows.
    fn num_rows(&self) -> usize;

    /// Write `text` left-aligned at `row`, replacing the row.
    fn text(&mut self, row: usize, text: &str) -> Result<(), DisplayError>;

    /// Write `left` left-aligned and `right` right-aligned on the same row.
    fn text_both_sides(&mut self, row: usize, left: &str, right: &str)
        -> Result<(), DisplayError>;

    fn clear_row(&mut self, row: usize) -> Result<(), DisplayError>;

    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Commit the back buffer to the screen.
    fn show(&mut self) -> Result<(), DisplayError>;
}

/// Compose a two-sided row of exactly `width` characters.
///
/// The right-hand text wins when both do not fit: the left side is cut first,
/// keeping at least one space between the two.
pub fn justify(left: &str, right: &str, width: usize) -> String {
    let right: String = right.chars().take(width).collect();
    let right_len = right.chars().count();
    let room = width.saturating_sub(right_len);
    let left_room = if right_len == 0 {
        room
    } else {
        room.saturating_sub(1)
    };
    let left: String = left.chars().take(left_room).collect();
    let pad = width - left.chars().count() - right_len;
    format!("{}{}{}", left, " ".repeat(pad), right)
}

pub(crate) fn check_row(row: usize, rows: usize) -> Result<(), DisplayError> {
    if row < rows {
        Ok(())
    } else {
        Err(DisplayError::RowOutOfRange { row, rows })
    }
}

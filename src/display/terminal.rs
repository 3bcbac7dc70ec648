//! Text-mode display for development without the panel (`--stdout`).

use super::{check_row, justify, DisplayError, TextDisplay, DEFAULT_COLUMNS, DEFAULT_ROWS};
use std::io::{self, Write};

/// Keeps the rows as strings and prints them inside a box on every commit.
pub struct TerminalDisplay<W: Write> {
    rows: Vec<String>,
    columns: usize,
    out: W,
}

impl TerminalDisplay<io::Stdout> {
    /// Panel-sized display printing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout(), DEFAULT_ROWS, DEFAULT_COLUMNS)
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, rows: usize, columns: usize) -> Self {
        Self {
            rows: vec![String::new(); rows],
            columns,
            out,
        }
    }

    /// Current back-buffer contents.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TextDisplay for TerminalDisplay<W> {
    fn num_rows(&self) -> usize {
        self.rows.len()
    }

    fn text(&mut self, row: usize, text: &str) -> Result<(), DisplayError> {
        check_row(row, self.rows.len())?;
        self.rows[row] = text.chars().take(self.columns).collect();
        Ok(())
    }

    fn text_both_sides(
        &mut self,
        row: usize,
        left: &str,
        right: &str,
    ) -> Result<(), DisplayError> {
        check_row(row, self.rows.len())?;
        self.rows[row] = justify(left, right, self.columns);
        Ok(())
    }

    fn clear_row(&mut self, row: usize) -> Result<(), DisplayError> {
        check_row(row, self.rows.len())?;
        self.rows[row].clear();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.rows.iter_mut().for_each(String::clear);
        Ok(())
    }

    fn show(&mut self) -> Result<(), DisplayError> {
        let border = "─".repeat(self.columns);
        writeln!(self.out, "┌{}┐", border)?;
        for row in &self.rows {
            writeln!(self.out, "│{:<width$}│", row, width = self.columns)?;
        }
        writeln!(self.out, "└{}┘", border)?;
        self.out.flush()?;
        Ok(())
    }
}

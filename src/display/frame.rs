//! Pixel-backed text display.
//!
//! Rows are rasterized with the embedded-graphics 6x10 mono font into a packed
//! 1-bit frame (one byte per 8 horizontal pixels, MSB first, the layout SH110x
//! and SSD130x controllers expect). On commit the whole frame goes to a
//! [`FrameSink`], which is the seam for a panel driver.

use super::{check_row, justify, DisplayError, TextDisplay};
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use std::io::Write;

/// Panel dimensions
pub const PANEL_WIDTH: u32 = 128;
pub const PANEL_HEIGHT: u32 = 64;

/// Vertical distance between two text rows in pixels.
const ROW_PITCH: u32 = 12;
/// Horizontal advance of one glyph.
const GLYPH_WIDTH: u32 = 6;

/// Packed monochrome frame buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonoFrame {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl MonoFrame {
    pub fn new(width: u32, height: u32) -> Self {
        // Each row has (width+7)/8 bytes
        let bytes_per_row = width.div_ceil(8);
        Self {
            width,
            height,
            buffer: vec![0x00; (bytes_per_row * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw packed bytes, row-major.
    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    fn index(&self, x: u32, y: u32) -> (usize, u8) {
        let bytes_per_row = self.width.div_ceil(8);
        ((y * bytes_per_row + x / 8) as usize, 0x80 >> (x % 8))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (byte, mask) = self.index(x, y);
        if on {
            self.buffer[byte] |= mask;
        } else {
            self.buffer[byte] &= !mask;
        }
    }

    pub fn is_on(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (byte, mask) = self.index(x, y);
        self.buffer[byte] & mask != 0
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0x00);
    }

    /// Number of lit pixels in rows `y0..y1`.
    pub fn lit_in_band(&self, y0: u32, y1: u32) -> usize {
        (y0..y1.min(self.height))
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_on(x, y))
            .count()
    }
}

impl OriginDimensions for MonoFrame {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for MonoFrame {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color.is_on());
            }
        }
        Ok(())
    }
}

/// Receives the committed frame (panel driver, preview, test probe).
pub trait FrameSink {
    fn flush(&mut self, frame: &MonoFrame) -> Result<(), DisplayError>;
}

/// Prints the frame with Unicode half blocks, two pixel rows per line.
pub struct HalfBlockPreview<W: Write> {
    out: W,
}

impl<W: Write> HalfBlockPreview<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for HalfBlockPreview<W> {
    fn flush(&mut self, frame: &MonoFrame) -> Result<(), DisplayError> {
        for y in (0..frame.height()).step_by(2) {
            let line: String = (0..frame.width())
                .map(|x| match (frame.is_on(x, y), frame.is_on(x, y + 1)) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                })
                .collect();
            writeln!(self.out, "{}", line.trim_end())?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Text rows rendered onto a [`MonoFrame`].
pub struct FrameDisplay<S: FrameSink> {
    frame: MonoFrame,
    rows: usize,
    columns: usize,
    sink: S,
}

impl<S: FrameSink> FrameDisplay<S> {
    /// 128x64 panel: 5 rows of 21 characters.
    pub fn new(sink: S) -> Self {
        Self::with_size(sink, PANEL_WIDTH, PANEL_HEIGHT)
    }

    pub fn with_size(sink: S, width: u32, height: u32) -> Self {
        Self {
            frame: MonoFrame::new(width, height),
            rows: (height / ROW_PITCH) as usize,
            columns: (width / GLYPH_WIDTH) as usize,
            sink,
        }
    }

    pub fn frame(&self) -> &MonoFrame {
        &self.frame
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn row_top(row: usize) -> i32 {
        (row as u32 * ROW_PITCH) as i32
    }

    fn blank_row(&mut self, row: usize) {
        Rectangle::new(
            Point::new(0, Self::row_top(row)),
            Size::new(self.frame.width(), ROW_PITCH),
        )
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
        .draw(&mut self.frame)
        .ok();
    }

    fn draw_row(&mut self, row: usize, text: &str) {
        self.blank_row(row);
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let text: String = text.chars().take(self.columns).collect();
        Text::with_baseline(
            &text,
            Point::new(0, Self::row_top(row) + 1),
            style,
            Baseline::Top,
        )
        .draw(&mut self.frame)
        .ok();
    }
}

impl<S: FrameSink> TextDisplay for FrameDisplay<S> {
    fn num_rows(&self) -> usize {
        self.rows
    }

    fn text(&mut self, row: usize, text: &str) -> Result<(), DisplayError> {
        check_row(row, self.rows)?;
        self.draw_row(row, text);
        Ok(())
    }

    fn text_both_sides(
        &mut self,
        row: usize,
        left: &str,
        right: &str,
    ) -> Result<(), DisplayError> {
        check_row(row, self.rows)?;
        // monospace font, so padding with spaces right-aligns exactly
        let line = justify(left, right, self.columns);
        self.draw_row(row, &line);
        Ok(())
    }

    fn clear_row(&mut self, row: usize) -> Result<(), DisplayError> {
        check_row(row, self.rows)?;
        self.blank_row(row);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.frame.clear();
        Ok(())
    }

    fn show(&mut self) -> Result<(), DisplayError> {
        self.sink.flush(&self.frame)
    }
}

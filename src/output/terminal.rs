//! Terminal preview of a rendered figure.
//!
//! The figure is downsampled with a box filter into character cells. Two
//! styles are available:
//! - [`PreviewStyle::HalfBlock`]: `▀` cells with 24-bit foreground and
//!   background colors, two image rows per terminal line
//! - [`PreviewStyle::Ascii`]: a luminance ramp for terminals without color

use std::fmt::Write as _;

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

/// How a preview cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewStyle {
    /// Plain characters picked by luminance.
    Ascii,
    /// Upper half blocks with true-color escapes.
    #[default]
    HalfBlock,
}

/// Downsampling terminal renderer.
#[derive(Debug, Clone)]
pub struct TerminalPreview {
    style: PreviewStyle,
    columns: u32,
    rows: Option<u32>,
}

impl Default for TerminalPreview {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPreview {
    /// Ramp from light to dark; figures are drawn on white.
    const RAMP: &'static [u8] = b" .:-=+*#%@";

    /// Default preview width in columns.
    pub const DEFAULT_COLUMNS: u32 = 80;

    /// Terminal cells are roughly twice as tall as wide.
    const CELL_ASPECT: f32 = 2.0;

    /// Create a half-block preview 80 columns wide.
    #[must_use]
    pub const fn new() -> Self {
        Self { style: PreviewStyle::HalfBlock, columns: Self::DEFAULT_COLUMNS, rows: None }
    }

    /// Set the cell style.
    #[must_use]
    pub const fn style(mut self, style: PreviewStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the output width in columns (at least 1).
    #[must_use]
    pub fn columns(mut self, columns: u32) -> Self {
        self.columns = columns.max(1);
        self
    }

    /// Fix the number of output lines instead of deriving it from the aspect ratio.
    #[must_use]
    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows.max(1));
        self
    }

    /// Output grid in (columns, lines) for a framebuffer.
    #[must_use]
    pub fn grid(&self, fb: &Framebuffer) -> (u32, u32) {
        let columns = self.columns.min(fb.width()).max(1);
        let lines = self.rows.unwrap_or_else(|| {
            let aspect = fb.height() as f32 / fb.width() as f32;
            ((columns as f32 * aspect / Self::CELL_ASPECT).round() as u32).max(1)
        });
        (columns, lines)
    }

    /// Render the framebuffer into a printable string, one line per row.
    #[must_use]
    pub fn render(&self, fb: &Framebuffer) -> String {
        let (columns, lines) = self.grid(fb);
        match self.style {
            PreviewStyle::Ascii => self.render_ascii(fb, columns, lines),
            PreviewStyle::HalfBlock => self.render_half_block(fb, columns, lines),
        }
    }

    fn render_ascii(&self, fb: &Framebuffer, columns: u32, lines: u32) -> String {
        let mut out = String::with_capacity((columns as usize + 1) * lines as usize);
        for line in 0..lines {
            for col in 0..columns {
                let cell = average(fb, columns, lines, col, line);
                let darkness = 1.0 - cell.luma();
                let idx = (darkness * (Self::RAMP.len() - 1) as f32).round() as usize;
                out.push(char::from(Self::RAMP[idx.min(Self::RAMP.len() - 1)]));
            }
            out.push('\n');
        }
        out
    }

    fn render_half_block(&self, fb: &Framebuffer, columns: u32, lines: u32) -> String {
        let sub_rows = lines * 2;
        let mut out = String::with_capacity(columns as usize * 40 * lines as usize);
        for line in 0..lines {
            for col in 0..columns {
                let top = average(fb, columns, sub_rows, col, line * 2);
                let bottom = average(fb, columns, sub_rows, col, line * 2 + 1);
                let _ = write!(
                    out,
                    "\x1b[38;2;{};{};{};48;2;{};{};{}m\u{2580}",
                    top.r, top.g, top.b, bottom.r, bottom.g, bottom.b
                );
            }
            out.push_str("\x1b[0m\n");
        }
        out
    }
}

/// Mean color of the framebuffer region mapped onto cell `(col, row)` of a
/// `columns` x `rows` grid.
fn average(fb: &Framebuffer, columns: u32, rows: u32, col: u32, row: u32) -> Rgba {
    let span = |index: u32, cells: u32, extent: u32| {
        let start = (u64::from(index) * u64::from(extent) / u64::from(cells)) as u32;
        let end = (u64::from(index + 1) * u64::from(extent) / u64::from(cells)) as u32;
        (start.min(extent - 1), end.clamp(start + 1, extent))
    };
    let (x0, x1) = span(col, columns, fb.width());
    let (y0, y1) = span(row, rows, fb.height());

    let mut sum = [0u64; 3];
    let mut n = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            if let Some(p) = fb.get_pixel(x, y) {
                sum[0] += u64::from(p.r);
                sum[1] += u64::from(p.g);
                sum[2] += u64::from(p.b);
                n += 1;
            }
        }
    }
    if n == 0 {
        return Rgba::WHITE;
    }
    let mean = |s: u64| ((s + n / 2) / n) as u8;
    Rgba::rgb(mean(sum[0]), mean(sum[1]), mean(sum[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(w: u32, h: u32, color: Rgba) -> Framebuffer {
        let mut fb = Framebuffer::new(w, h).unwrap();
        fb.clear(color);
        fb
    }

    #[test]
    fn test_ascii_white_is_blank() {
        let out = TerminalPreview::new()
            .style(PreviewStyle::Ascii)
            .columns(8)
            .render(&filled(32, 32, Rgba::WHITE));
        assert!(out.lines().all(|l| l.chars().all(|c| c == ' ')));
    }

    #[test]
    fn test_ascii_black_is_dense() {
        let out = TerminalPreview::new()
            .style(PreviewStyle::Ascii)
            .columns(8)
            .render(&filled(32, 32, Rgba::BLACK));
        assert!(out.lines().all(|l| l.chars().all(|c| c == '@')));
    }

    #[test]
    fn test_half_block_escapes() {
        let out = TerminalPreview::new().columns(4).render(&filled(16, 16, Rgba::BLUE));
        assert!(out.contains("38;2;0;0;255;48;2;0;0;255m\u{2580}"));
        assert!(out.ends_with("\x1b[0m\n"));
    }

    #[test]
    fn test_half_block_splits_rows() {
        let mut fb = filled(4, 4, Rgba::WHITE);
        for x in 0..4 {
            fb.set_pixel(x, 2, Rgba::BLACK);
            fb.set_pixel(x, 3, Rgba::BLACK);
        }
        let out = TerminalPreview::new().columns(1).rows(1).render(&fb);
        assert!(out.contains("38;2;255;255;255;48;2;0;0;0m"));
    }

    #[test]
    fn test_grid_follows_aspect() {
        let fb = filled(640, 480, Rgba::WHITE);
        let preview = TerminalPreview::new().columns(80);
        assert_eq!(preview.grid(&fb), (80, 30));

        let out = preview.style(PreviewStyle::Ascii).render(&fb);
        assert_eq!(out.lines().count(), 30);
        assert!(out.lines().all(|l| l.len() == 80));
    }

    #[test]
    fn test_columns_capped_by_image() {
        let fb = filled(10, 10, Rgba::WHITE);
        let (cols, lines) = TerminalPreview::new().columns(500).grid(&fb);
        assert_eq!(cols, 10);
        assert!(lines >= 1);
    }

    #[test]
    fn test_box_filter_averages() {
        let mut fb = filled(2, 1, Rgba::BLACK);
        fb.set_pixel(1, 0, Rgba::WHITE);
        assert_eq!(average(&fb, 1, 1, 0, 0), Rgba::rgb(128, 128, 128));
    }
}

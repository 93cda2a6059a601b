//! PNG encoding and decoding.
//!
//! Pure Rust PNG support using the `png` crate. Figures are always written as
//! 8-bit RGBA; decoding accepts whatever the baseline file holds and expands
//! it to RGBA.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;

/// PNG encoder for framebuffer output.
pub struct PngEncoder;

impl PngEncoder {
    /// Write a framebuffer to a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if file creation or PNG encoding fails.
    pub fn write_to_file<P: AsRef<Path>>(fb: &Framebuffer, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        Self::encode(fb, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Encode a framebuffer to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_bytes(fb: &Framebuffer) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        Self::encode(fb, &mut buffer)?;
        Ok(buffer)
    }

    /// Read a PNG file into a framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a supported PNG.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Framebuffer> {
        Self::decode(BufReader::new(File::open(path)?))
    }

    /// Decode PNG bytes into a framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a supported PNG.
    pub fn from_bytes(bytes: &[u8]) -> Result<Framebuffer> {
        Self::decode(bytes)
    }

    fn encode<W: Write>(fb: &Framebuffer, sink: W) -> Result<()> {
        let mut encoder = png::Encoder::new(sink, fb.width(), fb.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&fb.to_compact_pixels())?;
        writer.finish()?;
        Ok(())
    }

    fn decode<R: Read>(source: R) -> Result<Framebuffer> {
        let mut decoder = png::Decoder::new(source);
        // Expand palettes and low bit depths, strip 16-bit to 8-bit.
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

        let mut reader = decoder.read_info()?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        let data = &buf[..info.buffer_size()];

        let rgba: Vec<u8> = match info.color_type {
            png::ColorType::Rgba => data.to_vec(),
            png::ColorType::Rgb => data.chunks_exact(3).flat_map(|p| [p[0], p[1], p[2], 255]).collect(),
            png::ColorType::GrayscaleAlpha => {
                data.chunks_exact(2).flat_map(|p| [p[0], p[0], p[0], p[1]]).collect()
            }
            png::ColorType::Grayscale => data.iter().flat_map(|&g| [g, g, g, 255]).collect(),
            png::ColorType::Indexed => {
                return Err(Error::Rendering("indexed PNG was not expanded".to_string()));
            }
        };

        Framebuffer::from_rgba(info.width, info.height, &rgba)
    }
}

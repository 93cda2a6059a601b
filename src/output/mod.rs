//! Output encoders (PNG file, terminal preview).

mod png_encoder;
mod terminal;

pub use png_encoder::PngEncoder;
pub use terminal::{PreviewStyle, TerminalPreview};

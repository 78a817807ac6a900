//! Driver for A2-family serial thermal receipt printers.
//!
//! Text, formatting, barcodes and raster bitmaps are encoded into the printer's byte
//! commands and written one byte at a time to a [`Transport`].
//!
//! ```
//! use a2print::{bitmap, Justification, Printer};
//!
//! let mut printer = Printer::new(Vec::new());
//! printer.begin(150)?;
//! printer.justify(Justification::Center)?;
//! printer.bold_on()?;
//! printer.print_line("hello")?;
//!
//! let rows: &[u8] = &[0xAA; 48 * 5];
//! printer.print_bitmap(bitmap::with_dimensions(384, 5, rows)?)?;
//! # Ok::<(), a2print::Error>(())
//! ```

pub mod bitmap;
mod error;
pub mod printer;

pub use crate::bitmap::{Bitmap, BitmapData, ByteSource, RasterChunk};
pub use crate::error::{Error, Result};
pub use crate::printer::{
    Barcode, HeatSettings, Justification, PrintDensity, PrintMode, Printer, PrinterConfig, Size,
    Transport, Underline, UnixSerialPort, MAX_DOTS_PER_LINE,
};

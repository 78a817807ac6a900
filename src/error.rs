use std::io;
use thiserror::Error;

/// Errors raised while encoding commands or streaming them to the printer.
#[derive(Debug, Error)]
pub enum Error {
    /// The bitmap is wider than the print head. Nothing has been written.
    #[error("bitmap is {width} dots wide, the printer supports at most {max}")]
    BitmapTooWide { width: u16, max: u16 },

    /// Rows must be byte-aligned, one bit per dot.
    #[error("bitmap width {width} is not a multiple of 8")]
    UnalignedWidth { width: u16 },

    /// The bitmap source ran out before all announced bytes were pulled.
    #[error("bitmap source exhausted after {read} of {expected} bytes")]
    SourceExhausted { expected: usize, read: usize },

    #[error("could not read bitmap source: {0}")]
    Source(#[source] io::Error),

    /// Image dimensions do not fit the u16 width and height of a bitmap.
    #[error("image of {width}x{height} dots is too large for a bitmap")]
    ImageTooLarge { width: u32, height: u32 },

    #[error("{name} must be at most {max}, got {value}")]
    ParameterOutOfRange {
        name: &'static str,
        value: u8,
        max: u8,
    },

    /// A byte write failed. The printer is in an undefined state until reset.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Packed 1-bit bitmaps and the byte sources they are read from.
//!
//! Rows are byte-aligned, MSB first, `1` meaning a printed dot. A bitmap either comes with
//! externally known dimensions or from a self-describing stream whose first four bytes are
//! the little-endian `u16` width and height.

mod chunk;
#[cfg(feature = "image")]
pub mod raster;

pub use chunk::{chunk_heights, ChunkHeights, Chunks, RasterChunk, CHUNK_HEADER, MAX_CHUNK_HEIGHT};

use crate::error::{Error, Result};
use std::io::{self, Read};
use tracing::debug;

/// Pull-one-byte access to packed row data.
pub trait ByteSource {
    /// Next byte, or `None` once the source is exhausted.
    fn pull(&mut self) -> io::Result<Option<u8>>;

    fn pull_exact(&mut self, amount: usize) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(amount);
        while bytes.len() < amount {
            match self.pull().map_err(Error::Source)? {
                Some(b) => bytes.push(b),
                None => {
                    return Err(Error::SourceExhausted {
                        expected: amount,
                        read: bytes.len(),
                    })
                }
            }
        }
        Ok(bytes)
    }
}

impl<R: Read> ByteSource for R {
    fn pull(&mut self) -> io::Result<Option<u8>> {
        let mut b = [0u8; 1];
        loop {
            match self.read(&mut b) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(b[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Where a bitmap's dimensions come from.
#[derive(Debug)]
pub enum BitmapData<S> {
    /// Bare row bytes, dimensions supplied by the caller.
    Raw { width: u16, height: u16, bytes: S },
    /// Width and height (u16 LE each) precede the row bytes.
    SelfDescribing { bytes: S },
}

/// A bitmap whose rows have not been pulled yet.
///
/// The source is consumed exactly once, front to back, when the bitmap is chunked.
#[derive(Debug)]
pub struct Bitmap<S> {
    width: u16,
    height: u16,
    source: S,
}

impl<S: ByteSource> Bitmap<S> {
    pub fn from_data(data: BitmapData<S>) -> Result<Self> {
        let (width, height, source) = match data {
            BitmapData::Raw {
                width,
                height,
                bytes,
            } => (width, height, bytes),
            BitmapData::SelfDescribing { mut bytes } => {
                let header = bytes.pull_exact(4)?;
                let width = u16::from_le_bytes([header[0], header[1]]);
                let height = u16::from_le_bytes([header[2], header[3]]);
                (width, height, bytes)
            }
        };

        if width % 8 != 0 {
            return Err(Error::UnalignedWidth { width });
        }
        debug!(width, height, "bitmap");

        Ok(Self {
            width,
            height,
            source,
        })
    }
}

impl<S> Bitmap<S> {
    /// Width in dots
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in rows
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bytes per packed row
    pub fn row_width(&self) -> u16 {
        self.width / 8
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

/// Bitmap over bare row bytes of the given size.
pub fn with_dimensions<S: ByteSource>(width: u16, height: u16, source: S) -> Result<Bitmap<S>> {
    Bitmap::from_data(BitmapData::Raw {
        width,
        height,
        bytes: source,
    })
}

/// Bitmap over a stream that starts with its own width and height.
pub fn from_source<S: ByteSource>(source: S) -> Result<Bitmap<S>> {
    Bitmap::from_data(BitmapData::SelfDescribing { bytes: source })
}

use crate::bitmap::{Bitmap, ByteSource};
use crate::error::{Error, Result};
use crate::printer::Transport;
use tracing::{debug, trace};

/// `DC2 *`, the raster bit image command.
pub const CHUNK_HEADER: [u8; 2] = [18, 42];
pub const MAX_CHUNK_HEIGHT: u8 = 255;

// the row width travels as a single byte
const MAX_ROW_WIDTH_DOTS: u16 = u8::MAX as u16 * 8;

/// Heights of the consecutive chunks of a bitmap with `height` rows.
///
/// Every chunk but the last is [`MAX_CHUNK_HEIGHT`] tall. A height of 0 yields no chunk and
/// an exact multiple of 255 does not yield a trailing empty one.
pub fn chunk_heights(height: u16) -> ChunkHeights {
    ChunkHeights {
        height,
        row_start: 0,
    }
}

#[derive(Debug, Clone)]
pub struct ChunkHeights {
    height: u16,
    row_start: u16,
}

impl Iterator for ChunkHeights {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.row_start >= self.height {
            return None;
        }
        let rows = (self.height - self.row_start).min(MAX_CHUNK_HEIGHT as u16);
        self.row_start += rows;
        Some(rows as u8)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.height - self.row_start) as usize;
        let n = (remaining + MAX_CHUNK_HEIGHT as usize - 1) / MAX_CHUNK_HEIGHT as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for ChunkHeights {}

/// One `DC2 * height row_width payload` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterChunk {
    pub height: u8,
    pub row_width: u8,
    pub payload: Vec<u8>,
}

impl RasterChunk {
    pub fn header(&self) -> [u8; 4] {
        [CHUNK_HEADER[0], CHUNK_HEADER[1], self.height, self.row_width]
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 + self.payload.len());
        bytes.extend_from_slice(&self.header());
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    pub fn write_to<T: Transport + ?Sized>(&self, port: &mut T) -> Result<()> {
        for b in self.header().iter().chain(self.payload.iter()) {
            port.write_byte(*b)?;
        }
        Ok(())
    }
}

/// Pulls a bitmap's rows chunk by chunk, top to bottom.
///
/// Stops after the first error.
#[derive(Debug)]
pub struct Chunks<S> {
    source: S,
    row_width: u8,
    heights: ChunkHeights,
    failed: bool,
}

impl<S: ByteSource> Iterator for Chunks<S> {
    type Item = Result<RasterChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let height = self.heights.next()?;
        let amount = self.row_width as usize * height as usize;

        match self.source.pull_exact(amount) {
            Ok(payload) => {
                trace!(height, row_width = self.row_width, "raster chunk");
                Some(Ok(RasterChunk {
                    height,
                    row_width: self.row_width,
                    payload,
                }))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl<S: ByteSource> Bitmap<S> {
    /// Splits the bitmap into raster chunks.
    ///
    /// Fails with [`Error::BitmapTooWide`] before a single byte is pulled when the bitmap is
    /// wider than `max_dots`.
    pub fn chunks(self, max_dots: u16) -> Result<Chunks<S>> {
        let max = max_dots.min(MAX_ROW_WIDTH_DOTS);
        if self.width > max {
            return Err(Error::BitmapTooWide {
                width: self.width,
                max,
            });
        }

        let heights = chunk_heights(self.height);
        debug!(
            width = self.width,
            height = self.height,
            chunks = heights.len(),
            "chunking bitmap"
        );
        Ok(Chunks {
            row_width: self.row_width() as u8,
            source: self.source,
            heights,
            failed: false,
        })
    }

    /// The complete chunk stream, headers included.
    pub fn to_bytes(self, max_dots: u16) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        for chunk in self.chunks(max_dots)? {
            chunk?.write_to(&mut bytes)?;
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::with_dimensions;

    #[test]
    fn heights_at_boundaries() {
        assert_eq!(chunk_heights(0).collect::<Vec<_>>(), Vec::<u8>::new());
        assert_eq!(chunk_heights(1).collect::<Vec<_>>(), vec![1]);
        assert_eq!(chunk_heights(255).collect::<Vec<_>>(), vec![255]);
        assert_eq!(chunk_heights(256).collect::<Vec<_>>(), vec![255, 1]);
        assert_eq!(chunk_heights(510).collect::<Vec<_>>(), vec![255, 255]);
        assert_eq!(chunk_heights(511).collect::<Vec<_>>(), vec![255, 255, 1]);
        assert_eq!(chunk_heights(u16::MAX).len(), 257);
    }

    #[test]
    fn chunk_wire_format() {
        let chunk = RasterChunk {
            height: 2,
            row_width: 1,
            payload: vec![0xF0, 0x0F],
        };
        assert_eq!(chunk.to_bytes(), vec![18, 42, 2, 1, 0xF0, 0x0F]);
    }

    #[test]
    fn too_wide_pulls_nothing() {
        let mut data: &[u8] = &[0u8; 49];
        let bitmap = with_dimensions(392, 1, &mut data).unwrap();
        let err = bitmap.chunks(384).unwrap_err();
        assert!(matches!(
            err,
            Error::BitmapTooWide {
                width: 392,
                max: 384
            }
        ));
        assert_eq!(data.len(), 49);
    }

    #[test]
    fn row_width_limit() {
        let data: &[u8] = &[];
        let bitmap = with_dimensions(2048, 0, data).unwrap();
        assert!(matches!(
            bitmap.chunks(u16::MAX),
            Err(Error::BitmapTooWide { max: 2040, .. })
        ));
    }

    #[test]
    fn stops_after_exhausted_source() {
        let data: &[u8] = &[1, 2, 3];
        let bitmap = with_dimensions(16, 300, data).unwrap();
        let mut chunks = bitmap.chunks(384).unwrap();
        assert!(matches!(
            chunks.next(),
            Some(Err(Error::SourceExhausted { expected: 510, read: 3 }))
        ));
        assert!(chunks.next().is_none());
    }
}

//! Converting images into packed printer rows.

use crate::bitmap::{with_dimensions, Bitmap};
use crate::error::{Error, Result};
use bitvec::prelude::*;
use image::imageops::{self, BiLevel, FilterType};
use image::{DynamicImage, GenericImageView, GrayImage};
use tracing::debug;

/// A dithered image packed one bit per dot, rows padded to whole bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedImage {
    pub width: u16,
    pub height: u16,
    pub rows: Vec<u8>,
}

impl PackedImage {
    pub fn bitmap(&self) -> Result<Bitmap<&[u8]>> {
        with_dimensions(self.width, self.height, self.rows.as_slice())
    }

    /// Width and height as u16 LE, followed by the rows.
    pub fn to_self_describing(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 + self.rows.len());
        bytes.extend_from_slice(&self.width.to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(&self.rows);
        bytes
    }
}

/// Scales `img` down to at most `max_dots` wide and dithers it to black and white.
pub fn prepare(img: DynamicImage, max_dots: u16) -> GrayImage {
    let img = if img.width() > max_dots as u32 {
        let height = img.height() * max_dots as u32 / img.width();
        img.resize_exact(max_dots as u32, height.max(1), FilterType::Triangle)
    } else {
        img
    };
    let mut gray = img.into_luma8();
    imageops::dither(&mut gray, &BiLevel);
    gray
}

/// Packs a black and white image, dark pixels becoming printed dots.
///
/// The width is rounded up to a multiple of 8 with blank dots. Images whose padded width or
/// height does not fit a `u16` are refused.
pub fn pack(img: &GrayImage) -> Result<PackedImage> {
    let (w, h) = img.dimensions();
    let padded = (w as usize + 7) / 8 * 8;
    let too_large = || Error::ImageTooLarge {
        width: w,
        height: h,
    };
    let width = u16::try_from(padded).map_err(|_| too_large())?;
    let height = u16::try_from(h).map_err(|_| too_large())?;

    let mut bv: BitVec<u8, Msb0> = BitVec::with_capacity(padded * h as usize);
    for row in img.rows() {
        row.for_each(|p| bv.push(p[0] < 128));
        for _ in w as usize..padded {
            bv.push(false);
        }
    }
    debug!(width, height, "packed image");

    Ok(PackedImage {
        width,
        height,
        rows: bv.into_vec(),
    })
}

/// Renders packed rows as `#` and space, one text line per row.
pub fn preview(width: u16, rows: &[u8]) -> String {
    let width = width as usize;
    let mut out = String::new();
    if width == 0 {
        return out;
    }
    rows.view_bits::<Msb0>().chunks(width).for_each(|row| {
        row.iter().for_each(|bit| {
            out.push(if *bit { '#' } else { ' ' });
        });
        out.push('\n');
    });
    out
}

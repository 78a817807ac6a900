//! Thermal Printer from Adafruit interface (A2 micro panel printer)
//!
//! Every operation is encoded as a fixed byte sequence and pushed one byte at a time
//! to a [`Transport`]. Nothing is read back from the printer.

mod config;
mod printer;
mod serial;

#[cfg(feature = "build-binary")]
use clap::ValueEnum;
use std::ops::{BitOr, BitOrAssign};

pub use crate::printer::config::{HeatSettings, PrintDensity, PrinterConfig};
pub use crate::printer::printer::{Printer, WAKE_SETTLE};
pub use crate::printer::serial::{Transport, UnixSerialPort};

/// Maximum number of dots on one line of the print head.
pub const MAX_DOTS_PER_LINE: u16 = 384;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "build-binary", derive(ValueEnum))]
pub enum Underline {
    #[default]
    None = 0,
    Normal = 1,
    Thick = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "build-binary", derive(ValueEnum))]
pub enum Justification {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "build-binary", derive(ValueEnum))]
pub enum Size {
    #[default]
    Small = 0,
    Medium = 10,
    Large = 25,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "build-binary", derive(ValueEnum))]
pub enum Barcode {
    UpcA = 0,
    UpcE = 1,
    Ean13 = 2,
    Ean8 = 3,
    Code39 = 4,
    I25 = 5,
    Codabar = 6,
    Code93 = 7,
    Code128 = 8,
    Code11 = 9,
    Msi = 10,
}

/// The printer's 8-bit print mode register.
///
/// Bits stay set across printed lines until they are cleared again or the register is
/// zeroed with [`Printer::normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PrintMode(u8);

impl PrintMode {
    pub const NORMAL: PrintMode = PrintMode(0);
    pub const INVERSE: PrintMode = PrintMode(1 << 1);
    pub const UPSIDE_DOWN: PrintMode = PrintMode(1 << 2);
    pub const BOLD: PrintMode = PrintMode(1 << 3);
    pub const DOUBLE_HEIGHT: PrintMode = PrintMode(1 << 4);
    pub const DOUBLE_WIDTH: PrintMode = PrintMode(1 << 5);
    pub const STRIKE: PrintMode = PrintMode(1 << 6);

    pub const fn from_bits(bits: u8) -> Self {
        PrintMode(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: PrintMode) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: PrintMode) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: PrintMode) {
        self.0 &= !other.0;
    }
}

impl BitOr for PrintMode {
    type Output = PrintMode;

    fn bitor(self, rhs: PrintMode) -> PrintMode {
        PrintMode(self.0 | rhs.0)
    }
}

impl BitOrAssign for PrintMode {
    fn bitor_assign(&mut self, rhs: PrintMode) {
        self.insert(rhs);
    }
}

const HT: u8 = b'\t';
const LF: u8 = b'\n';
const FF: u8 = 12;
const DC2: u8 = 18;
// dropped from every text stream
const DC3: u8 = 0x13;
const ESC: u8 = 27;
const GS: u8 = 29;
const WAKE: u8 = 0xFF;

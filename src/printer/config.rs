use crate::error::{Error, Result};
use crate::printer::MAX_DOTS_PER_LINE;

/// Thermal head calibration sent by `ESC 7`.
///
/// `heat_time` controls how dark dots come out, `heat_interval` how long the head rests
/// between heating cycles. Units are 10µs on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatSettings {
    pub max_heating_dots: u8,
    pub heat_time: u8,
    pub heat_interval: u8,
}

impl Default for HeatSettings {
    fn default() -> Self {
        Self {
            max_heating_dots: 7,
            heat_time: 150,
            heat_interval: 50,
        }
    }
}

/// Print density and break time, packed into one byte as two nibbles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintDensity {
    pub density: u8,
    pub break_time: u8,
}

impl PrintDensity {
    const NIBBLE_MAX: u8 = 0x0F;

    pub fn byte(&self) -> Result<u8> {
        for (name, value) in [("density", self.density), ("break_time", self.break_time)] {
            if value > Self::NIBBLE_MAX {
                return Err(Error::ParameterOutOfRange {
                    name,
                    value,
                    max: Self::NIBBLE_MAX,
                });
            }
        }
        Ok((self.density << 4) | self.break_time)
    }
}

impl Default for PrintDensity {
    fn default() -> Self {
        Self {
            density: 15,
            break_time: 15,
        }
    }
}

/// Session defaults for a [`Printer`](crate::printer::Printer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    pub heat: HeatSettings,
    pub density: PrintDensity,
    /// Bitmaps wider than this are refused
    pub max_dots: u16,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            heat: HeatSettings::default(),
            density: PrintDensity::default(),
            max_dots: MAX_DOTS_PER_LINE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_packs_nibbles() {
        assert_eq!(PrintDensity::default().byte().unwrap(), 0xFF);
        let d = PrintDensity {
            density: 10,
            break_time: 2,
        };
        assert_eq!(d.byte().unwrap(), 0xA2);
    }

    #[test]
    fn density_rejects_wide_values() {
        let d = PrintDensity {
            density: 16,
            break_time: 0,
        };
        match d.byte() {
            Err(Error::ParameterOutOfRange { name, value, max }) => {
                assert_eq!(name, "density");
                assert_eq!(value, 16);
                assert_eq!(max, 15);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}

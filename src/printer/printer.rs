use crate::bitmap::{Bitmap, ByteSource};
use crate::error::Result;
use crate::printer::serial::Transport;
use crate::printer::{
    Barcode, HeatSettings, Justification, PrintDensity, PrintMode, PrinterConfig, Size, Underline,
    DC2, DC3, ESC, FF, GS, HT, LF, WAKE,
};
use std::time::Duration;
use tracing::{debug, trace};

/// How long the printer needs after [`Printer::wake`] before it accepts commands.
pub const WAKE_SETTLE: Duration = Duration::from_millis(50);

/// A session with one printer.
///
/// Every operation writes its bytes straight to the transport, in order, and returns once
/// the last one is out. If a write fails the printer is left mid-command; call
/// [`Printer::reset`] before using the session again.
pub struct Printer<P: Transport> {
    port: P,
    config: PrinterConfig,
    print_mode: PrintMode,
}

impl<P: Transport> Printer<P> {
    pub fn new(port: P) -> Self {
        Self::with_config(port, PrinterConfig::default())
    }

    pub fn with_config(port: P, config: PrinterConfig) -> Self {
        Self {
            port,
            config,
            print_mode: PrintMode::NORMAL,
        }
    }

    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    pub fn print_mode(&self) -> PrintMode {
        self.print_mode
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_port(self) -> P {
        self.port
    }

    /// Raw command bytes, sent as-is.
    pub fn write_bytes(&mut self, cmd: &[u8]) -> Result<()> {
        for b in cmd {
            self.port.write_byte(*b)?;
        }
        Ok(())
    }

    /// Text byte. DC3 is swallowed here.
    fn write(&mut self, c: u8) -> Result<()> {
        if c == DC3 {
            return Ok(());
        }
        self.port.write_byte(c)?;
        Ok(())
    }

    /// Resets the printer and calibrates the head. First call of every session.
    pub fn begin(&mut self, heat_time: u8) -> Result<()> {
        debug!(heat_time, "begin session");
        self.reset()?;
        self.calibrate(heat_time)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.write_bytes(&[ESC, b'@'])
    }

    /// Heat settings from the config with `heat_time` swapped in, then the print density.
    pub fn calibrate(&mut self, heat_time: u8) -> Result<()> {
        let heat = HeatSettings {
            heat_time,
            ..self.config.heat
        };
        self.set_heat_settings(heat)?;
        self.set_print_density(self.config.density)
    }

    pub fn set_heat_settings(&mut self, heat: HeatSettings) -> Result<()> {
        trace!(?heat, "heat settings");
        self.write_bytes(&[
            ESC,
            b'7',
            heat.max_heating_dots,
            heat.heat_time,
            heat.heat_interval,
        ])
    }

    pub fn set_print_density(&mut self, density: PrintDensity) -> Result<()> {
        let byte = density.byte()?;
        self.write_bytes(&[DC2, b'#', byte])
    }

    /// Online, normal mode, no underline, left aligned, line height 32, barcode height 50.
    pub fn set_default_formatting(&mut self) -> Result<()> {
        self.online()?;
        self.normal()?;
        self.underline_off()?;
        self.justify(Justification::Left)?;
        self.set_line_height(32)?;
        self.set_barcode_height(50)
    }

    pub fn feed(&mut self, lines: u8) -> Result<()> {
        for _ in 0..lines {
            self.write(LF)?;
        }
        Ok(())
    }

    /// Feeds by the given number of dot rows.
    pub fn feed_rows(&mut self, rows: u8) -> Result<()> {
        self.write_bytes(&[ESC, b'J', rows])
    }

    pub fn flush(&mut self) -> Result<()> {
        self.write_bytes(&[FF])
    }

    pub fn print_test_page(&mut self) -> Result<()> {
        self.write_bytes(&[DC2, b'T'])
    }

    pub fn print(&mut self, s: &str) -> Result<()> {
        for c in s.bytes() {
            self.write(c)?;
        }
        Ok(())
    }

    pub fn print_line(&mut self, s: &str) -> Result<()> {
        self.print(s)?;
        self.write(LF)
    }

    pub fn tab(&mut self) -> Result<()> {
        self.write(HT)
    }

    pub fn set_print_mode(&mut self, mask: PrintMode) -> Result<()> {
        self.print_mode.insert(mask);
        self.write_print_mode()
    }

    pub fn unset_print_mode(&mut self, mask: PrintMode) -> Result<()> {
        self.print_mode.remove(mask);
        self.write_print_mode()
    }

    fn write_print_mode(&mut self) -> Result<()> {
        trace!(mode = self.print_mode.bits(), "print mode");
        self.write_bytes(&[ESC, b'!', self.print_mode.bits()])
    }

    /// Clears bold, inverse, strike, upside down and double size.
    ///
    /// Underline, justification and line height are separate settings and stay as they are.
    pub fn normal(&mut self) -> Result<()> {
        self.print_mode = PrintMode::NORMAL;
        self.write_print_mode()
    }

    pub fn inverse_on(&mut self) -> Result<()> {
        self.set_print_mode(PrintMode::INVERSE)
    }

    pub fn inverse_off(&mut self) -> Result<()> {
        self.unset_print_mode(PrintMode::INVERSE)
    }

    pub fn upside_down_on(&mut self) -> Result<()> {
        self.set_print_mode(PrintMode::UPSIDE_DOWN)
    }

    pub fn upside_down_off(&mut self) -> Result<()> {
        self.unset_print_mode(PrintMode::UPSIDE_DOWN)
    }

    pub fn bold_on(&mut self) -> Result<()> {
        self.set_print_mode(PrintMode::BOLD)
    }

    pub fn bold_off(&mut self) -> Result<()> {
        self.unset_print_mode(PrintMode::BOLD)
    }

    pub fn double_height_on(&mut self) -> Result<()> {
        self.set_print_mode(PrintMode::DOUBLE_HEIGHT)
    }

    pub fn double_height_off(&mut self) -> Result<()> {
        self.unset_print_mode(PrintMode::DOUBLE_HEIGHT)
    }

    pub fn double_width_on(&mut self) -> Result<()> {
        self.set_print_mode(PrintMode::DOUBLE_WIDTH)
    }

    pub fn double_width_off(&mut self) -> Result<()> {
        self.unset_print_mode(PrintMode::DOUBLE_WIDTH)
    }

    pub fn strike_on(&mut self) -> Result<()> {
        self.set_print_mode(PrintMode::STRIKE)
    }

    pub fn strike_off(&mut self) -> Result<()> {
        self.unset_print_mode(PrintMode::STRIKE)
    }

    pub fn set_size(&mut self, size: Size) -> Result<()> {
        self.write_bytes(&[GS, b'!', size as u8, 10])
    }

    pub fn underline_on(&mut self, weight: Underline) -> Result<()> {
        self.write_bytes(&[ESC, b'-', weight as u8])
    }

    pub fn underline_off(&mut self) -> Result<()> {
        self.underline_on(Underline::None)
    }

    pub fn justify(&mut self, position: Justification) -> Result<()> {
        self.write_bytes(&[ESC, b'a', position as u8])
    }

    pub fn set_line_height(&mut self, val: u8) -> Result<()> {
        self.write_bytes(&[ESC, b'3', val])
    }

    pub fn set_barcode_height(&mut self, val: u8) -> Result<()> {
        self.write_bytes(&[GS, b'h', val])
    }

    pub fn print_barcode(&mut self, s: &str, barcode_type: Barcode) -> Result<()> {
        debug!(?barcode_type, len = s.len(), "barcode");
        self.write_bytes(&[GS, b'k', barcode_type as u8])?;
        for c in s.bytes() {
            self.write(c)?;
        }
        // terminator
        self.write(0)
    }

    /// Prints a bitmap as a sequence of raster chunks.
    ///
    /// A bitmap wider than the configured maximum is refused with
    /// [`Error::BitmapTooWide`](crate::Error::BitmapTooWide) and nothing is written.
    pub fn print_bitmap<S: ByteSource>(&mut self, bitmap: Bitmap<S>) -> Result<()> {
        for chunk in bitmap.chunks(self.config.max_dots)? {
            chunk?.write_to(&mut self.port)?;
        }
        Ok(())
    }

    /// Print commands are ignored until [`Printer::online`].
    pub fn offline(&mut self) -> Result<()> {
        self.write_bytes(&[ESC, b'=', 0])
    }

    pub fn online(&mut self) -> Result<()> {
        self.write_bytes(&[ESC, b'=', 1])
    }

    /// Low power mode, right away.
    pub fn sleep(&mut self) -> Result<()> {
        self.sleep_after(0)
    }

    pub fn sleep_after(&mut self, seconds: u8) -> Result<()> {
        self.write_bytes(&[ESC, b'8', seconds])
    }

    /// Wakes the printer up.
    ///
    /// Returns how long to hold off before sending the next command. The printer drops
    /// anything it receives during that time.
    #[must_use = "the printer ignores commands until the settle delay has passed"]
    pub fn wake(&mut self) -> Result<Duration> {
        self.write_bytes(&[WAKE])?;
        Ok(WAKE_SETTLE)
    }
}

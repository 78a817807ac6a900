use serial::core::{SerialDevice, SerialPortSettings};
use serial::SerialPort as _;
use serial::SystemPort;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// The only thing the printer needs from its connection: bytes, one at a time, in order.
pub trait Transport {
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_byte(byte)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_byte(byte)
    }
}

/// Captures the byte stream, for dry runs and tests.
impl Transport for Vec<u8> {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.push(byte);
        Ok(())
    }
}

/// 8N1 serial line with XON/XOFF flow control, as the A2 expects.
pub struct UnixSerialPort<const BAUDRATE: u32 = 19200> {
    port: SystemPort,
}

impl<const BAUDRATE: u32> UnixSerialPort<BAUDRATE> {
    // a byte is 11 bits on the wire
    pub const BYTE_DURATION: Duration =
        Duration::from_micros(((11 * 1000000) + BAUDRATE / 2) as u64 / BAUDRATE as u64);

    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let port = serial::open(path.as_ref().as_os_str())?;
        Self::new(port)
    }

    pub fn new(mut port: SystemPort) -> io::Result<Self> {
        port.reconfigure(&|settings| {
            settings.set_baud_rate(serial::BaudRate::from_speed(BAUDRATE as usize))?;
            settings.set_char_size(serial::Bits8);
            settings.set_parity(serial::ParityNone);
            settings.set_stop_bits(serial::Stop1);
            settings.set_flow_control(serial::FlowControl::FlowSoftware);
            Ok(())
        })?;
        <SystemPort as serial::SerialPort>::set_timeout(&mut port, Duration::from_millis(100))?;

        let settings = port.read_settings()?;
        debug!(
            baud = ?settings.baud_rate(),
            byte_duration_us = Self::BYTE_DURATION.as_micros() as u64,
            "serial port configured"
        );
        Ok(Self { port })
    }
}

impl<const BAUDRATE: u32> Transport for UnixSerialPort<BAUDRATE> {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.port.write_all(&[byte])
    }
}

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::thread;

use a2print::bitmap::{self, raster};
use a2print::{
    Barcode, Bitmap, ByteSource, Error, Justification, PrintMode, Printer, PrinterConfig, Size,
    Transport, Underline, UnixSerialPort,
};
use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Print to an A2 thermal printer over serial
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Serial device the printer is attached to
    #[clap(long, env = "A2PRINT_PORT", default_value = "/dev/ttyUSB0")]
    port: PathBuf,

    /// Write the raw byte stream to a file ("-" for stdout) instead of the printer
    #[clap(long, short)]
    output: Option<PathBuf>,

    /// Dot heating time, in units of 10µs
    #[clap(long, env = "A2PRINT_HEAT_TIME", default_value_t = 150)]
    heat_time: u8,

    /// Blank lines fed after the job
    #[clap(long, default_value_t = 3)]
    feed: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the built-in test page
    TestPage,
    /// Print a line of text
    Text {
        text: String,
        #[clap(long)]
        bold: bool,
        #[clap(long)]
        inverse: bool,
        #[clap(long)]
        double_height: bool,
        #[clap(long)]
        double_width: bool,
        #[clap(long)]
        strike: bool,
        #[clap(long)]
        upside_down: bool,
        #[clap(long, value_enum)]
        underline: Option<Underline>,
        #[clap(long, value_enum)]
        justify: Option<Justification>,
        #[clap(long, value_enum)]
        size: Option<Size>,
    },
    /// Print a barcode
    Barcode {
        text: String,
        #[clap(long, value_enum, default_value = "code128")]
        symbology: Barcode,
        /// Barcode height in dots
        #[clap(long, default_value_t = 50)]
        height: u8,
    },
    /// Print a bitmap file (u16 LE width and height, then packed rows)
    Bitmap { path: PathBuf },
    /// Convert and print an image
    Image { path: PathBuf },
    /// Feed paper by a number of dot rows
    Feed { rows: u8 },
    /// Put the printer to sleep
    Sleep {
        #[clap(default_value_t = 0)]
        seconds: u8,
    },
    /// Wake the printer up
    Wake,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

pub fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = PrinterConfig::default();

    match &cli.output {
        Some(path) => {
            let mut printer = Printer::with_config(Vec::new(), config);
            run(&mut printer, &cli)?;
            let bytes = printer.into_port();
            if path.as_os_str() == "-" {
                io::stdout().write_all(&bytes)?;
            } else {
                fs::write(path, &bytes)
                    .with_context(|| format!("Could not write {}", path.display()))?;
            }
            info!(bytes = bytes.len(), "wrote byte stream");
        }
        None => {
            let port = UnixSerialPort::<19200>::open(&cli.port)
                .with_context(|| format!("Could not open {}", cli.port.display()))?;
            let mut printer = Printer::with_config(port, config);
            run(&mut printer, &cli)?;
        }
    }

    Ok(())
}

fn run<P: Transport>(printer: &mut Printer<P>, cli: &Cli) -> anyhow::Result<()> {
    // power commands go out on their own, without resetting the printer
    let session = !matches!(cli.command, Commands::Sleep { .. } | Commands::Wake);
    if session {
        info!("{}: Initializing", Utc::now().time());
        printer.begin(cli.heat_time)?;
    }

    match &cli.command {
        Commands::TestPage => printer.print_test_page()?,
        Commands::Text {
            text,
            bold,
            inverse,
            double_height,
            double_width,
            strike,
            upside_down,
            underline,
            justify,
            size,
        } => {
            let mut mode = PrintMode::NORMAL;
            for (on, bit) in [
                (bold, PrintMode::BOLD),
                (inverse, PrintMode::INVERSE),
                (double_height, PrintMode::DOUBLE_HEIGHT),
                (double_width, PrintMode::DOUBLE_WIDTH),
                (strike, PrintMode::STRIKE),
                (upside_down, PrintMode::UPSIDE_DOWN),
            ] {
                if *on {
                    mode |= bit;
                }
            }
            printer.set_default_formatting()?;
            if let Some(size) = size {
                printer.set_size(*size)?;
            }
            if let Some(underline) = underline {
                printer.underline_on(*underline)?;
            }
            if let Some(justify) = justify {
                printer.justify(*justify)?;
            }
            printer.set_print_mode(mode)?;
            printer.print_line(text)?;
            printer.normal()?;
        }
        Commands::Barcode {
            text,
            symbology,
            height,
        } => {
            printer.set_barcode_height(*height)?;
            printer.print_barcode(text, *symbology)?;
        }
        Commands::Bitmap { path } => {
            let file =
                File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
            let bitmap = bitmap::from_source(BufReader::new(file))?;
            print_or_skip(printer, bitmap)?;
        }
        Commands::Image { path } => {
            let img = image::open(path)
                .with_context(|| format!("Could not read image {}", path.display()))?;
            let packed = raster::pack(&raster::prepare(img, printer.config().max_dots))?;
            print_or_skip(printer, packed.bitmap()?)?;
        }
        Commands::Feed { rows } => printer.feed_rows(*rows)?,
        Commands::Sleep { seconds } => printer.sleep_after(*seconds)?,
        Commands::Wake => {
            let settle = printer.wake()?;
            thread::sleep(settle);
        }
    }

    if session {
        printer.feed(cli.feed)?;
        info!("{}: Finished", Utc::now().time());
    }
    Ok(())
}

/// Bitmaps that are too wide are skipped with a warning rather than failing the job.
fn print_or_skip<P: Transport, S: ByteSource>(
    printer: &mut Printer<P>,
    bitmap: Bitmap<S>,
) -> anyhow::Result<()> {
    match printer.print_bitmap(bitmap) {
        Err(Error::BitmapTooWide { width, max }) => {
            warn!(width, max, "bitmap too wide, skipped");
            Ok(())
        }
        res => Ok(res?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2print::bitmap::with_dimensions;

    #[test]
    fn too_wide_bitmap_is_skipped() {
        let rows = vec![0xFFu8; 49 * 3];
        let mut printer = Printer::new(Vec::new());
        let bitmap = with_dimensions(392, 3, rows.as_slice()).unwrap();

        print_or_skip(&mut printer, bitmap).unwrap();
        assert!(printer.into_port().is_empty());
    }

    #[test]
    fn other_bitmap_errors_still_fail() {
        let rows = vec![0xFFu8; 48];
        let mut printer = Printer::new(Vec::new());
        let bitmap = with_dimensions(384, 2, rows.as_slice()).unwrap();

        let err = print_or_skip(&mut printer, bitmap).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::SourceExhausted { .. })
        ));
    }

    #[test]
    fn fitting_bitmap_is_printed() {
        let rows = vec![0x0Fu8; 2];
        let mut printer = Printer::new(Vec::new());
        let bitmap = with_dimensions(16, 1, rows.as_slice()).unwrap();

        print_or_skip(&mut printer, bitmap).unwrap();
        assert_eq!(printer.into_port(), vec![18, 42, 1, 2, 0x0F, 0x0F]);
    }
}

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::PathBuf;

use a2print::bitmap::{self, raster, ByteSource};
use a2print::MAX_DOTS_PER_LINE;
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about = "Convert images to printer bitmaps", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dither an image and write it as a self-describing bitmap
    Convert {
        image: PathBuf,
        #[clap(long, short)]
        output: Option<PathBuf>,
        /// Images wider than this are scaled down
        #[clap(long, default_value_t = MAX_DOTS_PER_LINE)]
        max_width: u16,
    },
    /// Show a bitmap file as text
    Preview { path: PathBuf },
}

pub fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Convert {
            image: input,
            output,
            max_width,
        } => {
            let img = image::open(input)
                .with_context(|| format!("Could not read image {}", input.display()))?;
            let packed = raster::pack(&raster::prepare(img, *max_width))?;
            info!(width = packed.width, height = packed.height, "image dimensions");

            let output = output
                .clone()
                .unwrap_or_else(|| input.with_extension("a2b"));
            fs::write(&output, packed.to_self_describing())
                .with_context(|| format!("Could not write {}", output.display()))?;
            print!("{}", raster::preview(packed.width, &packed.rows));
        }
        Commands::Preview { path } => {
            let file =
                File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
            let bitmap = bitmap::from_source(BufReader::new(file))?;
            let width = bitmap.width();
            let len = bitmap.row_width() as usize * bitmap.height() as usize;
            let rows = bitmap.into_source().pull_exact(len)?;
            print!("{}", raster::preview(width, &rows));
        }
    }

    Ok(())
}

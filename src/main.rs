// CLI entry point. Mirrors 40image.c's `-c|-d [filename]` dispatch and
// ppmdiff.c's `A B` comparison, as a single `clap`-derived binary with
// three subcommands instead of two separate programs.

use std::fs::File;
use std::io::{self, Read};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

use ppmvc::diff::rms_diff;
use ppmvc::error::CodecError;
use ppmvc::pipeline::{compress, decompress};
use ppmvc::ppm::read_ppm;

#[derive(Parser)]
#[command(name = "ppmvc", about = "Lossy 2x2-block DCT codec for 24-bit RGB PPM images")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Compress a PPM image to the codec's compressed format.
  Compress {
    /// Input PPM file; omit or pass `-` to read standard input.
    file: Option<String>,
  },
  /// Decompress a compressed stream back to a PPM image.
  Decompress {
    /// Input compressed file; omit or pass `-` to read standard input.
    file: Option<String>,
  },
  /// Compare two PPM images and print their RMS pixel difference.
  Diff {
    /// First image, or `-` for standard input.
    a: String,
    /// Second image, or `-` for standard input.
    b: String,
  },
}

fn open_input(file: &Option<String>) -> io::Result<Box<dyn Read>> {
  match file.as_deref() {
    None | Some("-") => Ok(Box::new(io::stdin())),
    Some(path) => Ok(Box::new(File::open(path)?)),
  }
}

fn run() -> Result<(), CodecError> {
  env_logger::init();
  let cli = Cli::parse();

  match cli.command {
    Command::Compress { file } => {
      let mut input = open_input(&file)?;
      let stdout = io::stdout();
      let mut out = stdout.lock();
      compress(&mut input, &mut out)
    }
    Command::Decompress { file } => {
      let mut input = open_input(&file)?;
      let stdout = io::stdout();
      let mut out = stdout.lock();
      decompress(&mut input, &mut out)
    }
    Command::Diff { a, b } => {
      if a == "-" && b == "-" {
        return Err(CodecError::BadArguments(
          "at most one of A, B may be '-' (standard input)".into(),
        ));
      }

      let mut input_a = open_input(&Some(a))?;
      let mut input_b = open_input(&Some(b))?;
      let image_a = read_ppm(&mut input_a)?;
      let image_b = read_ppm(&mut input_b)?;

      match rms_diff(&image_a, &image_b) {
        Ok(e) => {
          println!("{:.4}", e);
          Ok(())
        }
        Err(err) => {
          println!("1.0");
          Err(err)
        }
      }
    }
  }
}

fn main() -> ExitCode {
  match run() {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      error!("{}", err);
      eprintln!("ppmvc: {}", err);
      ExitCode::FAILURE
    }
  }
}

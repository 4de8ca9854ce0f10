// Pipeline driver (Module G): composes the stages above into
// compress/decompress over whole byte streams, plus the trim step
// (spec.md §4.2) that the original's `compress40.c::trim` performs as
// an explicit step rather than a read-time side effect.

use std::io::{Read, Write};

use log::debug;

use crate::block::{blockify, unblockify};
use crate::bytestream::{read_codewords, write_codewords};
use crate::codeword::{pack, unpack};
use crate::color::{rgb_to_vc, vc_to_rgb, Rgb};
use crate::error::{CodecError, Result};
use crate::ppm::{read_ppm, write_ppm, Ppm};
use crate::raster::Raster;

const HEADER: &str = "COMP40 Compressed image format 2\n";

/// Drop an odd trailing column/row so both dimensions are even. A
/// raster that's already even is returned unchanged (no copy required,
/// satisfying P7).
pub fn trim(pixels: &Raster<Rgb>) -> Raster<Rgb> {
  let rows = pixels.rows() - (pixels.rows() % 2);
  let cols = pixels.cols() - (pixels.cols() % 2);
  if rows == pixels.rows() && cols == pixels.cols() {
    return pixels.clone();
  }
  Raster::new_with(rows, cols, |row, col| pixels[row][col])
}

/// Compress a PPM byte stream into the codec's compressed format.
pub fn compress<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<()> {
  let ppm = read_ppm(input)?;
  debug!("compress: read {}x{} PPM, maxval={}", ppm.width, ppm.height, ppm.maxval);

  if ppm.width < 2 || ppm.height < 2 {
    return Err(CodecError::InvalidPpm(format!(
      "image too small to compress: {}x{} (need at least 2x2)",
      ppm.width, ppm.height
    )));
  }

  let trimmed = trim(&ppm.pixels);
  let width = trimmed.cols();
  let height = trimmed.rows();
  debug!("compress: trimmed to {}x{}", width, height);

  let vc = rgb_to_vc(&trimmed, ppm.maxval);
  let blocks = blockify(&vc);
  debug!("compress: {} codewords", blocks.rows() * blocks.cols());

  let mut codewords = Vec::with_capacity(blocks.rows() * blocks.cols());
  for row in 0..blocks.rows() {
    for col in 0..blocks.cols() {
      codewords.push(pack(blocks[row][col])?);
    }
  }

  write!(output, "{}{} {}\n", HEADER, width, height)?;
  write_codewords(output, &codewords)?;
  Ok(())
}

/// Decompress a compressed byte stream back into a binary PPM, using a
/// fixed `maxval = 255` (the compressed stream carries no maxval).
pub fn decompress<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<()> {
  let mut header_buf = vec![0u8; HEADER.len()];
  input.read_exact(&mut header_buf).map_err(CodecError::from)?;
  if header_buf != HEADER.as_bytes() {
    return Err(CodecError::BadHeader);
  }

  let (width, height) = read_dimensions(input)?;
  debug!("decompress: header declares {}x{}", width, height);

  if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
    return Err(CodecError::InvalidPpm(format!(
      "compressed stream dimensions must be even and positive, got {}x{}",
      width, height
    )));
  }

  let block_rows = height / 2;
  let block_cols = width / 2;
  let expected = block_rows * block_cols;
  let codewords = read_codewords(input, expected)?;

  let mut blocks = Raster::zeroed(block_rows, block_cols);
  let mut idx = 0;
  for row in 0..block_rows {
    for col in 0..block_cols {
      blocks[row][col] = unpack(codewords[idx])?;
      idx += 1;
    }
  }

  let vc = unblockify(&blocks);
  let pixels = vc_to_rgb(&vc, 255);

  let ppm = Ppm { width, height, maxval: 255, pixels };
  write_ppm(output, &ppm)?;
  Ok(())
}

fn read_dimensions<R: Read>(input: &mut R) -> Result<(usize, usize)> {
  use byteorder::ReadBytesExt;

  let read_decimal = |input: &mut R, first: Option<u8>| -> Result<(usize, u8)> {
    let mut byte = match first {
      Some(b) => b,
      None => input.read_u8().map_err(CodecError::from)?,
    };
    let mut v: usize = 0;
    let mut any = false;
    loop {
      if byte.is_ascii_digit() {
        v = v * 10 + (byte - b'0') as usize;
        any = true;
        byte = input.read_u8().map_err(CodecError::from)?;
      } else if any {
        return Ok((v, byte));
      } else {
        return Err(CodecError::BadHeader);
      }
    }
  };

  let (width, sep) = read_decimal(input, None)?;
  if sep != b' ' {
    return Err(CodecError::BadHeader);
  }
  let (height, sep) = read_decimal(input, None)?;
  if sep != b'\n' {
    return Err(CodecError::BadHeader);
  }
  Ok((width, height))
}

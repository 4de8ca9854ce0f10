// PPM (binary/"P6") reader and writer. Listed in spec.md §1/§6 as an
// external collaborator, but no such crate exists in the retrieved
// dependency pack, so it's implemented here the way tinyavif's y4m.rs
// hand-parses its own text+binary header: read one byte at a time,
// branch on it, skip `#` comments, stop at the first run of whitespace
// after each token.

use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::color::Rgb;
use crate::error::{CodecError, Result};
use crate::raster::Raster;

pub struct Ppm {
  pub width: usize,
  pub height: usize,
  pub maxval: u16,
  pub pixels: Raster<Rgb>,
}

fn skip_whitespace_and_comments<R: Read>(r: &mut R) -> Result<u8> {
  loop {
    let byte = r.read_u8().map_err(CodecError::from)?;
    match byte {
      b' ' | b'\t' | b'\r' | b'\n' => continue,
      b'#' => {
        while r.read_u8().map_err(CodecError::from)? != b'\n' {}
      }
      other => return Ok(other),
    }
  }
}

fn read_decimal<R: Read>(r: &mut R, first: u8) -> Result<(usize, u8)> {
  if !first.is_ascii_digit() {
    return Err(CodecError::InvalidPpm("expected a decimal number".into()));
  }
  let mut v = (first - b'0') as usize;
  loop {
    let byte = r.read_u8().map_err(CodecError::from)?;
    if byte.is_ascii_digit() {
      v = v * 10 + (byte - b'0') as usize;
    } else {
      return Ok((v, byte));
    }
  }
}

/// Read a binary ("P6") PPM image.
pub fn read_ppm<R: Read>(r: &mut R) -> Result<Ppm> {
  let mut magic = [0u8; 2];
  r.read_exact(&mut magic).map_err(CodecError::from)?;
  if &magic != b"P6" {
    return Err(CodecError::InvalidPpm(format!(
      "unsupported PPM magic {:?} (only binary P6 is supported)",
      magic
    )));
  }

  let next = skip_whitespace_and_comments(r)?;
  let (width, next) = read_decimal(r, next)?;
  let next = skip_whitespace_and_comments_from(r, next)?;
  let (height, next) = read_decimal(r, next)?;
  let next = skip_whitespace_and_comments_from(r, next)?;
  let (maxval, _trailing_whitespace) = read_decimal(r, next)?;

  if width == 0 || height == 0 {
    return Err(CodecError::InvalidPpm(format!("invalid PPM size {}x{}", width, height)));
  }
  if maxval == 0 || maxval > 65535 {
    return Err(CodecError::InvalidPpm(format!("invalid PPM maxval {}", maxval)));
  }

  debug!("read_ppm: {}x{} maxval={}", width, height, maxval);

  let wide = maxval > 255;
  let mut pixels = Raster::zeroed(height, width);
  for row in 0..height {
    for col in 0..width {
      let (red, green, blue) = if wide {
        (r.read_u16::<byteorder::BigEndian>()?, r.read_u16::<byteorder::BigEndian>()?, r.read_u16::<byteorder::BigEndian>()?)
      } else {
        (r.read_u8()? as u16, r.read_u8()? as u16, r.read_u8()? as u16)
      };
      pixels[row][col] = Rgb { red, green, blue };
    }
  }

  Ok(Ppm { width, height, maxval: maxval as u16, pixels })
}

fn skip_whitespace_and_comments_from<R: Read>(r: &mut R, first: u8) -> Result<u8> {
  let mut byte = first;
  loop {
    match byte {
      b' ' | b'\t' | b'\r' | b'\n' => {
        byte = r.read_u8().map_err(CodecError::from)?;
      }
      b'#' => {
        while r.read_u8().map_err(CodecError::from)? != b'\n' {}
        byte = r.read_u8().map_err(CodecError::from)?;
      }
      other => return Ok(other),
    }
  }
}

/// Write a binary ("P6") PPM image. Channel values are saturated into
/// `[0, maxval]` by the caller before they reach here (see `color::vc_to_rgb`).
pub fn write_ppm<W: Write>(w: &mut W, ppm: &Ppm) -> Result<()> {
  write!(w, "P6\n{} {}\n{}\n", ppm.width, ppm.height, ppm.maxval)?;
  let wide = ppm.maxval > 255;
  for row in 0..ppm.height {
    for col in 0..ppm.width {
      let p = ppm.pixels[row][col];
      if wide {
        w.write_u16::<byteorder::BigEndian>(p.red)?;
        w.write_u16::<byteorder::BigEndian>(p.green)?;
        w.write_u16::<byteorder::BigEndian>(p.blue)?;
      } else {
        w.write_u8(p.red as u8)?;
        w.write_u8(p.green as u8)?;
        w.write_u8(p.blue as u8)?;
      }
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trip_small_image() {
    let mut pixels = Raster::zeroed(2, 2);
    pixels[0][0] = Rgb { red: 1, green: 2, blue: 3 };
    pixels[0][1] = Rgb { red: 4, green: 5, blue: 6 };
    pixels[1][0] = Rgb { red: 7, green: 8, blue: 9 };
    pixels[1][1] = Rgb { red: 10, green: 11, blue: 12 };
    let ppm = Ppm { width: 2, height: 2, maxval: 255, pixels };

    let mut buf = Vec::new();
    write_ppm(&mut buf, &ppm).unwrap();

    let mut cursor = std::io::Cursor::new(buf);
    let read_back = read_ppm(&mut cursor).unwrap();
    assert_eq!(read_back.width, 2);
    assert_eq!(read_back.height, 2);
    assert_eq!(read_back.maxval, 255);
    assert_eq!(read_back.pixels[1][1], Rgb { red: 10, green: 11, blue: 12 });
  }

  #[test]
  fn rejects_bad_magic() {
    let mut cursor = std::io::Cursor::new(b"P3\n2 2\n255\n".to_vec());
    let err = read_ppm(&mut cursor).unwrap_err();
    assert!(matches!(err, CodecError::InvalidPpm(_)));
  }
}

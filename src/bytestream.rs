// Byte serializer (Module F): 32-bit codewords <-> a big-endian byte
// stream. Grounded on isobmff.rs's explicit big-endian byte writes and
// y4m.rs's use of `byteorder` for binary I/O; here we use
// `byteorder::{BigEndian, ReadBytesExt, WriteBytesExt}` directly rather
// than hand-rolled shifts, since spec.md §9 calls out that hand-rolled
// shift amounts have historically been a source of endianness bugs.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{CodecError, Result};

/// Write codewords in row-major order, each as 4 big-endian bytes.
pub fn write_codewords<W: Write>(w: &mut W, codewords: &[u32]) -> Result<()> {
  for &c in codewords {
    w.write_u32::<BigEndian>(c)?;
  }
  Ok(())
}

/// Read exactly `count` big-endian 32-bit codewords. Fewer bytes than
/// expected is `TruncatedStream`.
pub fn read_codewords<R: Read>(r: &mut R, count: usize) -> Result<Vec<u32>> {
  let mut out = Vec::with_capacity(count);
  for i in 0..count {
    match r.read_u32::<BigEndian>() {
      Ok(word) => out.push(word),
      Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
        return Err(CodecError::TruncatedStream { expected: count, got: i });
      }
      Err(e) => return Err(e.into()),
    }
  }
  Ok(out)
}

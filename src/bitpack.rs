// Fixed-width signed/unsigned field insertion and extraction in a 64-bit
// word. Every other stage that needs to pack or unpack a field goes
// through here rather than using native `<<`/`>>`, since a shift by
// exactly 64 (which legitimately occurs when width+lsb == 64) is
// undefined behaviour for the machine shift on a 64-bit operand.

use crate::error::CodecError;

/// Left-shift that saturates to 0 for `shift >= 64`, instead of relying
/// on (undefined, on some targets) wraparound of a native `<<`.
pub fn shl(n: u64, shift: u32) -> u64 {
  if shift >= 64 {
    0
  } else {
    n << shift
  }
}

/// Logical right-shift that saturates to 0 for `shift >= 64`.
pub fn shr_u(n: u64, shift: u32) -> u64 {
  if shift >= 64 {
    0
  } else {
    n >> shift
  }
}

/// Arithmetic right-shift that saturates to 0 or -1 for `shift >= 64`,
/// depending on the sign of `n`.
pub fn shr_s(n: i64, shift: u32) -> i64 {
  if shift >= 64 {
    if n < 0 {
      -1
    } else {
      0
    }
  } else {
    n >> shift
  }
}

/// True iff `n` can be represented in `w` bits, unsigned.
pub fn fits_u(n: u64, w: u32) -> bool {
  let limit = shl(1, w);
  n < limit || limit == 0
}

/// True iff `n` can be represented in `w` bits, two's-complement signed.
pub fn fits_s(n: i64, w: u32) -> bool {
  let limit = shl(1, w.saturating_sub(1)) as i64;
  (n < limit && n >= -limit) || shl(1, w) == 0
}

fn check_field(w: u32, lsb: u32) -> crate::error::Result<()> {
  if w > 64 || w + lsb > 64 {
    return Err(CodecError::FieldOutOfRange { width: w, lsb });
  }
  Ok(())
}

/// Extract `w` bits starting at `lsb` from `word`, zero-extended.
pub fn get_u(word: u64, w: u32, lsb: u32) -> crate::error::Result<u64> {
  check_field(w, lsb)?;
  let mask = shl(shl(1, w).wrapping_sub(1), lsb);
  Ok(shr_u(word & mask, lsb))
}

/// Extract `w` bits starting at `lsb` from `word`, sign-extended from
/// bit `lsb + w - 1`.
pub fn get_s(word: u64, w: u32, lsb: u32) -> crate::error::Result<i64> {
  check_field(w, lsb)?;
  let mask = shl(shl(1, w).wrapping_sub(1), lsb);
  let offset = 64 - w - lsb;
  let shifted = shl(word & mask, offset);
  Ok(shr_s(shifted as i64, lsb + offset))
}

/// Return `word` with the `w`-bit unsigned field at `lsb` replaced by `value`.
pub fn new_u(word: u64, w: u32, lsb: u32, value: u64) -> crate::error::Result<u64> {
  check_field(w, lsb)?;
  if !fits_u(value, w) {
    return Err(CodecError::Overflow { width: w });
  }
  let mask = shl(shl(1, w).wrapping_sub(1), lsb);
  Ok((word & !mask) | shl(value, lsb))
}

/// Return `word` with the `w`-bit signed field at `lsb` replaced by `value`.
pub fn new_s(word: u64, w: u32, lsb: u32, value: i64) -> crate::error::Result<u64> {
  check_field(w, lsb)?;
  if !fits_s(value, w) {
    return Err(CodecError::Overflow { width: w });
  }
  let mask = shl(shl(1, w).wrapping_sub(1), lsb);
  let bits = mask & shl(value as u64, lsb);
  Ok((word & !mask) | bits)
}

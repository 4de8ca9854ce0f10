// Codeword coder (Module E): pack/unpack the six quantized fields
// into/from a 32-bit codeword at the fixed bit positions of spec.md §3.

use crate::bitpack::{get_s, get_u, new_s, new_u};
use crate::block::QuantizedBlock;
use crate::error::Result;

const PR_IDX_LSB: u32 = 0;
const PR_IDX_W: u32 = 4;
const PB_IDX_LSB: u32 = 4;
const PB_IDX_W: u32 = 4;
const D_LSB: u32 = 8;
const D_W: u32 = 5;
const C_LSB: u32 = 13;
const C_W: u32 = 5;
const B_LSB: u32 = 18;
const B_W: u32 = 5;
const A_LSB: u32 = 23;
const A_W: u32 = 9;

/// Pack a quantized block's six fields into a 32-bit codeword.
pub fn pack(q: QuantizedBlock) -> Result<u32> {
  let mut word = 0u64;
  word = new_u(word, PR_IDX_W, PR_IDX_LSB, q.pr_idx as u64)?;
  word = new_u(word, PB_IDX_W, PB_IDX_LSB, q.pb_idx as u64)?;
  word = new_s(word, D_W, D_LSB, q.d as i64)?;
  word = new_s(word, C_W, C_LSB, q.c as i64)?;
  word = new_s(word, B_W, B_LSB, q.b as i64)?;
  word = new_u(word, A_W, A_LSB, q.a as u64)?;
  Ok(word as u32)
}

/// Unpack a 32-bit codeword back into its six quantized fields.
pub fn unpack(codeword: u32) -> Result<QuantizedBlock> {
  let word = codeword as u64;
  Ok(QuantizedBlock {
    a: get_u(word, A_W, A_LSB)? as u16,
    b: get_s(word, B_W, B_LSB)? as i8,
    c: get_s(word, C_W, C_LSB)? as i8,
    d: get_s(word, D_W, D_LSB)? as i8,
    pb_idx: get_u(word, PB_IDX_W, PB_IDX_LSB)? as u8,
    pr_idx: get_u(word, PR_IDX_W, PR_IDX_LSB)? as u8,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pack_unpack_round_trip_p3() {
    let q = QuantizedBlock {
      a: 511,
      b: -15,
      c: 7,
      d: -3,
      pb_idx: 9,
      pr_idx: 2,
    };
    let word = pack(q).unwrap();
    assert_eq!(word & !0xFFFF_FFFFu32, 0);
    let round = unpack(word).unwrap();
    assert_eq!(round, q);
  }

  #[test]
  fn occupies_exactly_32_bits() {
    let q = QuantizedBlock { a: 511, b: -1, c: -1, d: -1, pb_idx: 15, pr_idx: 15 };
    let word = pack(q).unwrap();
    assert_eq!(word, 0xFFFF_FFFF);
  }

  #[test]
  fn monochrome_gray_codeword_field() {
    let q = QuantizedBlock { a: 256, b: 0, c: 0, d: 0, pb_idx: 0, pr_idx: 0 };
    let word = pack(q).unwrap();
    assert_eq!((word >> 23) & 0x1FF, 256);
  }
}
